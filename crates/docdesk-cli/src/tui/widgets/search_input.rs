use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// A text input widget for the document filter, with cursor and focus highlight.
pub struct SearchInput<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub focused: bool,
    /// Query currently applied to the list, if any.
    pub applied: &'a str,
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };

        let title = if self.focused {
            " Search (Enter to apply, Esc to clear) ".to_string()
        } else if !self.applied.is_empty() {
            format!(" Filtered by \"{}\" (Esc to clear) ", self.applied)
        } else {
            " Search (press /) ".to_string()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Render text with cursor
        let cursor = self.cursor.min(self.text.len());
        let prefix = Span::styled("❯ ", Style::default().fg(Color::Cyan));
        let before_cursor = &self.text[..cursor];
        let after_cursor = &self.text[cursor..];

        let mut spans = vec![prefix, Span::raw(before_cursor)];

        if self.focused {
            let cursor_char = after_cursor.chars().next().unwrap_or(' ');
            spans.push(Span::styled(
                cursor_char.to_string(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            if after_cursor.len() > cursor_char.len_utf8() {
                spans.push(Span::raw(&after_cursor[cursor_char.len_utf8()..]));
            }
        } else {
            spans.push(Span::raw(after_cursor));
        }

        let line = Line::from(spans);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}
