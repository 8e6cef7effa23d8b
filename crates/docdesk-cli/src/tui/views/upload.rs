use docdesk_core::format::{format_file_size, truncate};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::tui::{
    app::App,
    widgets::{cursor_x, overlay::centered},
};

/// Upload modal: path input, drop hint and the current selection.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let height = u16::try_from(app.upload.len())
        .unwrap_or(u16::MAX)
        .saturating_add(10)
        .max(12);
    let rect = centered(area, 72, height);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Upload documents ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let [hint, input, files, summary] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                " Drop files onto the terminal, or type a path and press Enter.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                " Press Enter on an empty line or Ctrl+S to upload.",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        hint,
    );

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Path ");
    frame.render_widget(
        Paragraph::new(app.upload_input.as_str()).block(input_block),
        input,
    );
    if input.width > 2 {
        let x = cursor_x(input, app.upload_input.chars().count());
        frame.set_cursor_position((x, input.y + 1));
    }

    let items: Vec<ListItem> = if app.upload.is_empty() {
        vec![ListItem::new(Span::styled(
            "  No files selected",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.upload
            .files()
            .iter()
            .map(|f| {
                ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::raw(truncate(&f.name, 52)),
                    Span::styled(
                        format!("  {}", format_file_size(f.size)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };
    frame.render_widget(List::new(items), files);

    if !app.upload.is_empty() {
        frame.render_widget(
            Line::from(Span::styled(
                format!(" Selected: {}", app.upload.summary()),
                Style::default().fg(Color::Green),
            )),
            summary,
        );
    }
}
