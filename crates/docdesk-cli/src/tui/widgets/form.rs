use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::Form;

/// Render every field of `form` as a bordered one-line input, stacked
/// vertically. The focused field gets a yellow border and the cursor.
pub fn render(frame: &mut Frame, form: &Form, area: Rect) {
    let constraints = vec![Constraint::Length(3); form.values.len()];
    let rows = Layout::vertical(constraints).split(area);

    for (i, (label, value)) in form.labels.iter().zip(&form.values).enumerate() {
        let Some(&row) = rows.get(i) else {
            break;
        };
        let focused = i == form.focused;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let shown = if form.secret == Some(i) {
            "•".repeat(value.chars().count())
        } else {
            value.clone()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {label} "));
        frame.render_widget(Paragraph::new(shown.as_str()).block(block), row);

        if focused && row.width > 2 {
            let x = super::cursor_x(row, shown.chars().count());
            frame.set_cursor_position((x, row.y + 1));
        }
    }
}

/// Total height `form` needs.
pub fn height(form: &Form) -> u16 {
    form.values.len() as u16 * 3
}
