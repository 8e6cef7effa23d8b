use docdesk_core::notify::{Level, Notice};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// A rectangle of `width` x `height` centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

fn level_style(level: Level) -> (&'static str, &'static str, Color) {
    match level {
        Level::Success => ("✓", " Success ", Color::Green),
        Level::Info => ("ℹ", " Info ", Color::Blue),
        Level::Warning => ("⚠", " Warning ", Color::Yellow),
        Level::Danger => ("✗", " Error ", Color::Red),
    }
}

/// Toast anchored to the bottom of the screen, colored by level.
pub fn render_toast(frame: &mut Frame, notice: &Notice) {
    let area = frame.area();
    let [toast_area] = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(area);
    let [toast_area] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::End)
        .areas(toast_area);

    let (icon, title, color) = level_style(notice.level);
    let fg = if notice.level == Level::Warning {
        Color::Black
    } else {
        Color::White
    };

    frame.render_widget(Clear, toast_area);
    let toast = Paragraph::new(format!(" {icon} {}", notice.message))
        .style(Style::default().fg(fg).bg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    frame.render_widget(toast, toast_area);
}

/// Full-screen blocking overlay shown while an operation is in flight.
pub fn render_busy(frame: &mut Frame, label: &str) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Indexed(234))),
        area,
    );

    let width = u16::try_from(label.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(10)
        .max(30);
    let rect = centered(area, width, 5);
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("⏳ ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{label}..."),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ])
    .alignment(ratatui::layout::Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(body, rect);
}
