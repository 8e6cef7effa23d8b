use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [welcome, cards, rest] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Min(0),
    ])
    .areas(area);

    let name = app
        .session
        .as_ref()
        .map(|s| s.user.full_name.as_str())
        .unwrap_or("");
    let company = app
        .session
        .as_ref()
        .map(|s| s.company.name.as_str())
        .unwrap_or("");
    let greeting = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Welcome, ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                name,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {company}"),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(greeting, welcome);

    let [total, processed, pending, chats] =
        Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(cards);
    let count = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_else(|| "—".to_string());
    let stats = app.stats.as_ref();
    stat_card(
        frame,
        total,
        "Documents",
        count(stats.map(|s| s.total_documents)),
        Color::Cyan,
    );
    stat_card(
        frame,
        processed,
        "Processed",
        count(stats.map(|s| s.processed_documents)),
        Color::Green,
    );
    stat_card(
        frame,
        pending,
        "Processing",
        count(stats.map(|s| s.pending())),
        Color::Yellow,
    );
    stat_card(
        frame,
        chats,
        "Questions asked",
        app.chat.user_turns().to_string(),
        Color::Magenta,
    );

    let hints = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  u", Style::default().fg(Color::Cyan)),
            Span::styled(" upload documents   ", Style::default().fg(Color::DarkGray)),
            Span::styled("2", Style::default().fg(Color::Cyan)),
            Span::styled(" browse documents   ", Style::default().fg(Color::DarkGray)),
            Span::styled("3", Style::default().fg(Color::Cyan)),
            Span::styled(" ask the assistant", Style::default().fg(Color::DarkGray)),
        ]),
    ]);
    frame.render_widget(hints, rest);
}

fn stat_card(frame: &mut Frame, area: Rect, label: &str, value: String, color: Color) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(card, area);
}
