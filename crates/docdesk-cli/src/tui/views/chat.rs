use docdesk_core::model::{ChatMessage, ChatRole};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::widgets::cursor_x;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [history, input] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

    let lines = transcript(app.chat.messages(), app.chat.is_pending());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Ask your documents ");
    let inner_height = history.height.saturating_sub(2);
    let inner_width = history.width.saturating_sub(2).max(1);

    // Pin to the bottom; PgUp scrolls back.
    let total = wrapped_height(&lines, inner_width);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    let bottom = total.saturating_sub(inner_height);
    let offset = bottom.saturating_sub(app.chat_scroll);
    frame.render_widget(paragraph.scroll((offset, 0)), history);

    let locked = app.chat.is_pending();
    let (border, title) = if locked {
        (Color::DarkGray, " Waiting for reply... ")
    } else {
        (Color::Yellow, " Message (Enter to send) ")
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    frame.render_widget(
        Paragraph::new(app.chat_input.as_str()).block(input_block),
        input,
    );
    if !locked && input.width > 2 {
        let x = cursor_x(input, app.chat_input.chars().count());
        frame.set_cursor_position((x, input.y + 1));
    }
}

/// Rows `lines` occupy when wrapped at `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width as usize;
    lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(width))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

/// Lines for the message history, with a trailing indicator while a reply is pending.
pub fn transcript(messages: &[ChatMessage], pending: bool) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    for message in messages {
        let (who, color) = match message.role {
            ChatRole::User => ("You", Color::Cyan),
            ChatRole::Assistant => ("Assistant", Color::Magenta),
        };
        lines.push(Line::from(vec![
            Span::styled(
                who,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  {}",
                    message.timestamp.with_timezone(&chrono::Local).format("%H:%M")
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for text in message.content.lines() {
            lines.push(Line::from(format!("  {text}")));
        }
        lines.push(Line::from(""));
    }
    if pending {
        lines.push(Line::from(Span::styled(
            "Assistant is typing…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use docdesk_core::chat::ChatLog;

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_pending_indicator_follows_user_message() {
        let mut log = ChatLog::new();
        log.submit("Hello").unwrap();
        let lines = text(&transcript(log.messages(), log.is_pending()));
        assert!(lines.iter().any(|l| l == "  Hello"));
        assert_eq!(lines.last().map(String::as_str), Some("Assistant is typing…"));
    }

    #[test]
    fn test_indicator_replaced_by_reply() {
        let mut log = ChatLog::new();
        log.submit("Hello").unwrap();
        log.resolve(Ok("Hi!\nHow can I help?".into()));
        let lines = text(&transcript(log.messages(), log.is_pending()));
        assert!(!lines.iter().any(|l| l.contains("typing")));
        assert!(lines.iter().any(|l| l == "  How can I help?"));
    }
}
