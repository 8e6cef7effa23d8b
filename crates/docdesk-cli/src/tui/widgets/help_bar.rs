use docdesk_core::router::Route;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::tui::app::InputMode;

/// Bottom help bar showing context-sensitive key bindings.
pub struct HelpBar {
    pub route: Route,
    pub input_mode: InputMode,
}

impl HelpBar {
    fn bindings(&self) -> &'static [(&'static str, &'static str)] {
        match (self.route, self.input_mode) {
            (Route::Login, _) => &[
                ("Tab", "next field"),
                ("Enter", "sign in"),
                ("Ctrl+R", "register"),
                ("Esc", "quit"),
            ],
            (Route::Register, _) => &[
                ("Tab", "next field"),
                ("Ctrl+S", "create account"),
                ("Esc", "back to sign in"),
            ],
            (Route::Dashboard, _) => &[
                ("1/2/3", "switch view"),
                ("u", "upload"),
                ("r", "refresh"),
                ("L", "sign out"),
                ("q", "quit"),
            ],
            (Route::Documents, InputMode::Normal) => &[
                ("j/k", "navigate"),
                ("Enter", "details"),
                ("/", "search"),
                ("u", "upload"),
                ("s", "save"),
                ("d", "delete"),
                ("r", "refresh"),
                ("Tab", "next view"),
                ("q", "quit"),
            ],
            (Route::Documents, InputMode::Search) => &[
                ("Enter", "apply"),
                ("Esc", "clear"),
            ],
            (Route::Documents, InputMode::Upload) => &[
                ("Enter", "add path / upload"),
                ("Ctrl+S", "upload"),
                ("Ctrl+D", "remove last"),
                ("Esc", "close"),
            ],
            (Route::Documents, InputMode::ConfirmDelete) => &[("y", "delete"), ("n/Esc", "keep")],
            (Route::Documents, InputMode::Detail) => &[
                ("s", "save"),
                ("d", "delete"),
                ("Esc", "close"),
            ],
            (Route::Chat, _) => &[
                ("Enter", "send"),
                ("PgUp/PgDn", "scroll"),
                ("Esc", "clear input"),
                ("Tab", "next view"),
            ],
        }
    }
}

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::DarkGray);
        let key_style = Style::default().fg(Color::Cyan);

        let bindings = self.bindings();
        let mut spans: Vec<Span> = Vec::with_capacity(bindings.len() * 2);
        for (i, (key, label)) in bindings.iter().enumerate() {
            spans.push(Span::styled(*key, key_style));
            let sep = if i + 1 == bindings.len() { "" } else { "  " };
            spans.push(Span::styled(format!(" {label}{sep}"), style));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
