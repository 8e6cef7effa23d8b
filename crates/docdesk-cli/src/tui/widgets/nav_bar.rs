use docdesk_core::router::{Route, SHELL_ROUTES};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Top bar: view tabs on the left, company and user on the right.
pub struct NavBar<'a> {
    pub active: Route,
    pub company: &'a str,
    pub user: &'a str,
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            " docdesk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::raw(" "));

        for (i, route) in SHELL_ROUTES.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, route.title());
            let style = if *route == self.active {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Indexed(236))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(label, style));
        }

        let left = Line::from(spans);
        buf.set_line(area.x, area.y, &left, area.width);

        let identity = format!("{} · {} ", self.company, self.user);
        let width = identity.chars().count();
        if width + left.width() + 2 <= area.width as usize {
            let width = width as u16;
            let line = Line::from(Span::styled(identity, Style::default().fg(Color::DarkGray)));
            buf.set_line(area.right() - width, area.y, &line, width);
        }
    }
}
