use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{
    app::App,
    widgets::{form, help_bar::HelpBar, overlay::centered},
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [body, help] = Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let card = centered(body, 56, form::height(&app.login_form) + 6);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Sign in ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [intro, fields, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(form::height(&app.login_form)),
        Constraint::Min(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " Sign in to your company workspace.",
            Style::default().fg(Color::DarkGray),
        ))),
        intro,
    );
    form::render(frame, &app.login_form, fields);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" No account? ", Style::default().fg(Color::DarkGray)),
            Span::styled("Ctrl+R", Style::default().fg(Color::Cyan)),
            Span::styled(" to register", Style::default().fg(Color::DarkGray)),
        ])),
        footer,
    );

    frame.render_widget(
        HelpBar {
            route: app.route,
            input_mode: app.input_mode,
        },
        help,
    );
}
