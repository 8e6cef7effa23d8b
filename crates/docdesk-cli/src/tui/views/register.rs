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

    let card = centered(body, 60, form::height(&app.register_form) + 4);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Create a company account ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [intro, fields] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(form::height(&app.register_form)),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " You will be the first user of the new company.",
            Style::default().fg(Color::DarkGray),
        ))),
        intro,
    );
    form::render(frame, &app.register_form, fields);

    frame.render_widget(
        HelpBar {
            route: app.route,
            input_mode: app.input_mode,
        },
        help,
    );
}
