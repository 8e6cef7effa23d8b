use docdesk_core::router::Route;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::tui::{
    app::App,
    views::{chat, dashboard, documents},
    widgets::{help_bar::HelpBar, nav_bar::NavBar},
};

/// Signed-in layout: nav bar, the active view, help bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [nav, body, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(area);

    let (company, user) = app
        .session
        .as_ref()
        .map(|s| (s.company.name.as_str(), s.user.full_name.as_str()))
        .unwrap_or(("", ""));
    frame.render_widget(
        NavBar {
            active: app.route,
            company,
            user,
        },
        nav,
    );

    match app.route {
        Route::Dashboard => dashboard::render(frame, app, body),
        Route::Documents => documents::render(frame, app, body),
        Route::Chat => chat::render(frame, app, body),
        Route::Login | Route::Register => {}
    }

    frame.render_widget(
        HelpBar {
            route: app.route,
            input_mode: app.input_mode,
        },
        help,
    );
}
