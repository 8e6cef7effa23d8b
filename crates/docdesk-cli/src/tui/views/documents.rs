use docdesk_core::format::{format_date, format_file_size, truncate};
use docdesk_core::model::{Document, FileKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::tui::{
    app::{App, InputMode},
    widgets::{overlay::centered, search_input::SearchInput},
};

/// One rendered document row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub icon: &'static str,
    pub name: String,
    pub badge: String,
    pub size: String,
    pub processed: bool,
    pub status: &'static str,
    pub date: String,
}

impl DocumentRow {
    pub fn new(doc: &Document, date_format: &str) -> Self {
        Self {
            icon: doc.kind().icon(),
            name: doc.display_name().to_string(),
            badge: doc.badge(),
            size: format_file_size(doc.file_size),
            processed: doc.is_processed,
            status: doc.status_label(),
            date: format_date(doc.created_at.as_ref(), date_format),
        }
    }
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentsBody {
    Loading,
    Error(String),
    /// No documents at all: the upload call-to-action.
    Empty,
    /// Documents exist but the search matches none of them.
    NoMatches(String),
    Rows(Vec<DocumentRow>),
}

impl DocumentsBody {
    pub fn from_app(app: &App) -> Self {
        if app.documents_loading && app.documents.is_empty() {
            return Self::Loading;
        }
        if let Some(ref err) = app.documents_error {
            return Self::Error(err.clone());
        }
        if app.documents.is_empty() {
            return Self::Empty;
        }
        if app.visible.is_empty() {
            return Self::NoMatches(app.applied_query.clone());
        }
        Self::Rows(
            app.visible
                .iter()
                .filter_map(|&i| app.documents.get(i))
                .map(|d| DocumentRow::new(d, &app.date_format))
                .collect(),
        )
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [search, list] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    frame.render_widget(
        SearchInput {
            text: &app.search_input,
            cursor: app.search_cursor,
            focused: app.input_mode == InputMode::Search,
            applied: &app.applied_query,
        },
        search,
    );

    match DocumentsBody::from_app(app) {
        DocumentsBody::Loading => {
            let loading = Line::from(Span::styled(
                "  Loading documents...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(loading, list);
        }
        DocumentsBody::Error(msg) => render_message(
            frame,
            list,
            " Error ",
            Color::Red,
            vec![
                Line::from(Span::styled(
                    format!("✗ {msg}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to try again.",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
        DocumentsBody::Empty => render_message(
            frame,
            list,
            " Documents (0) ",
            Color::DarkGray,
            vec![
                Line::from(Span::styled(
                    "No documents yet",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                    Span::styled("u", Style::default().fg(Color::Cyan)),
                    Span::styled(
                        " or drop files here to upload your first document.",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ],
        ),
        DocumentsBody::NoMatches(query) => render_message(
            frame,
            list,
            " Documents ",
            Color::DarkGray,
            vec![Line::from(Span::styled(
                format!("No documents match \"{query}\"."),
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        DocumentsBody::Rows(rows) => render_table(frame, app, list, rows),
    }
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, color: Color, lines: Vec<Line>) {
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title.to_string()),
        );
    frame.render_widget(body, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect, rows: Vec<DocumentRow>) {
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Size"),
        Cell::from("Status"),
        Cell::from("Uploaded"),
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let count = rows.len();
    let table_rows: Vec<Row> = rows.into_iter().map(make_row).collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let title = if app.applied_query.is_empty() {
        format!(" Documents ({count}) ")
    } else {
        format!(" Documents ({count} of {}) ", app.documents.len())
    };

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::Indexed(236))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn make_row(row: DocumentRow) -> Row<'static> {
    let status_color = if row.processed {
        Color::Green
    } else {
        Color::Yellow
    };
    Row::new(vec![
        Cell::from(row.icon),
        Cell::from(truncate(&row.name, 60)),
        Cell::from(Span::styled(row.badge, Style::default().fg(Color::Magenta))),
        Cell::from(row.size),
        Cell::from(Span::styled(row.status, Style::default().fg(status_color))),
        Cell::from(Span::styled(row.date, Style::default().fg(Color::DarkGray))),
    ])
}

/// Delete confirmation dialog.
pub fn render_confirm(frame: &mut Frame, app: &App) {
    let Some((_, ref name)) = app.confirm_delete else {
        return;
    };
    let rect = centered(frame.area(), 56, 7);
    frame.render_widget(Clear, rect);
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(
                truncate(name, 36),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("?"),
        ]),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(Color::Cyan)),
            Span::raw(" keep"),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Confirm "),
    );
    frame.render_widget(body, rect);
}

/// Metadata popup for the selected document.
pub fn render_detail(frame: &mut Frame, app: &App) {
    let Some(doc) = app.selected_document() else {
        return;
    };
    let row = DocumentRow::new(doc, &app.date_format);
    let kind = doc.kind();
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", row.icon)),
            Span::styled(row.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Type      ", label), Span::raw(kind.to_string())]),
        Line::from(vec![Span::styled("Size      ", label), Span::raw(row.size)]),
        Line::from(vec![
            Span::styled("Status    ", label),
            Span::styled(
                row.status,
                Style::default().fg(if row.processed {
                    Color::Green
                } else {
                    Color::Yellow
                }),
            ),
        ]),
        Line::from(vec![Span::styled("Uploaded  ", label), Span::raw(row.date)]),
        Line::from(vec![Span::styled("Stored as ", label), Span::raw(doc.filename.clone())]),
        Line::from(vec![Span::styled("ID        ", label), Span::raw(doc.id.to_string())]),
    ];
    if kind == FileKind::Other {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No preview available for this type.",
            label,
        )));
    }

    let rect = centered(frame.area(), 64, lines.len() as u16 + 2);
    frame.render_widget(Clear, rect);
    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Document "),
    );
    frame.render_widget(body, rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::{doc, session};
    use crate::tui::event::AsyncResult;
    use docdesk_core::config::UiConfig;
    use docdesk_core::router::Route;
    use ratatui::{backend::TestBackend, Terminal};

    fn app_with(docs: Vec<Document>) -> App {
        let mut app = App::new(Some(session()), &UiConfig::default());
        app.navigate(Route::Documents);
        app.handle_result(AsyncResult::Documents(docs));
        app
    }

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, app, frame.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_empty_collection_is_empty_state() {
        let app = app_with(vec![]);
        assert_eq!(DocumentsBody::from_app(&app), DocumentsBody::Empty);

        let screen = render_to_string(&app);
        assert!(screen.contains("No documents yet"));
        assert!(!screen.contains("Uploaded"));
    }

    #[test]
    fn test_rows_match_collection() {
        let app = app_with(vec![
            doc(1, "a.pdf", 1536),
            doc(2, "b.docx", 0),
            doc(3, "c.png", 1024),
        ]);
        let DocumentsBody::Rows(rows) = DocumentsBody::from_app(&app) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "a.pdf");
        assert_eq!(rows[0].size, "1.5 KB");
        assert_eq!(rows[0].badge, "PDF");
        assert_eq!(rows[0].date, "09.03.2024");
        assert_eq!(rows[1].size, "0 Bytes");
        assert_eq!(rows[1].status, "Processed");
        assert_eq!(rows[2].size, "1 KB");

        let screen = render_to_string(&app);
        assert!(screen.contains("Documents (3)"));
        assert!(screen.contains("b.docx"));
        assert!(screen.contains("09.03.2024"));
    }

    #[test]
    fn test_loading_and_error_states() {
        let mut app = App::new(Some(session()), &UiConfig::default());
        app.navigate(Route::Documents);
        assert_eq!(DocumentsBody::from_app(&app), DocumentsBody::Loading);

        app.handle_result(AsyncResult::DocumentsFailed("Server unavailable".into()));
        assert_eq!(
            DocumentsBody::from_app(&app),
            DocumentsBody::Error("Server unavailable".into())
        );
        assert!(render_to_string(&app).contains("Server unavailable"));
    }

    #[test]
    fn test_no_matches_is_not_empty_state() {
        let mut app = app_with(vec![doc(1, "a.pdf", 1)]);
        app.applied_query = "zzz".into();
        app.refilter();
        assert_eq!(
            DocumentsBody::from_app(&app),
            DocumentsBody::NoMatches("zzz".into())
        );
    }
}
