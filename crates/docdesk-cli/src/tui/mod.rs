pub mod app;
pub mod event;
mod views;
mod widgets;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self as ct_event, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::execute;
use docdesk_core::api::ApiClient;
use docdesk_core::auth::AuthService;
use docdesk_core::config::DocdeskConfig;
use docdesk_core::download;
use docdesk_core::error::DocdeskError;
use docdesk_core::model::*;
use docdesk_core::router::Route;
use docdesk_core::storage;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;

use self::app::{App, InputMode};
use self::event::{AsyncAction, AsyncResult};

/// Entry point for the interactive TUI mode.
pub async fn run_tui(config: &DocdeskConfig, start: Option<Route>) -> Result<()> {
    let api = ApiClient::from_config(&config.api).context("failed to create API client")?;
    let store = storage::create_store(config).context("failed to open local storage")?;
    let auth = AuthService::new(api, store);
    let session = auth.restore_session();

    // Channels for async communication
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AsyncAction>();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<AsyncResult>();

    // Spawn async worker
    let mut worker = Worker {
        auth,
        session: session.clone(),
        download_dir: config.ui.resolved_download_dir(),
    };
    tokio::spawn(async move {
        worker.run(&mut action_rx, &result_tx).await;
    });

    let mut app = App::new(session, &config.ui);
    if let Some(action) = app.start(start) {
        action_tx.send(action)?;
    }

    // Initialize terminal
    let mut terminal = ratatui::init();
    let _ = execute!(std::io::stdout(), EnableBracketedPaste);

    let result = run_loop(&mut terminal, &mut app, &action_tx, &mut result_rx);

    // Restore terminal
    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}

fn run_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    action_tx: &mpsc::UnboundedSender<AsyncAction>,
    result_rx: &mut mpsc::UnboundedReceiver<AsyncResult>,
) -> Result<()> {
    loop {
        // Draw
        terminal.draw(|frame| render(frame, app))?;

        // Poll for async results (non-blocking)
        while let Ok(result) = result_rx.try_recv() {
            app.handle_result(result);
        }

        // Reloads queued by completed operations
        for action in app.drain_actions() {
            let _ = action_tx.send(action);
        }

        // Poll for terminal events (50ms timeout for responsive UI)
        if ct_event::poll(Duration::from_millis(50))? {
            match ct_event::read()? {
                Event::Key(key) => {
                    if let Some(action) = app.handle_key(key) {
                        let _ = action_tx.send(action);
                    }
                }
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        // Toast expiry and search debounce
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    match app.route {
        Route::Login => views::login::render(frame, app, area),
        Route::Register => views::register::render(frame, app, area),
        Route::Dashboard | Route::Documents | Route::Chat => {
            views::shell::render(frame, app, area)
        }
    }

    if app.route == Route::Documents {
        match app.input_mode {
            InputMode::Upload => views::upload::render(frame, app),
            InputMode::ConfirmDelete => views::documents::render_confirm(frame, app),
            InputMode::Detail => views::documents::render_detail(frame, app),
            InputMode::Normal | InputMode::Search => {}
        }
    }

    if let Some(label) = app.busy.label() {
        widgets::overlay::render_busy(frame, label);
    }

    if let Some(notice) = app.notifier.current() {
        widgets::overlay::render_toast(frame, notice);
    }
}

/// Async worker: owns the API client and the persisted session.
struct Worker {
    auth: AuthService,
    session: Option<Session>,
    download_dir: PathBuf,
}

impl Worker {
    async fn run(
        &mut self,
        action_rx: &mut mpsc::UnboundedReceiver<AsyncAction>,
        result_tx: &mpsc::UnboundedSender<AsyncResult>,
    ) {
        while let Some(action) = action_rx.recv().await {
            let Some(result) = self.handle(action).await else {
                continue;
            };
            if result_tx.send(result).is_err() {
                break; // UI closed
            }
        }
    }

    async fn handle(&mut self, action: AsyncAction) -> Option<AsyncResult> {
        let result = match action {
            AsyncAction::Login { email, password } => {
                match self.auth.login(&email, &password).await {
                    Ok(session) => {
                        self.session = Some(session.clone());
                        AsyncResult::LoggedIn(Box::new(session))
                    }
                    Err(e) => AsyncResult::Error(e.user_message("Login failed")),
                }
            }
            AsyncAction::Register(request) => match self.auth.register(&request).await {
                Ok(message) => AsyncResult::Registered { message },
                Err(e) => AsyncResult::Error(e.user_message("Registration failed")),
            },
            AsyncAction::Logout => {
                let session = self.session.take();
                if let Err(e) = self.auth.logout(session.as_ref()).await {
                    tracing::warn!(error = %e, "failed to clear stored session");
                }
                AsyncResult::LoggedOut
            }
            AsyncAction::LoadStats => {
                let session = self.session.as_ref()?;
                match self.auth.api().stats(session).await {
                    Ok(stats) => AsyncResult::Stats(stats),
                    Err(e) => {
                        if let Some(expired) = self.expire_on_401(&e) {
                            return Some(expired);
                        }
                        // Counters stay blank; nothing to tell the user.
                        tracing::warn!(error = %e, "failed to load stats");
                        return None;
                    }
                }
            }
            AsyncAction::LoadDocuments => {
                let Some(session) = self.session.as_ref() else {
                    return Some(AsyncResult::SessionExpired);
                };
                match self.auth.api().list_documents(session).await {
                    Ok(docs) => AsyncResult::Documents(docs),
                    Err(e) => self.expire_on_401(&e).unwrap_or_else(|| {
                        AsyncResult::DocumentsFailed(e.user_message("Could not load documents"))
                    }),
                }
            }
            AsyncAction::Upload(selection) => {
                let Some(session) = self.session.as_ref() else {
                    return Some(AsyncResult::SessionExpired);
                };
                match self.auth.api().upload(session, &selection).await {
                    Ok(resp) => AsyncResult::Uploaded {
                        message: resp
                            .message
                            .unwrap_or_else(|| "Files uploaded successfully".to_string()),
                    },
                    Err(e) => self.expire_on_401(&e).unwrap_or_else(|| {
                        AsyncResult::UploadFailed(e.user_message("Upload failed"))
                    }),
                }
            }
            AsyncAction::DeleteDocument { id, name } => {
                let Some(session) = self.session.as_ref() else {
                    return Some(AsyncResult::SessionExpired);
                };
                match self.auth.api().delete_document(session, id).await {
                    Ok(message) => AsyncResult::Deleted {
                        message: message.unwrap_or_else(|| format!("Deleted {name}")),
                    },
                    Err(e) => self.expire_on_401(&e).unwrap_or_else(|| {
                        AsyncResult::Error(e.user_message("Could not delete document"))
                    }),
                }
            }
            AsyncAction::DownloadDocument { id, name } => {
                let Some(session) = self.session.as_ref() else {
                    return Some(AsyncResult::SessionExpired);
                };
                let saved = match self.auth.api().download_document(session, id).await {
                    Ok(bytes) => download::save(&self.download_dir, &name, &bytes).await,
                    Err(e) => Err(e),
                };
                match saved {
                    Ok(path) => AsyncResult::Downloaded { path },
                    Err(e) => self.expire_on_401(&e).unwrap_or_else(|| {
                        AsyncResult::Error(e.user_message("Could not download document"))
                    }),
                }
            }
            AsyncAction::SendChat { message } => {
                let Some(session) = self.session.as_ref() else {
                    return Some(AsyncResult::SessionExpired);
                };
                match self.auth.api().send_chat(session, &message).await {
                    Ok(reply) => AsyncResult::ChatReply(Ok(reply)),
                    Err(e) => self
                        .expire_on_401(&e)
                        .unwrap_or_else(|| AsyncResult::ChatReply(Err(e.to_string()))),
                }
            }
        };
        Some(result)
    }

    /// A 401 on an authenticated call means the stored token is no longer
    /// valid: drop it and tell the UI to return to login.
    fn expire_on_401(&mut self, err: &DocdeskError) -> Option<AsyncResult> {
        if !err.is_unauthorized() {
            return None;
        }
        tracing::info!("session rejected by server, signing out");
        self.session = None;
        if let Err(e) = self.auth.clear() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        Some(AsyncResult::SessionExpired)
    }
}
