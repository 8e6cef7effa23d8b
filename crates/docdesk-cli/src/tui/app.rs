use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use docdesk_core::chat::ChatLog;
use docdesk_core::config::UiConfig;
use docdesk_core::debounce::Debouncer;
use docdesk_core::model::*;
use docdesk_core::notify::{Busy, Level, Notifier};
use docdesk_core::router::{self, Loader, Route};
use docdesk_core::upload::UploadSelection;

use super::event::{AsyncAction, AsyncResult};

/// Input mode within the documents screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    ConfirmDelete,
    Upload,
    Detail,
}

pub const LOGIN_FIELDS: &[&str] = &["Email", "Password"];
pub const REGISTER_FIELDS: &[&str] = &[
    "Company name",
    "Company email",
    "Full name",
    "Email",
    "Password",
];

/// A column of labelled single-line text fields.
#[derive(Debug, Clone)]
pub struct Form {
    pub labels: &'static [&'static str],
    pub values: Vec<String>,
    pub focused: usize,
    /// Index of the field rendered as `•••`.
    pub secret: Option<usize>,
}

impl Form {
    pub fn new(labels: &'static [&'static str], secret: Option<usize>) -> Self {
        Self {
            labels,
            values: vec![String::new(); labels.len()],
            focused: 0,
            secret,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.values.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = if self.focused == 0 {
            self.values.len() - 1
        } else {
            self.focused - 1
        };
    }

    pub fn is_last_focused(&self) -> bool {
        self.focused + 1 == self.values.len()
    }

    pub fn push(&mut self, c: char) {
        self.values[self.focused].push(c);
    }

    pub fn insert_str(&mut self, s: &str) {
        // Pasted text may carry a trailing newline.
        self.values[self.focused].push_str(s.trim_end_matches(['\r', '\n']));
    }

    pub fn pop(&mut self) {
        self.values[self.focused].pop();
    }

    pub fn clear(&mut self) {
        for v in &mut self.values {
            v.clear();
        }
        self.focused = 0;
    }

    /// Edit keys shared by every form. Returns `true` if the key was consumed.
    fn handle_edit(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Backspace => self.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.push(c),
            _ => return false,
        }
        true
    }
}

/// Central application state.
pub struct App {
    pub route: Route,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub session: Option<Session>,
    pub date_format: String,

    // -- Overlays --
    pub busy: Busy,
    pub notifier: Notifier,

    // -- Login / Register --
    pub login_form: Form,
    pub register_form: Form,

    // -- Dashboard --
    pub stats: Option<DocumentStats>,

    // -- Documents --
    pub documents: Vec<Document>,
    pub documents_loading: bool,
    pub documents_error: Option<String>,
    pub visible: Vec<usize>, // indices into `documents`
    pub selected: usize,
    pub search_input: String,
    pub search_cursor: usize,
    pub applied_query: String,
    pub search_debounce: Debouncer,
    pub confirm_delete: Option<(i64, String)>,

    // -- Upload --
    pub upload: UploadSelection,
    pub upload_input: String,

    // -- Chat --
    pub chat: ChatLog,
    pub chat_input: String,
    pub chat_scroll: u16,

    /// Follow-up actions produced while handling results (e.g. reloads).
    outbox: Vec<AsyncAction>,
}

impl App {
    pub fn new(session: Option<Session>, ui: &UiConfig) -> Self {
        Self {
            route: Route::Login,
            input_mode: InputMode::Normal,
            should_quit: false,
            session,
            date_format: ui.date_format.clone(),

            busy: Busy::default(),
            notifier: Notifier::new(Duration::from_secs(ui.toast_secs)),

            login_form: Form::new(LOGIN_FIELDS, Some(1)),
            register_form: Form::new(REGISTER_FIELDS, Some(4)),

            stats: None,

            documents: Vec::new(),
            documents_loading: false,
            documents_error: None,
            visible: Vec::new(),
            selected: 0,
            search_input: String::new(),
            search_cursor: 0,
            applied_query: String::new(),
            search_debounce: Debouncer::new(Duration::from_millis(ui.search_debounce_ms)),
            confirm_delete: None,

            upload: UploadSelection::new(),
            upload_input: String::new(),

            chat: ChatLog::new(),
            chat_input: String::new(),
            chat_scroll: 0,

            outbox: Vec::new(),
        }
    }

    /// Initial navigation: dashboard with a restored session, login otherwise.
    pub fn start(&mut self, requested: Option<Route>) -> Option<AsyncAction> {
        let route = requested.unwrap_or(router::initial(self.session.is_some()).route);
        let action = self.navigate(route);
        // The redirect warning makes no sense before the user did anything.
        if self.route == Route::Login {
            self.notifier.dismiss();
        }
        action
    }

    /// Move to `requested`, applying the authentication guard, and return the
    /// load the view needs.
    pub fn navigate(&mut self, requested: Route) -> Option<AsyncAction> {
        let nav = router::resolve(requested, self.session.is_some());
        self.route = nav.route;
        self.input_mode = InputMode::Normal;
        if nav.redirected {
            self.notify(Level::Warning, "Please sign in to continue");
        }
        match nav.load? {
            Loader::Stats => Some(AsyncAction::LoadStats),
            Loader::Documents => {
                self.documents_loading = true;
                Some(AsyncAction::LoadDocuments)
            }
            Loader::ChatGreeting => {
                self.chat.seed_greeting();
                None
            }
        }
    }

    pub fn notify(&mut self, level: Level, message: impl Into<String>) {
        self.notifier.push(level, message, Instant::now());
    }

    /// Take the follow-up actions queued by `handle_result`.
    pub fn drain_actions(&mut self) -> Vec<AsyncAction> {
        std::mem::take(&mut self.outbox)
    }

    /// Reload the document list and the dashboard counters, once each.
    fn queue_refresh(&mut self) {
        self.documents_loading = true;
        self.outbox.push(AsyncAction::LoadDocuments);
        self.outbox.push(AsyncAction::LoadStats);
    }

    /// Process an async result from the worker.
    pub fn handle_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::LoggedIn(session) => {
                self.busy.end();
                self.session = Some(*session);
                self.login_form.clear();
                if let Some(action) = self.navigate(Route::Dashboard) {
                    self.outbox.push(action);
                }
                self.notify(Level::Success, "Signed in successfully");
            }
            AsyncResult::Registered { message } => {
                self.busy.end();
                let email = self.register_form.value(3).to_string();
                self.register_form.clear();
                self.navigate(Route::Login);
                self.login_form.clear();
                self.login_form.values[0] = email;
                self.login_form.focused = 1;
                self.notify(
                    Level::Success,
                    message.unwrap_or_else(|| {
                        "Registration successful! You can sign in now.".to_string()
                    }),
                );
            }
            AsyncResult::LoggedOut => {
                self.sign_out_locally();
                self.notify(Level::Info, "Signed out");
            }
            AsyncResult::SessionExpired => {
                self.sign_out_locally();
                self.notify(
                    Level::Warning,
                    "Your session has expired. Please sign in again.",
                );
            }
            AsyncResult::Stats(stats) => {
                self.stats = Some(stats);
            }
            AsyncResult::Documents(documents) => {
                self.documents = documents;
                self.documents_loading = false;
                self.documents_error = None;
                self.refilter();
            }
            AsyncResult::DocumentsFailed(msg) => {
                self.documents.clear();
                self.visible.clear();
                self.selected = 0;
                self.documents_loading = false;
                self.documents_error = Some(msg);
            }
            AsyncResult::Uploaded { message } => {
                self.busy.end();
                self.upload.clear();
                self.upload_input.clear();
                if self.input_mode == InputMode::Upload {
                    self.input_mode = InputMode::Normal;
                }
                self.notify(Level::Success, message);
                self.queue_refresh();
            }
            AsyncResult::UploadFailed(msg) => {
                self.busy.end();
                self.notify(Level::Danger, msg);
            }
            AsyncResult::Deleted { message } => {
                self.busy.end();
                self.notify(Level::Success, message);
                self.queue_refresh();
            }
            AsyncResult::Downloaded { path } => {
                self.busy.end();
                self.notify(Level::Success, format!("Saved to {}", path.display()));
            }
            AsyncResult::ChatReply(reply) => {
                self.chat.resolve(reply);
                self.chat_scroll = 0;
            }
            AsyncResult::Error(msg) => {
                self.busy.end();
                self.notify(Level::Danger, msg);
            }
        }
    }

    fn sign_out_locally(&mut self) {
        self.busy.reset();
        self.session = None;
        self.stats = None;
        self.documents.clear();
        self.visible.clear();
        self.selected = 0;
        self.documents_error = None;
        self.search_input.clear();
        self.search_cursor = 0;
        self.applied_query.clear();
        self.search_debounce.cancel();
        self.upload.clear();
        self.upload_input.clear();
        self.chat.clear();
        self.chat_input.clear();
        self.outbox.clear();
        self.navigate(Route::Login);
    }

    /// Advance timers: toast expiry and the search debounce.
    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
        if self.search_debounce.poll(now) {
            self.apply_search();
        }
    }

    /// Handle a key event. Returns an optional async action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }
        // The busy overlay blocks interaction until the operation finishes.
        if self.busy.is_active() {
            return None;
        }

        match (self.route, self.input_mode) {
            (Route::Login, _) => self.handle_login(key),
            (Route::Register, _) => self.handle_register(key),
            (Route::Dashboard, _) => self.handle_dashboard(key),
            (Route::Documents, InputMode::Normal) => self.handle_documents_normal(key),
            (Route::Documents, InputMode::Search) => {
                self.handle_documents_search(key, Instant::now());
                None
            }
            (Route::Documents, InputMode::ConfirmDelete) => self.handle_confirm_delete(key),
            (Route::Documents, InputMode::Upload) => self.handle_upload(key),
            (Route::Documents, InputMode::Detail) => self.handle_detail(key),
            (Route::Chat, _) => self.handle_chat(key),
        }
    }

    /// Handle pasted text. Terminals deliver dropped files this way.
    pub fn handle_paste(&mut self, text: &str) {
        if self.busy.is_active() {
            return;
        }
        match (self.route, self.input_mode) {
            (Route::Login, _) => self.login_form.insert_str(text),
            (Route::Register, _) => self.register_form.insert_str(text),
            (Route::Documents, InputMode::Normal | InputMode::Upload) => {
                self.input_mode = InputMode::Upload;
                self.add_dropped(text);
            }
            (Route::Documents, InputMode::Search) => {
                let line = text.lines().next().unwrap_or("");
                self.search_input.insert_str(self.search_cursor, line);
                self.search_cursor += line.len();
                self.search_debounce.trigger(Instant::now());
            }
            (Route::Chat, _) => self.chat_input.push_str(text.trim_end()),
            _ => {}
        }
    }

    // -- Login / Register --

    fn handle_login(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => self.navigate(Route::Register),
            KeyCode::F(2) => self.navigate(Route::Register),
            KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Enter => {
                if !self.login_form.is_last_focused() && self.login_form.value(1).is_empty() {
                    self.login_form.focus_next();
                    return None;
                }
                self.submit_login()
            }
            _ => {
                self.login_form.handle_edit(key);
                None
            }
        }
    }

    fn submit_login(&mut self) -> Option<AsyncAction> {
        let request = LoginRequest::new(self.login_form.value(0).trim(), self.login_form.value(1));
        if let Err(e) = request.validate() {
            self.notify(Level::Warning, e.user_message("Please fill in all fields"));
            return None;
        }
        self.busy.begin("Signing in");
        Some(AsyncAction::Login {
            email: request.email,
            password: request.password,
        })
    }

    fn handle_register(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.navigate(Route::Login),
            KeyCode::Char('s') if ctrl => self.submit_register(),
            KeyCode::Enter if self.register_form.is_last_focused() => self.submit_register(),
            KeyCode::Enter => {
                self.register_form.focus_next();
                None
            }
            _ => {
                self.register_form.handle_edit(key);
                None
            }
        }
    }

    fn submit_register(&mut self) -> Option<AsyncAction> {
        let f = &self.register_form;
        let request = RegisterRequest {
            company_name: f.value(0).trim().to_string(),
            company_email: f.value(1).trim().to_string(),
            username: f.value(2).trim().to_string(),
            user_email: f.value(3).trim().to_string(),
            password: f.value(4).to_string(),
        };
        if let Err(e) = request.validate() {
            self.notify(Level::Warning, e.user_message("Please fill in all fields"));
            return None;
        }
        self.busy.begin("Creating account");
        Some(AsyncAction::Register(request))
    }

    // -- Shell navigation shared by the authenticated views --

    fn handle_shell_nav(&mut self, key: KeyEvent) -> Option<Option<AsyncAction>> {
        let action = match key.code {
            KeyCode::Tab => self.navigate(self.route.next_shell()),
            KeyCode::BackTab => self.navigate(self.route.prev_shell()),
            KeyCode::Char('1') => self.navigate(Route::Dashboard),
            KeyCode::Char('2') => self.navigate(Route::Documents),
            KeyCode::Char('3') => self.navigate(Route::Chat),
            KeyCode::Char('L') => {
                self.busy.begin("Signing out");
                Some(AsyncAction::Logout)
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            _ => return None,
        };
        Some(action)
    }

    fn handle_dashboard(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        if let Some(action) = self.handle_shell_nav(key) {
            return action;
        }
        match key.code {
            KeyCode::Char('r') => Some(AsyncAction::LoadStats),
            KeyCode::Char('u') => {
                let action = self.navigate(Route::Documents);
                self.input_mode = InputMode::Upload;
                action
            }
            _ => None,
        }
    }

    // -- Documents --

    fn handle_documents_normal(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        if let Some(action) = self.handle_shell_nav(key) {
            return action;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') => {
                self.selected = self.visible.len().saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.move_selection(20);
                None
            }
            KeyCode::PageUp => {
                self.move_selection(-20);
                None
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.search_cursor = self.search_input.len();
                None
            }
            KeyCode::Char('u') => {
                self.input_mode = InputMode::Upload;
                None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(doc) = self.selected_document() {
                    self.confirm_delete = Some((doc.id, doc.display_name().to_string()));
                    self.input_mode = InputMode::ConfirmDelete;
                }
                None
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                if self.selected_document().is_some() {
                    self.input_mode = InputMode::Detail;
                }
                None
            }
            KeyCode::Char('s') => self.download_selected(),
            KeyCode::Char('r') => {
                self.documents_loading = true;
                Some(AsyncAction::LoadDocuments)
            }
            KeyCode::Esc => {
                if !self.applied_query.is_empty() || !self.search_input.is_empty() {
                    self.search_input.clear();
                    self.search_cursor = 0;
                    self.search_debounce.cancel();
                    self.apply_search();
                }
                None
            }
            _ => None,
        }
    }

    fn handle_documents_search(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
                self.search_cursor = 0;
                self.search_debounce.cancel();
                self.apply_search();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.search_debounce.cancel();
                self.apply_search();
            }
            KeyCode::Backspace => {
                if self.search_cursor > 0 {
                    let prev = self.search_input[..self.search_cursor]
                        .chars()
                        .next_back()
                        .map(char::len_utf8)
                        .unwrap_or(1);
                    self.search_cursor -= prev;
                    self.search_input.remove(self.search_cursor);
                    self.search_debounce.trigger(now);
                }
            }
            KeyCode::Left => {
                if let Some(c) = self.search_input[..self.search_cursor].chars().next_back() {
                    self.search_cursor -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = self.search_input[self.search_cursor..].chars().next() {
                    self.search_cursor += c.len_utf8();
                }
            }
            KeyCode::Char(c) => {
                self.search_input.insert(self.search_cursor, c);
                self.search_cursor += c.len_utf8();
                self.search_debounce.trigger(now);
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        self.input_mode = InputMode::Normal;
        let (id, name) = self.confirm_delete.take()?;
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.busy.begin(format!("Deleting {name}"));
                Some(AsyncAction::DeleteDocument { id, name })
            }
            _ => None,
        }
    }

    fn handle_detail(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Char('s') => {
                self.input_mode = InputMode::Normal;
                self.download_selected()
            }
            KeyCode::Char('d') => {
                self.input_mode = InputMode::Normal;
                self.handle_documents_normal(key)
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Backspace => {
                self.input_mode = InputMode::Normal;
                None
            }
            _ => None,
        }
    }

    fn download_selected(&mut self) -> Option<AsyncAction> {
        let (id, name) = self
            .selected_document()
            .map(|d| (d.id, d.display_name().to_string()))?;
        self.busy.begin(format!("Downloading {name}"));
        Some(AsyncAction::DownloadDocument { id, name })
    }

    // -- Upload --

    fn handle_upload(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Char('s') if ctrl => self.submit_upload(),
            KeyCode::Char('d') if ctrl => {
                if !self.upload.is_empty() {
                    self.upload.remove(self.upload.len() - 1);
                }
                None
            }
            KeyCode::Enter => {
                if self.upload_input.trim().is_empty() {
                    return self.submit_upload();
                }
                let text = std::mem::take(&mut self.upload_input);
                self.add_dropped(&text);
                None
            }
            KeyCode::Backspace => {
                self.upload_input.pop();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.upload_input.push(c);
                None
            }
            _ => None,
        }
    }

    fn add_dropped(&mut self, text: &str) {
        let (added, errors) = self.upload.add_dropped(text);
        if let Some(first) = errors.first() {
            let extra = if errors.len() > 1 {
                format!(" (+{} more)", errors.len() - 1)
            } else {
                String::new()
            };
            self.notify(
                Level::Warning,
                format!("{}{extra}", first.user_message("Could not add file")),
            );
        } else if added > 0 {
            self.notify(Level::Info, format!("Selected {}", self.upload.summary()));
        }
    }

    fn submit_upload(&mut self) -> Option<AsyncAction> {
        if let Err(e) = self.upload.validate() {
            self.notify(Level::Warning, e.user_message("Please select at least one file"));
            return None;
        }
        self.busy
            .begin(format!("Uploading {}", self.upload.summary()));
        Some(AsyncAction::Upload(self.upload.clone()))
    }

    // -- Chat --

    fn handle_chat(&mut self, key: KeyEvent) -> Option<AsyncAction> {
        match key.code {
            KeyCode::Tab => self.navigate(self.route.next_shell()),
            KeyCode::BackTab => self.navigate(self.route.prev_shell()),
            KeyCode::Enter => match self.chat.submit(&self.chat_input) {
                Ok(message) => {
                    self.chat_input.clear();
                    self.chat_scroll = 0;
                    Some(AsyncAction::SendChat { message })
                }
                Err(e) => {
                    self.notify(Level::Warning, e.user_message("Cannot send message"));
                    None
                }
            },
            KeyCode::Esc => {
                self.chat_input.clear();
                None
            }
            KeyCode::Backspace => {
                self.chat_input.pop();
                None
            }
            KeyCode::PageUp => {
                self.chat_scroll = self.chat_scroll.saturating_add(5);
                None
            }
            KeyCode::PageDown => {
                self.chat_scroll = self.chat_scroll.saturating_sub(5);
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.chat_input.push(c);
                None
            }
            _ => None,
        }
    }

    // -- List helpers --

    pub fn selected_document(&self) -> Option<&Document> {
        self.visible
            .get(self.selected)
            .and_then(|&idx| self.documents.get(idx))
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.visible.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected as i32;
        let new = (current + delta).clamp(0, len as i32 - 1);
        self.selected = new as usize;
    }

    fn apply_search(&mut self) {
        self.applied_query = self.search_input.trim().to_lowercase();
        self.refilter();
        self.selected = 0;
    }

    /// Recompute `visible` from the applied search query.
    pub fn refilter(&mut self) {
        let query = &self.applied_query;
        self.visible = self
            .documents
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                query.is_empty()
                    || d.display_name().to_lowercase().contains(query.as_str())
                    || d.file_type.to_lowercase() == *query
            })
            .map(|(i, _)| i)
            .collect();
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub(crate) fn session() -> Session {
        Session {
            user: User {
                id: 1,
                full_name: "Ann Example".into(),
                email: "ann@acme.example".into(),
                role: Some("admin".into()),
                company_id: Some(9),
            },
            company: Company {
                id: 9,
                name: "Acme".into(),
                email: None,
            },
            token: "t0k".into(),
        }
    }

    pub(crate) fn doc(id: i64, name: &str, size: u64) -> Document {
        let ext = name.rsplit('.').next().unwrap_or("").to_string();
        Document {
            id,
            filename: format!("{id}_{name}"),
            original_filename: Some(name.to_string()),
            file_type: ext,
            file_size: size,
            is_processed: id % 2 == 0,
            created_at: chrono::DateTime::parse_from_rfc3339("2024-03-09T10:00:00Z")
                .ok()
                .map(|d| d.with_timezone(&chrono::Utc)),
        }
    }

    fn signed_in_app() -> App {
        let mut app = App::new(Some(session()), &UiConfig::default());
        app.start(None);
        app
    }

    fn documents_app(docs: Vec<Document>) -> App {
        let mut app = signed_in_app();
        app.navigate(Route::Documents);
        app.handle_result(AsyncResult::Documents(docs));
        app
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_start_without_session_shows_login() {
        let mut app = App::new(None, &UiConfig::default());
        let action = app.start(None);
        assert_eq!(app.route, Route::Login);
        assert!(action.is_none());
        assert!(app.notifier.current().is_none());
    }

    #[test]
    fn test_start_with_restored_session_loads_dashboard() {
        let mut app = App::new(Some(session()), &UiConfig::default());
        let action = app.start(None);
        assert_eq!(app.route, Route::Dashboard);
        assert!(matches!(action, Some(AsyncAction::LoadStats)));
    }

    #[test]
    fn test_requested_route_is_guarded() {
        let mut app = App::new(None, &UiConfig::default());
        app.start(Some(Route::Documents));
        assert_eq!(app.route, Route::Login);

        let mut app = App::new(Some(session()), &UiConfig::default());
        let action = app.start(Some(Route::Documents));
        assert_eq!(app.route, Route::Documents);
        assert!(matches!(action, Some(AsyncAction::LoadDocuments)));
    }

    #[test]
    fn test_login_submit_validates_locally() {
        let mut app = App::new(None, &UiConfig::default());
        app.start(None);
        app.login_form.focused = 1;
        let action = app.handle_key(key(KeyCode::Enter));
        assert!(action.is_none());
        assert_eq!(
            app.notifier.current().map(|n| n.level),
            Some(Level::Warning)
        );
        assert!(!app.busy.is_active());
    }

    #[test]
    fn test_login_flow() {
        let mut app = App::new(None, &UiConfig::default());
        app.start(None);
        type_str(&mut app, "ann@acme.example");
        app.handle_key(key(KeyCode::Tab));
        type_str(&mut app, "pw");
        let action = app.handle_key(key(KeyCode::Enter));
        match action {
            Some(AsyncAction::Login { email, password }) => {
                assert_eq!(email, "ann@acme.example");
                assert_eq!(password, "pw");
            }
            other => panic!("expected login action, got {other:?}"),
        }
        assert!(app.busy.is_active());

        // Keys are ignored while busy
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());

        app.handle_result(AsyncResult::LoggedIn(Box::new(session())));
        assert!(!app.busy.is_active());
        assert_eq!(app.route, Route::Dashboard);
        let follow_up = app.drain_actions();
        assert_eq!(follow_up.len(), 1);
        assert!(matches!(follow_up[0], AsyncAction::LoadStats));
        assert!(app.login_form.value(1).is_empty());
    }

    #[test]
    fn test_register_switches_to_login_without_session() {
        let mut app = App::new(None, &UiConfig::default());
        app.start(None);
        app.handle_key(ctrl('r'));
        assert_eq!(app.route, Route::Register);

        for (i, value) in ["Acme", "info@acme.example", "Ann", "ann@acme.example", "pw"]
            .iter()
            .enumerate()
        {
            app.register_form.values[i] = value.to_string();
        }
        let action = app.handle_key(ctrl('s'));
        assert!(matches!(action, Some(AsyncAction::Register(_))));

        app.handle_result(AsyncResult::Registered { message: None });
        assert_eq!(app.route, Route::Login);
        assert!(app.session.is_none());
        assert_eq!(app.login_form.value(0), "ann@acme.example");
    }

    #[test]
    fn test_logout_redirects_and_clears() {
        let mut app = documents_app(vec![doc(1, "a.pdf", 10)]);
        let action = app.handle_key(key(KeyCode::Char('L')));
        assert!(matches!(action, Some(AsyncAction::Logout)));

        app.handle_result(AsyncResult::LoggedOut);
        assert_eq!(app.route, Route::Login);
        assert!(app.session.is_none());
        assert!(app.documents.is_empty());
        assert!(!app.busy.is_active());
    }

    #[test]
    fn test_session_expired_redirects_to_login() {
        let mut app = documents_app(vec![]);
        app.handle_result(AsyncResult::SessionExpired);
        assert_eq!(app.route, Route::Login);
        assert!(app.session.is_none());
        // Navigating back to an authenticated view is refused
        app.navigate(Route::Chat);
        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = documents_app(vec![doc(1, "a.pdf", 10), doc(2, "b.txt", 20)]);
        app.handle_key(key(KeyCode::Char('j')));
        assert!(app.handle_key(key(KeyCode::Char('d'))).is_none());
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);

        // Anything but 'y' cancels
        assert!(app.handle_key(key(KeyCode::Char('n'))).is_none());
        assert_eq!(app.input_mode, InputMode::Normal);

        app.handle_key(key(KeyCode::Char('d')));
        match app.handle_key(key(KeyCode::Char('y'))) {
            Some(AsyncAction::DeleteDocument { id, name }) => {
                assert_eq!(id, 2);
                assert_eq!(name, "b.txt");
            }
            other => panic!("expected delete, got {other:?}"),
        }
    }

    #[test]
    fn test_successful_delete_reloads_list_and_dashboard_once() {
        let mut app = documents_app(vec![doc(1, "a.pdf", 10)]);
        app.busy.begin("Deleting a.pdf");
        app.handle_result(AsyncResult::Deleted {
            message: "Document deleted".into(),
        });

        let actions = app.drain_actions();
        assert_eq!(actions.len(), 2);
        let lists = actions
            .iter()
            .filter(|a| matches!(a, AsyncAction::LoadDocuments))
            .count();
        let stats = actions
            .iter()
            .filter(|a| matches!(a, AsyncAction::LoadStats))
            .count();
        assert_eq!((lists, stats), (1, 1));
        assert!(app.drain_actions().is_empty());
        // No optimistic removal
        assert_eq!(app.documents.len(), 1);
    }

    #[test]
    fn test_search_is_debounced() {
        let mut app = documents_app(vec![
            doc(1, "invoice.pdf", 10),
            doc(2, "notes.txt", 20),
            doc(3, "invoice-2.pdf", 30),
        ]);
        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, "invoi");

        // Nothing filtered until the quiet period passes
        app.tick(Instant::now());
        assert_eq!(app.visible.len(), 3);

        app.tick(Instant::now() + Duration::from_millis(400));
        assert_eq!(app.visible, vec![0, 2]);
        assert_eq!(app.applied_query, "invoi");
    }

    #[test]
    fn test_search_enter_applies_immediately_and_esc_clears() {
        let mut app = documents_app(vec![doc(1, "invoice.pdf", 10), doc(2, "notes.txt", 20)]);
        app.handle_key(key(KeyCode::Char('/')));
        type_str(&mut app, "notes");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.visible, vec![1]);
        assert!(!app.search_debounce.is_pending());

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.visible.len(), 2);
    }

    #[test]
    fn test_upload_requires_selection() {
        let mut app = documents_app(vec![]);
        app.handle_key(key(KeyCode::Char('u')));
        assert_eq!(app.input_mode, InputMode::Upload);
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(
            app.notifier.current().map(|n| n.level),
            Some(Level::Warning)
        );
    }

    #[test]
    fn test_drop_then_upload_then_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        std::fs::write(&file, vec![0u8; 2048]).unwrap();

        let mut app = documents_app(vec![]);
        app.handle_paste(&format!("'{}'", file.display()));
        assert_eq!(app.input_mode, InputMode::Upload);
        assert_eq!(app.upload.len(), 1);

        let action = app.handle_key(ctrl('s'));
        assert!(matches!(action, Some(AsyncAction::Upload(ref sel)) if sel.len() == 1));
        assert!(app.busy.is_active());

        app.handle_result(AsyncResult::Uploaded {
            message: "1 file uploaded".into(),
        });
        assert!(!app.busy.is_active());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.upload.is_empty());
        assert_eq!(app.drain_actions().len(), 2);
    }

    #[test]
    fn test_failed_upload_keeps_selection() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        std::fs::write(&file, "x").unwrap();

        let mut app = documents_app(vec![]);
        app.handle_key(key(KeyCode::Char('u')));
        type_str(&mut app, &file.display().to_string());
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.upload.len(), 1);

        app.handle_key(ctrl('s'));
        app.handle_result(AsyncResult::UploadFailed("File type not allowed".into()));
        assert_eq!(app.upload.len(), 1);
        assert_eq!(app.input_mode, InputMode::Upload);
        assert_eq!(
            app.notifier.current().map(|n| n.message.as_str()),
            Some("File type not allowed")
        );
    }

    #[test]
    fn test_chat_hello_roundtrip() {
        let mut app = signed_in_app();
        app.navigate(Route::Chat);
        assert_eq!(app.chat.messages().len(), 1); // greeting

        type_str(&mut app, "Hello");
        let action = app.handle_key(key(KeyCode::Enter));
        assert!(matches!(action, Some(AsyncAction::SendChat { ref message }) if message == "Hello"));
        assert_eq!(app.chat.messages().last().map(|m| m.content.as_str()), Some("Hello"));
        assert!(app.chat.is_pending());
        assert!(app.chat_input.is_empty());

        // Second submit while pending is refused
        type_str(&mut app, "again");
        assert!(app.handle_key(key(KeyCode::Enter)).is_none());

        app.handle_result(AsyncResult::ChatReply(Err("timeout".into())));
        let messages = app.chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[2].content, docdesk_core::chat::FALLBACK_REPLY);
    }

    #[test]
    fn test_chat_typing_digits_does_not_navigate() {
        let mut app = signed_in_app();
        app.navigate(Route::Chat);
        type_str(&mut app, "q1");
        assert_eq!(app.route, Route::Chat);
        assert!(!app.should_quit);
        assert_eq!(app.chat_input, "q1");
    }

    #[test]
    fn test_shell_navigation_keys() {
        let mut app = signed_in_app();
        assert!(matches!(
            app.handle_key(key(KeyCode::Char('2'))),
            Some(AsyncAction::LoadDocuments)
        ));
        assert_eq!(app.route, Route::Documents);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.route, Route::Chat);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn test_documents_failed_shows_error() {
        let mut app = documents_app(vec![doc(1, "a.pdf", 1)]);
        app.handle_result(AsyncResult::DocumentsFailed("Could not load documents".into()));
        assert!(app.documents.is_empty());
        assert_eq!(app.documents_error.as_deref(), Some("Could not load documents"));
        assert!(!app.documents_loading);
    }

    #[test]
    fn test_error_toast_auto_dismiss() {
        let mut app = signed_in_app();
        app.handle_result(AsyncResult::Error("boom".into()));
        assert!(app.notifier.current().is_some());
        app.tick(Instant::now() + Duration::from_secs(6));
        assert!(app.notifier.current().is_none());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = signed_in_app();
        app.busy.begin("x");
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }
}
