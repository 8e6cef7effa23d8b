use std::path::PathBuf;

use docdesk_core::model::*;
use docdesk_core::upload::UploadSelection;

/// Actions the UI sends to the async worker task.
#[derive(Debug)]
pub enum AsyncAction {
    Login { email: String, password: String },
    Register(RegisterRequest),
    /// Best-effort server logout, then clear the persisted session.
    Logout,
    /// Dashboard counters.
    LoadStats,
    LoadDocuments,
    Upload(UploadSelection),
    DeleteDocument { id: i64, name: String },
    DownloadDocument { id: i64, name: String },
    SendChat { message: String },
}

/// Results the async worker sends back to the UI.
#[derive(Debug)]
pub enum AsyncResult {
    LoggedIn(Box<Session>),
    Registered { message: Option<String> },
    LoggedOut,
    Stats(DocumentStats),
    Documents(Vec<Document>),
    DocumentsFailed(String),
    Uploaded { message: String },
    UploadFailed(String),
    Deleted { message: String },
    Downloaded { path: PathBuf },
    /// Reply text, or the error that replaced it.
    ChatReply(Result<String, String>),
    /// The server rejected the stored token; the worker already cleared it.
    SessionExpired,
    /// An error occurred during an async operation.
    Error(String),
}
