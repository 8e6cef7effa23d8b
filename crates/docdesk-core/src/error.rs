use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocdeskError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response that carried an `{"error": "..."}` body.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Non-2xx response without a structured error body.
    #[error("Unexpected response status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not signed in")]
    NotSignedIn,
}

impl DocdeskError {
    /// Text to show to the user. Server-provided messages and validation
    /// messages are shown verbatim, everything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::NotSignedIn => "Please sign in first.".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Returns `true` when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Server { status: 401, .. } | Self::UnexpectedStatus { status: 401 }
        )
    }
}

pub type Result<T> = std::result::Result<T, DocdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_shown_verbatim() {
        let err = DocdeskError::Server {
            status: 401,
            message: "Invalid email or password".into(),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid email or password");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_unstructured_status_uses_fallback() {
        let err = DocdeskError::UnexpectedStatus { status: 502 };
        assert_eq!(err.user_message("Upload failed"), "Upload failed");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_validation_message_shown_verbatim() {
        let err = DocdeskError::InvalidInput("Please select at least one file".into());
        assert_eq!(
            err.user_message("Upload failed"),
            "Please select at least one file"
        );
    }

    #[test]
    fn test_storage_error_uses_fallback() {
        let err = DocdeskError::Storage("disk full".into());
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");
    }
}
