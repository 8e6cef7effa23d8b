//! Chat panel state: single turn, one request in flight at a time.

use crate::error::{DocdeskError, Result};
use crate::model::{ChatMessage, ChatRole};

pub const GREETING: &str = "Hello! Ask me anything about your documents.";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't answer that right now. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the greeting when the panel is opened for the first time.
    pub fn seed_greeting(&mut self) {
        if self.messages.is_empty() {
            self.messages.push(ChatMessage::assistant(GREETING));
        }
    }

    /// Append the user's message and mark a reply as pending. Returns the text
    /// to send. The user message is never rolled back.
    ///
    /// Refused while a reply is pending so two replies cannot interleave.
    pub fn submit(&mut self, input: &str) -> Result<String> {
        let text = input.trim();
        if text.is_empty() {
            return Err(DocdeskError::InvalidInput("Message cannot be empty".into()));
        }
        if self.pending {
            return Err(DocdeskError::InvalidInput(
                "Please wait for the current reply".into(),
            ));
        }
        self.messages.push(ChatMessage::user(text));
        self.pending = true;
        Ok(text.to_string())
    }

    /// Replace the pending indicator with the reply, or with the fallback text
    /// when the request failed. A call without a pending request is ignored.
    pub fn resolve(&mut self, reply: std::result::Result<String, String>) {
        if !self.pending {
            tracing::debug!("chat reply arrived with nothing pending, dropping");
            return;
        }
        self.pending = false;
        let content = match reply {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.messages.push(ChatMessage::assistant(content));
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of questions asked this run.
    pub fn user_turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.pending = false;
    }
}
