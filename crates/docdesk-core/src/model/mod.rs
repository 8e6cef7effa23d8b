mod chat;
mod document;
mod session;
pub(crate) mod timestamp;

pub use chat::*;
pub use document::*;
pub use session::*;
