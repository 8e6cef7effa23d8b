//! Core library for docdesk: a typed client for the document + chat backend,
//! the persisted session, view routing and the small pieces of view state
//! (chat log, notices, debounce) the front ends share.

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod debounce;
pub mod download;
pub mod error;
pub mod format;
pub mod model;
pub mod notify;
pub mod router;
pub mod storage;
pub mod upload;
