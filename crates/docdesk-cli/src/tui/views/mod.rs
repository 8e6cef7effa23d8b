pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod login;
pub mod register;
pub mod shell;
pub mod upload;
