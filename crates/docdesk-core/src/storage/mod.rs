//! Client-local key/value storage for the persisted session.
//!
//! Values are plaintext strings (JSON for structured values), the same shape
//! a browser's local storage would hold.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::DocdeskConfig;
use crate::error::{DocdeskError, Result};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const CURRENT_COMPANY_KEY: &str = "currentCompany";

/// Every key the session writes. Logout removes all of them.
pub const SESSION_KEYS: &[&str] = &[AUTH_TOKEN_KEY, CURRENT_USER_KEY, CURRENT_COMPANY_KEY];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Enum wrapper for store implementations. Dispatches to the concrete store.
#[derive(Debug)]
pub enum LocalStorage {
    File(FileStore),
    Memory(MemoryStore),
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            LocalStorage::File(s) => s.get(key),
            LocalStorage::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            LocalStorage::File(s) => s.set(key, value),
            LocalStorage::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self {
            LocalStorage::File(s) => s.remove(key),
            LocalStorage::Memory(s) => s.remove(key),
        }
    }
}

/// Create the configured store: a JSON file under the config directory, or a
/// process-local map for `storage.backend = "memory"`.
pub fn create_store(config: &DocdeskConfig) -> Result<LocalStorage> {
    if config.storage.backend == "memory" {
        return Ok(LocalStorage::Memory(MemoryStore::new()));
    }
    let path = config.storage.resolved_path().ok_or_else(|| {
        DocdeskError::Storage("cannot determine storage path; set storage.path".into())
    })?;
    Ok(LocalStorage::File(FileStore::open(path)?))
}
