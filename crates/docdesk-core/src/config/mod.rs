use crate::error::{DocdeskError, Result};
use chrono::format::{Item, StrftimeItems};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocdeskConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. A slow backend must not leave the busy overlay up forever.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `file` persists the session between runs; `memory` keeps it for one process only.
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Custom path for the session key/value file. Defaults to `~/.config/docdesk/storage.json`.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: None,
        }
    }
}

/// Valid storage backend names.
pub const VALID_STORAGE_BACKENDS: &[&str] = &["file", "memory"];

impl StorageConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match self.path {
            Some(ref p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => config_dir().map(|d| d.join("storage.json")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// chrono format string for upload dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
    /// Where downloaded documents are written. Defaults to the user's download dir.
    #[serde(default)]
    pub download_dir: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            search_debounce_ms: default_search_debounce_ms(),
            toast_secs: default_toast_secs(),
            download_dir: None,
        }
    }
}

impl UiConfig {
    pub fn resolved_download_dir(&self) -> PathBuf {
        match self.download_dir {
            Some(ref d) if !d.is_empty() => PathBuf::from(d),
            _ => dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

// -- Defaults --

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}
fn default_search_debounce_ms() -> u64 {
    300
}
fn default_toast_secs() -> u64 {
    5
}
fn default_storage_backend() -> String {
    "file".to_string()
}

impl DocdeskConfig {
    /// Load configuration with three-layer TOML merge plus environment:
    /// 1. ~/.config/docdesk/config.toml (global)
    /// 2. .docdesk/config.toml (project)
    /// 3. .docdesk/config.local.toml (local, gitignored)
    /// 4. `DOCDESK__SECTION__KEY` environment variables
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".docdesk").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".docdesk").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("DOCDESK")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder
            .build()
            .map_err(|e| DocdeskError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| DocdeskError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Validate config values, fixing out-of-range values and logging warnings.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        let trimmed = self.api.base_url.trim().trim_end_matches('/').to_string();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            warnings.push(format!(
                "api.base_url '{}' is not an http(s) URL, using {}",
                self.api.base_url,
                default_base_url()
            ));
            self.api.base_url = default_base_url();
        } else {
            self.api.base_url = trimmed;
        }

        if !VALID_STORAGE_BACKENDS.contains(&self.storage.backend.as_str()) {
            warnings.push(format!(
                "unknown storage backend '{}', valid: {}, using file",
                self.storage.backend,
                VALID_STORAGE_BACKENDS.join(", ")
            ));
            self.storage.backend = default_storage_backend();
        }

        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs = 0, setting to 1".to_string());
            self.api.timeout_secs = 1;
        }
        if self.ui.toast_secs == 0 {
            warnings.push("ui.toast_secs = 0, setting to 1".to_string());
            self.ui.toast_secs = 1;
        }
        if self.ui.search_debounce_ms > 5000 {
            warnings.push(format!(
                "ui.search_debounce_ms = {} is above 5000, clamping",
                self.ui.search_debounce_ms
            ));
            self.ui.search_debounce_ms = 5000;
        }
        if self.ui.date_format.trim().is_empty() {
            warnings.push("ui.date_format is empty, using default".to_string());
            self.ui.date_format = default_date_format();
        } else if StrftimeItems::new(&self.ui.date_format)
            .any(|item| matches!(item, Item::Error))
        {
            warnings.push(format!(
                "ui.date_format '{}' is not a valid strftime format, using {}",
                self.ui.date_format,
                default_date_format()
            ));
            self.ui.date_format = default_date_format();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    /// Write a starter global config if none exists. Returns the path written.
    pub fn write_default() -> Result<PathBuf> {
        let path = global_config_path()
            .ok_or_else(|| DocdeskError::Config("cannot determine config directory".to_string()))?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DocdeskError::Config(format!("failed to create config dir: {e}")))?;
        }
        let toml_str = toml::to_string_pretty(&Self::default())
            .map_err(|e| DocdeskError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(&path, toml_str)
            .map_err(|e| DocdeskError::Config(format!("failed to write config: {e}")))?;
        Ok(path)
    }
}

/// `~/.config/docdesk`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("docdesk"))
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
