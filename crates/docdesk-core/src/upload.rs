//! File selection for the upload flow: typed paths (picker) or dropped paths.
//!
//! Type and size are not checked here; the server decides what it accepts.

use std::path::{Path, PathBuf};

use crate::error::{DocdeskError, Result};
use crate::format::format_file_size;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct UploadSelection {
    files: Vec<UploadFile>,
}

impl UploadSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. The path must point at a readable regular file.
    /// Adding the same path twice is a no-op.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| {
            DocdeskError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?;
        if !meta.is_file() {
            return Err(DocdeskError::InvalidInput(format!(
                "{} is not a file",
                path.display()
            )));
        }
        if self.files.iter().any(|f| f.path == path) {
            return Ok(());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.files.push(UploadFile {
            path: path.to_path_buf(),
            name,
            size: meta.len(),
        });
        Ok(())
    }

    /// Add every path in `text` (see [`parse_dropped_paths`]). Returns how many
    /// were added and the errors for the ones that were not.
    pub fn add_dropped(&mut self, text: &str) -> (usize, Vec<DocdeskError>) {
        let mut added = 0;
        let mut errors = Vec::new();
        for path in parse_dropped_paths(text) {
            let before = self.files.len();
            match self.add_path(&path) {
                Ok(()) => added += self.files.len() - before,
                Err(e) => errors.push(e),
            }
        }
        (added, errors)
    }

    pub fn remove(&mut self, index: usize) -> Option<UploadFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// "3 files, 1.2 MB"
    pub fn summary(&self) -> String {
        let noun = if self.files.len() == 1 { "file" } else { "files" };
        format!(
            "{} {noun}, {}",
            self.files.len(),
            format_file_size(self.total_size())
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(DocdeskError::InvalidInput(
                "Please select at least one file".into(),
            ));
        }
        Ok(())
    }
}

/// Split text produced by dropping files onto a terminal into paths.
///
/// Terminals paste dropped files as shell-quoted paths separated by spaces or
/// newlines, sometimes as `file://` URIs. Handles single/double quotes,
/// backslash-escaped spaces and `file://` URIs (decoded with `Url`).
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(to_path(&current));
                    current.clear();
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(to_path(&current));
    }
    paths
}

fn to_path(token: &str) -> PathBuf {
    if token.starts_with("file:") {
        if let Some(path) = reqwest::Url::parse(token)
            .ok()
            .and_then(|u| u.to_file_path().ok())
        {
            return path;
        }
    }
    PathBuf::from(token)
}
