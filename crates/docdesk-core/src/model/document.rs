use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp;

/// A document as the backend reports it. Never mutated locally; every change
/// goes through the server and is followed by a full reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    /// Nullable on older rows; `null` reads as not yet processed.
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_processed: bool,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    /// The name the user uploaded the file under, falling back to the stored name.
    pub fn display_name(&self) -> &str {
        self.original_filename
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.filename)
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_extension(&self.file_type)
    }

    /// Upper-cased extension shown in the type badge.
    pub fn badge(&self) -> String {
        if self.file_type.is_empty() {
            "?".to_string()
        } else {
            self.file_type.to_uppercase()
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_processed {
            "Processed"
        } else {
            "Processing"
        }
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Coarse file category used for icons and badge colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Excel,
    Image,
    Text,
    Other,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Word,
            "xls" | "xlsx" => Self::Excel,
            "png" | "jpg" | "jpeg" | "gif" => Self::Image,
            "txt" => Self::Text,
            _ => Self::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pdf => "📕",
            Self::Word => "📘",
            Self::Excel => "📗",
            Self::Image => "🖼",
            Self::Text => "📄",
            Self::Other => "📁",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Word => write!(f, "word"),
            Self::Excel => write!(f, "excel"),
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
            Self::Other => write!(f, "file"),
        }
    }
}

/// `GET /api/documents` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Dashboard counters from `GET /api/documents/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub processed_documents: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_documents: Option<u64>,
}

impl DocumentStats {
    pub fn pending(&self) -> u64 {
        self.pending_documents.unwrap_or_else(|| {
            self.total_documents
                .saturating_sub(self.processed_documents)
        })
    }
}

/// `POST /api/documents/upload` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files: Vec<Document>,
}

/// Generic `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}
