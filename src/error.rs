//! Ingestion error taxonomy shared by the file and clipboard paths.

use thiserror::Error;

/// Every way an ingestion attempt can fail.
///
/// `Display` renders the fixed message shown to the user. Parser positions are
/// carried for logging and never appear in the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("The file must be a JSON file!")]
    UnsupportedFileType { content_type: String },

    #[error("Invalid JSON data provided!")]
    MalformedJson { line: usize, column: usize },

    #[error("The file could not be read!")]
    UnreadableFile { name: String },
}

impl IngestError {
    /// Stable short code, suitable for the frontend to branch on.
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFileType { .. } => "I001",
            IngestError::MalformedJson { .. } => "I002",
            IngestError::UnreadableFile { .. } => "I003",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::UnsupportedFileType { .. } => "UnsupportedFileType",
            IngestError::MalformedJson { .. } => "MalformedJson",
            IngestError::UnreadableFile { .. } => "UnreadableFile",
        }
    }

    pub fn unsupported(content_type: impl Into<String>) -> Self {
        IngestError::UnsupportedFileType {
            content_type: content_type.into(),
        }
    }

    pub fn unreadable(name: impl Into<String>) -> Self {
        IngestError::UnreadableFile { name: name.into() }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        IngestError::MalformedJson {
            line: e.line(),
            column: e.column(),
        }
    }
}
