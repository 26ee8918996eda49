//! Input ports for the graph page: file selection and clipboard paste.
//!
//! Both paths end in [`crate::parse::parse`]. Neither touches view state;
//! [`session::ViewState`] decides what a finished ingestion does to the page.

pub mod session;

use std::future::Future;
use std::io;

use tracing::{debug, warn};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::parse::{self, EntityNode};

pub use session::ViewState;

/// Sample scan shipped with the graph page.
pub const EXAMPLE_DOCUMENT: &str = include_str!("example.json");

/// A file picked by the user, as handed over by the file-open dialog.
///
/// Reading is asynchronous and only happens after the declared type passed.
pub trait FileSource {
    fn name(&self) -> &str;
    fn content_type(&self) -> &str;
    fn read_text(&self) -> impl Future<Output = io::Result<String>>;
}

/// A dialog result whose contents are already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub contents: String,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        SelectedFile {
            name: name.into(),
            content_type: content_type.into(),
            contents: contents.into(),
        }
    }
}

impl FileSource for SelectedFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn read_text(&self) -> impl Future<Output = io::Result<String>> {
        std::future::ready(Ok(self.contents.clone()))
    }
}

pub fn check_content_type(content_type: &str, config: &IngestConfig) -> Result<(), IngestError> {
    if config.accepts(content_type) {
        Ok(())
    } else {
        warn!(content_type, "rejecting file with non-JSON content type");
        Err(IngestError::unsupported(content_type))
    }
}

/// Type-check, read and parse a selected file.
pub async fn ingest_from_file<F: FileSource>(
    file: &F,
    config: &IngestConfig,
) -> Result<EntityNode, IngestError> {
    check_content_type(file.content_type(), config)?;

    let text = file.read_text().await.map_err(|e| {
        warn!(file = file.name(), error = %e, "failed to read selected file");
        IngestError::unreadable(file.name())
    })?;

    debug!(file = file.name(), bytes = text.len(), "ingesting file");
    parse::parse(&text)
}

pub fn ingest_from_clipboard_text(text: &str) -> Result<EntityNode, IngestError> {
    debug!(bytes = text.len(), "ingesting clipboard text");
    parse::parse(text)
}
