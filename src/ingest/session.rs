//! The graph page's single "current result" slot.

use tracing::debug;

use super::{EXAMPLE_DOCUMENT, FileSource, ingest_from_clipboard_text, ingest_from_file};
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::flags::DomainDetails;
use crate::parse::{self, EntityNode, ResultGraph};

/// What the rendering layer sees: the loaded tree, if any, and the last
/// error, if any.
///
/// A failed ingestion only sets the error; the loaded tree stays. A successful
/// one replaces the tree and clears the error. When ingestions overlap, feed
/// each outcome to [`ViewState::apply`] as it completes; the last one applied
/// wins.
#[derive(Debug, Default)]
pub struct ViewState {
    root: Option<EntityNode>,
    error: Option<IngestError>,
    config: IngestConfig,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IngestConfig) -> Self {
        ViewState {
            root: None,
            error: None,
            config,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&EntityNode> {
        self.root.as_ref()
    }

    pub fn error(&self) -> Option<&IngestError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Record a finished ingestion. Returns whether a new tree was loaded.
    pub fn apply(&mut self, outcome: Result<EntityNode, IngestError>) -> bool {
        match outcome {
            Ok(root) => {
                debug!(root = root.value(), "replacing displayed tree");
                self.root = Some(root);
                self.error = None;
                true
            }
            Err(e) => {
                debug!(code = e.code(), "keeping displayed tree after failed ingestion");
                self.error = Some(e);
                false
            }
        }
    }

    pub async fn load_file<F: FileSource>(&mut self, file: &F) -> bool {
        let outcome = ingest_from_file(file, &self.config).await;
        self.apply(outcome)
    }

    pub fn paste(&mut self, text: &str) -> bool {
        self.apply(ingest_from_clipboard_text(text))
    }

    pub fn load_example(&mut self) -> bool {
        self.apply(parse::parse(EXAMPLE_DOCUMENT))
    }

    pub fn reset(&mut self) {
        self.root = None;
        self.error = None;
    }

    pub fn graph(&self) -> Option<ResultGraph> {
        self.root
            .as_ref()
            .map(|root| ResultGraph::build(root, &self.config))
    }

    /// Decoded details for the domain node behind a graph id.
    pub fn details(&self, graph_id: &str) -> Option<DomainDetails> {
        let mut node = self.root.as_ref()?;
        let mut path = graph_id.split('.');
        if path.next()? != "0" {
            return None;
        }
        for step in path {
            node = node.connections().get(path_step(step)?)?;
        }
        node.domain_details()
    }
}

/// Position of one id step, in the exact form the graph builder writes it:
/// decimal digits, no sign and no leading zero.
fn path_step(step: &str) -> Option<usize> {
    let canonical = !step.is_empty()
        && step.bytes().all(|b| b.is_ascii_digit())
        && (step == "0" || !step.starts_with('0'));
    if canonical { step.parse().ok() } else { None }
}
