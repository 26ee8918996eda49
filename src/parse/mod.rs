//! Parse phase: JSON text → entity tree + graph view.

pub mod graph;
pub mod types;

pub use graph::{GraphDto, ResultGraph};
pub use types::*;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::IngestConfig;
use crate::error::IngestError;

/// Shared parse step for every input path. Only JSON well-formedness is
/// checked; shapes are read tolerantly by [`EntityNode::from`].
pub fn parse(text: &str) -> Result<EntityNode, IngestError> {
    let value = read_value(text).map_err(|e| {
        warn!(line = e.line(), column = e.column(), "rejecting malformed JSON");
        IngestError::from(e)
    })?;

    let root = EntityNode::from(value);
    debug!(
        root_type = root.type_name(),
        nodes = root.node_count(),
        "parsed entity tree"
    );
    Ok(root)
}

/// Trees may nest to any depth, so the recursion limit is off and the stack
/// grows on demand while deserializing.
fn read_value(text: &str) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Parse text and build the graph view in one step.
pub fn parse_and_build(
    text: &str,
    config: &IngestConfig,
) -> Result<(EntityNode, ResultGraph), IngestError> {
    let root = parse(text)?;
    let graph = ResultGraph::build(&root, config);
    Ok((root, graph))
}
