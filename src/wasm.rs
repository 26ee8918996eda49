//! WASM entry points for the graph page.

use serde::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::flags::{DomainDetails, DomainFlags};
use crate::ingest::{check_content_type, ingest_from_clipboard_text};
use crate::parse::{self, EntityNode, GraphDto};

/// Parse pasted clipboard text.
/// Returns `{status: "loaded", root}` or `{status: "error", ...}`.
#[wasm_bindgen]
pub fn ingest_clipboard_text(text: &str) -> JsValue {
    to_js(&IngestOutcome::from(ingest_from_clipboard_text(text)))
}

/// Check the declared type of a selected file, then parse its contents.
#[wasm_bindgen]
pub fn ingest_file(content_type: &str, contents: &str) -> JsValue {
    to_js(&ingest_file_inner(content_type, contents))
}

fn ingest_file_inner(content_type: &str, contents: &str) -> IngestOutcome {
    let result = check_content_type(content_type, &IngestConfig::default())
        .and_then(|()| parse::parse(contents));
    IngestOutcome::from(result)
}

/// Decode the detail view of one domain node. `flags` is a JS number; any
/// non-negative integer up to `Number.MAX_SAFE_INTEGER` keeps all its bits.
#[wasm_bindgen]
pub fn decode_domain(value: &str, flags: f64, platform: Option<String>) -> JsValue {
    to_js(&DomainDetails::decode(
        value,
        flags_from_js(flags),
        platform.as_deref(),
    ))
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Non-integral, negative or out-of-range numbers carry no flags.
fn flags_from_js(flags: f64) -> DomainFlags {
    if flags.is_finite() && flags >= 0.0 && flags.fract() == 0.0 && flags <= MAX_SAFE_INTEGER {
        DomainFlags::from_bits(flags as u64)
    } else {
        debug!(flags, "ignoring flags that are not a safe integer");
        DomainFlags::EMPTY
    }
}

/// Parse a document and flatten it into `{nodes, edges}` for the graph widget.
#[wasm_bindgen]
pub fn build_graph(json: &str, domains_only: bool) -> JsValue {
    to_js(&build_graph_inner(json, domains_only))
}

fn build_graph_inner(json: &str, domains_only: bool) -> GraphOutcome {
    let config = IngestConfig {
        domains_only,
        ..IngestConfig::default()
    };
    match parse::parse_and_build(json, &config) {
        Ok((_, graph)) => GraphOutcome::Graph(graph.to_dto()),
        Err(e) => GraphOutcome::Error(ErrorDto::from(e)),
    }
}

/// Objects become plain JS objects, not `Map`s, so `data` bags read the same
/// as parsed JSON on the JS side.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ErrorDto {
    code: String,
    kind: String,
    message: String,
}

impl From<IngestError> for ErrorDto {
    fn from(e: IngestError) -> Self {
        ErrorDto {
            code: e.code().to_string(),
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
enum IngestOutcome {
    #[serde(rename = "loaded")]
    Loaded { root: EntityNode },
    #[serde(rename = "error")]
    Error(ErrorDto),
}

impl From<Result<EntityNode, IngestError>> for IngestOutcome {
    fn from(result: Result<EntityNode, IngestError>) -> Self {
        match result {
            Ok(root) => IngestOutcome::Loaded { root },
            Err(e) => IngestOutcome::Error(ErrorDto::from(e)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
enum GraphOutcome {
    #[serde(rename = "graph")]
    Graph(GraphDto),
    #[serde(rename = "error")]
    Error(ErrorDto),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_file_reports_unsupported_type() {
        let outcome = serde_json::to_value(ingest_file_inner("text/plain", "{}")).unwrap();
        assert_eq!(
            outcome,
            json!({
                "status": "error",
                "code": "I001",
                "kind": "UnsupportedFileType",
                "message": "The file must be a JSON file!"
            })
        );
    }

    #[test]
    fn json_file_loads_root() {
        let outcome = serde_json::to_value(ingest_file_inner(
            "application/json",
            r#"{"type":"file","value":"robots.txt","connections":[],"data":{}}"#,
        ))
        .unwrap();
        assert_eq!(outcome["status"], json!("loaded"));
        assert_eq!(outcome["root"]["value"], json!("robots.txt"));
    }

    #[test]
    fn graph_outcome_for_malformed_json() {
        let outcome = serde_json::to_value(build_graph_inner("{", false)).unwrap();
        assert_eq!(outcome["status"], json!("error"));
        assert_eq!(outcome["code"], json!("I002"));
    }

    #[test]
    fn graph_outcome_shape() {
        let outcome = serde_json::to_value(build_graph_inner(
            r#"{"type":"domain","value":"krypton.ninja","connections":[{"type":"domain","value":"beta.krypton.ninja","data":{"flags":2}}],"data":{}}"#,
            true,
        ))
        .unwrap();
        insta::with_settings!({sort_maps => true}, {
            insta::assert_json_snapshot!(outcome, @r#"
            {
              "edges": [
                {
                  "id": "0->0.0",
                  "source": "0",
                  "target": "0.0"
                }
              ],
              "nodes": [
                {
                  "flags": 0,
                  "id": "0",
                  "label": "krypton.ninja",
                  "type": "domain"
                },
                {
                  "flags": 2,
                  "id": "0.0",
                  "label": "beta.krypton.ninja",
                  "type": "domain"
                }
              ],
              "status": "graph"
            }
            "#);
        });
    }

    #[test]
    fn js_flags_keep_high_bits() {
        let flags = flags_from_js(2f64.powi(33) + 4.0);
        assert!(flags.possible_takeover());
        assert_eq!(flags.bits(), (1u64 << 33) | 4);
        assert_eq!(flags_from_js(MAX_SAFE_INTEGER).bits(), 9_007_199_254_740_991);
    }

    #[test]
    fn js_flags_reject_non_integers() {
        for flags in [-1.0, 1.5, f64::NAN, f64::INFINITY, 2f64.powi(60)] {
            assert!(flags_from_js(flags).is_empty(), "{flags} should carry no flags");
        }
        assert!(flags_from_js(0.0).is_empty());
    }
}
