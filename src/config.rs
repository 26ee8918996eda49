//! Ingestion and graph-view settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestConfig {
    /// MIME essences accepted for file uploads. `+json` suffixes always pass.
    pub accepted_content_types: Vec<String>,
    /// Keep only domain nodes when building the graph view.
    pub domains_only: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            accepted_content_types: vec!["application/json".to_string()],
            domains_only: false,
        }
    }
}

impl IngestConfig {
    /// Whether a declared content type (e.g. `application/json; charset=utf-8`)
    /// indicates a JSON document.
    pub fn accepts(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if essence.is_empty() {
            return false;
        }
        if essence.ends_with("+json") {
            return true;
        }
        self.accepted_content_types
            .iter()
            .any(|accepted| accepted.trim().eq_ignore_ascii_case(&essence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_json_only() {
        let config = IngestConfig::default();
        assert!(config.accepts("application/json"));
        assert!(config.accepts("Application/JSON; charset=UTF-8"));
        assert!(config.accepts("application/vnd.scan+json"));
        assert!(!config.accepts("text/plain"));
        assert!(!config.accepts(""));
    }

    #[test]
    fn extra_types_from_json() {
        let config: IngestConfig =
            serde_json::from_str(r#"{"acceptedContentTypes": ["application/json", "text/json"]}"#)
                .unwrap();
        assert!(config.accepts("text/json"));
        assert!(!config.domains_only);
    }
}
