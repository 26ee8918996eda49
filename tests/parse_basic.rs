//! Integration tests for the parse phase: scan JSON parsing, round-trips, graph building.

mod helpers;

use result_graph::config::IngestConfig;
use result_graph::parse::{self, EntityKind, EntityNode, ResultGraph};

#[test]
fn parse_documented_example() {
    let json = include_str!("fixtures/krypton_example.json");
    let root = parse::parse(json).expect("Should parse successfully");
    assert_eq!(root.kind(), EntityKind::Domain);
    assert_eq!(root.value(), "krypton.ninja");
    assert_eq!(root.connections().len(), 1);

    let beta = &root.connections()[0];
    assert_eq!(beta.value(), "beta.krypton.ninja");
    let flags = beta.flags();
    assert!(flags.is_recent());
    assert!(!flags.has_expired());
    assert!(!flags.possible_takeover());
}

#[test]
fn parse_round_trip() {
    let json = include_str!("fixtures/nested_scan.json");
    let root = parse::parse(json).expect("Should parse");
    let serialized = serde_json::to_string(&root).expect("Should serialize");
    let root2 = parse::parse(&serialized).expect("Should parse again");
    assert_eq!(root, root2);
    assert_eq!(root.node_count(), root2.node_count());
}

#[test]
fn built_trees_round_trip() {
    for tree in [helpers::krypton_tree(), helpers::mixed_tree(), EntityNode::email("a@b.c")] {
        let serialized = serde_json::to_string_pretty(&tree).unwrap();
        assert_eq!(parse::parse(&serialized).unwrap(), tree);
    }
}

#[test]
fn parse_invalid_json_returns_error() {
    let result = parse::parse("{not valid json");
    assert!(result.is_err());
    let error = result.unwrap_err();
    assert_eq!(error.code(), "I002");
    assert_eq!(error.to_string(), "Invalid JSON data provided!");
}

#[test]
fn any_well_formed_json_is_accepted() {
    for json in ["42", "null", "[]", r#"{"unexpected": true}"#] {
        let root = parse::parse(json).expect("well-formed JSON must not be rejected");
        assert_eq!(root.kind(), EntityKind::Unknown);
        assert!(root.is_leaf());
    }
}

#[test]
fn parse_node_kinds() {
    let json = include_str!("fixtures/nested_scan.json");
    let root = parse::parse(json).expect("Should parse");
    let types: Vec<&str> = root.iter().map(|n| n.type_name()).collect();
    assert!(types.contains(&"domain"));
    assert!(types.contains(&"email"));
    assert!(types.contains(&"file"));
    assert!(types.contains(&"port"), "Unknown types keep their tag");

    let port = root.find("port", "krypton.ninja:443").unwrap();
    assert_eq!(port.kind(), EntityKind::Unknown);
    assert!(port.is_leaf(), "Missing connections means no children");
}

#[test]
fn non_domain_data_is_preserved() {
    let json = include_str!("fixtures/nested_scan.json");
    let root = parse::parse(json).unwrap();
    let email = root.find("email", "security@krypton.ninja").unwrap();
    assert_eq!(email.attributes().unwrap()["source"], "security.txt");
    assert!(email.domain_data().is_none());
    assert!(email.flags().is_empty());
}

#[test]
fn build_graph_from_nested_scan() {
    let json = include_str!("fixtures/nested_scan.json");
    let (root, graph) = parse::parse_and_build(json, &IngestConfig::default()).expect("Should build graph");
    assert_eq!(graph.node_count(), root.node_count());
    assert_eq!(graph.node_count(), 8);
    assert_eq!(graph.outgoing_count("0"), 5);
    assert_eq!(graph.outgoing_count("0.0"), 1);
    assert_eq!(graph.outgoing_count("0.1"), 0);
    assert_eq!(graph.node("0.0.0").unwrap().type_name, "file");
}

#[test]
fn domains_only_graph_from_nested_scan() {
    let json = include_str!("fixtures/nested_scan.json");
    let root = parse::parse(json).unwrap();
    let config = IngestConfig {
        domains_only: true,
        ..IngestConfig::default()
    };
    let graph = ResultGraph::build(&root, &config);
    // root + old + docs + shop; the email subtree, the port and the file go.
    assert_eq!(graph.node_count(), 4);
    assert!(graph.node("0.3.0").is_none());
}

#[test]
fn deep_nesting_round_trips() {
    const DEPTH: usize = 300;
    let chain = (1..DEPTH).fold(EntityNode::file("leaf.txt"), |child, level| {
        EntityNode::domain(format!("l{}.krypton.ninja", level)).with_connection(child)
    });
    assert_eq!(chain.depth(), DEPTH);

    let serialized = serde_json::to_string(&chain).expect("Should serialize");
    let parsed = parse::parse(&serialized).expect("Deep documents must parse");
    assert_eq!(parsed.depth(), DEPTH);
    assert_eq!(parsed, chain);

    let graph = ResultGraph::build(&parsed, &IngestConfig::default());
    assert_eq!(graph.node_count(), DEPTH);
    assert_eq!(graph.edge_count(), DEPTH - 1);
}

#[test]
fn deep_hand_written_document_parses() {
    let depth = 1000;
    let mut json = String::new();
    for level in 0..depth {
        json.push_str(&format!(r#"{{"type":"domain","value":"l{}","data":{{"flags":2}},"connections":["#, level));
    }
    for _ in 0..depth {
        json.push_str("]}");
    }
    let root = parse::parse(&json).expect("Deep documents must parse");
    assert_eq!(root.depth(), depth);
    assert_eq!(root.node_count(), depth);
    assert!(root.iter().all(|n| n.flags().is_recent()));
}
