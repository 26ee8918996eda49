//! petgraph-based view of the entity tree for the graph widget.
//!
//! Node values are not unique, so vertices are keyed by their index path from
//! the root: `"0"` is the root, `"0.2"` its third connection, and so on.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use super::types::{EntityKind, EntityNode};
use crate::config::IngestConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub label: String,
    pub flags: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// Flat `{nodes, edges}` shape the frontend graph widget consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDto {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

pub struct ResultGraph {
    pub graph: DiGraph<GraphNode, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
    pub root: NodeIndex,
}

impl ResultGraph {
    pub fn build(root: &EntityNode, config: &IngestConfig) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        let root_idx = add_subtree(&mut graph, &mut node_indices, root, config);

        ResultGraph {
            graph,
            node_indices,
            root: root_idx,
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_indices.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn root_node(&self) -> &GraphNode {
        &self.graph[self.root]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Children of `id` in connection order.
    pub fn successors(&self, id: &str) -> Vec<&GraphNode> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn predecessors(&self, id: &str) -> Vec<&GraphNode> {
        self.neighbors(id, Direction::Incoming)
    }

    pub fn outgoing_count(&self, id: &str) -> usize {
        self.successors(id).len()
    }

    pub fn incoming_count(&self, id: &str) -> usize {
        self.predecessors(id).len()
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&GraphNode> {
        let Some(&idx) = self.node_indices.get(id) else {
            return vec![];
        };
        // Children are inserted in connection order, so index order is
        // connection order.
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort_by_key(|n| n.index());
        found.into_iter().map(|n| &self.graph[n]).collect()
    }

    pub fn to_dto(&self) -> GraphDto {
        let nodes = self.graph.node_weights().cloned().collect();
        let edges = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| {
                let source = &self.graph[e.source()].id;
                let target = &self.graph[e.target()].id;
                GraphEdge {
                    id: format!("{}->{}", source, target),
                    source: source.clone(),
                    target: target.clone(),
                }
            })
            .collect();
        GraphDto { nodes, edges }
    }
}

/// Pre-order walk with an explicit stack, so arbitrarily deep trees build
/// without recursion. Children are pushed in reverse to keep their indices
/// in connection order.
fn add_subtree(
    graph: &mut DiGraph<GraphNode, ()>,
    node_indices: &mut HashMap<String, NodeIndex>,
    root: &EntityNode,
    config: &IngestConfig,
) -> NodeIndex {
    let mut root_idx = None;
    let mut stack: Vec<(&EntityNode, String, Option<NodeIndex>)> = vec![(root, "0".to_string(), None)];

    while let Some((node, id, parent)) = stack.pop() {
        let idx = graph.add_node(GraphNode {
            id: id.clone(),
            type_name: node.type_name().to_string(),
            label: node.value().to_string(),
            flags: node.flags().bits(),
        });
        match parent {
            Some(parent) => {
                graph.add_edge(parent, idx, ());
            }
            None => root_idx = Some(idx),
        }

        for (position, child) in node.connections().iter().enumerate().rev() {
            if config.domains_only && child.kind() != EntityKind::Domain {
                continue;
            }
            stack.push((child, format!("{}.{}", id, position), Some(idx)));
        }
        node_indices.insert(id, idx);
    }

    // The root is always the first vertex added.
    root_idx.unwrap_or_else(|| NodeIndex::new(0))
}
