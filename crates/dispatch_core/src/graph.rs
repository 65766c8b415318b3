//! Immutable road graph: node table plus symmetric weighted adjacency.
//!
//! The graph is built once from a node set and an edge list, validated up
//! front, and never mutated afterwards. Reloading produces a fresh instance
//! that callers publish by swapping a shared `Arc`, so concurrent readers
//! never observe a half-built graph.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::LatLng;

/// Identifier of a graph node. Ordered and hashable so adjacency and frontier
/// iteration stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

/// A graph node with its map position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: LatLng,
}

/// An undirected road segment between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// Errors raised while validating graph input. Fatal at load time.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge references unknown node `{0}`")]
    UnknownNode(NodeId),
    #[error("edge {from}->{to} has invalid weight {weight}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },
    #[error("self-loop on node `{0}`")]
    SelfLoop(NodeId),
}

/// Immutable weighted undirected graph.
///
/// Adjacency uses `BTreeMap` keyed by [`NodeId`] so that neighbor iteration
/// order is fixed, which the path engine relies on for reproducible
/// tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct RoadGraph {
    nodes: BTreeMap<NodeId, Node>,
    adjacency: BTreeMap<NodeId, BTreeMap<NodeId, f64>>,
}

impl RoadGraph {
    /// Build a graph from a node set and edge list.
    ///
    /// Every edge endpoint must name a known node and carry a finite,
    /// non-negative weight. Each undirected edge is inserted in both
    /// directions at the same weight.
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        let mut node_table = BTreeMap::new();
        let mut adjacency: BTreeMap<NodeId, BTreeMap<NodeId, f64>> = BTreeMap::new();
        for node in nodes {
            adjacency.entry(node.id.clone()).or_default();
            node_table.insert(node.id.clone(), node);
        }

        for edge in edges {
            if !node_table.contains_key(&edge.from) {
                return Err(GraphError::UnknownNode(edge.from));
            }
            if !node_table.contains_key(&edge.to) {
                return Err(GraphError::UnknownNode(edge.to));
            }
            if edge.from == edge.to {
                return Err(GraphError::SelfLoop(edge.from));
            }
            if !edge.weight.is_finite() || edge.weight < 0.0 {
                return Err(GraphError::InvalidWeight {
                    from: edge.from,
                    to: edge.to,
                    weight: edge.weight,
                });
            }
            adjacency
                .entry(edge.from.clone())
                .or_default()
                .insert(edge.to.clone(), edge.weight);
            adjacency
                .entry(edge.to.clone())
                .or_default()
                .insert(edge.from.clone(), edge.weight);
        }

        Ok(Self {
            nodes: node_table,
            adjacency,
        })
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Neighbors of `id` with their base weights. Empty for an unknown node;
    /// callers that care about existence check [`has_node`](Self::has_node).
    pub fn neighbors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = (&'a NodeId, f64)> + 'a {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(n, w)| (n, *w)))
    }

    /// Base weight of the edge `from`->`to`, if present.
    pub fn edge_weight(&self, from: &NodeId, to: &NodeId) -> Option<f64> {
        self.adjacency.get(from).and_then(|m| m.get(to)).copied()
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
