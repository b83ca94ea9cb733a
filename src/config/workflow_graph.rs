// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::PayloadType;

/// Directed, typed connection between two executors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub payload_type: PayloadType,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        payload_type: impl Into<PayloadType>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            payload_type: payload_type.into(),
        }
    }
}

/// Adjacency list of edges keyed by source executor.
///
/// Edges keep their insertion order per source, which fixes the order fan-out
/// copies are queued in. Cycles are allowed.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph(pub HashMap<String, Vec<Edge>>);

impl WorkflowGraph {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.0.entry(edge.source.clone()).or_default().push(edge);
    }

    /// All edges leaving `source`
    pub fn outgoing(&self, source: &str) -> &[Edge] {
        self.0.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges leaving `source` that accept `payload_type`
    pub fn routes<'a>(
        &'a self,
        source: &str,
        payload_type: &'a PayloadType,
    ) -> impl Iterator<Item = &'a Edge> {
        self.outgoing(source)
            .iter()
            .filter(move |edge| &edge.payload_type == payload_type)
    }

    pub fn edge_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl From<Vec<Edge>> for WorkflowGraph {
    fn from(edges: Vec<Edge>) -> Self {
        let mut graph = Self::new();
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_filter_by_payload_type() {
        let graph = WorkflowGraph::from(vec![
            Edge::new("a", "b", "text"),
            Edge::new("a", "c", "number"),
            Edge::new("a", "d", "text"),
        ]);

        let text = PayloadType::from("text");
        let targets: Vec<&str> = graph.routes("a", &text).map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["b", "d"]);

        let missing = PayloadType::from("image");
        assert_eq!(graph.routes("a", &missing).count(), 0);
        assert_eq!(graph.routes("unknown", &text).count(), 0);
        assert_eq!(graph.edge_count(), 3);
    }
}
