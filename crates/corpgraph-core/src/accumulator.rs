//! Incremental node/edge deduplication shared by every normalizer.
//!
//! A `GraphAccumulator` lives for one request. Nodes are keyed by identity
//! and merged first-non-null-wins; edges are a set keyed by the unordered
//! endpoint pair, the relationship kind and the `designation` property.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::classify::classify;
use crate::model::{
    display_label, Classification, EntityNode, GraphEdge, GraphNode, GraphStatistics, GraphView,
    NodeKind, Properties,
};
use crate::reference::ReferenceSet;

/// Relationship kind of a directorship.
pub const DIRECTED: &str = "DIRECTED";

/// What happened to an edge handed to [`GraphAccumulator::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Added,
    Duplicate,
    MissingEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeKey {
    low: String,
    high: String,
    rel_type: String,
    designation: Option<String>,
}

impl EdgeKey {
    fn new(a: &str, b: &str, rel_type: &str, properties: &Properties) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let designation = properties.get("designation").and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        Self {
            low: low.to_string(),
            high: high.to_string(),
            rel_type: rel_type.to_string(),
            designation,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingNode {
    id: String,
    kind: NodeKind,
    properties: Properties,
}

/// Request-scoped node map and edge set.
#[derive(Debug, Default)]
pub struct GraphAccumulator {
    nodes: Vec<PendingNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_keys: HashSet<EdgeKey>,
    skipped_edges: usize,
}

impl GraphAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store entity and return its view identity.
    pub fn add_entity(&mut self, entity: &EntityNode) -> String {
        self.add_node(entity.view_id(), entity.kind(), &entity.properties)
    }

    /// Register a node. Re-registering an identity merges the property bag:
    /// a key keeps its first non-null value.
    pub fn add_node(&mut self, id: String, kind: NodeKind, properties: &Properties) -> String {
        if let Some(&pos) = self.index.get(&id) {
            let existing = &mut self.nodes[pos];
            for (key, value) in properties {
                if value.is_null() {
                    continue;
                }
                let unset = existing.properties.get(key).map_or(true, Value::is_null);
                if unset {
                    existing.properties.insert(key.clone(), value.clone());
                }
            }
            if existing.kind.is_unknown() && !kind.is_unknown() {
                existing.kind = kind;
            }
            return id;
        }

        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(PendingNode {
            id: id.clone(),
            kind,
            properties: properties.clone(),
        });
        id
    }

    pub fn node_kind(&self, id: &str) -> Option<&NodeKind> {
        self.index.get(id).map(|&pos| &self.nodes[pos].kind)
    }

    /// Overwrite one property of a registered node. Returns false when the
    /// node is unknown.
    pub fn set_property(&mut self, id: &str, key: &str, value: Value) -> bool {
        match self.index.get(id) {
            Some(&pos) => {
                self.nodes[pos].properties.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Register an edge between two registered nodes.
    ///
    /// A `DIRECTED` edge with exactly one Director endpoint is oriented with
    /// the Director as source. Other kinds keep the given direction. Edges whose endpoints are not both registered are
    /// skipped.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        rel_type: &str,
        properties: &Properties,
    ) -> EdgeOutcome {
        let kinds = match (self.node_kind(source).cloned(), self.node_kind(target).cloned()) {
            (Some(s), Some(t)) => (s, t),
            _ => {
                debug!(source, target, rel_type, "Skipping edge with unregistered endpoint");
                self.skipped_edges += 1;
                return EdgeOutcome::MissingEndpoint;
            }
        };

        let (source, target) = match kinds {
            (NodeKind::Director, NodeKind::Director) => (source, target),
            (_, NodeKind::Director) if rel_type == DIRECTED => (target, source),
            _ => (source, target),
        };

        if !self.edge_keys.insert(EdgeKey::new(source, target, rel_type, properties)) {
            return EdgeOutcome::Duplicate;
        }

        self.edges.push(GraphEdge {
            source: source.to_string(),
            target: target.to_string(),
            rel_type: rel_type.to_string(),
            properties: properties.clone(),
        });
        EdgeOutcome::Added
    }

    /// Record an edge contribution dropped before reaching `add_edge`.
    pub fn note_skipped_edge(&mut self) {
        self.skipped_edges += 1;
    }

    pub fn skipped_edges(&self) -> usize {
        self.skipped_edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Classify every node and produce the canonical view.
    pub fn finalize(self, primary: Option<&ReferenceSet>) -> GraphView {
        let nodes: Vec<GraphNode> = self
            .nodes
            .into_iter()
            .map(|pending| GraphNode {
                label: display_label(&pending.kind, &pending.properties),
                classification: classify(&pending.kind, &pending.properties, primary),
                id: pending.id,
                node_type: pending.kind,
                properties: pending.properties,
            })
            .collect();

        let links: Vec<GraphEdge> = self
            .edges
            .into_iter()
            .filter(|e| self.index.contains_key(&e.source) && self.index.contains_key(&e.target))
            .collect();

        let statistics = compute_statistics(&nodes, &links);
        GraphView {
            nodes,
            links,
            statistics,
        }
    }
}

fn compute_statistics(nodes: &[GraphNode], links: &[GraphEdge]) -> GraphStatistics {
    let mut stats = GraphStatistics {
        total_nodes: nodes.len(),
        total_links: links.len(),
        ..Default::default()
    };
    for node in nodes {
        match node.node_type {
            NodeKind::Company => stats.companies += 1,
            NodeKind::Director => stats.directors += 1,
            _ => {}
        }
        match node.classification {
            Classification::Primary => stats.primary += 1,
            Classification::Secondary => stats.secondary += 1,
            Classification::Director => {}
        }
    }
    stats
}
