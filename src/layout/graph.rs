use std::collections::HashMap;

use crate::config::EdgePolicy;
use crate::ir::{Graph, Node};

use super::error::{DanglingReference, EdgeEnd, LayoutError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ModelEdge {
    /// Position in the caller's edge list.
    pub input: usize,
    pub from: usize,
    pub to: usize,
}

/// Validated, index-based view of a [`Graph`]. Node slots are unique ids in
/// first-occurrence order.
#[derive(Debug)]
pub(super) struct GraphModel<'a> {
    pub nodes: Vec<&'a Node>,
    pub outgoing: Vec<Vec<usize>>,
    pub incoming: Vec<Vec<usize>>,
    pub edges: Vec<ModelEdge>,
    pub explicit_roots: Vec<usize>,
    pub dropped_edges: Vec<DanglingReference>,
    pub ignored_roots: Vec<String>,
}

impl<'a> GraphModel<'a> {
    pub fn build(graph: &'a Graph, policy: EdgePolicy) -> Result<Self, LayoutError> {
        let mut nodes: Vec<&'a Node> = Vec::with_capacity(graph.nodes.len());
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(graph.nodes.len());
        for (position, node) in graph.nodes.iter().enumerate() {
            if node.id.is_empty() {
                return Err(LayoutError::MissingNodeId { index: position });
            }
            match index.get(node.id.as_str()) {
                Some(&slot) => {
                    tracing::warn!(id = %node.id, "duplicate node id; last definition wins");
                    nodes[slot] = node;
                }
                None => {
                    index.insert(node.id.as_str(), nodes.len());
                    nodes.push(node);
                }
            }
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::with_capacity(graph.edges.len());
        let mut dropped_edges = Vec::new();
        for (position, edge) in graph.edges.iter().enumerate() {
            if edge.from.is_empty() {
                return Err(LayoutError::MissingEdgeEndpoint {
                    index: position,
                    end: EdgeEnd::From,
                });
            }
            if edge.to.is_empty() {
                return Err(LayoutError::MissingEdgeEndpoint {
                    index: position,
                    end: EdgeEnd::To,
                });
            }
            let from = index.get(edge.from.as_str()).copied();
            let to = index.get(edge.to.as_str()).copied();
            let (Some(from), Some(to)) = (from, to) else {
                let mut missing = Vec::new();
                if from.is_none() {
                    missing.push(edge.from.clone());
                }
                if to.is_none() && edge.to != edge.from {
                    missing.push(edge.to.clone());
                }
                dropped_edges.push(DanglingReference {
                    edge: Some(position),
                    from: Some(edge.from.clone()),
                    to: Some(edge.to.clone()),
                    missing,
                });
                continue;
            };
            outgoing[from].push(to);
            incoming[to].push(from);
            edges.push(ModelEdge {
                input: position,
                from,
                to,
            });
        }

        let mut explicit_roots = Vec::new();
        let mut ignored_roots = Vec::new();
        for root in &graph.roots {
            match index.get(root.as_str()) {
                Some(&slot) => {
                    if !explicit_roots.contains(&slot) {
                        explicit_roots.push(slot);
                    }
                }
                None => ignored_roots.push(root.clone()),
            }
        }

        if policy == EdgePolicy::Strict && (!dropped_edges.is_empty() || !ignored_roots.is_empty())
        {
            let mut references = dropped_edges;
            references.extend(ignored_roots.into_iter().map(|root| DanglingReference {
                edge: None,
                from: None,
                to: None,
                missing: vec![root],
            }));
            return Err(LayoutError::InvalidReferences(references));
        }

        for reference in &dropped_edges {
            tracing::warn!(%reference, "dropping edge");
        }
        for root in &ignored_roots {
            tracing::warn!(root = %root, "ignoring unknown root");
        }

        Ok(Self {
            nodes,
            outgoing,
            incoming,
            edges,
            explicit_roots,
            dropped_edges,
            ignored_roots,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Caller roots, or every source node when none resolve. A source has
    /// outgoing edges and no incoming ones; isolated nodes are not sources.
    pub fn roots(&self) -> Vec<usize> {
        if !self.explicit_roots.is_empty() {
            return self.explicit_roots.clone();
        }
        (0..self.len())
            .filter(|&slot| self.incoming[slot].is_empty() && !self.outgoing[slot].is_empty())
            .collect()
    }

    pub fn has_edges(&self, slot: usize) -> bool {
        !self.outgoing[slot].is_empty() || !self.incoming[slot].is_empty()
    }

    pub fn out_degree(&self, slot: usize) -> usize {
        self.outgoing[slot].len()
    }
}
