use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::graph::GraphModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

/// Result of layer assignment over a [`GraphModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Layering {
    /// Layer per node slot.
    pub layer: Vec<usize>,
    /// Node slots per layer, in placement order.
    pub buckets: Vec<Vec<usize>>,
    /// Per model edge: closes a cycle and was excluded from ranking.
    pub back_edges: Vec<bool>,
}

impl Layering {
    pub fn layer_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Longest-path layering from the root set.
///
/// A depth-first pass from the roots marks every edge that reaches a node
/// still on the DFS stack as a back edge. The remaining edges form a DAG, so
/// relaxing `rank(v) = max(rank(v), rank(u) + 1)` once per edge in reverse
/// postorder reaches the longest-path fixpoint in `O(V + E)` even when the
/// input has cycles.
///
/// Without caller roots, every source node is a root and each source-less
/// component is entered at its earliest declared node, so only isolated nodes
/// stay unreached. Unreached nodes get one fresh layer each below the deepest
/// ranked layer, in topological order among themselves.
pub(super) fn assign_layers(model: &GraphModel<'_>) -> Layering {
    let node_count = model.len();
    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (idx, edge) in model.edges.iter().enumerate() {
        out_edges[edge.from].push(idx);
    }

    let mut visit = vec![Visit::New; node_count];
    let mut back_edges = vec![false; model.edges.len()];

    let mut roots = model.roots();
    let mut reached_order = Vec::with_capacity(node_count);
    depth_first(
        model,
        &out_edges,
        &roots,
        &mut visit,
        &mut back_edges,
        &mut reached_order,
    );
    if model.explicit_roots.is_empty() {
        // Components without a source node (pure cycles) are entered at
        // their earliest declared node.
        for slot in 0..node_count {
            if visit[slot] == Visit::New && model.has_edges(slot) {
                roots.push(slot);
                depth_first(
                    model,
                    &out_edges,
                    &[slot],
                    &mut visit,
                    &mut back_edges,
                    &mut reached_order,
                );
            }
        }
    }

    let mut rank: Vec<Option<usize>> = vec![None; node_count];
    for &root in &roots {
        rank[root] = Some(0);
    }
    for &node in reached_order.iter().rev() {
        let Some(current) = rank[node] else {
            continue;
        };
        for &edge_idx in &out_edges[node] {
            if back_edges[edge_idx] {
                continue;
            }
            let to = model.edges[edge_idx].to;
            let candidate = current + 1;
            if rank[to].map_or(true, |existing| candidate > existing) {
                rank[to] = Some(candidate);
            }
        }
    }

    let unreached: Vec<usize> = (0..node_count)
        .filter(|&slot| visit[slot] == Visit::New)
        .collect();
    if !unreached.is_empty() {
        let mut scratch = Vec::with_capacity(unreached.len());
        depth_first(
            model,
            &out_edges,
            &unreached,
            &mut visit,
            &mut back_edges,
            &mut scratch,
        );
        let order = declaration_topological_order(model, &out_edges, &unreached, &back_edges);
        let mut next = rank.iter().flatten().max().map_or(0, |max| max + 1);
        for node in order {
            rank[node] = Some(next);
            next += 1;
        }
        tracing::debug!(
            count = unreached.len(),
            "nodes unreachable from roots appended as separate layers"
        );
    }

    let layer: Vec<usize> = rank.into_iter().map(|r| r.unwrap_or(0)).collect();
    let layer_count = layer.iter().max().map_or(0, |max| max + 1);
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
    for (slot, &l) in layer.iter().enumerate() {
        buckets[l].push(slot);
    }
    for bucket in &mut buckets {
        // Stable: equal out-degree keeps declaration order.
        bucket.sort_by_key(|&slot| Reverse(model.out_degree(slot)));
    }

    tracing::debug!(
        nodes = node_count,
        layers = layer_count,
        roots = roots.len(),
        back_edges = back_edges.iter().filter(|b| **b).count(),
        "assigned layers"
    );

    Layering {
        layer,
        buckets,
        back_edges,
    }
}

/// Topological order of `subset` over non-back edges, preferring the earliest
/// declared node whenever several are ready.
fn declaration_topological_order(
    model: &GraphModel<'_>,
    out_edges: &[Vec<usize>],
    subset: &[usize],
    back_edges: &[bool],
) -> Vec<usize> {
    let mut member = vec![false; model.len()];
    for &node in subset {
        member[node] = true;
    }
    let inner = |edge_idx: usize| !back_edges[edge_idx] && member[model.edges[edge_idx].to];
    let mut indegree = vec![0usize; model.len()];
    for &node in subset {
        for &edge_idx in &out_edges[node] {
            if inner(edge_idx) {
                indegree[model.edges[edge_idx].to] += 1;
            }
        }
    }
    let mut ready: BinaryHeap<Reverse<usize>> = subset
        .iter()
        .copied()
        .filter(|&node| indegree[node] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(subset.len());
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &edge_idx in &out_edges[node] {
            if !inner(edge_idx) {
                continue;
            }
            let to = model.edges[edge_idx].to;
            indegree[to] -= 1;
            if indegree[to] == 0 {
                ready.push(Reverse(to));
            }
        }
    }
    order
}

fn depth_first(
    model: &GraphModel<'_>,
    out_edges: &[Vec<usize>],
    starts: &[usize],
    visit: &mut [Visit],
    back_edges: &mut [bool],
    postorder: &mut Vec<usize>,
) {
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for &start in starts {
        if visit[start] != Visit::New {
            continue;
        }
        visit[start] = Visit::Open;
        stack.push((start, 0));
        while let Some(top) = stack.last_mut() {
            let (node, cursor) = *top;
            let Some(&edge_idx) = out_edges[node].get(cursor) else {
                visit[node] = Visit::Done;
                postorder.push(node);
                stack.pop();
                continue;
            };
            top.1 += 1;
            let to = model.edges[edge_idx].to;
            match visit[to] {
                Visit::New => {
                    visit[to] = Visit::Open;
                    stack.push((to, 0));
                }
                Visit::Open => back_edges[edge_idx] = true,
                Visit::Done => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgePolicy;
    use crate::ir::{Edge, Graph, Node};

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph {
            nodes: nodes.iter().map(|id| Node::new(*id)).collect(),
            edges: edges.iter().map(|(from, to)| Edge::new(*from, *to)).collect(),
            roots: Vec::new(),
        }
    }

    fn layers_of(g: &Graph) -> Layering {
        let model = GraphModel::build(g, EdgePolicy::Lenient).expect("model");
        assign_layers(&model)
    }

    #[test]
    fn chain_gets_one_layer_per_node() {
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")],
        );
        let layering = layers_of(&g);
        assert_eq!(layering.layer, vec![0, 1, 2, 3, 4]);
        assert_eq!(layering.layer_count(), 5);
    }

    #[test]
    fn longest_path_wins_over_shortcut() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("A", "C")]);
        assert_eq!(layers_of(&g).layer, vec![0, 1, 2]);
    }

    #[test]
    fn disconnected_node_goes_below_deepest_layer() {
        let g = graph(&["A", "B", "C"], &[("A", "B")]);
        assert_eq!(layers_of(&g).layer, vec![0, 1, 2]);

        let g = graph(&["C", "A", "B", "D"], &[("A", "B")]);
        assert_eq!(layers_of(&g).layer, vec![2, 0, 1, 3]);
    }

    #[test]
    fn single_isolated_node_sits_on_layer_zero() {
        let g = graph(&["solo"], &[]);
        let layering = layers_of(&g);
        assert_eq!(layering.layer, vec![0]);
        assert_eq!(layering.layer_count(), 1);
    }

    #[test]
    fn cycle_reachable_from_root_terminates() {
        let g = graph(
            &["S", "A", "B", "C"],
            &[("S", "A"), ("A", "B"), ("B", "C"), ("C", "A")],
        );
        let layering = layers_of(&g);
        assert_eq!(layering.layer, vec![0, 1, 2, 3]);
        assert_eq!(layering.back_edges, vec![false, false, false, true]);
    }

    #[test]
    fn pure_cycle_without_sources_is_laid_out() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let layering = layers_of(&g);
        assert_eq!(layering.layer, vec![0, 1, 2]);
        assert_eq!(layering.back_edges.iter().filter(|b| **b).count(), 1);
    }

    #[test]
    fn unreached_nodes_follow_their_own_edges() {
        // Z is declared before Y, but Y -> Z and neither is reachable from A.
        let mut g = graph(&["A", "Z", "Y"], &[("Y", "Z")]);
        g.roots = vec!["A".to_string()];
        assert_eq!(layers_of(&g).layer, vec![0, 2, 1]);
    }

    #[test]
    fn sourceless_cycle_feeding_reached_node_stays_monotone() {
        let g = graph(
            &["S", "R", "X", "U"],
            &[("S", "R"), ("X", "U"), ("U", "X"), ("U", "R")],
        );
        let layering = layers_of(&g);
        assert_eq!(layering.layer, vec![0, 2, 0, 1]);
        assert_eq!(layering.back_edges, vec![false, false, true, false]);
    }

    #[test]
    fn self_loop_is_a_back_edge() {
        let g = graph(&["A", "B"], &[("A", "A"), ("A", "B")]);
        let layering = layers_of(&g);
        assert_eq!(layering.layer, vec![0, 1]);
        assert_eq!(layering.back_edges, vec![true, false]);
    }

    #[test]
    fn layer_sorted_by_descending_out_degree() {
        let g = graph(
            &["R", "A", "B", "X", "Y"],
            &[("R", "A"), ("R", "B"), ("B", "X"), ("B", "Y")],
        );
        let layering = layers_of(&g);
        assert_eq!(layering.buckets[1], vec![2, 1]);
        assert_eq!(layering.buckets[2], vec![3, 4]);
    }

    #[test]
    fn large_dense_cyclic_graph_finishes() {
        let n = 2_000;
        let ids: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let mut g = Graph::default();
        g.nodes = ids.iter().map(|id| Node::new(id.as_str())).collect();
        for i in 0..n {
            g.edges.push(Edge::new(ids[i].as_str(), ids[(i + 1) % n].as_str()));
            g.edges.push(Edge::new(ids[i].as_str(), ids[(i * 7 + 3) % n].as_str()));
        }
        let layering = layers_of(&g);
        assert_eq!(layering.layer.len(), n);
        assert!(layering.layer_count() >= 1);
    }
}
