mod error;
mod graph;
mod labels;
mod position;
mod ranking;
mod routing;
mod text;
pub(crate) mod types;
pub use error::{DanglingReference, EdgeEnd, LayoutError};
pub use labels::{IdSource, RandomIds, SequentialIds, label_from_meta, truncate_label};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::Graph;
use graph::GraphModel;
use labels::LabelSynthesizer;
use position::place_nodes;
use ranking::assign_layers;
use routing::{route_edge, route_self_loop};

/// Runs the layout pipeline: validation, label synthesis, layering, placement
/// and edge routing. The caller's graph is only read; synthesized edge ids and
/// labels live on the returned [`Layout`].
pub fn compute_layout(
    graph: &Graph,
    config: &LayoutConfig,
    ids: &mut dyn IdSource,
) -> Result<Layout, LayoutError> {
    config.validate()?;
    let model = GraphModel::build(graph, config.edge_policy)?;

    let mut synthesizer = LabelSynthesizer::new(ids, config.edge_label_max_length).reserve(
        model
            .edges
            .iter()
            .filter_map(|edge| graph.edges[edge.input].id.as_deref()),
    );
    let texts: Vec<_> = model
        .edges
        .iter()
        .map(|edge| synthesizer.annotate(&graph.edges[edge.input]))
        .collect();

    let layering = assign_layers(&model);
    let boxes = place_nodes(&model, &layering, config);

    let nodes: Vec<NodeLayout> = model
        .nodes
        .iter()
        .zip(&boxes)
        .zip(&layering.layer)
        .map(|((node, placed), &layer)| NodeLayout {
            id: node.id.clone(),
            label: node.display_label().to_string(),
            layer,
            x: placed.center.x,
            y: placed.center.y,
            width: placed.width,
            height: placed.height,
        })
        .collect();

    let edges: Vec<EdgeLayout> = model
        .edges
        .iter()
        .zip(texts)
        .enumerate()
        .map(|(idx, (edge, text))| EdgeLayout {
            id: text.id,
            from: model.nodes[edge.from].id.clone(),
            to: model.nodes[edge.to].id.clone(),
            label: text.label,
            path: if edge.from == edge.to {
                route_self_loop(&boxes[edge.from])
            } else {
                route_edge(boxes[edge.from].center, boxes[edge.to].center)
            },
            back_edge: layering.back_edges[idx],
        })
        .collect();

    let diagram_id = ids.next_token();

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped = model.dropped_edges.len(),
        layers = layering.layer_count(),
        "computed layout"
    );

    Ok(Layout {
        width: config.width,
        height: config.height,
        layer_count: layering.layer_count(),
        diagram_id,
        nodes,
        edges,
        dropped_edges: model.dropped_edges,
        ignored_roots: model.ignored_roots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgePolicy;
    use crate::ir::{Edge, Node};
    use serde_json::json;

    #[test]
    fn caller_graph_is_not_mutated() {
        let graph = Graph {
            nodes: vec![Node::new("A"), Node::new("B")],
            edges: vec![Edge::new("A", "B").with_meta(json!({"type": "ack"}))],
            roots: Vec::new(),
        };
        let before = graph.clone();
        let layout =
            compute_layout(&graph, &LayoutConfig::default(), &mut SequentialIds::new()).unwrap();
        assert_eq!(graph, before);
        assert_eq!(layout.edges[0].label, "event:ack");
        assert_eq!(layout.edges[0].id, "e-1-0");
        assert_eq!(layout.diagram_id, "1");
    }

    #[test]
    fn dangling_edges_are_reported_not_rendered() {
        let graph = Graph {
            nodes: vec![Node::new("A"), Node::new("B")],
            edges: vec![Edge::new("A", "B"), Edge::new("A", "ghost")],
            roots: Vec::new(),
        };
        let layout =
            compute_layout(&graph, &LayoutConfig::default(), &mut SequentialIds::new()).unwrap();
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.dropped_edges.len(), 1);
        assert_eq!(layout.dropped_edges[0].missing, vec!["ghost".to_string()]);

        let strict = LayoutConfig {
            edge_policy: EdgePolicy::Strict,
            ..Default::default()
        };
        let err = compute_layout(&graph, &strict, &mut SequentialIds::new()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidReferences(ref refs) if refs.len() == 1));
    }

    #[test]
    fn invalid_options_fail_before_layout() {
        let config = LayoutConfig {
            height: -1.0,
            ..Default::default()
        };
        let err = compute_layout(&Graph::new(), &config, &mut SequentialIds::new()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidOption { name: "height", .. }));
    }

    #[test]
    fn empty_graph_yields_empty_layout() {
        let layout =
            compute_layout(&Graph::new(), &LayoutConfig::default(), &mut SequentialIds::new())
                .unwrap();
        assert_eq!(layout.layer_count, 0);
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn self_loops_get_a_visible_path() {
        let graph = Graph {
            nodes: vec![Node::new("A")],
            edges: vec![Edge::new("A", "A").with_label("retry")],
            roots: Vec::new(),
        };
        let layout =
            compute_layout(&graph, &LayoutConfig::default(), &mut SequentialIds::new()).unwrap();
        let edge = &layout.edges[0];
        assert!(edge.back_edge);
        assert_ne!(edge.path.start, edge.path.end);
        assert!(edge.path.control1.x > layout.nodes[0].x + layout.nodes[0].width / 2.0);
    }

    #[test]
    fn back_edges_are_flagged_on_the_layout() {
        let mut graph = Graph::from_transitions(
            ["idle", "busy"],
            [("idle", "busy", "start"), ("busy", "idle", "finish")],
        );
        graph.roots = vec!["idle".to_string()];
        let layout =
            compute_layout(&graph, &LayoutConfig::default(), &mut SequentialIds::new()).unwrap();
        assert_eq!(layout.layer_of("idle"), Some(0));
        assert_eq!(layout.layer_of("busy"), Some(1));
        assert!(!layout.edges[0].back_edge);
        assert!(layout.edges[1].back_edge);
    }
}
