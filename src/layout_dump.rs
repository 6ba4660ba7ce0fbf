use crate::layout::{DanglingReference, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub layer_count: usize,
    pub layers: Vec<Vec<String>>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub dropped_edges: Vec<DanglingReference>,
    pub ignored_roots: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub layer: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    pub back_edge: bool,
    pub path: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                layer: node.layer,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                label: edge.label.clone(),
                back_edge: edge.back_edge,
                path: edge.path.to_svg_path(),
            })
            .collect();

        let layers = layout
            .layers()
            .into_iter()
            .map(|ids| ids.into_iter().map(str::to_string).collect())
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            layer_count: layout.layer_count,
            layers,
            nodes,
            edges,
            dropped_edges: layout.dropped_edges.clone(),
            ignored_roots: layout.ignored_roots.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::Graph;
    use crate::layout::{SequentialIds, compute_layout};

    #[test]
    fn dump_lists_layers_and_positions() {
        let graph = Graph::from_transitions(
            Vec::<String>::new(),
            [("A", "B", "go"), ("A", "C", "stay")],
        );
        let layout =
            compute_layout(&graph, &LayoutConfig::default(), &mut SequentialIds::new()).unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.layers, vec![vec!["A".to_string()], vec!["B".into(), "C".into()]]);
        let json: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
        assert_eq!(json["layerCount"], 2);
        assert_eq!(json["nodes"][1]["layer"], 1);
        assert_eq!(json["edges"][0]["label"], "go");
        assert_eq!(json["edges"][0]["backEdge"], false);
    }
}
