use serde::Serialize;

use super::error::DanglingReference;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Cubic Bézier from `start` to `end` with two control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicPath {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicPath {
    /// SVG path data (`M .. C ..`).
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub label: String,
    pub layer: usize,
    /// Center of the box.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeLayout {
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    /// Caller-supplied or synthesized id.
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    pub path: CubicPath,
    /// Edge was classified as closing a cycle and ignored while ranking.
    pub back_edge: bool,
}

/// Derived per-call result of the layout pipeline. Nodes are in declaration
/// order (first occurrence of each id), edges in input order minus dropped ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub layer_count: usize,
    /// Token used to keep document-local ids (arrow marker) unique per render.
    pub diagram_id: String,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub dropped_edges: Vec<DanglingReference>,
    pub ignored_roots: Vec<String>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn layer_of(&self, id: &str) -> Option<usize> {
        self.node(id).map(|node| node.layer)
    }

    /// Node ids per layer, in left-to-right order.
    pub fn layers(&self) -> Vec<Vec<&str>> {
        let mut layers: Vec<Vec<&NodeLayout>> = vec![Vec::new(); self.layer_count];
        for node in &self.nodes {
            if let Some(bucket) = layers.get_mut(node.layer) {
                bucket.push(node);
            }
        }
        layers
            .into_iter()
            .map(|mut bucket| {
                bucket.sort_by(|a, b| a.x.total_cmp(&b.x));
                bucket.into_iter().map(|node| node.id.as_str()).collect()
            })
            .collect()
    }
}
