use thiserror::Error;

/// Which end of an edge a validation problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    From,
    To,
}

impl std::fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeEnd::From => f.write_str("from"),
            EdgeEnd::To => f.write_str("to"),
        }
    }
}

/// A reference to a node id that is not in the node list. `edge` is `None`
/// for an unknown explicit root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DanglingReference {
    pub edge: Option<usize>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub missing: Vec<String>,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.edge {
            Some(index) => write!(
                f,
                "edge #{index} ({} -> {}) references unknown node(s) {}",
                self.from.as_deref().unwrap_or(""),
                self.to.as_deref().unwrap_or(""),
                self.missing.join(", ")
            ),
            None => write!(f, "root references unknown node {}", self.missing.join(", ")),
        }
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("node #{index} has no id")]
    MissingNodeId { index: usize },
    #[error("edge #{index} has no `{end}` node id")]
    MissingEdgeEndpoint { index: usize, end: EdgeEnd },
    #[error("graph has {} invalid reference(s): {}", .0.len(), join_references(.0))]
    InvalidReferences(Vec<DanglingReference>),
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

fn join_references(references: &[DanglingReference]) -> String {
    references
        .iter()
        .map(|reference| reference.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
