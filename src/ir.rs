use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A box in the diagram. `width`/`height` override the size derived from the
/// label; `w`/`h` are accepted as short aliases in serialized input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(default, alias = "w", skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, alias = "h", skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Text drawn inside the box: the label, or the id when no label is set.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// A directed connection. `meta` is opaque producer data; it is only read to
/// synthesize a label when `label` is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Caller-owned input to a layout call. Node ids must be unique; on duplicates
/// the last definition wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_node(&mut self, id: &str, label: Option<String>) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
            if label.is_some() {
                node.label = label;
            }
            return;
        }
        self.nodes.push(Node {
            id: id.to_string(),
            label,
            ..Default::default()
        });
    }

    pub fn add_edge(&mut self, from: &str, to: &str, label: Option<String>) {
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            label,
            ..Default::default()
        });
    }

    /// Builds a graph from state-machine states and `(from, to, name)`
    /// transitions. States only mentioned by a transition are added after the
    /// listed ones.
    pub fn from_transitions<S, F, T, N>(
        states: impl IntoIterator<Item = S>,
        transitions: impl IntoIterator<Item = (F, T, N)>,
    ) -> Self
    where
        S: Into<String>,
        F: Into<String>,
        T: Into<String>,
        N: Into<String>,
    {
        let mut graph = Graph::new();
        for state in states {
            let id: String = state.into();
            graph.ensure_node(&id, None);
        }
        for (from, to, name) in transitions {
            let (from, to): (String, String) = (from.into(), to.into());
            graph.ensure_node(&from, None);
            graph.ensure_node(&to, None);
            graph.add_edge(&from, &to, Some(name.into()));
        }
        graph
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn from_json5(input: &str) -> Result<Self, json5::Error> {
        json5::from_str(input)
    }
}

// Labels that are not strings (numbers, objects, ...) become an empty label
// instead of failing the whole document.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            tracing::warn!(value = %other, "non-string label replaced by empty text");
            Some(String::new())
        }
    })
}
