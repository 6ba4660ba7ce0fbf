use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub arrow_color: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_text_color: String,
    pub edge_text_color: String,
}

impl Theme {
    pub fn midnight() -> Self {
        Self {
            font_family: "ui-monospace, SFMono-Regular, Menlo, Monaco, \"Roboto Mono\", \"Courier New\", monospace"
                .to_string(),
            background: "#0f172a".to_string(),
            arrow_color: "#60a5fa".to_string(),
            node_fill: "#0b1220".to_string(),
            node_stroke: "#1f2937".to_string(),
            node_text_color: "#e6eef8".to_string(),
            edge_text_color: "#bae6fd".to_string(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            arrow_color: "#7A8AA6".to_string(),
            node_fill: "#F8FAFF".to_string(),
            node_stroke: "#C7D2E5".to_string(),
            node_text_color: "#1C2430".to_string(),
            edge_text_color: "#334155".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "midnight" | "dark" | "default" => Some(Self::midnight()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}
