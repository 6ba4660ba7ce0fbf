use crate::layout::LayoutError;
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Horizontal placement policy within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Canvas width split into equal slots, one per node, ignoring node width.
    #[default]
    EvenSlots,
    /// Boxes packed left to right with `node_h_gap` between them, row centered.
    Packed,
}

/// What to do with edges whose endpoints are not in the node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgePolicy {
    /// Drop them and report them on the layout.
    #[default]
    Lenient,
    /// Reject the whole layout.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub node_padding: f32,
    pub node_v_gap: f32,
    pub node_h_gap: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub edge_label_max_length: usize,
    pub canvas_padding: f32,
    pub placement: Placement,
    pub edge_policy: EdgePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_padding: 10.0,
            node_v_gap: 80.0,
            node_h_gap: 36.0,
            width: 1200.0,
            height: 800.0,
            font_size: 12.0,
            edge_label_max_length: 32,
            canvas_padding: 40.0,
            placement: Placement::EvenSlots,
            edge_policy: EdgePolicy::Lenient,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("fontSize", self.font_size)?;
        non_negative("nodePadding", self.node_padding)?;
        non_negative("nodeVGap", self.node_v_gap)?;
        non_negative("nodeHGap", self.node_h_gap)?;
        non_negative("canvasPadding", self.canvas_padding)?;
        Ok(())
    }

    /// Padding actually applied on each side: `canvas_padding`, shrunk so a
    /// small canvas keeps every node center inside it.
    pub fn effective_padding(&self) -> f32 {
        self.canvas_padding
            .min(self.width / 2.0)
            .min(self.height / 2.0)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(LayoutError::InvalidOption {
        name,
        reason: format!("expected a finite value > 0, got {value}"),
    })
}

fn non_negative(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(LayoutError::InvalidOption {
        name,
        reason: format!("expected a finite value >= 0, got {value}"),
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    arrow_color: Option<String>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    node_text_color: Option<String>,
    edge_text_color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_padding: Option<f32>,
    node_v_gap: Option<f32>,
    node_h_gap: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    font_size: Option<f32>,
    edge_label_max_length: Option<usize>,
    canvas_padding: Option<f32>,
    placement: Option<Placement>,
    edge_policy: Option<EdgePolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let parsed: ConfigFile = if is_json5 {
        json5::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?
    };
    apply_config_file(config, parsed)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> anyhow::Result<Config> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme `{theme_name}`"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.arrow_color {
            config.theme.arrow_color = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.node_text_color {
            config.theme.node_text_color = v;
        }
        if let Some(v) = vars.edge_text_color {
            config.theme.edge_text_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_padding {
            target.node_padding = v;
        }
        if let Some(v) = layout.node_v_gap {
            target.node_v_gap = v;
        }
        if let Some(v) = layout.node_h_gap {
            target.node_h_gap = v;
        }
        if let Some(v) = layout.width {
            target.width = v;
        }
        if let Some(v) = layout.height {
            target.height = v;
        }
        if let Some(v) = layout.font_size {
            target.font_size = v;
        }
        if let Some(v) = layout.edge_label_max_length {
            target.edge_label_max_length = v;
        }
        if let Some(v) = layout.canvas_padding {
            target.canvas_padding = v;
        }
        if let Some(v) = layout.placement {
            target.placement = v;
        }
        if let Some(v) = layout.edge_policy {
            target.edge_policy = v;
        }
    }

    Ok(config)
}
