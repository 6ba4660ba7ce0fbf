use chronos_viz::{
    Config, EdgePolicy, Graph, Placement, RandomIds, Theme, render_with_ids, render_with_options,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagramRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    packed: Option<bool>,
    strict: Option<bool>,
    seed: Option<u64>,
}

fn build_config(options: &DiagramRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = &options.font_family {
        config.theme.font_family = font_family.clone();
    }
    if let Some(font_size) = options.font_size {
        config.layout.font_size = font_size;
    }
    if let Some(width) = options.width {
        config.layout.width = width;
    }
    if let Some(height) = options.height {
        config.layout.height = height;
    }
    if options.packed == Some(true) {
        config.layout.placement = Placement::Packed;
    }
    if options.strict == Some(true) {
        config.layout.edge_policy = EdgePolicy::Strict;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<DiagramRenderOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(DiagramRenderOptions::default()),
    }
}

fn render(graph_json: &str, options_json: Option<String>) -> Result<chronos_viz::Rendered, String> {
    let options = parse_options(options_json)?;
    let graph = Graph::from_json(graph_json).map_err(|error| error.to_string())?;
    let config = build_config(&options);
    let rendered = match options.seed {
        Some(seed) => render_with_ids(&graph, &config, &mut RandomIds::seeded(seed)),
        None => render_with_options(&graph, &config),
    };
    rendered.map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn render_graph_svg(graph_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    render(graph_json, options_json)
        .map(|rendered| rendered.svg)
        .map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_graph_data_uri(
    graph_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    render(graph_json, options_json)
        .map(|rendered| rendered.data_uri)
        .map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::render;

    #[test]
    fn renders_state_machine_graph_with_edge_labels() {
        let graph = r#"{
            "nodes": [
                {"id": "UNINIT", "label": "UNINITIALIZED"},
                {"id": "PRES", "label": "PRESENTATION"},
                {"id": "LIVE", "label": "LIVE"}
            ],
            "edges": [
                {"from": "UNINIT", "to": "PRES", "label": "init"},
                {"from": "PRES", "to": "LIVE", "meta": {"type": "ack"}}
            ]
        }"#;

        let rendered = render(graph, Some(r#"{"theme": "light", "width": 900}"#.to_string()))
            .expect("state machine graph should render");

        assert!(rendered.svg.contains("width=\"900\""));
        assert!(rendered.svg.contains(">init</textPath>"));
        assert!(rendered.svg.contains(">event:ack</textPath>"));
        assert!(rendered.data_uri.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn reports_dangling_edges_in_strict_mode() {
        let graph = r#"{"nodes": [{"id": "A"}], "edges": [{"from": "A", "to": "B"}]}"#;
        let err = render(graph, Some(r#"{"strict": true}"#.to_string())).unwrap_err();
        assert!(err.contains("unknown node"));
    }
}
