pub mod config;
pub mod encode;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{Config, EdgePolicy, LayoutConfig, Placement, load_config};
pub use encode::to_data_uri;
pub use ir::{Edge, Graph, Node};
pub use layout::{
    IdSource, Layout, LayoutError, RandomIds, SequentialIds, compute_layout,
};
pub use render::{escape_xml, render_svg};
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;

/// Output of one layout-and-render call.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub layout: Layout,
    pub svg: String,
    pub data_uri: String,
}

/// Lays out and renders `graph` with deterministic sequential ids.
pub fn render_with_options(graph: &Graph, config: &Config) -> Result<Rendered, LayoutError> {
    render_with_ids(graph, config, &mut SequentialIds::new())
}

/// Lays out and renders `graph`, drawing synthesized ids from `ids`.
pub fn render_with_ids(
    graph: &Graph,
    config: &Config,
    ids: &mut dyn IdSource,
) -> Result<Rendered, LayoutError> {
    let layout = compute_layout(graph, &config.layout, ids)?;
    let svg = render_svg(&layout, &config.theme, &config.layout);
    let data_uri = to_data_uri(&svg);
    Ok(Rendered {
        layout,
        svg,
        data_uri,
    })
}
