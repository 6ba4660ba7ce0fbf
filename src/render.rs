use crate::config::LayoutConfig;
use crate::layout::{EdgeLayout, Layout, NodeLayout};
use crate::theme::Theme;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

const NODE_CORNER_RADIUS: f32 = 8.0;
const NODE_STROKE_WIDTH: f32 = 1.2;
const EDGE_STROKE_WIDTH: f32 = 1.4;
const EDGE_OPACITY: f32 = 0.9;
const MIN_EDGE_FONT_SIZE: f32 = 10.0;

static DOM_ID_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Serializes a layout into a standalone SVG document whose declared size is
/// exactly the canvas size of `config`.
pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = config.width;
    let height = config.height;
    let marker_id = format!("arrow-{}", dom_id(&layout.diagram_id));

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" role=\"img\" aria-label=\"System diagram\">",
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"{marker_id}\" markerWidth=\"10\" markerHeight=\"10\" refX=\"10\" refY=\"5\" orient=\"auto\"><path d=\"M0,0 L10,5 L0,10 z\" fill=\"{}\"/></marker>",
        escape_xml(&theme.arrow_color)
    ));
    let font_family = escape_xml(&theme.font_family);
    svg.push_str(&format!(
        "<style>.node-text {{ font-family: {font_family}; font-size: {}px; fill: {}; }} .edge-text {{ font-family: {font_family}; font-size: {}px; fill: {}; }}</style>",
        config.font_size,
        escape_xml(&theme.node_text_color),
        (config.font_size - 1.0).max(MIN_EDGE_FONT_SIZE),
        escape_xml(&theme.edge_text_color)
    ));
    svg.push_str("</defs>");

    svg.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    svg.push_str("<g class=\"edges\">");
    for (idx, edge) in layout.edges.iter().enumerate() {
        svg.push_str(&edge_svg(idx, edge, &marker_id, theme));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn edge_svg(idx: usize, edge: &EdgeLayout, marker_id: &str, theme: &Theme) -> String {
    let path_id = format!("edge-path-{idx}-{}", dom_id(&edge.id));
    let label = escape_xml(&edge.label);
    format!(
        "<g class=\"edge\" aria-label=\"{label}\"><path id=\"{path_id}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{EDGE_STROKE_WIDTH}\" marker-end=\"url(#{marker_id})\" opacity=\"{EDGE_OPACITY}\"/><text class=\"edge-text\"><textPath href=\"#{path_id}\" startOffset=\"50%\" text-anchor=\"middle\">{label}</textPath></text></g>",
        edge.path.to_svg_path(),
        escape_xml(&theme.arrow_color),
    )
}

fn node_svg(node: &NodeLayout, theme: &Theme) -> String {
    format!(
        "<g id=\"node-{}\" transform=\"translate({:.2},{:.2})\"><rect rx=\"{NODE_CORNER_RADIUS}\" ry=\"{NODE_CORNER_RADIUS}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{NODE_STROKE_WIDTH}\"/><text class=\"node-text\" x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"middle\" text-anchor=\"middle\">{}</text></g>",
        dom_id(&node.id),
        node.left(),
        node.top(),
        node.width,
        node.height,
        escape_xml(&theme.node_fill),
        escape_xml(&theme.node_stroke),
        node.width / 2.0,
        node.height / 2.0,
        escape_xml(&node.label)
    )
}

/// Escapes the five XML-significant characters.
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Makes a user-supplied id usable as an XML id and URL fragment.
pub fn dom_id(raw: &str) -> String {
    DOM_ID_UNSAFE.replace_all(raw, "_").into_owned()
}

/// Writes text output to `output`, or stdout when absent.
pub fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
        }
        None => {
            print!("{}", text);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    config: &LayoutConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = primary_font_family(&theme.font_family);
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(config.width, config.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size {}x{}", config.width, config.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _config: &LayoutConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn primary_font_family(families: &str) -> String {
    families
        .split(',')
        .map(|family| family.trim().trim_matches('"').trim_matches('\''))
        .find(|family| !family.is_empty())
        .unwrap_or("monospace")
        .to_string()
}
