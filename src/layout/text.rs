use unicode_width::UnicodeWidthStr;

use crate::config::LayoutConfig;
use crate::ir::Node;

const MIN_TEXT_WIDTH: f32 = 24.0;
const MIN_CHAR_WIDTH: f32 = 6.0;
const CHAR_WIDTH_PER_FONT_PX: f32 = 0.6;
const MIN_NODE_HEIGHT: f32 = 28.0;
const NODE_HEIGHT_PER_FONT_PX: f32 = 2.5;

/// Average glyph advance for the configured font size.
pub(super) fn average_char_width(font_size: f32) -> f32 {
    (font_size * CHAR_WIDTH_PER_FONT_PX).round().max(MIN_CHAR_WIDTH)
}

/// Approximate rendered width of a single-line label, in display columns
/// times the average glyph advance.
pub(super) fn approx_text_width(text: &str, avg_char_width: f32) -> f32 {
    let columns = UnicodeWidthStr::width(text) as f32;
    (columns * avg_char_width).ceil().max(MIN_TEXT_WIDTH)
}

/// Box size for a node: explicit width/height when given, text-derived
/// otherwise. Padding is always added horizontally.
pub(super) fn node_size(node: &Node, config: &LayoutConfig) -> (f32, f32) {
    let content_width = node.width.unwrap_or_else(|| {
        approx_text_width(node.display_label(), average_char_width(config.font_size))
    });
    let width = content_width + config.node_padding * 2.0;
    let height = node.height.unwrap_or_else(|| {
        (config.font_size * NODE_HEIGHT_PER_FONT_PX)
            .round()
            .max(MIN_NODE_HEIGHT)
    });
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_label_length() {
        let config = LayoutConfig::default();
        // 12px font -> 7px per char; "PRESENTATION" is 12 chars.
        let node = Node::new("pres").with_label("PRESENTATION");
        assert_eq!(node_size(&node, &config), (84.0 + 20.0, 30.0));
    }

    #[test]
    fn short_labels_hit_the_floor() {
        let config = LayoutConfig::default();
        let node = Node::new("A");
        assert_eq!(node_size(&node, &config).0, 24.0 + 20.0);
    }

    #[test]
    fn explicit_size_wins() {
        let config = LayoutConfig::default();
        let node = Node {
            width: Some(100.0),
            height: Some(50.0),
            ..Node::new("A")
        };
        assert_eq!(node_size(&node, &config), (120.0, 50.0));
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(approx_text_width("状态机器", 7.0), 56.0);
        assert_eq!(approx_text_width("abcd", 7.0), 28.0);
    }

    #[test]
    fn small_fonts_keep_minimum_sizes() {
        let config = LayoutConfig {
            font_size: 6.0,
            ..Default::default()
        };
        assert_eq!(average_char_width(config.font_size), 6.0);
        assert_eq!(node_size(&Node::new("A"), &config).1, 28.0);
    }
}
