use crate::config::{LayoutConfig, Placement};

use super::graph::GraphModel;
use super::ranking::Layering;
use super::text::node_size;
use super::types::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct NodeBox {
    pub center: Point,
    pub width: f32,
    pub height: f32,
}

/// Vertical distance between consecutive layers. With a single layer every
/// node sits on the top padding line.
pub(super) fn layer_spacing(layer_count: usize, config: &LayoutConfig) -> f32 {
    let usable = config.height - config.effective_padding() * 2.0;
    usable / layer_count.saturating_sub(1).max(1) as f32
}

/// Sizes and centers every node slot.
pub(super) fn place_nodes(
    model: &GraphModel<'_>,
    layering: &Layering,
    config: &LayoutConfig,
) -> Vec<NodeBox> {
    let sizes: Vec<(f32, f32)> = model
        .nodes
        .iter()
        .map(|node| node_size(node, config))
        .collect();
    let mut boxes: Vec<NodeBox> = sizes
        .iter()
        .map(|&(width, height)| NodeBox {
            center: Point::new(0.0, 0.0),
            width,
            height,
        })
        .collect();

    let spacing = layer_spacing(layering.layer_count(), config);
    if layering.layer_count() > 1 && spacing < config.node_v_gap {
        tracing::warn!(
            spacing,
            min_gap = config.node_v_gap,
            layers = layering.layer_count(),
            "layers are closer than the configured vertical gap"
        );
    }

    let padding = config.effective_padding();
    let available = config.width - padding * 2.0;
    for (layer, bucket) in layering.buckets.iter().enumerate() {
        let y = padding + layer as f32 * spacing;
        let xs = match config.placement {
            Placement::EvenSlots => even_slots(bucket.len(), available, padding),
            Placement::Packed => {
                let widths: Vec<f32> = bucket.iter().map(|&slot| sizes[slot].0).collect();
                packed(&widths, available, config).unwrap_or_else(|| {
                    tracing::warn!(
                        layer,
                        nodes = bucket.len(),
                        "layer too wide to pack; using even slots"
                    );
                    even_slots(bucket.len(), available, padding)
                })
            }
        };
        for (&slot, x) in bucket.iter().zip(xs) {
            boxes[slot].center = Point::new(x, y);
        }
    }

    boxes
}

fn even_slots(count: usize, available: f32, left: f32) -> Vec<f32> {
    let slot_width = available / count.max(1) as f32;
    (0..count)
        .map(|idx| left + slot_width * (idx as f32 + 0.5))
        .collect()
}

/// Left-to-right packing with `node_h_gap` between boxes, centered in the
/// available width. `None` when the row does not fit.
fn packed(widths: &[f32], available: f32, config: &LayoutConfig) -> Option<Vec<f32>> {
    let gaps = config.node_h_gap * widths.len().saturating_sub(1) as f32;
    let total: f32 = widths.iter().sum::<f32>() + gaps;
    if total > available {
        return None;
    }
    let mut cursor = config.effective_padding() + (available - total) / 2.0;
    let mut xs = Vec::with_capacity(widths.len());
    for width in widths {
        xs.push(cursor + width / 2.0);
        cursor += width + config.node_h_gap;
    }
    Some(xs)
}
