use super::position::NodeBox;
use super::types::{CubicPath, Point};

const MIN_CURVATURE: f32 = 0.2;
const MAX_CURVATURE: f32 = 0.6;
const VERTICAL_PULL: f32 = 0.25;
const SELF_LOOP_REACH: f32 = 36.0;

/// Curve between two node centers. Mostly horizontal edges get a wider
/// horizontal swing, mostly vertical ones stay close to a straight drop.
pub(super) fn route_edge(from: Point, to: Point) -> CubicPath {
    let delta_x = to.x - from.x;
    let dx = delta_x.abs();
    let dy = (to.y - from.y).abs();
    let curvature = (dx / (dx + dy + 1.0)).clamp(MIN_CURVATURE, MAX_CURVATURE);
    CubicPath {
        start: from,
        control1: Point::new(from.x + delta_x * curvature, from.y + dy * VERTICAL_PULL),
        control2: Point::new(to.x - delta_x * curvature, to.y - dy * VERTICAL_PULL),
        end: to,
    }
}

/// Loop off the right side of a node back into itself, so the path (and the
/// label riding on it) has a visible length.
pub(super) fn route_self_loop(node: &NodeBox) -> CubicPath {
    let right = node.center.x + node.width / 2.0;
    let start = Point::new(right, node.center.y - node.height / 4.0);
    let end = Point::new(right, node.center.y + node.height / 4.0);
    CubicPath {
        start,
        control1: Point::new(right + SELF_LOOP_REACH, start.y - SELF_LOOP_REACH / 2.0),
        control2: Point::new(right + SELF_LOOP_REACH, end.y + SELF_LOOP_REACH / 2.0),
        end,
    }
}
