#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use kurbo::Point;

use crate::doc::{Shape, ShapeId};

/// A control point found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub shape_id: ShapeId,
    pub point_index: usize,
}

/// Find the first control point within `threshold_squared` of `pt`.
///
/// Shapes are scanned in draw order and points in index order; the first
/// point whose squared distance is strictly below the threshold wins, even if
/// a later point is closer. Overlapping points therefore resolve by draw
/// order, not proximity.
#[must_use]
pub fn hit_test(shapes: &[Shape], pt: Point, threshold_squared: f64) -> Option<Hit> {
    shapes.iter().find_map(|shape| {
        shape
            .points()
            .iter()
            .position(|p| p.distance_squared(pt) < threshold_squared)
            .map(|point_index| Hit { shape_id: shape.id(), point_index })
    })
}
