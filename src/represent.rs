//! The "compute representation" capability.
//!
//! A [`Representer`] turns a shape's control points into drawable path data
//! (SVG path syntax). The real curve fitter lives outside this crate; it
//! plugs in by implementing the trait. [`PolylineRepresenter`] is the stand-in
//! used when nothing else is supplied: it connects the points with straight
//! segments so drawings stay visible and exportable.

#[cfg(test)]
#[path = "represent_test.rs"]
mod represent_test;

use kurbo::BezPath;

use crate::consts::MIN_REPRESENTABLE_POINTS;
use crate::doc::Shape;

/// Why a representation could not be produced.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RepresentError {
    /// The shape does not have enough points to describe a path.
    #[error("shape has {found} point(s), at least {required} required")]
    InsufficientPoints { found: usize, required: usize },
    /// The fitter gave up for any other reason.
    #[error("representation failed: {0}")]
    Failed(String),
}

/// Computes drawable path data for a shape.
pub trait Representer {
    /// Produce path data for `shape`.
    ///
    /// # Errors
    ///
    /// Returns a [`RepresentError`] when the shape cannot be represented.
    fn try_represent(&self, shape: &Shape) -> Result<String, RepresentError>;
}

impl<F> Representer for F
where
    F: Fn(&Shape) -> Result<String, RepresentError>,
{
    fn try_represent(&self, shape: &Shape) -> Result<String, RepresentError> {
        self(shape)
    }
}

/// Straight segments through every control point, closed when the shape is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolylineRepresenter;

impl Representer for PolylineRepresenter {
    fn try_represent(&self, shape: &Shape) -> Result<String, RepresentError> {
        if shape.len() < MIN_REPRESENTABLE_POINTS {
            return Err(RepresentError::InsufficientPoints {
                found: shape.len(),
                required: MIN_REPRESENTABLE_POINTS,
            });
        }

        let mut points = shape.points().iter().map(|p| p.position());
        let mut path = BezPath::new();
        if let Some(first) = points.next() {
            path.move_to(first);
        }
        for p in points {
            path.line_to(p);
        }
        if shape.is_closed {
            path.close_path();
        }
        Ok(path.to_svg())
    }
}
