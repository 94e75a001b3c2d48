//! Document model: control points, shapes, drawings, and the ordered shape store.
//!
//! Control points are plain values. Editing a point never writes through a
//! reference; the owning [`Shape`] swaps in a replacement value at the same
//! index. Shapes carry an identity ([`ShapeId`]) that is independent of their
//! contents, so two shapes with identical points remain distinct for hit
//! testing and representation caching.
//!
//! Data flows into this layer from the editing engine (pointer gestures), the
//! script parser (batch creation), and JSON deserialization (whole drawings).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Identity handle for a shape. Not persisted; assigned fresh on creation and load.
pub type ShapeId = Uuid;

/// How the curve fitter interprets a control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointType {
    /// Sharp corner; the curve may change direction abruptly.
    Corner,
    /// Smooth point with fourth-order continuity.
    G4,
    /// Smooth point with second-order continuity.
    G2,
    /// Transition from a straight segment on the left to a curve.
    Left,
    /// Transition from a curve to a straight segment on the right.
    Right,
    /// First point of an open contour.
    OpenContour,
    /// Last point of an open contour.
    EndOpenContour,
    /// Terminates a closed contour.
    End,
}

impl PointType {
    /// Every point type, in declaration order.
    pub const ALL: [PointType; 8] = [
        Self::Corner,
        Self::G4,
        Self::G2,
        Self::Left,
        Self::Right,
        Self::OpenContour,
        Self::EndOpenContour,
        Self::End,
    ];

    /// Parse a point type name.
    ///
    /// Accepts the variant name (`"G4"`, `"OpenContour"`) or its snake case
    /// form (`"g4"`, `"open_contour"`), ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase() == normalized)
    }

    /// The canonical variant name, as written to JSON.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Corner => "Corner",
            Self::G4 => "G4",
            Self::G2 => "G2",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::OpenContour => "OpenContour",
            Self::EndOpenContour => "EndOpenContour",
            Self::End => "End",
        }
    }
}

/// A positioned, typed control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Horizontal position in canvas units.
    pub x: f64,
    /// Vertical position in canvas units.
    pub y: f64,
    /// Interpretation hint for the curve fitter.
    #[serde(rename = "type")]
    pub kind: PointType,
}

impl ControlPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, kind: PointType) -> Self {
        Self { x, y, kind }
    }

    /// A copy of this point moved to `(x, y)`, keeping its type.
    #[must_use]
    pub fn with_position(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    /// A copy of this point with a different type, keeping its position.
    #[must_use]
    pub fn with_kind(self, kind: PointType) -> Self {
        Self { kind, ..self }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Squared Euclidean distance from this point to `pt`.
    #[must_use]
    pub fn distance_squared(&self, pt: Point) -> f64 {
        self.position().distance_squared(pt)
    }
}

/// An ordered list of control points plus contour flags.
///
/// Points can be appended or replaced in place, never removed, so a point
/// index stays valid for the life of the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(skip, default = "Uuid::new_v4")]
    id: ShapeId,
    points: Vec<ControlPoint>,
    /// Whether the contour is closed.
    pub is_closed: bool,
    /// Whether the shape came from the script language rather than free-hand drawing.
    pub is_tagged: bool,
}

impl Shape {
    /// Create an empty shape with a fresh identity.
    #[must_use]
    pub fn new(is_closed: bool, is_tagged: bool) -> Self {
        Self { id: Uuid::new_v4(), points: Vec::new(), is_closed, is_tagged }
    }

    /// Create a shape from existing points with a fresh identity.
    #[must_use]
    pub fn with_points(points: Vec<ControlPoint>, is_closed: bool, is_tagged: bool) -> Self {
        Self { id: Uuid::new_v4(), points, is_closed, is_tagged }
    }

    #[must_use]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    #[must_use]
    pub fn last_point(&self) -> Option<&ControlPoint> {
        self.points.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point, returning its index.
    pub fn push(&mut self, point: ControlPoint) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    /// Replace the point at `index`. Returns false if the index is out of range.
    pub fn replace_point(&mut self, index: usize, point: ControlPoint) -> bool {
        let Some(slot) = self.points.get_mut(index) else {
            return false;
        };
        *slot = point;
        true
    }

    /// Move the point at `index` to `(x, y)`, keeping its type.
    pub fn set_point_position(&mut self, index: usize, x: f64, y: f64) -> bool {
        let Some(old) = self.points.get(index).copied() else {
            return false;
        };
        self.replace_point(index, old.with_position(x, y))
    }

    /// Retype the last point, keeping its position. Returns false for an empty shape.
    pub fn set_last_point_kind(&mut self, kind: PointType) -> bool {
        let Some(index) = self.points.len().checked_sub(1) else {
            return false;
        };
        let old = self.points[index];
        self.replace_point(index, old.with_kind(kind))
    }

    /// Give this shape a new identity. Used when a drawing is loaded into a store.
    fn reidentify(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// The persisted unit: canvas size plus shapes in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT, shapes: Vec::new() }
    }
}

/// Ordered in-memory store of shapes with identity lookup.
///
/// Shapes are kept in insertion (draw) order. Because shapes are never
/// removed individually, the id-to-index table only changes on push and on
/// wholesale replacement.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    shapes: Vec<Shape>,
    index: HashMap<ShapeId, usize>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape at the end of the draw order and return its id.
    ///
    /// A shape whose id is already present is given a fresh identity first.
    pub fn push(&mut self, mut shape: Shape) -> ShapeId {
        if self.index.contains_key(&shape.id) {
            shape.reidentify();
        }
        let id = shape.id;
        self.index.insert(id, self.shapes.len());
        self.shapes.push(shape);
        id
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.index.get(&id).and_then(|&i| self.shapes.get(i))
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        let i = *self.index.get(&id)?;
        self.shapes.get_mut(i)
    }

    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Shapes in draw order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Replace every shape. Each loaded shape receives a fresh identity.
    pub fn load(&mut self, shapes: Vec<Shape>) {
        self.clear();
        for mut shape in shapes {
            shape.reidentify();
            self.push(shape);
        }
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.index.clear();
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
