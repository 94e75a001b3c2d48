//! Input model: editing modes, mouse buttons, defaults, and interaction state.
//!
//! `Mode` is the coarse editing mode the pointer handlers dispatch on.
//! `UiState` holds the user-chosen defaults applied to newly drawn shapes and
//! points. `InputState` records what the pointer is currently attached to:
//! nothing, a shape being drawn, or a hit point. Keeping the active shape and
//! the hit target in one enum makes it impossible for both to be set at once.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::config::EditorConfig;
use crate::doc::{PointType, ShapeId};
use crate::hit::Hit;

/// Current editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Inert; pointer presses neither create nor move points.
    None,
    /// Presses on empty canvas add points (default).
    #[default]
    Create,
    /// A hit point follows the pointer until release.
    Move,
    /// A drag was released; the hit point stays highlighted.
    Selected,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Persistent UI state: mode plus the defaults for new shapes and points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiState {
    /// Current editing mode.
    pub mode: Mode,
    /// Type given to newly drawn points.
    pub point_type: PointType,
    /// Closed flag given to newly drawn shapes.
    pub is_closed: bool,
    /// Tagged flag given to newly drawn shapes.
    pub is_tagged: bool,
    /// Squared distance below which a press lands on an existing point.
    pub hit_threshold_squared: f64,
}

impl UiState {
    /// Build the initial UI state from editor configuration.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            mode: Mode::Create,
            point_type: config.point_type,
            is_closed: config.is_closed,
            is_tagged: config.is_tagged,
            hit_threshold_squared: config.hit_threshold_squared,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// What the pointer is currently attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// Neither drawing nor pointing at a point.
    #[default]
    Idle,
    /// A shape is being drawn; presses append points to it.
    Drawing {
        /// Id of the shape receiving new points.
        shape_id: ShapeId,
    },
    /// The pointer is over, or dragging, an existing point.
    ///
    /// Holds a shape id rather than the shape itself; the store owns every
    /// shape and a target whose shape has gone away is treated as empty.
    Targeting(Hit),
}

impl InputState {
    /// The shape being drawn, if any.
    #[must_use]
    pub fn active_shape(&self) -> Option<ShapeId> {
        match self {
            Self::Drawing { shape_id } => Some(*shape_id),
            Self::Idle | Self::Targeting(_) => None,
        }
    }

    /// The hit target, if any.
    #[must_use]
    pub fn hit(&self) -> Option<Hit> {
        match self {
            Self::Targeting(hit) => Some(*hit),
            Self::Idle | Self::Drawing { .. } => None,
        }
    }

    /// State for an optional hit result: `Targeting` on a hit, `Idle` otherwise.
    #[must_use]
    pub fn from_hit(hit: Option<Hit>) -> Self {
        hit.map_or(Self::Idle, Self::Targeting)
    }
}
