//! Shared default values for the editor.

// ── Hit-testing ─────────────────────────────────────────────────

/// Squared distance below which a click lands on an existing point (7px radius).
pub const HIT_THRESHOLD_SQUARED: f64 = 49.0;

// ── Canvas ──────────────────────────────────────────────────────

/// Default drawing width in canvas units.
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Default drawing height in canvas units.
pub const DEFAULT_HEIGHT: f64 = 600.0;

// ── Representation ──────────────────────────────────────────────

/// Fewest points a shape needs before a path can be drawn through it.
pub const MIN_REPRESENTABLE_POINTS: usize = 2;
