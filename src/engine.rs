//! Editing state machine.
//!
//! [`EngineCore`] owns the shape store, the representation cache, the UI
//! defaults, and the interaction state. Every handler returns the list of
//! [`Action`]s it caused; a list containing [`Action::RenderNeeded`] means
//! the view is stale. [`Engine`] wraps the core and turns that signal into a
//! synchronous `on_invalidate` callback for hosts that prefer one.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use kurbo::Point;

use crate::cache::RepresentationCache;
use crate::config::EditorConfig;
use crate::doc::{ControlPoint, DocStore, Drawing, PointType, Shape, ShapeId};
use crate::hit::{Hit, hit_test};
use crate::input::{Button, InputState, Mode, UiState};
use crate::represent::{PolylineRepresenter, Representer};
use crate::script::{self, ScriptError};
use crate::svg;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A press on empty canvas started a new shape.
    ShapeStarted { id: ShapeId },
    /// A point was appended to a shape.
    PointAdded { shape_id: ShapeId, index: usize },
    /// A point was moved to a new position.
    PointMoved { shape_id: ShapeId, index: usize },
    /// The active shape was finished by a secondary press.
    ShapeFinished { id: ShapeId },
    /// A script committed a shape to the store.
    ShapeCommitted { id: ShapeId },
    /// The hit target changed.
    HitChanged(Option<Hit>),
    /// The whole shape list was replaced.
    DrawingReplaced,
    /// The view must be redrawn.
    RenderNeeded,
}

/// Core engine state. Holds no host resources, so it is driven directly by tests.
pub struct EngineCore {
    pub doc: DocStore,
    pub cache: RepresentationCache,
    pub ui: UiState,
    pub input: InputState,
    pub width: f64,
    pub height: f64,
    representer: Box<dyn Representer>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(&EditorConfig::default(), Box::new(PolylineRepresenter))
    }
}

impl std::fmt::Debug for EngineCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCore")
            .field("doc", &self.doc)
            .field("cache", &self.cache)
            .field("ui", &self.ui)
            .field("input", &self.input)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given defaults and representation routine.
    #[must_use]
    pub fn with_config(config: &EditorConfig, representer: Box<dyn Representer>) -> Self {
        Self {
            doc: DocStore::new(),
            cache: RepresentationCache::new(),
            ui: UiState::from_config(config),
            input: InputState::Idle,
            width: config.width,
            height: config.height,
            representer,
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        match button {
            Button::Primary => self.on_primary_down(pt),
            Button::Secondary => self.on_secondary_down(),
        }
    }

    /// Drag releases leave the moved point selected.
    pub fn on_pointer_up(&mut self, _pt: Point, _button: Button) -> Vec<Action> {
        if self.ui.mode == Mode::Move {
            self.ui.mode = Mode::Selected;
        }
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        if let Some(shape_id) = self.input.active_shape() {
            return self.drag_last_point(shape_id, pt);
        }

        match self.ui.mode {
            Mode::Move => match self.input.hit() {
                Some(hit) => self.move_point(hit.shape_id, hit.point_index, pt),
                None => Vec::new(),
            },
            Mode::Create => {
                let previous = self.input.hit();
                let hit = self.hit_test(pt);
                self.input = InputState::from_hit(hit);
                let mut actions = Vec::new();
                if hit != previous {
                    actions.push(Action::HitChanged(hit));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            Mode::None | Mode::Selected => Vec::new(),
        }
    }

    fn on_primary_down(&mut self, pt: Point) -> Vec<Action> {
        if self.input.active_shape().is_none() {
            if let Some(hit) = self.hit_test(pt) {
                self.input = InputState::Targeting(hit);
                self.ui.mode = Mode::Move;
                return vec![Action::HitChanged(Some(hit)), Action::RenderNeeded];
            }
            if self.input.hit().is_some() {
                return self.clear_hit();
            }
        }

        if self.ui.mode != Mode::Create {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let shape_id = match self.input.active_shape() {
            Some(id) => id,
            None => {
                let id = self.doc.push(Shape::new(self.ui.is_closed, self.ui.is_tagged));
                self.input = InputState::Drawing { shape_id: id };
                tracing::debug!(shape = %id, "shape started");
                actions.push(Action::ShapeStarted { id });
                id
            }
        };

        let Some(shape) = self.doc.get_mut(shape_id) else {
            return actions;
        };
        let index = shape.push(ControlPoint::new(pt.x, pt.y, self.ui.point_type));
        self.refresh(shape_id);
        actions.push(Action::PointAdded { shape_id, index });
        actions.push(Action::RenderNeeded);
        actions
    }

    fn on_secondary_down(&mut self) -> Vec<Action> {
        if let Some(id) = self.input.active_shape() {
            self.refresh(id);
            self.input = InputState::Idle;
            tracing::debug!(shape = %id, "shape finished");
            return vec![Action::ShapeFinished { id }, Action::RenderNeeded];
        }
        if self.input.hit().is_some() {
            return self.clear_hit();
        }
        Vec::new()
    }

    fn drag_last_point(&mut self, shape_id: ShapeId, pt: Point) -> Vec<Action> {
        let Some(shape) = self.doc.get(shape_id) else {
            return Vec::new();
        };
        if shape.len() < 2 {
            return Vec::new();
        }
        let index = shape.len() - 1;
        self.move_point(shape_id, index, pt)
    }

    fn move_point(&mut self, shape_id: ShapeId, index: usize, pt: Point) -> Vec<Action> {
        let moved = self
            .doc
            .get_mut(shape_id)
            .is_some_and(|shape| shape.set_point_position(index, pt.x, pt.y));
        if !moved {
            return Vec::new();
        }
        self.refresh(shape_id);
        vec![Action::PointMoved { shape_id, index }, Action::RenderNeeded]
    }

    fn clear_hit(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui.mode = Mode::Create;
        vec![Action::HitChanged(None), Action::RenderNeeded]
    }

    fn hit_test(&self, pt: Point) -> Option<Hit> {
        let hit = hit_test(self.doc.shapes(), pt, self.ui.hit_threshold_squared);
        if let Some(h) = hit {
            tracing::debug!(shape = %h.shape_id, index = h.point_index, "hit");
        }
        hit
    }

    // --- Defaults ---

    /// Flip the closed default and apply it to the shape being drawn.
    pub fn toggle_closed(&mut self) -> Vec<Action> {
        self.ui.is_closed = !self.ui.is_closed;
        let is_closed = self.ui.is_closed;
        self.update_active(|shape| shape.is_closed = is_closed)
    }

    /// Flip the tagged default and apply it to the shape being drawn.
    pub fn toggle_tagged(&mut self) -> Vec<Action> {
        self.ui.is_tagged = !self.ui.is_tagged;
        let is_tagged = self.ui.is_tagged;
        self.update_active(|shape| shape.is_tagged = is_tagged)
    }

    /// Set the type for new points and retype the active shape's last point.
    pub fn set_point_type(&mut self, kind: PointType) -> Vec<Action> {
        self.ui.point_type = kind;
        let mut actions = self.update_active(|shape| {
            shape.set_last_point_kind(kind);
        });
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn update_active<F>(&mut self, apply: F) -> Vec<Action>
    where
        F: FnOnce(&mut Shape),
    {
        let Some(id) = self.input.active_shape() else {
            return Vec::new();
        };
        let Some(shape) = self.doc.get_mut(id) else {
            return Vec::new();
        };
        apply(shape);
        self.refresh(id);
        vec![Action::RenderNeeded]
    }

    // --- Data inputs ---

    /// Run a shape script, committing each finished shape to the store.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line. Shapes committed before it stay in
    /// the store with their representations cached.
    pub fn execute_script(&mut self, text: &str) -> Result<Vec<Action>, ScriptError> {
        let Self { doc, cache, representer, .. } = self;
        let mut actions = Vec::new();
        script::run(text, |shape| {
            let id = doc.push(shape);
            if let Some(shape) = doc.get(id) {
                cache.refresh(shape, &**representer);
            }
            tracing::debug!(shape = %id, "script shape committed");
            actions.push(Action::ShapeCommitted { id });
        })?;
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        Ok(actions)
    }

    /// Discard every shape, keeping the canvas size.
    pub fn new_drawing(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.cache.clear();
        self.reset_interaction();
        vec![Action::DrawingReplaced, Action::RenderNeeded]
    }

    /// Replace the canvas size and shapes. Shapes receive fresh identities.
    pub fn load_drawing(&mut self, drawing: Drawing) -> Vec<Action> {
        self.width = drawing.width;
        self.height = drawing.height;
        self.doc.load(drawing.shapes);
        self.cache.rebuild(self.doc.shapes(), &*self.representer);
        self.reset_interaction();
        tracing::debug!(shapes = self.doc.len(), "drawing loaded");
        vec![Action::DrawingReplaced, Action::RenderNeeded]
    }

    /// Snapshot of the canvas size and shapes.
    #[must_use]
    pub fn export_drawing(&self) -> Drawing {
        Drawing { width: self.width, height: self.height, shapes: self.doc.shapes().to_vec() }
    }

    /// Render the current drawing as an SVG document.
    #[must_use]
    pub fn export_svg(&self) -> String {
        svg::to_svg(self.width, self.height, self.doc.shapes(), &self.cache)
    }

    fn reset_interaction(&mut self) {
        self.input = InputState::Idle;
        self.ui.mode = Mode::Create;
    }

    fn refresh(&mut self, id: ShapeId) {
        if let Some(shape) = self.doc.get(id) {
            self.cache.refresh(shape, &*self.representer);
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ui.mode
    }

    #[must_use]
    pub fn active_shape(&self) -> Option<ShapeId> {
        self.input.active_shape()
    }

    /// The hit target, ignoring one whose shape is no longer in the store.
    #[must_use]
    pub fn hit(&self) -> Option<Hit> {
        self.input.hit().filter(|h| self.doc.contains(h.shape_id))
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.doc.shapes()
    }

    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.doc.get(id)
    }

    /// Cached path data for a shape, absent when it could not be computed.
    #[must_use]
    pub fn representation(&self, id: ShapeId) -> Option<&str> {
        self.cache.get(id)
    }
}

/// Engine that reports staleness through a callback instead of return values.
///
/// The callback runs synchronously, at most once per operation, and must not
/// call back into the engine.
pub struct Engine {
    pub core: EngineCore,
    on_invalidate: Box<dyn FnMut()>,
}

impl Engine {
    #[must_use]
    pub fn new(core: EngineCore, on_invalidate: Box<dyn FnMut()>) -> Self {
        Self { core, on_invalidate }
    }

    fn notify(&mut self, actions: Vec<Action>) -> Vec<Action> {
        if actions.contains(&Action::RenderNeeded) {
            (self.on_invalidate)();
        }
        actions
    }

    // --- Delegated input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let actions = self.core.on_pointer_down(pt, button);
        self.notify(actions)
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let actions = self.core.on_pointer_up(pt, button);
        self.notify(actions)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_move(pt);
        self.notify(actions)
    }

    pub fn toggle_closed(&mut self) -> Vec<Action> {
        let actions = self.core.toggle_closed();
        self.notify(actions)
    }

    pub fn toggle_tagged(&mut self) -> Vec<Action> {
        let actions = self.core.toggle_tagged();
        self.notify(actions)
    }

    pub fn set_point_type(&mut self, kind: PointType) -> Vec<Action> {
        let actions = self.core.set_point_type(kind);
        self.notify(actions)
    }

    // --- Delegated data inputs ---

    /// See [`EngineCore::execute_script`]. A failing script still invalidates
    /// when it committed shapes before the bad line.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line.
    pub fn execute_script(&mut self, text: &str) -> Result<Vec<Action>, ScriptError> {
        let before = self.core.doc.len();
        match self.core.execute_script(text) {
            Ok(actions) => Ok(self.notify(actions)),
            Err(e) => {
                if self.core.doc.len() != before {
                    (self.on_invalidate)();
                }
                Err(e)
            }
        }
    }

    pub fn new_drawing(&mut self) -> Vec<Action> {
        let actions = self.core.new_drawing();
        self.notify(actions)
    }

    pub fn load_drawing(&mut self, drawing: Drawing) -> Vec<Action> {
        let actions = self.core.load_drawing(drawing);
        self.notify(actions)
    }

    #[must_use]
    pub fn export_drawing(&self) -> Drawing {
        self.core.export_drawing()
    }

    #[must_use]
    pub fn export_svg(&self) -> String {
        self.core.export_svg()
    }
}
