//! Per-shape memo of computed representations, keyed by shape identity.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::HashMap;

use crate::doc::{Shape, ShapeId};
use crate::represent::{RepresentError, Representer};

/// Maps each shape id to its last computed representation.
///
/// An entry holding `None` records that the last computation failed, so a
/// stale string is never served after a shape stops being representable.
#[derive(Debug, Clone, Default)]
pub struct RepresentationCache {
    entries: HashMap<ShapeId, Option<String>>,
}

impl RepresentationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute and store the representation of `shape`.
    ///
    /// Failures are logged and cached as absent; they never reach the caller.
    pub fn refresh(&mut self, shape: &Shape, representer: &dyn Representer) {
        let value = match representer.try_represent(shape) {
            Ok(data) => Some(data),
            Err(RepresentError::InsufficientPoints { found, required }) => {
                tracing::debug!(shape = %shape.id(), found, required, "shape not yet representable");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, shape = %shape.id(), "representation failed");
                None
            }
        };
        self.entries.insert(shape.id(), value);
    }

    /// The cached representation, or `None` if absent or never computed.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&str> {
        self.entries.get(&id).and_then(Option::as_deref)
    }

    /// Whether `id` has been refreshed at least once, successfully or not.
    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drop every entry and recompute one per shape.
    pub fn rebuild<'a, I>(&mut self, shapes: I, representer: &dyn Representer)
    where
        I: IntoIterator<Item = &'a Shape>,
    {
        self.entries.clear();
        for shape in shapes {
            self.refresh(shape, representer);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
