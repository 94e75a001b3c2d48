//! JSON persistence for drawings.
//!
//! Field names follow the drawing format used by the desktop editor:
//! `width`, `height`, `shapes`; per shape `points`, `isClosed`, `isTagged`;
//! per point `x`, `y`, `type`. Shape identities are not stored, so every
//! read yields shapes with fresh identities.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::fs;
use std::path::Path;

use crate::doc::Drawing;

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a drawing from JSON text.
///
/// # Errors
///
/// Returns [`FileError::Json`] if the text is not a valid drawing.
pub fn from_json(text: &str) -> Result<Drawing, FileError> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a drawing as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`FileError::Json`] if serialization fails.
pub fn to_json(drawing: &Drawing) -> Result<String, FileError> {
    Ok(serde_json::to_string_pretty(drawing)?)
}

/// Read a drawing from a JSON file.
///
/// # Errors
///
/// Returns a [`FileError`] if the file cannot be read or parsed.
pub fn read_drawing(path: &Path) -> Result<Drawing, FileError> {
    let text = fs::read_to_string(path)?;
    let drawing = from_json(&text)?;
    tracing::debug!(path = %path.display(), shapes = drawing.shapes.len(), "drawing read");
    Ok(drawing)
}

/// Write a drawing to a JSON file, replacing any existing file.
///
/// # Errors
///
/// Returns a [`FileError`] if serialization or the write fails.
pub fn write_drawing(path: &Path, drawing: &Drawing) -> Result<(), FileError> {
    fs::write(path, to_json(drawing)?)?;
    tracing::debug!(path = %path.display(), shapes = drawing.shapes.len(), "drawing written");
    Ok(())
}
