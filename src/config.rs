//! Editor configuration: hit threshold, drawing defaults, and canvas size.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, HIT_THRESHOLD_SQUARED};
use crate::doc::PointType;

/// Error returned when an override cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value of the wrong shape.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    /// `SPIRO_POINT_TYPE` names no known point type.
    #[error("unknown point type: {0:?}")]
    UnknownPointType(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub hit_threshold_squared: f64,
    pub point_type: PointType,
    pub is_closed: bool,
    pub is_tagged: bool,
    pub width: f64,
    pub height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_threshold_squared: HIT_THRESHOLD_SQUARED,
            point_type: PointType::G4,
            is_closed: false,
            is_tagged: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `SPIRO_HIT_THRESHOLD_SQUARED`: positive number, default 49
    /// - `SPIRO_POINT_TYPE`: `corner`, `g4` (default), `g2`, `left`, `right`,
    ///   `open_contour`, `end_open_contour`, `end`
    /// - `SPIRO_CLOSED`, `SPIRO_TAGGED`: `true`/`false`/`1`/`0`, default false
    /// - `SPIRO_WIDTH`, `SPIRO_HEIGHT`: positive numbers, default 600
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. [`Self::from_env`] uses the
    /// process environment; tests pass a map.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a key maps to an unparseable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let point_type = match lookup("SPIRO_POINT_TYPE") {
            Some(raw) => PointType::from_name(&raw).ok_or(ConfigError::UnknownPointType(raw))?,
            None => defaults.point_type,
        };

        Ok(Self {
            hit_threshold_squared: parse_positive(
                "SPIRO_HIT_THRESHOLD_SQUARED",
                lookup("SPIRO_HIT_THRESHOLD_SQUARED"),
                defaults.hit_threshold_squared,
            )?,
            point_type,
            is_closed: parse_bool("SPIRO_CLOSED", lookup("SPIRO_CLOSED"), defaults.is_closed)?,
            is_tagged: parse_bool("SPIRO_TAGGED", lookup("SPIRO_TAGGED"), defaults.is_tagged)?,
            width: parse_positive("SPIRO_WIDTH", lookup("SPIRO_WIDTH"), defaults.width)?,
            height: parse_positive("SPIRO_HEIGHT", lookup("SPIRO_HEIGHT"), defaults.height)?,
        })
    }
}

fn parse_positive(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidValue { var, value: raw }),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue { var, value: raw }),
    }
}
