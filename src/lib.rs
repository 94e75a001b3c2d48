//! Interaction core for a spiro path editor.
//!
//! The crate turns raw pointer events and a small line-oriented shape script
//! into a mutable collection of path shapes. Each shape is an ordered list of
//! typed control points; turning those points into drawable path data is the
//! job of a pluggable [`represent::Representer`], whose output is memoized per
//! shape in a [`cache::RepresentationCache`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editing state machine ([`engine::EngineCore`]) and the callback-firing [`engine::Engine`] |
//! | [`doc`] | Control points, shapes, drawings, and the ordered shape store |
//! | [`input`] | Editing modes, mouse buttons, and interaction state |
//! | [`hit`] | First-match hit testing against control points |
//! | [`script`] | Parser for the shape script mini-language |
//! | [`represent`] | The representation capability and a polyline fallback |
//! | [`cache`] | Identity-keyed representation cache |
//! | [`config`] | Editor defaults and environment overrides |
//! | [`file`] | JSON persistence for drawings |
//! | [`svg`] | SVG export |
//! | [`consts`] | Shared default values |

pub mod cache;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod file;
pub mod hit;
pub mod input;
pub mod represent;
pub mod script;
pub mod svg;
