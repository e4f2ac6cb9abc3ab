//! `ce-common` — Shared types, configuration, and errors for the curve graph editor.
//!
//! This crate is the foundation that all other editor crates depend on:
//!
//! - **Types**: `Vec2`, `Rect` (geometry in any coordinate space)
//! - **Config**: `GraphEditorConfig` (hit radii, paddings, zoom and momentum tuning)
//! - **Errors**: `CurveError` (thiserror-based)

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use config::GraphEditorConfig;
pub use error::{CurveError, CurveResult};
pub use types::{Rect, Vec2};
