//! Tunable pixel and interaction constants for the graph editor.

use serde::{Deserialize, Serialize};

/// Graph editor configuration.
///
/// All pixel values are in viewport pixels. The defaults match the look and
/// feel of the editor widget; hosts with different pixel densities can scale
/// them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphEditorConfig {
    /// Horizontal inset kept free at both edges of the graph viewport, so
    /// keyframes on the first/last visible frame are still clickable.
    pub edge_padding_px: f64,
    /// Hit radius for control points.
    pub control_point_hit_radius_px: f64,
    /// Hit radius for keyframes.
    pub keyframe_hit_radius_px: f64,
    /// Width of each view-bounds handle.
    pub view_bounds_handle_width_px: f64,
    /// Extra slop around view-bounds handles when hit testing.
    pub view_bounds_handle_hit_expand_px: f64,
    /// Half-height of the value range used for flat timelines.
    pub flat_y_bounds_buffer: f64,
    /// Fraction of the visible value range added above and below.
    pub y_bounds_padding: f64,
    /// Zoom multiplier for a single Z click.
    pub zoom_factor: f64,
    /// Smallest allowed view-bounds width (fraction of the full length).
    pub min_view_bounds_width: f64,
    /// Pointer travel required before a press becomes a drag.
    pub drag_start_distance_px: f64,
    /// Velocity multiplier applied per 16ms frame of pan momentum.
    pub pan_momentum_decay: f64,
    /// Pan momentum stops below this speed (pixels per millisecond).
    pub pan_momentum_min_speed: f64,
}

impl Default for GraphEditorConfig {
    fn default() -> Self {
        Self {
            edge_padding_px: 16.0,
            control_point_hit_radius_px: 6.0,
            keyframe_hit_radius_px: 8.0,
            view_bounds_handle_width_px: 8.0,
            view_bounds_handle_hit_expand_px: 4.0,
            flat_y_bounds_buffer: 1.0,
            y_bounds_padding: 0.1,
            zoom_factor: 2.0,
            min_view_bounds_width: 0.005,
            drag_start_distance_px: 3.0,
            pan_momentum_decay: 0.9,
            pan_momentum_min_speed: 0.02,
        }
    }
}
