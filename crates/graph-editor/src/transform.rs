//! Mapping between the three coordinate spaces of the graph.
//!
//! - **global**: raw pointer coordinates from the host
//! - **viewport**: global minus the graph viewport's origin
//! - **normal**: curve space, `x` = frame index, `y` = curve value
//!
//! The visible frame window is `length * view_bounds`, laid out across the
//! viewport width minus a fixed inset on both sides. The visible value range
//! (`YBounds`) spans the full viewport height, with `upper` at the top.

use ce_app_state::{ViewState, YBounds};
use ce_common::{GraphEditorConfig, Rect, Vec2};

/// Smallest extent used as a divisor, so degenerate views stay finite.
const MIN_EXTENT: f64 = 1e-9;

/// Coordinate mapping for one frame of the graph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphSpace {
    /// Visible fraction of `[0, length]`.
    pub view_bounds: [f64; 2],
    /// Total number of frames.
    pub length: f64,
    /// Visible value range.
    pub y_bounds: YBounds,
    /// Graph viewport in global coordinates.
    pub viewport: Rect,
    /// Horizontal inset at both edges of the viewport, in pixels.
    pub edge_padding: f64,
}

impl GraphSpace {
    pub fn new(view: &ViewState, y_bounds: YBounds, config: &GraphEditorConfig) -> Self {
        Self {
            view_bounds: view.view_bounds,
            length: view.length,
            y_bounds,
            viewport: view.graph_viewport(),
            edge_padding: config.edge_padding_px,
        }
    }

    /// First visible frame.
    pub fn start_frame(&self) -> f64 {
        self.length * self.view_bounds[0]
    }

    /// Number of visible frames.
    pub fn visible_frames(&self) -> f64 {
        (self.length * (self.view_bounds[1] - self.view_bounds[0])).max(MIN_EXTENT)
    }

    fn usable_width(&self) -> f64 {
        (self.viewport.width - 2.0 * self.edge_padding).max(MIN_EXTENT)
    }

    pub fn pixels_per_frame(&self) -> f64 {
        self.usable_width() / self.visible_frames()
    }

    pub fn pixels_per_value(&self) -> f64 {
        self.viewport.height.max(MIN_EXTENT) / self.y_bounds.height().max(MIN_EXTENT)
    }

    /// Ratio of x to y pixel scale, used to measure angles and distances as
    /// they appear on screen.
    pub fn y_fac(&self) -> f64 {
        self.pixels_per_frame() / self.pixels_per_value()
    }

    pub fn global_to_viewport(&self, p: Vec2) -> Vec2 {
        p - self.viewport.origin()
    }

    pub fn viewport_to_global(&self, p: Vec2) -> Vec2 {
        p + self.viewport.origin()
    }

    pub fn normal_to_viewport(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.edge_padding + (p.x - self.start_frame()) * self.pixels_per_frame(),
            (self.y_bounds.upper - p.y) * self.pixels_per_value(),
        )
    }

    pub fn viewport_to_normal(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x - self.edge_padding) / self.pixels_per_frame() + self.start_frame(),
            self.y_bounds.upper - p.y / self.pixels_per_value(),
        )
    }

    pub fn global_to_normal(&self, p: Vec2) -> Vec2 {
        self.viewport_to_normal(self.global_to_viewport(p))
    }

    pub fn normal_to_global(&self, p: Vec2) -> Vec2 {
        self.viewport_to_global(self.normal_to_viewport(p))
    }

    /// Convert a pixel delta into a curve-space delta (frames, value).
    /// Pixel `y` grows downward, values grow upward.
    pub fn pixel_delta_to_normal(&self, d: Vec2) -> Vec2 {
        Vec2::new(d.x / self.pixels_per_frame(), -d.y / self.pixels_per_value())
    }
}
