//! Editor state containers.
//!
//! - `TimelineState`: the primary history track (all edited timelines)
//! - `ViewState`: pan/zoom and viewport geometry, outside of history
//! - `EphemeralState`: visuals belonging to the open transaction
//! - `RenderState`: borrowed snapshot handed to the drawing collaborator

use ce_common::{CurveError, CurveResult, Rect, Vec2};
use ce_timeline::{ControlPointShift, KeyframeShift, NewControlPointShift, Timeline};
use serde::{Deserialize, Serialize};

use crate::selection::TimelineSelectionState;

/// All timelines shown in the graph editor, in draw order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    pub timelines: Vec<Timeline>,
}

impl TimelineState {
    pub fn new(timelines: Vec<Timeline>) -> Self {
        Self { timelines }
    }

    /// Find a timeline by ID.
    pub fn timeline(&self, timeline_id: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.id == timeline_id)
    }

    /// Replace a timeline (matched by id) wholesale.
    pub fn replace(&mut self, timeline: Timeline) -> CurveResult<()> {
        let slot = self
            .timelines
            .iter_mut()
            .find(|t| t.id == timeline.id)
            .ok_or_else(|| CurveError::TimelineNotFound {
                timeline_id: timeline.id.clone(),
            })?;
        *slot = timeline;
        Ok(())
    }

    pub fn timeline_ids(&self) -> impl Iterator<Item = &str> {
        self.timelines.iter().map(|t| t.id.as_str())
    }

    /// Total number of keyframes across all timelines.
    pub fn total_keyframes(&self) -> usize {
        self.timelines.iter().map(Timeline::len).sum()
    }
}

/// Visible value range of the graph.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YBounds {
    pub upper: f64,
    pub lower: f64,
}

impl YBounds {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    pub fn height(&self) -> f64 {
        self.upper - self.lower
    }

    /// Smallest range containing both.
    pub fn union(self, other: Self) -> Self {
        Self::new(self.upper.max(other.upper), self.lower.min(other.lower))
    }

    /// Grow by `fraction` of the height on both ends.
    pub fn padded(self, fraction: f64) -> Self {
        let pad = self.height() * fraction;
        Self::new(self.upper + pad, self.lower - pad)
    }

    /// Move both ends by `delta` value units.
    pub fn offset(self, delta: f64) -> Self {
        Self::new(self.upper + delta, self.lower + delta)
    }
}

/// Pan/zoom state and viewport geometry.
///
/// Changes to the view are committed through `on_submit_view` and never take
/// an undo slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Visible fraction of `[0, length]`.
    pub view_bounds: [f64; 2],
    /// Total number of frames.
    pub length: f64,
    /// Editor rectangle in global coordinates.
    pub viewport: Rect,
    /// Current frame (playhead).
    pub frame_index: i64,
    /// Height of the view-bounds bar at the top of the viewport (0 hides it).
    pub view_bounds_height: f64,
    /// Height of the scrubber below the view-bounds bar.
    pub scrubber_height: f64,
    /// Let pan and zoom move the view bounds outside `[0, 1]`.
    pub allow_exceed_view_bounds: bool,
    /// Pinned value range; `None` fits the visible curves.
    pub y_bounds: Option<YBounds>,
}

impl ViewState {
    pub fn new(length: f64, viewport: Rect) -> Self {
        Self {
            view_bounds: [0.0, 1.0],
            length,
            viewport,
            frame_index: 0,
            view_bounds_height: 0.0,
            scrubber_height: 0.0,
            allow_exceed_view_bounds: false,
            y_bounds: None,
        }
    }

    pub fn view_bounds_width(&self) -> f64 {
        self.view_bounds[1] - self.view_bounds[0]
    }

    /// Whether the view-bounds bar is drawn (and can be hit).
    pub fn has_view_bounds_bar(&self) -> bool {
        self.view_bounds_height > 0.0
    }

    /// Rectangle of the view-bounds bar, in global coordinates.
    pub fn view_bounds_bar(&self) -> Rect {
        Rect::new(
            self.viewport.left,
            self.viewport.top,
            self.viewport.width,
            self.view_bounds_height,
        )
    }

    /// Rectangle the curves are drawn in, below the view-bounds bar and the
    /// scrubber, in global coordinates.
    pub fn graph_viewport(&self) -> Rect {
        let inset = self.view_bounds_height + self.scrubber_height;
        Rect::new(
            self.viewport.left,
            self.viewport.top + inset,
            self.viewport.width,
            (self.viewport.height - inset).max(0.0),
        )
    }

    /// Set the view bounds, enforcing `min_width` and (unless exceeding is
    /// allowed) the `[0, 1]` range.
    pub fn set_view_bounds(&mut self, bounds: [f64; 2], min_width: f64) {
        let [mut a, mut b] = bounds;
        if b - a < min_width {
            let mid = (a + b) * 0.5;
            a = mid - min_width * 0.5;
            b = mid + min_width * 0.5;
        }
        if !self.allow_exceed_view_bounds {
            let width = (b - a).min(1.0);
            if a < 0.0 {
                a = 0.0;
                b = width;
            }
            if b > 1.0 {
                b = 1.0;
                a = 1.0 - width;
            }
        }
        self.view_bounds = [a, b];
    }

    /// Shift the view bounds by `delta` (fraction of the length), keeping
    /// their width.
    pub fn pan_view_bounds(&mut self, delta: f64) {
        let [a, b] = self.view_bounds;
        let width = b - a;
        let mut a = a + delta;
        if !self.allow_exceed_view_bounds {
            a = a.clamp(0.0, (1.0 - width).max(0.0));
        }
        self.view_bounds = [a, a + width];
    }
}

/// Pointer cursor requested by the open gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
    ZoomIn,
    ZoomOut,
    EwResize,
    Move,
    Crosshair,
}

/// Visual state of the open transaction. Never stored in history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemeralState {
    /// Value range frozen for the duration of the gesture.
    pub y_bounds: Option<YBounds>,
    /// Pan offset in viewport pixels.
    pub pan: Option<Vec2>,
    pub keyframe_shift: Option<KeyframeShift>,
    pub control_point_shift: Option<ControlPointShift>,
    pub new_control_point_shift: Option<NewControlPointShift>,
    pub cursor: Cursor,
    /// Drag-selection rectangle in viewport pixels.
    pub drag_selection_rect: Option<Rect>,
}

/// Snapshot handed to the drawing collaborator.
#[derive(Copy, Clone, Debug)]
pub struct RenderState<'a> {
    pub primary: &'a TimelineState,
    pub selection: &'a TimelineSelectionState,
    pub view: &'a ViewState,
    pub ephemeral: &'a EphemeralState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_timeline::TimelineKeyframe;

    fn view() -> ViewState {
        let mut view = ViewState::new(100.0, Rect::new(10.0, 20.0, 400.0, 300.0));
        view.view_bounds_height = 16.0;
        view.scrubber_height = 24.0;
        view
    }

    #[test]
    fn graph_viewport_sits_below_bars() {
        let v = view();
        assert_eq!(v.graph_viewport(), Rect::new(10.0, 60.0, 400.0, 260.0));
        assert_eq!(v.view_bounds_bar(), Rect::new(10.0, 20.0, 400.0, 16.0));
        assert!(v.has_view_bounds_bar());
    }

    #[test]
    fn view_bounds_are_clamped() {
        let mut v = view();
        v.set_view_bounds([-0.2, 0.3], 0.005);
        assert_eq!(v.view_bounds, [0.0, 0.5]);

        v.set_view_bounds([0.5, 0.5001], 0.01);
        assert!((v.view_bounds_width() - 0.01).abs() < 1e-12);

        v.pan_view_bounds(2.0);
        assert!((v.view_bounds[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn view_bounds_may_exceed_when_allowed() {
        let mut v = view();
        v.allow_exceed_view_bounds = true;
        v.set_view_bounds([-0.2, 0.3], 0.005);
        assert_eq!(v.view_bounds, [-0.2, 0.3]);
        v.pan_view_bounds(1.0);
        assert!((v.view_bounds[0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn replace_timeline() {
        let mut state = TimelineState::new(vec![Timeline::new("a")]);
        let updated = Timeline::with_keyframes("a", vec![TimelineKeyframe::new("1", 0, 1.0)]);
        state.replace(updated).unwrap();
        assert_eq!(state.total_keyframes(), 1);

        let err = state.replace(Timeline::new("missing")).unwrap_err();
        assert!(matches!(err, CurveError::TimelineNotFound { .. }));
    }

    #[test]
    fn y_bounds_helpers() {
        let b = YBounds::new(10.0, 0.0).padded(0.1);
        assert!((b.upper - 11.0).abs() < 1e-12);
        assert!((b.lower + 1.0).abs() < 1e-12);
        let u = YBounds::new(1.0, 0.0).union(YBounds::new(5.0, 2.0));
        assert_eq!(u, YBounds::new(5.0, 0.0));
    }
}
