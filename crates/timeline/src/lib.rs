//! `ce-timeline` — Keyframe curve model and curve math for the graph editor.
//!
//! A [`Timeline`] is a value curve made of keyframes; every pair of adjacent
//! keyframes forms a line or a cubic Bezier segment. This crate handles:
//!
//! - **Curve math**: keyframe pairs to segments, evaluation at a frame index,
//!   De Casteljau splitting, x-intersection search
//! - **Structural edits**: splitting a segment without changing its shape,
//!   setting a value at a frame, removing keyframes
//! - **Conversion**: building a timeline from externally supplied segments
//! - **Shift geometry**: moving keyframes and control points during a drag
//!
//! # Usage
//!
//! ```rust
//! use ce_timeline::{value_at_index, ControlPoint, Timeline, TimelineKeyframe};
//!
//! let timeline = Timeline::with_keyframes(
//!     "opacity",
//!     vec![
//!         TimelineKeyframe::new("1", 0, 0.0)
//!             .with_control_points(None, Some(ControlPoint::new(0.4, 0.0, 10.0))),
//!         TimelineKeyframe::new("2", 10, 1.0),
//!     ],
//! );
//! let mid = value_at_index(&timeline, 5.0);
//! assert!(mid > 0.0 && mid < 1.0);
//! ```

pub mod convert;
pub mod curve;
pub mod edit;
pub mod ids;
pub mod shift;
pub mod types;

// Re-export primary API
pub use convert::{
    curve_segments_to_timeline, curves_from_points, curves_to_timeline, is_reflected,
    CurvePointInput, REFLECT_ANGLE_TOLERANCE_DEG,
};
pub use curve::{
    bezier_value_at_x, control_point_position, cubic_point, find_bezier_x_intersection_t,
    keyframes_to_curve, split_cubic_bezier, timeline_curves, try_value_at_index, value_at_index,
    CurveSegment, MISSING_CONTROL_POINT_FAC, X_INTERSECTION_ITERATIONS,
};
pub use edit::{
    insert_keyframe_at_index, remove_keyframes, set_value_at_index, split_keyframes_at_index,
};
pub use ids::next_keyframe_id;
pub use shift::{
    apply_control_point_shift, apply_new_control_point_shift, apply_timeline_keyframe_shift,
    ControlPointShift, KeyframeShift, NewControlPointShift,
};
pub use types::{
    ControlPoint, ControlPointSide, Timeline, TimelineKeyframe, TimelineSelection,
    TIMELINE_CP_TX_MAX, TIMELINE_CP_TX_MIN,
};
