//! Control point and keyframe shift geometry applied while dragging.
//!
//! A drag is described by a shift captured at drag start plus the cumulative
//! pointer delta (in curve space). Every tick re-applies the current shift to
//! the timeline as it was when the drag started, so the result never
//! accumulates rounding from earlier ticks.

use std::collections::HashSet;

use ce_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::types::{ControlPoint, ControlPointSide, Timeline, TimelineKeyframe, TimelineSelection};

/// Move selected keyframes by `shift_vector` (frames, value).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeShift {
    pub shift_vector: Vec2,
}

/// Drag of an existing control point.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPointShift {
    /// Cumulative drag in curve space (frames, value).
    pub shift_vector: Vec2,
    /// Index distance between the dragged keyframe and its neighbor on the
    /// dragged side, captured at drag start.
    pub distance_between_keyframes: f64,
    /// Which control point of each selected keyframe is being dragged.
    pub direction: ControlPointSide,
    /// Pixels per frame divided by pixels per value unit.
    pub y_fac: f64,
    /// Snap the dragged control point to horizontal.
    pub shift_key_down: bool,
}

/// Drag that creates both control points of a keyframe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewControlPointShift {
    pub keyframe_id: String,
    /// Cumulative drag in curve space (frames, value).
    pub shift_vector: Vec2,
    /// Side the drag is heading toward.
    pub direction: ControlPointSide,
}

/// Apply a control point drag to every selected keyframe that has a control
/// point (and a neighbor) on the dragged side.
///
/// The x delta is converted to `tx` using the distance captured at drag
/// start, so keyframes whose live neighbor distance differs move by the same
/// fraction of their segment. When a keyframe reflects its control points,
/// the opposite point is rotated to stay collinear through the keyframe
/// while keeping its own distance from it. That distance is measured in
/// visual units (x scaled by `y_fac`).
pub fn apply_control_point_shift(
    timeline: &Timeline,
    selection: &TimelineSelection,
    shift: &ControlPointShift,
) -> Timeline {
    let mut next = timeline.clone();
    let side = shift.direction;
    let captured = shift.distance_between_keyframes;
    let y_fac = if shift.y_fac > 0.0 && shift.y_fac.is_finite() {
        shift.y_fac
    } else {
        1.0
    };

    for (pos, keyframe) in timeline.keyframes.iter().enumerate() {
        if !selection.contains(&keyframe.id) {
            continue;
        }
        let Some(cp) = keyframe.control_point(side) else {
            continue;
        };
        let Some(neighbor) = timeline.neighbor(pos, side) else {
            continue;
        };

        let live = (neighbor.index - keyframe.index).abs() as f64;
        let dx = if captured > 0.0 {
            shift.shift_vector.x * (live / captured)
        } else {
            shift.shift_vector.x
        };
        let value = if shift.shift_key_down {
            0.0
        } else {
            cp.scaled_value(live) + shift.shift_vector.y
        };
        let moved = ControlPoint::new(cp.tx + dx / live, value, live);
        next.keyframes[pos].set_control_point(side, Some(moved));

        if !keyframe.reflect_control_points {
            continue;
        }
        let opposite = side.opposite();
        let (Some(opp_cp), Some(opp_neighbor)) =
            (keyframe.control_point(opposite), timeline.neighbor(pos, opposite))
        else {
            continue;
        };

        let anchor = Vec2::new(keyframe.index as f64, keyframe.value);
        let moved_pos = position_of(keyframe, neighbor, &moved);
        let opp_pos = position_of(keyframe, opp_neighbor, opp_cp);

        let moved_visual = (moved_pos - anchor).scale(y_fac, 1.0);
        let opp_visual = (opp_pos - anchor).scale(y_fac, 1.0);
        let Some(dir) = moved_visual.normalized() else {
            continue;
        };
        let reflected = anchor + (-dir * opp_visual.length()).scale(1.0 / y_fac, 1.0);

        let opp_live = (opp_neighbor.index - keyframe.index).abs() as f64;
        let opp_start = keyframe.index.min(opp_neighbor.index) as f64;
        next.keyframes[pos].set_control_point(
            opposite,
            Some(ControlPoint::new(
                (reflected.x - opp_start) / opp_live,
                reflected.y - keyframe.value,
                opp_live,
            )),
        );
    }

    next
}

/// Curve-space position of `cp` on `keyframe`, pointing toward `neighbor`.
fn position_of(
    keyframe: &TimelineKeyframe,
    neighbor: &TimelineKeyframe,
    cp: &ControlPoint,
) -> Vec2 {
    let distance = (neighbor.index - keyframe.index).abs() as f64;
    let start = keyframe.index.min(neighbor.index) as f64;
    Vec2::new(start + cp.tx * distance, keyframe.value + cp.scaled_value(distance))
}

/// Create both control points of a keyframe from one drag vector.
///
/// The control point on the drag side sits at the anchor plus the drag; the
/// other is its mirror through the anchor. A side without a neighbor gets no
/// control point. The keyframe is marked as reflecting.
pub fn apply_new_control_point_shift(
    timeline: &Timeline,
    shift: &NewControlPointShift,
) -> Timeline {
    let mut next = timeline.clone();
    let Some(pos) = timeline.position_of(&shift.keyframe_id) else {
        return next;
    };
    let keyframe = &timeline.keyframes[pos];
    let index = keyframe.index as f64;

    let left_offset = shift.shift_vector * shift.direction.sign();
    let right_offset = -left_offset;

    let left = timeline.neighbor(pos, ControlPointSide::Left).map(|n| {
        let distance = index - n.index as f64;
        ControlPoint::new(
            (index + left_offset.x - n.index as f64) / distance,
            left_offset.y,
            distance,
        )
    });
    let right = timeline.neighbor(pos, ControlPointSide::Right).map(|n| {
        let distance = n.index as f64 - index;
        ControlPoint::new(right_offset.x / distance, right_offset.y, distance)
    });

    let target = &mut next.keyframes[pos];
    target.control_point_left = left;
    target.control_point_right = right;
    target.reflect_control_points = true;
    next
}

/// Move every selected keyframe by `(round(dx), dy)`.
///
/// Unselected keyframes sitting on a destination index are removed first.
/// After moving, keyframes that land on an already used index are dropped
/// (first seen wins) and the result is sorted by index.
pub fn apply_timeline_keyframe_shift(
    timeline: &Timeline,
    selection: &TimelineSelection,
    shift: &KeyframeShift,
) -> Timeline {
    let dx = shift.shift_vector.x.round() as i64;
    let dy = shift.shift_vector.y;

    let destinations: HashSet<i64> = timeline
        .keyframes
        .iter()
        .filter(|k| selection.contains(&k.id))
        .map(|k| k.index + dx)
        .collect();

    let mut seen = HashSet::new();
    let mut keyframes: Vec<TimelineKeyframe> = timeline
        .keyframes
        .iter()
        .filter_map(|k| {
            if selection.contains(&k.id) {
                let mut moved = k.clone();
                moved.index += dx;
                moved.value += dy;
                Some(moved)
            } else if destinations.contains(&k.index) {
                None
            } else {
                Some(k.clone())
            }
        })
        .filter(|k| seen.insert(k.index))
        .collect();
    keyframes.sort_by_key(|k| k.index);

    Timeline {
        id: timeline.id.clone(),
        keyframes,
    }
}
