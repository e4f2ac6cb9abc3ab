//! Structural timeline edits: splitting a segment, setting a value at a frame,
//! and removing keyframes.
//!
//! All functions return a new `Timeline`; the input is never modified.

use std::collections::BTreeSet;

use ce_common::{CurveError, CurveResult, Vec2};
use tracing::debug;

use crate::curve::{
    find_bezier_x_intersection_t, keyframes_to_curve, split_cubic_bezier, value_at_index,
    CurveSegment,
};
use crate::types::{ControlPoint, Timeline, TimelineKeyframe};

/// Insert a keyframe at `new_index` between the adjacent keyframes `k0_id`
/// and `k1_id` without changing the shape of the curve.
///
/// For a Bezier segment the curve is split with de Casteljau at the point
/// where it crosses `new_index`: `k0` receives a new right control point,
/// the new keyframe receives both control points (and reflects them), and
/// `k1` receives a new left control point. All control points are expressed
/// relative to the two new segment lengths. For a line segment the new
/// keyframe has no control points.
pub fn split_keyframes_at_index(
    timeline: &Timeline,
    k0_id: &str,
    k1_id: &str,
    new_index: i64,
    new_id: impl Into<String>,
) -> CurveResult<Timeline> {
    let pos0 = find(timeline, k0_id)?;
    let pos1 = find(timeline, k1_id)?;
    if pos1 != pos0 + 1 {
        return Err(CurveError::InvalidCurve {
            segment: pos0,
            reason: format!("keyframes {k0_id} and {k1_id} are not adjacent"),
        });
    }

    let k0 = &timeline.keyframes[pos0];
    let k1 = &timeline.keyframes[pos1];
    if new_index <= k0.index || new_index >= k1.index {
        return Err(CurveError::InvalidCurve {
            segment: pos0,
            reason: format!(
                "split index {new_index} outside segment ({}, {})",
                k0.index, k1.index
            ),
        });
    }

    let mut new_k0 = k0.clone();
    let mut new_k1 = k1.clone();

    let new_keyframe = match keyframes_to_curve(k0, k1) {
        CurveSegment::Line([a, b]) => {
            let t = (new_index as f64 - a.x) / (b.x - a.x);
            TimelineKeyframe::new(new_id, new_index, a.y + (b.y - a.y) * t).with_reflect(true)
        }
        CurveSegment::Cubic(bezier) => {
            let t = find_bezier_x_intersection_t(&bezier, new_index as f64);
            let (left, right) = split_cubic_bezier(&bezier, t);

            let left_distance = (new_index - k0.index) as f64;
            let right_distance = (k1.index - new_index) as f64;
            let left_start = k0.index as f64;
            let right_start = new_index as f64;
            let split_value = left[3].y;

            new_k0.control_point_right = Some(control_point_from(
                left[1],
                left_start,
                left_distance,
                k0.value,
            ));
            new_k1.control_point_left = Some(control_point_from(
                right[2],
                right_start,
                right_distance,
                k1.value,
            ));

            TimelineKeyframe::new(new_id, new_index, split_value)
                .with_control_points(
                    Some(control_point_from(
                        left[2],
                        left_start,
                        left_distance,
                        split_value,
                    )),
                    Some(control_point_from(
                        right[1],
                        right_start,
                        right_distance,
                        split_value,
                    )),
                )
                .with_reflect(true)
        }
    };

    debug!(
        timeline = %timeline.id,
        k0 = k0_id,
        k1 = k1_id,
        new_index,
        "Segment split"
    );

    let mut keyframes = Vec::with_capacity(timeline.keyframes.len() + 1);
    keyframes.extend_from_slice(&timeline.keyframes[..pos0]);
    keyframes.push(new_k0);
    keyframes.push(new_keyframe);
    keyframes.push(new_k1);
    keyframes.extend_from_slice(&timeline.keyframes[pos1 + 1..]);

    Ok(Timeline {
        id: timeline.id.clone(),
        keyframes,
    })
}

/// Control point at curve-space `point` on a segment starting at
/// `segment_start` that is `distance` frames long, owned by a keyframe
/// whose value is `anchor_value`.
fn control_point_from(
    point: Vec2,
    segment_start: f64,
    distance: f64,
    anchor_value: f64,
) -> ControlPoint {
    ControlPoint::new(
        (point.x - segment_start) / distance,
        point.y - anchor_value,
        distance,
    )
}

/// Set the curve value at `index`.
///
/// - A keyframe already at `index` gets the new value.
/// - Inside the keyframe range, the enclosing segment is split first (keeping
///   the curve shape), then the new keyframe gets the value.
/// - Outside the range (or on an empty timeline), a bare keyframe is inserted.
pub fn set_value_at_index(
    timeline: &Timeline,
    index: i64,
    value: f64,
    new_id: impl Into<String>,
) -> CurveResult<Timeline> {
    if let Some(pos) = timeline.position_at_index(index) {
        let mut next = timeline.clone();
        next.keyframes[pos].value = value;
        return Ok(next);
    }

    let inside = matches!(
        timeline.index_range(),
        Some((first, last)) if index > first && index < last
    );
    if !inside {
        let mut keyframes = timeline.keyframes.clone();
        keyframes.push(TimelineKeyframe::new(new_id, index, value));
        debug!(timeline = %timeline.id, index, value, "Keyframe created outside range");
        return Ok(Timeline::with_keyframes(timeline.id.clone(), keyframes));
    }

    let pos = timeline.keyframes.partition_point(|k| k.index < index);
    let k0_id = timeline.keyframes[pos - 1].id.clone();
    let k1_id = timeline.keyframes[pos].id.clone();
    let new_id = new_id.into();

    let mut split = split_keyframes_at_index(timeline, &k0_id, &k1_id, index, new_id.clone())?;
    if let Some(k) = split.keyframes.iter_mut().find(|k| k.id == new_id) {
        k.value = value;
    }
    Ok(split)
}

/// Insert a keyframe at `index` carrying the curve's current value there.
pub fn insert_keyframe_at_index(
    timeline: &Timeline,
    index: i64,
    new_id: impl Into<String>,
) -> CurveResult<Timeline> {
    if timeline.is_empty() {
        return Err(CurveError::EmptyTimeline {
            timeline_id: timeline.id.clone(),
        });
    }
    let value = value_at_index(timeline, index as f64);
    set_value_at_index(timeline, index, value, new_id)
}

/// Remove every keyframe whose id is in `ids`.
pub fn remove_keyframes(timeline: &Timeline, ids: &BTreeSet<String>) -> Timeline {
    Timeline {
        id: timeline.id.clone(),
        keyframes: timeline
            .keyframes
            .iter()
            .filter(|k| !ids.contains(&k.id))
            .cloned()
            .collect(),
    }
}

fn find(timeline: &Timeline, keyframe_id: &str) -> CurveResult<usize> {
    timeline
        .position_of(keyframe_id)
        .ok_or_else(|| CurveError::KeyframeNotFound {
            timeline_id: timeline.id.clone(),
            keyframe_id: keyframe_id.to_string(),
        })
}
