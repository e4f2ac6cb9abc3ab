//! Building a `Timeline` from caller-supplied curve segments.
//!
//! This is the inverse of [`crate::curve::timeline_curves`]. Each input curve
//! is either a line (2 points) or a cubic Bezier (4 points); consecutive
//! curves must share an endpoint. Points may be given as `[x, y]` arrays,
//! `{ "x": .., "y": .. }` objects, or `Vec2` values.

use ce_common::{CurveError, CurveResult, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::CurveSegment;
use crate::types::{ControlPoint, Timeline, TimelineKeyframe};

/// Shared keyframes whose control points are this close (in degrees) to
/// pointing in exactly opposite directions are marked as reflected.
pub const REFLECT_ANGLE_TOLERANCE_DEG: f64 = 0.5;

/// Max distance between the end of one curve and the start of the next.
const CONTIGUITY_EPSILON: f64 = 1e-6;

/// A curve point as accepted from external input.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurvePointInput {
    Tuple([f64; 2]),
    Object { x: f64, y: f64 },
}

impl From<CurvePointInput> for Vec2 {
    fn from(p: CurvePointInput) -> Self {
        match p {
            CurvePointInput::Tuple([x, y]) => Vec2::new(x, y),
            CurvePointInput::Object { x, y } => Vec2::new(x, y),
        }
    }
}

impl From<Vec2> for CurvePointInput {
    fn from(v: Vec2) -> Self {
        Self::Object { x: v.x, y: v.y }
    }
}

impl From<[f64; 2]> for CurvePointInput {
    fn from(p: [f64; 2]) -> Self {
        Self::Tuple(p)
    }
}

/// Convert raw point lists into curve segments. Each list must hold 2 or 4 points.
pub fn curves_from_points<P>(curves: &[Vec<P>]) -> CurveResult<Vec<CurveSegment>>
where
    P: Into<Vec2> + Copy,
{
    curves
        .iter()
        .enumerate()
        .map(|(i, points)| {
            let points: Vec<Vec2> = points.iter().map(|&p| p.into()).collect();
            match points.as_slice() {
                &[a, b] => Ok(CurveSegment::Line([a, b])),
                &[a, b, c, d] => Ok(CurveSegment::Cubic([a, b, c, d])),
                other => Err(CurveError::InvalidCurve {
                    segment: i,
                    reason: format!("expected 2 or 4 points, got {}", other.len()),
                }),
            }
        })
        .collect()
}

/// Build a timeline from raw point lists (see [`curves_from_points`]).
pub fn curves_to_timeline<P>(id: impl Into<String>, curves: &[Vec<P>]) -> CurveResult<Timeline>
where
    P: Into<Vec2> + Copy,
{
    let segments = curves_from_points(curves)?;
    curve_segments_to_timeline(id, &segments)
}

/// Build a timeline from a contiguous chain of segments.
///
/// Keyframes get ids `"1"..="n"` in index order. Keyframe indices are the
/// segment endpoints' x rounded to the nearest frame.
pub fn curve_segments_to_timeline(
    id: impl Into<String>,
    segments: &[CurveSegment],
) -> CurveResult<Timeline> {
    let id = id.into();
    validate_chain(segments)?;

    let Some(first) = segments.first() else {
        return Ok(Timeline::new(id));
    };

    let mut keyframes = Vec::with_capacity(segments.len() + 1);
    keyframes.push(anchor_keyframe(1, first.start()));
    for (i, segment) in segments.iter().enumerate() {
        let kf = anchor_keyframe(i + 2, segment.end());
        let prev_index = keyframes[i].index;
        if kf.index <= prev_index {
            return Err(CurveError::InvalidCurve {
                segment: i,
                reason: format!(
                    "rounded indices must ascend ({} then {})",
                    prev_index, kf.index
                ),
            });
        }
        keyframes.push(kf);
    }

    for (i, segment) in segments.iter().enumerate() {
        let CurveSegment::Cubic(b) = segment else {
            continue;
        };
        let start_index = keyframes[i].index as f64;
        let distance = keyframes[i + 1].index as f64 - start_index;
        let start_value = keyframes[i].value;
        let end_value = keyframes[i + 1].value;

        keyframes[i].control_point_right = Some(ControlPoint::new(
            (b[1].x - start_index) / distance,
            b[1].y - start_value,
            distance,
        ));
        keyframes[i + 1].control_point_left = Some(ControlPoint::new(
            (b[2].x - start_index) / distance,
            b[2].y - end_value,
            distance,
        ));
    }

    // Shared keyframes: decide reflection from the input tangents.
    for i in 1..segments.len() {
        let (CurveSegment::Cubic(prev), CurveSegment::Cubic(next)) =
            (&segments[i - 1], &segments[i])
        else {
            continue;
        };
        let anchor = prev[3];
        keyframes[i].reflect_control_points = is_reflected(prev[2] - anchor, next[1] - anchor);
    }

    debug!(timeline = %id, keyframes = keyframes.len(), "Timeline built from curves");
    Ok(Timeline { id, keyframes })
}

/// Whether two tangent directions from the same anchor point in opposite
/// directions, within [`REFLECT_ANGLE_TOLERANCE_DEG`].
pub fn is_reflected(left: Vec2, right: Vec2) -> bool {
    if left.normalized().is_none() || right.normalized().is_none() {
        return false;
    }
    let diff = (right.angle() - left.angle()).abs();
    (diff - std::f64::consts::PI).abs() < REFLECT_ANGLE_TOLERANCE_DEG.to_radians()
}

fn anchor_keyframe(n: usize, p: Vec2) -> TimelineKeyframe {
    TimelineKeyframe::new(n.to_string(), p.x.round() as i64, p.y)
}

fn validate_chain(segments: &[CurveSegment]) -> CurveResult<()> {
    for (i, segment) in segments.iter().enumerate() {
        if segment.start().x >= segment.end().x {
            return Err(CurveError::InvalidCurve {
                segment: i,
                reason: format!(
                    "end x {} must be greater than start x {}",
                    segment.end().x,
                    segment.start().x
                ),
            });
        }
        if let Some(next) = segments.get(i + 1) {
            if segment.end().distance(next.start()) > CONTIGUITY_EPSILON {
                return Err(CurveError::NonContiguousCurves {
                    segment: i,
                    next: i + 1,
                });
            }
        }
    }
    Ok(())
}
