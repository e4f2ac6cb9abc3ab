//! Curve math: keyframe pairs to line/Bezier segments, evaluation, and splitting.
//!
//! Every segment between two adjacent keyframes is either a straight line
//! (neither keyframe has a control point facing the other) or a cubic Bezier.
//! Curve space uses the frame index as `x` and the curve value as `y`.

use std::f64::consts::PI;

use ce_common::{CurveError, CurveResult, Vec2};
use serde::{Deserialize, Serialize};

use crate::types::{ControlPointSide, Timeline, TimelineKeyframe};

/// Fraction of the distance toward the far endpoint used to synthesize a
/// missing control point from the one that is present.
pub const MISSING_CONTROL_POINT_FAC: f64 = 0.4;

/// Bisection steps used by [`find_bezier_x_intersection_t`].
pub const X_INTERSECTION_ITERATIONS: usize = 20;

const ROOT_POLISH_ITERATIONS: usize = 3;

/// Below this, the normalized x-cubic is solved as a quadratic before polishing.
const NEARLY_QUADRATIC: f64 = 1e-6;

/// One segment of a timeline curve, in curve space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CurveSegment {
    /// Straight line between two keyframes.
    Line([Vec2; 2]),
    /// Cubic Bezier: start, start control point, end control point, end.
    Cubic([Vec2; 4]),
}

impl CurveSegment {
    pub fn start(&self) -> Vec2 {
        match self {
            Self::Line(p) => p[0],
            Self::Cubic(p) => p[0],
        }
    }

    pub fn end(&self) -> Vec2 {
        match self {
            Self::Line(p) => p[1],
            Self::Cubic(p) => p[3],
        }
    }

    pub fn points(&self) -> &[Vec2] {
        match self {
            Self::Line(p) => p,
            Self::Cubic(p) => p,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Self::Line(_))
    }

    /// Point at curve parameter `t`.
    pub fn point_at(&self, t: f64) -> Vec2 {
        match self {
            Self::Line([a, b]) => a.lerp(*b, t),
            Self::Cubic(b) => cubic_point(b, t),
        }
    }

    /// Split the segment where it crosses `x`. `x` is expected to lie
    /// between the segment's start and end.
    pub fn split_at_x(&self, x: f64) -> (Self, Self) {
        match self {
            Self::Line([a, b]) => {
                let width = b.x - a.x;
                let t = if width.abs() <= f64::EPSILON {
                    0.0
                } else {
                    (x - a.x) / width
                };
                let mid = a.lerp(*b, t);
                (Self::Line([*a, mid]), Self::Line([mid, *b]))
            }
            Self::Cubic(b) => {
                let t = find_bezier_x_intersection_t(b, x);
                let (left, right) = split_cubic_bezier(b, t);
                (Self::Cubic(left), Self::Cubic(right))
            }
        }
    }
}

/// Build the curve segment between two adjacent keyframes.
///
/// A missing control point is synthesized from the one that is present:
/// `p2 = p1 + 0.4 * (p3 - p1)` or `p1 = p2 + 0.4 * (p0 - p2)`.
pub fn keyframes_to_curve(k0: &TimelineKeyframe, k1: &TimelineKeyframe) -> CurveSegment {
    let p0 = Vec2::new(k0.index as f64, k0.value);
    let p3 = Vec2::new(k1.index as f64, k1.value);
    let distance = (k1.index - k0.index) as f64;

    let p1 = k0
        .control_point_right
        .map(|cp| Vec2::new(p0.x + cp.tx * distance, k0.value + cp.scaled_value(distance)));
    let p2 = k1
        .control_point_left
        .map(|cp| Vec2::new(p0.x + cp.tx * distance, k1.value + cp.scaled_value(distance)));

    match (p1, p2) {
        (None, None) => CurveSegment::Line([p0, p3]),
        (Some(p1), Some(p2)) => CurveSegment::Cubic([p0, p1, p2, p3]),
        (Some(p1), None) => {
            let p2 = p1 + (p3 - p1) * MISSING_CONTROL_POINT_FAC;
            CurveSegment::Cubic([p0, p1, p2, p3])
        }
        (None, Some(p2)) => {
            let p1 = p2 + (p0 - p2) * MISSING_CONTROL_POINT_FAC;
            CurveSegment::Cubic([p0, p1, p2, p3])
        }
    }
}

/// All segments of a timeline, in index order.
pub fn timeline_curves(timeline: &Timeline) -> Vec<CurveSegment> {
    timeline
        .keyframes
        .windows(2)
        .map(|w| keyframes_to_curve(&w[0], &w[1]))
        .collect()
}

/// Curve-space position of a keyframe's control point, or `None` if the
/// control point or the neighbor it points toward does not exist.
pub fn control_point_position(
    timeline: &Timeline,
    pos: usize,
    side: ControlPointSide,
) -> Option<Vec2> {
    let keyframe = timeline.keyframes.get(pos)?;
    let cp = keyframe.control_point(side)?;
    let neighbor = timeline.neighbor(pos, side)?;
    let distance = (neighbor.index - keyframe.index).abs() as f64;
    let segment_start = keyframe.index.min(neighbor.index) as f64;
    Some(Vec2::new(
        segment_start + cp.tx * distance,
        keyframe.value + cp.scaled_value(distance),
    ))
}

/// Evaluate a cubic Bezier: B(t) = (1-t)^3*p0 + 3*(1-t)^2*t*p1 + 3*(1-t)*t^2*p2 + t^3*p3
pub fn cubic_point(b: &[Vec2; 4], t: f64) -> Vec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    b[0] * (mt2 * mt) + b[1] * (3.0 * mt2 * t) + b[2] * (3.0 * mt * t2) + b[3] * (t2 * t)
}

/// Split a cubic Bezier at `t` using de Casteljau's algorithm.
///
/// Returns `(left, right)`; `left[3] == right[0]` is the point at `t`.
pub fn split_cubic_bezier(b: &[Vec2; 4], t: f64) -> ([Vec2; 4], [Vec2; 4]) {
    let p01 = b[0].lerp(b[1], t);
    let p12 = b[1].lerp(b[2], t);
    let p23 = b[2].lerp(b[3], t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let p0123 = p012.lerp(p123, t);

    ([b[0], p01, p012, p0123], [p0123, p123, p23, b[3]])
}

/// Find the curve parameter where the Bezier crosses `x` by bisection.
///
/// Assumes `x(t)` is monotonic over `[0, 1]`. Runs a fixed number of
/// iterations; there is no convergence check.
pub fn find_bezier_x_intersection_t(b: &[Vec2; 4], x: f64) -> f64 {
    let ascending = b[3].x >= b[0].x;
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;

    for _ in 0..X_INTERSECTION_ITERATIONS {
        let t = (lo + hi) * 0.5;
        let px = cubic_point(b, t).x;
        if (px < x) == ascending {
            lo = t;
        } else {
            hi = t;
        }
    }

    (lo + hi) * 0.5
}

/// Solve `x(t) = x` in closed form on the x-normalized curve.
///
/// Returns `None` when no real root lies in `[0, 1]`.
fn solve_bezier_t_for_x(b: &[Vec2; 4], x: f64) -> Option<f64> {
    let width = b[3].x - b[0].x;
    if width.abs() <= f64::EPSILON {
        return None;
    }

    // Normalized so that x0 = 0 and x3 = 1.
    let n1 = (b[1].x - b[0].x) / width;
    let n2 = (b[2].x - b[0].x) / width;
    let target = (x - b[0].x) / width;

    let a = 3.0 * n1 - 3.0 * n2 + 1.0;
    let bb = -6.0 * n1 + 3.0 * n2;
    let c = 3.0 * n1;
    let d = -target;

    const SLACK: f64 = 1e-9;
    // A vanishing cubic term is dropped for root finding; the polish uses the full cubic.
    let leading = if a.abs() < NEARLY_QUADRATIC { 0.0 } else { a };
    cubic_roots(leading, bb, c, d)
        .into_iter()
        .map(|t| polish_root(a, bb, c, d, t))
        .find(|t| (-SLACK..=1.0 + SLACK).contains(t))
        .map(|t| t.clamp(0.0, 1.0))
}

/// Newton steps on `a*t^3 + b*t^2 + c*t + d` from a Cardano root.
///
/// A step is only taken while it lowers the residual.
fn polish_root(a: f64, b: f64, c: f64, d: f64, mut t: f64) -> f64 {
    let eval = |t: f64| ((a * t + b) * t + c) * t + d;
    for _ in 0..ROOT_POLISH_ITERATIONS {
        let slope = (3.0 * a * t + 2.0 * b) * t + c;
        if slope.abs() <= f64::EPSILON {
            break;
        }
        let next = t - eval(t) / slope;
        if eval(next).abs() >= eval(t).abs() {
            break;
        }
        t = next;
    }
    t
}

/// Real roots of `a*t^3 + b*t^2 + c*t + d`, via Cardano's formula
/// (trigonometric form for three real roots).
fn cubic_roots(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    const EPS: f64 = 1e-12;

    if a.abs() < EPS {
        if b.abs() < EPS {
            if c.abs() < EPS {
                return Vec::new();
            }
            return vec![-d / c];
        }
        let disc = c * c - 4.0 * b * d;
        if disc < 0.0 {
            return Vec::new();
        }
        let sq = disc.sqrt();
        return vec![(-c + sq) / (2.0 * b), (-c - sq) / (2.0 * b)];
    }

    let (b, c, d) = (b / a, c / a, d / a);
    let p = (3.0 * c - b * b) / 3.0;
    let q = (2.0 * b * b * b - 9.0 * b * c + 27.0 * d) / 27.0;
    let offset = b / 3.0;
    let disc = q * q / 4.0 + p * p * p / 27.0;

    if disc > EPS {
        let sq = disc.sqrt();
        let u = (-q / 2.0 + sq).cbrt();
        let v = (-q / 2.0 - sq).cbrt();
        vec![u + v - offset]
    } else if disc < -EPS {
        let r = (-p * p * p / 27.0).sqrt();
        let phi = (-q / (2.0 * r)).clamp(-1.0, 1.0).acos();
        let m = 2.0 * r.cbrt();
        (0..3)
            .map(|k| m * ((phi + 2.0 * PI * k as f64) / 3.0).cos() - offset)
            .collect()
    } else {
        let u = (-q / 2.0).cbrt();
        vec![2.0 * u - offset, -u - offset]
    }
}

/// Value of a Bezier segment at `x`.
///
/// Segments whose endpoints share a value (S-curves that start and end at
/// the same height) are solved by bisection instead of the closed form.
pub fn bezier_value_at_x(b: &[Vec2; 4], x: f64) -> f64 {
    let t = if (b[0].y - b[3].y).abs() <= f64::EPSILON {
        find_bezier_x_intersection_t(b, x)
    } else {
        solve_bezier_t_for_x(b, x).unwrap_or_else(|| find_bezier_x_intersection_t(b, x))
    };
    cubic_point(b, t).y
}

/// Evaluate a timeline at a (possibly fractional) frame index.
///
/// Values before the first keyframe and after the last keyframe are held flat.
///
/// # Panics
///
/// Panics if the timeline has no keyframes; an empty timeline has no value.
pub fn value_at_index(timeline: &Timeline, frame_index: f64) -> f64 {
    assert!(
        !timeline.keyframes.is_empty(),
        "value_at_index called on empty timeline {}",
        timeline.id
    );
    evaluate(&timeline.keyframes, frame_index)
}

/// Fallible variant of [`value_at_index`].
pub fn try_value_at_index(timeline: &Timeline, frame_index: f64) -> CurveResult<f64> {
    if timeline.keyframes.is_empty() {
        return Err(CurveError::EmptyTimeline {
            timeline_id: timeline.id.clone(),
        });
    }
    Ok(evaluate(&timeline.keyframes, frame_index))
}

fn evaluate(keyframes: &[TimelineKeyframe], x: f64) -> f64 {
    let first = &keyframes[0];
    if keyframes.len() == 1 || x <= first.index as f64 {
        return first.value;
    }

    let last = &keyframes[keyframes.len() - 1];
    if x >= last.index as f64 {
        return last.value;
    }

    // First keyframe strictly after x; always in 1..len given the checks above.
    let pos = keyframes.partition_point(|k| (k.index as f64) <= x);
    let k0 = &keyframes[pos - 1];
    let k1 = &keyframes[pos];

    if (k0.index as f64 - x).abs() <= f64::EPSILON {
        return k0.value;
    }

    match keyframes_to_curve(k0, k1) {
        CurveSegment::Line([a, b]) => {
            let t = (x - a.x) / (b.x - a.x);
            a.y + (b.y - a.y) * t
        }
        CurveSegment::Cubic(b) => bezier_value_at_x(&b, x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ControlPoint;
    use proptest::prelude::*;

    fn linear(points: &[(i64, f64)]) -> Timeline {
        Timeline::with_keyframes(
            "tl",
            points
                .iter()
                .enumerate()
                .map(|(i, &(index, value))| {
                    TimelineKeyframe::new((i + 1).to_string(), index, value)
                })
                .collect(),
        )
    }

    /// Cubic from (0,0) to (10,10) whose control points sit on the straight line.
    fn straight_cubic() -> Timeline {
        Timeline::with_keyframes(
            "tl",
            vec![
                TimelineKeyframe::new("1", 0, 0.0).with_control_points(
                    None,
                    Some(ControlPoint::new(1.0 / 3.0, 10.0 / 3.0, 10.0)),
                ),
                TimelineKeyframe::new("2", 10, 10.0).with_control_points(
                    Some(ControlPoint::new(2.0 / 3.0, -10.0 / 3.0, 10.0)),
                    None,
                ),
            ],
        )
    }

    /// S-curve from (0,0) to (10,0) through (5,0).
    fn s_curve() -> Timeline {
        Timeline::with_keyframes(
            "tl",
            vec![
                TimelineKeyframe::new("1", 0, 0.0)
                    .with_control_points(None, Some(ControlPoint::new(0.5, 5.0, 10.0))),
                TimelineKeyframe::new("2", 10, 0.0)
                    .with_control_points(Some(ControlPoint::new(0.5, -5.0, 10.0)), None),
            ],
        )
    }

    #[test]
    fn curve_without_control_points_is_a_line() {
        let tl = linear(&[(0, 0.0), (10, 5.0)]);
        let curve = keyframes_to_curve(&tl.keyframes[0], &tl.keyframes[1]);
        assert_eq!(
            curve,
            CurveSegment::Line([Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)])
        );
    }

    #[test]
    fn curve_with_both_control_points_is_cubic() {
        let tl = straight_cubic();
        let CurveSegment::Cubic(b) = keyframes_to_curve(&tl.keyframes[0], &tl.keyframes[1])
        else {
            panic!("expected cubic");
        };
        assert!((b[1].x - 10.0 / 3.0).abs() < 1e-9);
        assert!((b[2].x - 20.0 / 3.0).abs() < 1e-9);
        assert!((b[2].y - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn missing_control_point_is_synthesized() {
        let k0 = TimelineKeyframe::new("1", 0, 0.0)
            .with_control_points(None, Some(ControlPoint::new(0.5, 5.0, 10.0)));
        let k1 = TimelineKeyframe::new("2", 10, 0.0);
        let CurveSegment::Cubic(b) = keyframes_to_curve(&k0, &k1) else {
            panic!("expected cubic");
        };
        // p2 = p1 + 0.4 * (p3 - p1) with p1 = (5, 5), p3 = (10, 0)
        assert!((b[2].x - 7.0).abs() < 1e-9);
        assert!((b[2].y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn control_point_value_rescales_to_live_distance() {
        // Defined for a 10-frame segment, now the segment is 20 frames long.
        let k0 = TimelineKeyframe::new("1", 0, 0.0)
            .with_control_points(None, Some(ControlPoint::new(0.25, 2.0, 10.0)));
        let k1 = TimelineKeyframe::new("2", 20, 0.0)
            .with_control_points(Some(ControlPoint::new(0.75, 2.0, 10.0)), None);
        let CurveSegment::Cubic(b) = keyframes_to_curve(&k0, &k1) else {
            panic!("expected cubic");
        };
        assert!((b[1].x - 5.0).abs() < 1e-9);
        assert!((b[1].y - 4.0).abs() < 1e-9);
        assert!((b[2].x - 15.0).abs() < 1e-9);
    }

    #[test]
    fn flat_extrapolation_outside_keyframes() {
        let tl = linear(&[(5, 2.0), (10, 8.0)]);
        assert!((value_at_index(&tl, -100.0) - 2.0).abs() < 1e-12);
        assert!((value_at_index(&tl, 5.0) - 2.0).abs() < 1e-12);
        assert!((value_at_index(&tl, 10.0) - 8.0).abs() < 1e-12);
        assert!((value_at_index(&tl, 400.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn single_keyframe_returns_value() {
        let tl = linear(&[(3, 0.75)]);
        assert!((value_at_index(&tl, 50.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn multi_segment_linear() {
        let tl = linear(&[(0, 0.0), (10, 10.0), (20, 5.0)]);
        assert!((value_at_index(&tl, 5.0) - 5.0).abs() < 1e-12);
        assert!((value_at_index(&tl, 15.0) - 7.5).abs() < 1e-12);
        assert!((value_at_index(&tl, 10.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn cubic_on_a_straight_line_evaluates_linearly() {
        let tl = straight_cubic();
        for x in [1.0, 2.5, 5.0, 7.5, 9.0] {
            let v = value_at_index(&tl, x);
            assert!((v - x).abs() < 1e-6, "x={x} v={v}");
        }
    }

    #[test]
    fn s_curve_with_equal_endpoints_uses_bisection() {
        let tl = s_curve();
        assert!(value_at_index(&tl, 5.0).abs() < 1e-4);
        let early = value_at_index(&tl, 2.0);
        let late = value_at_index(&tl, 8.0);
        assert!(early > 0.0);
        assert!(late < 0.0);
        assert!((early + late).abs() < 1e-4);
    }

    #[test]
    fn bisection_agrees_with_closed_form() {
        let tl = straight_cubic();
        let CurveSegment::Cubic(b) = keyframes_to_curve(&tl.keyframes[0], &tl.keyframes[1])
        else {
            panic!("expected cubic");
        };
        let t_bisect = find_bezier_x_intersection_t(&b, 4.0);
        let t_closed = solve_bezier_t_for_x(&b, 4.0).unwrap();
        assert!((t_bisect - t_closed).abs() < 1e-5);
        assert!((cubic_point(&b, t_bisect).x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn de_casteljau_split_reproduces_original() {
        let b = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 8.0),
            Vec2::new(7.0, -3.0),
            Vec2::new(10.0, 4.0),
        ];
        let t = 0.3;
        let (left, right) = split_cubic_bezier(&b, t);
        assert_eq!(left[0], b[0]);
        assert_eq!(right[3], b[3]);
        assert!(left[3].distance(right[0]) < 1e-12);

        for u in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let on_left = cubic_point(&left, u);
            let on_original = cubic_point(&b, u * t);
            assert!(on_left.distance(on_original) < 1e-9);

            let on_right = cubic_point(&right, u);
            let on_original = cubic_point(&b, t + u * (1.0 - t));
            assert!(on_right.distance(on_original) < 1e-9);
        }
    }

    #[test]
    fn split_line_at_x() {
        let line = CurveSegment::Line([Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0)]);
        let (a, b) = line.split_at_x(2.5);
        assert_eq!(a.end(), Vec2::new(2.5, 5.0));
        assert_eq!(b.start(), Vec2::new(2.5, 5.0));
    }

    #[test]
    fn control_point_positions() {
        let tl = straight_cubic();
        let right = control_point_position(&tl, 0, ControlPointSide::Right).unwrap();
        assert!((right.x - 10.0 / 3.0).abs() < 1e-9);
        let left = control_point_position(&tl, 1, ControlPointSide::Left).unwrap();
        assert!((left.x - 20.0 / 3.0).abs() < 1e-9);
        assert!(control_point_position(&tl, 0, ControlPointSide::Left).is_none());
    }

    #[test]
    fn empty_timeline_is_an_error() {
        let tl = Timeline::new("empty");
        assert_eq!(
            try_value_at_index(&tl, 0.0),
            Err(CurveError::EmptyTimeline {
                timeline_id: "empty".into()
            })
        );
    }

    #[test]
    #[should_panic(expected = "empty timeline")]
    fn value_at_index_panics_on_empty_timeline() {
        value_at_index(&Timeline::new("empty"), 0.0);
    }

    #[test]
    fn cubic_roots_finds_all_three() {
        // (t - 0.2)(t - 0.5)(t - 0.9)
        let mut roots = cubic_roots(1.0, -1.6, 0.73, -0.09);
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(roots.len(), 3);
        for (r, expected) in roots.iter().zip([0.2, 0.5, 0.9]) {
            assert!((r - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn polished_root_survives_tiny_leading_coefficient() {
        // n1 = 0.1, n2 just above 13/30: the cubic coefficient is about -1e-10.
        let b = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 4.0),
            Vec2::new(13.0 / 3.0 + 1e-9 / 3.0, -2.0),
            Vec2::new(10.0, 3.0),
        ];
        let x = 6.5;
        let t = solve_bezier_t_for_x(&b, x).unwrap();
        assert!((cubic_point(&b, t).x - x).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn closed_form_matches_bisection_on_monotone_segments(
            start in -100.0f64..100.0,
            width in 1.0f64..100.0,
            n1 in 0.05f64..0.95,
            n2 in 0.05f64..0.95,
            ys in prop::array::uniform4(-20.0f64..20.0),
            f in 0.0f64..1.0,
        ) {
            let b = [
                Vec2::new(start, ys[0]),
                Vec2::new(start + n1 * width, ys[1]),
                Vec2::new(start + n2 * width, ys[2]),
                Vec2::new(start + width, ys[3]),
            ];
            let x = start + f * width;

            let t = solve_bezier_t_for_x(&b, x);
            prop_assert!(t.is_some(), "no root for x={}", x);
            let closed = cubic_point(&b, t.unwrap());
            let bisected = cubic_point(&b, find_bezier_x_intersection_t(&b, x));

            prop_assert!((closed.x - x).abs() < 1e-6, "x={} solved to {}", x, closed.x);
            prop_assert!(
                (closed.y - bisected.y).abs() < 1e-3,
                "x={}: closed form {} vs bisection {}",
                x,
                closed.y,
                bisected.y
            );
        }
    }
}
