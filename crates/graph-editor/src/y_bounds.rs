//! Visible value range for the current view bounds.
//!
//! Each timeline's segments are cropped to the visible frame window, splitting
//! segments that straddle a window edge. The range covers every point of the
//! cropped segments (Bezier control points included) plus any original
//! control point of an edge segment that lies inside the window.

use ce_app_state::YBounds;
use ce_common::GraphEditorConfig;
use ce_timeline::{timeline_curves, CurveSegment, Timeline};

/// Value range of one timeline inside the window, or `None` if it has no
/// keyframes. A flat range is widened by `flat_y_bounds_buffer`.
pub fn timeline_y_bounds(
    timeline: &Timeline,
    view_bounds: [f64; 2],
    length: f64,
    config: &GraphEditorConfig,
) -> Option<YBounds> {
    let (first, last) = (timeline.keyframes.first()?, timeline.keyframes.last()?);
    let x0 = length * view_bounds[0];
    let x1 = length * view_bounds[1];

    let mut range = Range::default();

    if timeline.len() == 1 || x1 <= first.index as f64 {
        range.include(first.value);
    } else if x0 >= last.index as f64 {
        range.include(last.value);
    } else {
        for segment in timeline_curves(timeline) {
            let (start, end) = (segment.start().x, segment.end().x);
            if end < x0 || start > x1 {
                continue;
            }

            let mut cropped = segment;
            let crosses_left = start < x0;
            let crosses_right = end > x1;
            if crosses_left {
                cropped = cropped.split_at_x(x0).1;
            }
            if crosses_right {
                cropped = cropped.split_at_x(x1).0;
            }
            for p in cropped.points() {
                range.include(p.y);
            }

            if crosses_left || crosses_right {
                if let CurveSegment::Cubic(b) = segment {
                    for cp in &b[1..3] {
                        if cp.x >= x0 && cp.x <= x1 {
                            range.include(cp.y);
                        }
                    }
                }
            }
        }
    }

    let (upper, lower) = range.bounds()?;
    if upper - lower <= f64::EPSILON {
        let buffer = config.flat_y_bounds_buffer;
        return Some(YBounds::new(upper + buffer, lower - buffer));
    }
    Some(YBounds::new(upper, lower))
}

/// Value range across all timelines, padded by `y_bounds_padding` of its
/// height on both ends. Without any keyframes the range is the flat buffer
/// around zero.
pub fn get_y_bounds(
    timelines: &[Timeline],
    view_bounds: [f64; 2],
    length: f64,
    config: &GraphEditorConfig,
) -> YBounds {
    timelines
        .iter()
        .filter_map(|t| timeline_y_bounds(t, view_bounds, length, config))
        .reduce(YBounds::union)
        .unwrap_or_else(|| YBounds::new(config.flat_y_bounds_buffer, -config.flat_y_bounds_buffer))
        .padded(config.y_bounds_padding)
}

#[derive(Default)]
struct Range {
    upper: Option<f64>,
    lower: Option<f64>,
}

impl Range {
    fn include(&mut self, v: f64) {
        self.upper = Some(self.upper.map_or(v, |u| u.max(v)));
        self.lower = Some(self.lower.map_or(v, |l| l.min(v)));
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.upper?, self.lower?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_timeline::{ControlPoint, TimelineKeyframe};

    fn config() -> GraphEditorConfig {
        GraphEditorConfig::default()
    }

    fn ramp() -> Timeline {
        Timeline::with_keyframes(
            "ramp",
            vec![
                TimelineKeyframe::new("1", 0, 0.0),
                TimelineKeyframe::new("2", 100, 100.0),
            ],
        )
    }

    #[test]
    fn single_keyframe_is_widened_by_flat_buffer() {
        let tl = Timeline::with_keyframes("tl", vec![TimelineKeyframe::new("1", 10, 5.0)]);
        let b = timeline_y_bounds(&tl, [0.0, 1.0], 100.0, &config()).unwrap();
        assert_eq!(b, YBounds::new(6.0, 4.0));
    }

    #[test]
    fn flat_visible_range_is_widened() {
        let tl = Timeline::with_keyframes(
            "tl",
            vec![
                TimelineKeyframe::new("1", 0, 3.0),
                TimelineKeyframe::new("2", 50, 3.0),
                TimelineKeyframe::new("3", 100, 20.0),
            ],
        );
        // Only the flat first segment is visible.
        let b = timeline_y_bounds(&tl, [0.0, 0.4], 100.0, &config()).unwrap();
        assert_eq!(b, YBounds::new(4.0, 2.0));
    }

    #[test]
    fn window_crops_segments() {
        let b = timeline_y_bounds(&ramp(), [0.25, 0.5], 100.0, &config()).unwrap();
        assert!((b.lower - 25.0).abs() < 1e-9);
        assert!((b.upper - 50.0).abs() < 1e-9);
    }

    #[test]
    fn window_beyond_keyframes_holds_edge_value() {
        let tl = Timeline::with_keyframes(
            "tl",
            vec![
                TimelineKeyframe::new("1", 10, 1.0),
                TimelineKeyframe::new("2", 20, 9.0),
            ],
        );
        let after = timeline_y_bounds(&tl, [0.5, 1.0], 100.0, &config()).unwrap();
        assert_eq!(after, YBounds::new(10.0, 8.0));
        let before = timeline_y_bounds(&tl, [0.0, 0.05], 100.0, &config()).unwrap();
        assert_eq!(before, YBounds::new(2.0, 0.0));
    }

    #[test]
    fn edge_segment_control_points_inside_window_count() {
        let tl = Timeline::with_keyframes(
            "tl",
            vec![
                TimelineKeyframe::new("1", 0, 0.0)
                    .with_control_points(None, Some(ControlPoint::new(0.3, 40.0, 100.0))),
                TimelineKeyframe::new("2", 100, 0.0)
                    .with_control_points(Some(ControlPoint::new(0.7, 0.0, 100.0)), None),
            ],
        );
        // Window [20, 50] contains the control point at x = 30, y = 40.
        let b = timeline_y_bounds(&tl, [0.2, 0.5], 100.0, &config()).unwrap();
        assert!((b.upper - 40.0).abs() < 1e-9);
    }

    #[test]
    fn empty_timeline_has_no_bounds() {
        assert!(timeline_y_bounds(&Timeline::new("e"), [0.0, 1.0], 100.0, &config()).is_none());
    }

    #[test]
    fn aggregate_is_padded() {
        let flat = Timeline::with_keyframes("flat", vec![TimelineKeyframe::new("1", 0, 50.0)]);
        let b = get_y_bounds(&[ramp(), flat], [0.0, 1.0], 100.0, &config());
        assert!((b.upper - 110.0).abs() < 1e-9);
        assert!((b.lower + 10.0).abs() < 1e-9);
    }

    #[test]
    fn aggregate_of_single_keyframe_is_not_zero_width() {
        let tl = Timeline::with_keyframes("tl", vec![TimelineKeyframe::new("1", 0, 7.0)]);
        let b = get_y_bounds(&[tl], [0.0, 1.0], 100.0, &config());
        assert!(b.height() > 0.0);
        assert!((b.upper - 8.2).abs() < 1e-9);
        assert!((b.lower - 5.8).abs() < 1e-9);
    }

    #[test]
    fn no_timelines_gives_default_range() {
        let b = get_y_bounds(&[], [0.0, 1.0], 100.0, &config());
        assert!(b.upper > 0.0 && b.lower < 0.0);
    }
}
