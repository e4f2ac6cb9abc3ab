//! Timeline data model types: Timeline, TimelineKeyframe, ControlPoint, TimelineSelection.
//!
//! A timeline is a value curve made of keyframes sorted by frame index. Each
//! keyframe may carry a control point on either side; a control point is
//! stored relative to its keyframe and to the index distance of the segment
//! it belongs to, so it stays meaningful when keyframes move.
//!
//! Timelines are treated as immutable values: every editing function in this
//! crate takes a `&Timeline` and returns a new one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Smallest allowed control point `tx`.
pub const TIMELINE_CP_TX_MIN: f64 = 0.005;
/// Largest allowed control point `tx`.
pub const TIMELINE_CP_TX_MAX: f64 = 1.0 - TIMELINE_CP_TX_MIN;

/// A value curve composed of keyframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Unique timeline identifier.
    pub id: String,
    /// Keyframes, sorted strictly ascending by `index`.
    pub keyframes: Vec<TimelineKeyframe>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keyframes: Vec::new(),
        }
    }

    /// Create a timeline from keyframes in any order. Keyframes are sorted by index.
    pub fn with_keyframes(id: impl Into<String>, mut keyframes: Vec<TimelineKeyframe>) -> Self {
        keyframes.sort_by_key(|k| k.index);
        Self {
            id: id.into(),
            keyframes,
        }
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Look up a keyframe by id.
    pub fn keyframe(&self, id: &str) -> Option<&TimelineKeyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    /// Position of a keyframe (by id) in the sorted keyframe list.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == id)
    }

    /// Position of the keyframe sitting exactly at `index`, if any.
    pub fn position_at_index(&self, index: i64) -> Option<usize> {
        self.keyframes.binary_search_by_key(&index, |k| k.index).ok()
    }

    /// Neighbor of the keyframe at `pos` on the given side.
    pub fn neighbor(&self, pos: usize, side: ControlPointSide) -> Option<&TimelineKeyframe> {
        match side {
            ControlPointSide::Left => pos.checked_sub(1).and_then(|p| self.keyframes.get(p)),
            ControlPointSide::Right => self.keyframes.get(pos + 1),
        }
    }

    /// First and last keyframe index, or `None` for an empty timeline.
    pub fn index_range(&self) -> Option<(i64, i64)> {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => Some((first.index, last.index)),
            _ => None,
        }
    }

    /// All keyframe ids in index order.
    pub fn keyframe_ids(&self) -> impl Iterator<Item = &str> {
        self.keyframes.iter().map(|k| k.id.as_str())
    }

    /// Whether keyframe indices are strictly ascending (and therefore unique).
    pub fn is_sorted_unique(&self) -> bool {
        self.keyframes.windows(2).all(|w| w[0].index < w[1].index)
    }
}

/// A single keyframe: a fixed (index, value) anchor on the curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineKeyframe {
    /// Unique (per timeline) keyframe identifier.
    pub id: String,
    /// Frame position.
    pub index: i64,
    /// Value at this keyframe.
    pub value: f64,
    /// Tangent toward the previous keyframe.
    pub control_point_left: Option<ControlPoint>,
    /// Tangent toward the next keyframe.
    pub control_point_right: Option<ControlPoint>,
    /// Keep the two control points collinear through the keyframe while dragging.
    pub reflect_control_points: bool,
}

impl TimelineKeyframe {
    /// A keyframe without control points.
    pub fn new(id: impl Into<String>, index: i64, value: f64) -> Self {
        Self {
            id: id.into(),
            index,
            value,
            control_point_left: None,
            control_point_right: None,
            reflect_control_points: false,
        }
    }

    pub fn control_point(&self, side: ControlPointSide) -> Option<&ControlPoint> {
        match side {
            ControlPointSide::Left => self.control_point_left.as_ref(),
            ControlPointSide::Right => self.control_point_right.as_ref(),
        }
    }

    pub fn set_control_point(&mut self, side: ControlPointSide, cp: Option<ControlPoint>) {
        match side {
            ControlPointSide::Left => self.control_point_left = cp,
            ControlPointSide::Right => self.control_point_right = cp,
        }
    }

    /// Builder-style helper used when constructing timelines by hand.
    pub fn with_control_points(
        mut self,
        left: Option<ControlPoint>,
        right: Option<ControlPoint>,
    ) -> Self {
        self.control_point_left = left;
        self.control_point_right = right;
        self
    }

    pub fn with_reflect(mut self, reflect: bool) -> Self {
        self.reflect_control_points = reflect;
        self
    }
}

/// A tangent-defining offset attached to one side of a keyframe.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Position along the segment (0 = left keyframe, 1 = right keyframe),
    /// regardless of which keyframe owns the control point.
    pub tx: f64,
    /// Value offset from the owning keyframe's value.
    pub value: f64,
    /// Segment length (in frames) at the time `value` was defined.
    pub relative_to_distance: f64,
}

impl ControlPoint {
    /// Create a control point. `tx` is clamped to the allowed range.
    pub fn new(tx: f64, value: f64, relative_to_distance: f64) -> Self {
        Self {
            tx: Self::clamp_tx(tx),
            value,
            relative_to_distance,
        }
    }

    /// Clamp a `tx` into `[TIMELINE_CP_TX_MIN, TIMELINE_CP_TX_MAX]`.
    pub fn clamp_tx(tx: f64) -> f64 {
        tx.clamp(TIMELINE_CP_TX_MIN, TIMELINE_CP_TX_MAX)
    }

    /// `value` rescaled to a segment that is `live_distance` frames long.
    pub fn scaled_value(&self, live_distance: f64) -> f64 {
        if self.relative_to_distance <= 0.0 {
            return self.value;
        }
        self.value * (live_distance / self.relative_to_distance)
    }
}

/// Which side of a keyframe a control point sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlPointSide {
    Left,
    Right,
}

impl ControlPointSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// `+1` for left, `-1` for right.
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// Selected keyframe ids of one timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSelection {
    pub keyframes: BTreeSet<String>,
}

impl TimelineSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyframes: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, keyframe_id: &str) -> bool {
        self.keyframes.contains(keyframe_id)
    }

    pub fn insert(&mut self, keyframe_id: impl Into<String>) {
        self.keyframes.insert(keyframe_id.into());
    }

    pub fn remove(&mut self, keyframe_id: &str) {
        self.keyframes.remove(keyframe_id);
    }

    /// Add the keyframe if absent, remove it if present.
    pub fn toggle(&mut self, keyframe_id: &str) {
        if !self.keyframes.remove(keyframe_id) {
            self.keyframes.insert(keyframe_id.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keyframes.iter().map(String::as_str)
    }
}
