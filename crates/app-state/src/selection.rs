//! Keyframe selection state, per timeline.

use std::collections::{BTreeMap, BTreeSet};

use ce_timeline::TimelineSelection;
use serde::{Deserialize, Serialize};

static EMPTY: TimelineSelection = TimelineSelection {
    keyframes: BTreeSet::new(),
};

/// Selected keyframes of every timeline in the editor, keyed by timeline id.
///
/// This is the selection track of the editor's history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSelectionState {
    timelines: BTreeMap<String, TimelineSelection>,
}

impl TimelineSelectionState {
    /// Create a new empty selection state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection of one timeline (empty if nothing was ever selected there).
    pub fn get(&self, timeline_id: &str) -> &TimelineSelection {
        self.timelines.get(timeline_id).unwrap_or(&EMPTY)
    }

    /// Mutable selection of one timeline, created on first use.
    pub fn get_mut(&mut self, timeline_id: &str) -> &mut TimelineSelection {
        self.timelines.entry(timeline_id.to_string()).or_default()
    }

    /// Check if a keyframe is currently selected.
    pub fn is_keyframe_selected(&self, timeline_id: &str, keyframe_id: &str) -> bool {
        self.get(timeline_id).contains(keyframe_id)
    }

    /// Select a keyframe. If `additive` is false, every other keyframe (in all
    /// timelines) is deselected first.
    pub fn select_keyframe(&mut self, timeline_id: &str, keyframe_id: &str, additive: bool) {
        if !additive {
            self.clear();
        }
        self.get_mut(timeline_id).insert(keyframe_id);
    }

    /// Add the keyframe if absent, remove it if present.
    pub fn toggle_keyframe(&mut self, timeline_id: &str, keyframe_id: &str) {
        self.get_mut(timeline_id).toggle(keyframe_id);
    }

    pub fn deselect_keyframe(&mut self, timeline_id: &str, keyframe_id: &str) {
        if let Some(sel) = self.timelines.get_mut(timeline_id) {
            sel.remove(keyframe_id);
        }
    }

    /// Drop every selected keyframe id of `timeline_id` that is not in `existing`.
    pub fn retain_existing<'a>(
        &mut self,
        timeline_id: &str,
        existing: impl IntoIterator<Item = &'a str>,
    ) {
        let Some(sel) = self.timelines.get_mut(timeline_id) else {
            return;
        };
        let existing: BTreeSet<&str> = existing.into_iter().collect();
        sel.keyframes.retain(|id| existing.contains(id.as_str()));
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.timelines.clear();
    }

    pub fn clear_timeline(&mut self, timeline_id: &str) {
        self.timelines.remove(timeline_id);
    }

    /// Timelines with at least one selected keyframe.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimelineSelection)> {
        self.timelines
            .iter()
            .filter(|(_, sel)| !sel.is_empty())
            .map(|(id, sel)| (id.as_str(), sel))
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.timelines.values().all(TimelineSelection::is_empty)
    }

    /// Total number of selected keyframes across all timelines.
    pub fn count(&self) -> usize {
        self.timelines.values().map(TimelineSelection::len).sum()
    }
}
