//! Transactional undo/redo over a (primary, selection) state pair.
//!
//! Both tracks are evolved in lockstep: every committed action appends one
//! entry to each list and undo/redo move both cursors together. Each entry
//! records whether the *other* track was modified by that action
//! (`modified_related`), which lets the selection track be edited without
//! losing work across an intervening undo of the primary track:
//!
//! - **Shift forward**: after an undo, a new action starts its selection
//!   baseline from the entry one past the cursor if that entry was produced
//!   by an action that modified the primary track and allows index shifting.
//! - **Preferred redo**: a selection-only commit after an undo would discard
//!   the primary redo tail. The previous lists are remembered and restored
//!   verbatim by the next `redo()`.
//!
//! # Usage
//!
//! ```
//! use ce_app_state::{ActionId, HistoryManager};
//!
//! let mut history = HistoryManager::new(0_i32, Vec::<u32>::new());
//! let id = ActionId::next();
//! assert!(history.start(&id).is_ok());
//! history.dispatch_primary(&id, |p| *p += 1);
//! history.submit(&id, "Increment", true, false, false);
//! assert_eq!(*history.current_primary(), 1);
//!
//! history.undo();
//! assert_eq!(*history.current_primary(), 0);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HistoryError, HistoryResult};

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of an in-flight action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A process-unique id.
    pub fn next() -> Self {
        let n = NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed);
        Self(format!("action-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a history operation. Rejected operations change nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryOutcome {
    Ok,
    /// `start` was called while another action is open.
    AlreadyInProgress { active: ActionId },
    /// The id does not match the open action (`expected` is `None` when no
    /// action is open).
    StaleId {
        expected: Option<ActionId>,
        got: ActionId,
    },
}

impl HistoryOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn into_result(self) -> HistoryResult<()> {
        match self {
            Self::Ok => Ok(()),
            Self::AlreadyInProgress { active } => Err(HistoryError::AlreadyInProgress { active }),
            Self::StaleId {
                expected: Some(expected),
                got,
            } => Err(HistoryError::StaleId { expected, got }),
            Self::StaleId {
                expected: None,
                got,
            } => Err(HistoryError::NoActionInProgress { got }),
        }
    }
}

/// Which track a [`HistoryState`] holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryKind {
    Primary,
    Selection,
}

/// Direction of the last cursor move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexDirection {
    Forward,
    Backward,
}

/// A committed history entry.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry<S> {
    pub state: S,
    /// Human-readable label (e.g. "Move keyframes").
    pub name: String,
    /// Whether the action that produced this entry modified the other track.
    pub modified_related: bool,
    /// Whether a later action may start from this entry while it sits in the
    /// redo tail.
    pub allow_index_shift: bool,
}

/// The open action of a track: its id and working copy of the state.
#[derive(Clone, Debug, PartialEq)]
pub struct InFlightAction<S> {
    pub id: ActionId,
    pub state: S,
}

/// Saved list and cursor restored by the next `redo()`.
#[derive(Clone, Debug, PartialEq)]
pub struct PreferredRedo<S> {
    pub list: Vec<HistoryEntry<S>>,
    pub index: usize,
}

/// One history track.
#[derive(Clone, Debug)]
pub struct HistoryState<S> {
    kind: HistoryKind,
    list: Vec<HistoryEntry<S>>,
    index: usize,
    index_direction: IndexDirection,
    action: Option<InFlightAction<S>>,
    preferred_redo: Option<PreferredRedo<S>>,
}

impl<S: Clone> HistoryState<S> {
    fn new(kind: HistoryKind, initial: S) -> Self {
        Self {
            kind,
            list: vec![HistoryEntry {
                state: initial,
                name: "Initial state".to_string(),
                modified_related: false,
                allow_index_shift: false,
            }],
            index: 0,
            index_direction: IndexDirection::Forward,
            action: None,
            preferred_redo: None,
        }
    }

    pub fn kind(&self) -> HistoryKind {
        self.kind
    }

    pub fn list(&self) -> &[HistoryEntry<S>] {
        &self.list
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn index_direction(&self) -> IndexDirection {
        self.index_direction
    }

    pub fn action(&self) -> Option<&InFlightAction<S>> {
        self.action.as_ref()
    }

    pub fn preferred_redo(&self) -> Option<&PreferredRedo<S>> {
        self.preferred_redo.as_ref()
    }

    /// State at the cursor.
    pub fn current(&self) -> &S {
        &self.list[self.index].state
    }

    /// In-flight working copy if an action is open, else the state at the cursor.
    pub fn live(&self) -> &S {
        self.action.as_ref().map_or_else(|| self.current(), |a| &a.state)
    }

    fn has_redo_tail(&self) -> bool {
        self.index + 1 < self.list.len()
    }

    /// Whether a new action should start from the entry one past the cursor.
    fn shift_forward(&self) -> bool {
        self.kind == HistoryKind::Selection
            && self.index_direction == IndexDirection::Backward
            && self
                .list
                .get(self.index + 1)
                .is_some_and(|e| e.modified_related && e.allow_index_shift)
    }

    fn start(&mut self, id: ActionId) {
        let base = if self.shift_forward() {
            self.index + 1
        } else {
            self.index
        };
        self.action = Some(InFlightAction {
            id,
            state: self.list[base].state.clone(),
        });
    }

    fn push(&mut self, name: &str, modified_related: bool, allow_index_shift: bool) {
        let Some(action) = self.action.take() else {
            return;
        };
        self.list.truncate(self.index + 1);
        self.list.push(HistoryEntry {
            state: action.state,
            name: name.to_string(),
            modified_related,
            allow_index_shift,
        });
        self.index += 1;
        self.index_direction = IndexDirection::Forward;
    }

    fn remember_redo(&mut self) {
        self.preferred_redo = Some(PreferredRedo {
            list: self.list.clone(),
            index: self.index + 1,
        });
    }

    fn restore_preferred_redo(&mut self) -> bool {
        match self.preferred_redo.take() {
            Some(redo) => {
                self.list = redo.list;
                self.index = redo.index.min(self.list.len().saturating_sub(1));
                self.index_direction = IndexDirection::Forward;
                true
            }
            None => false,
        }
    }
}

/// Transactional undo/redo manager over a primary and a selection track.
///
/// Exactly one action may be open at a time. All mutation goes through the
/// open action's working copies; `submit` commits them as one entry and
/// `cancel` discards them.
#[derive(Clone, Debug)]
pub struct HistoryManager<P, S> {
    primary: HistoryState<P>,
    selection: HistoryState<S>,
}

impl<P: Clone, S: Clone> HistoryManager<P, S> {
    pub fn new(primary: P, selection: S) -> Self {
        Self {
            primary: HistoryState::new(HistoryKind::Primary, primary),
            selection: HistoryState::new(HistoryKind::Selection, selection),
        }
    }

    /// Open an action. Rejected if another action is open.
    pub fn start(&mut self, id: &ActionId) -> HistoryOutcome {
        if let Some(active) = self.action_id() {
            warn!(
                id = %id,
                active = %active,
                "start called while an action is in progress, ignoring"
            );
            return HistoryOutcome::AlreadyInProgress {
                active: active.clone(),
            };
        }

        let shifted = self.selection.shift_forward();
        self.primary.start(id.clone());
        self.selection.start(id.clone());
        debug!(id = %id, shifted, "Action started");
        HistoryOutcome::Ok
    }

    /// Mutate the open action's primary working copy.
    pub fn dispatch_primary(&mut self, id: &ActionId, f: impl FnOnce(&mut P)) -> HistoryOutcome {
        let outcome = self.check_id(id, "dispatch_primary");
        if let (HistoryOutcome::Ok, Some(action)) = (&outcome, self.primary.action.as_mut()) {
            f(&mut action.state);
        }
        outcome
    }

    /// Mutate the open action's selection working copy.
    pub fn dispatch_selection(&mut self, id: &ActionId, f: impl FnOnce(&mut S)) -> HistoryOutcome {
        let outcome = self.check_id(id, "dispatch_selection");
        if let (HistoryOutcome::Ok, Some(action)) = (&outcome, self.selection.action.as_mut()) {
            f(&mut action.state);
        }
        outcome
    }

    /// Replace the open action's primary working copy.
    pub fn set_primary(&mut self, id: &ActionId, state: P) -> HistoryOutcome {
        self.dispatch_primary(id, |p| *p = state)
    }

    /// Replace the open action's selection working copy.
    pub fn set_selection(&mut self, id: &ActionId, state: S) -> HistoryOutcome {
        self.dispatch_selection(id, |s| *s = state)
    }

    /// Commit the open action.
    ///
    /// When neither track was modified the action is closed without adding an
    /// entry. Otherwise both tracks get a new entry at the cursor (dropping
    /// any redo tail) and the preferred redo is updated: cleared by a primary
    /// modification, or captured by the first selection-only commit that
    /// drops a redo tail.
    pub fn submit(
        &mut self,
        id: &ActionId,
        name: &str,
        modified_primary: bool,
        modified_selection: bool,
        allow_index_shift: bool,
    ) -> HistoryOutcome {
        let outcome = self.check_id(id, "submit");
        if !outcome.is_ok() {
            return outcome;
        }

        if !modified_primary && !modified_selection {
            self.primary.action = None;
            self.selection.action = None;
            debug!(id = %id, name, "Action submitted without changes");
            return HistoryOutcome::Ok;
        }

        if modified_primary {
            if self.primary.preferred_redo.is_some() {
                debug!(id = %id, "Preferred redo cleared");
            }
            self.primary.preferred_redo = None;
            self.selection.preferred_redo = None;
        } else if self.primary.has_redo_tail() && self.primary.preferred_redo.is_none() {
            self.primary.remember_redo();
            self.selection.remember_redo();
            debug!(id = %id, index = self.primary.index + 1, "Preferred redo captured");
        }

        self.primary.push(name, modified_selection, allow_index_shift);
        self.selection.push(name, modified_primary, allow_index_shift);

        debug!(
            id = %id,
            name,
            modified_primary,
            modified_selection,
            index = self.primary.index,
            "Action submitted"
        );
        HistoryOutcome::Ok
    }

    /// Discard the open action.
    pub fn cancel(&mut self, id: &ActionId) -> HistoryOutcome {
        let outcome = self.check_id(id, "cancel");
        if outcome.is_ok() {
            self.primary.action = None;
            self.selection.action = None;
            debug!(id = %id, "Action cancelled");
        }
        outcome
    }

    /// Move both cursors back one entry. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if let Some(active) = self.action_id() {
            warn!(active = %active, "undo called while an action is in progress, ignoring");
            return false;
        }
        if self.primary.index == 0 {
            return false;
        }

        let name = self.primary.list[self.primary.index].name.clone();
        self.primary.index -= 1;
        self.selection.index -= 1;
        self.primary.index_direction = IndexDirection::Backward;
        self.selection.index_direction = IndexDirection::Backward;

        debug!(name = %name, index = self.primary.index, "Undo");
        true
    }

    /// Restore the preferred redo if one is set, otherwise move both cursors
    /// forward one entry. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if let Some(active) = self.action_id() {
            warn!(active = %active, "redo called while an action is in progress, ignoring");
            return false;
        }

        if self.primary.restore_preferred_redo() {
            self.selection.restore_preferred_redo();
            debug!(index = self.primary.index, "Redo (preferred)");
            return true;
        }

        if !self.primary.has_redo_tail() {
            return false;
        }
        self.primary.index += 1;
        self.selection.index += 1;
        self.primary.index_direction = IndexDirection::Forward;
        self.selection.index_direction = IndexDirection::Forward;

        debug!(
            name = %self.primary.list[self.primary.index].name,
            index = self.primary.index,
            "Redo"
        );
        true
    }

    fn check_id(&self, id: &ActionId, op: &str) -> HistoryOutcome {
        match self.action_id() {
            Some(active) if active == id => HistoryOutcome::Ok,
            Some(active) => {
                warn!(op, id = %id, active = %active, "Stale action id, ignoring");
                HistoryOutcome::StaleId {
                    expected: Some(active.clone()),
                    got: id.clone(),
                }
            }
            None => {
                warn!(op, id = %id, "No action in progress, ignoring");
                HistoryOutcome::StaleId {
                    expected: None,
                    got: id.clone(),
                }
            }
        }
    }

    // --- Queries ---

    pub fn primary(&self) -> &HistoryState<P> {
        &self.primary
    }

    pub fn selection(&self) -> &HistoryState<S> {
        &self.selection
    }

    pub fn current_primary(&self) -> &P {
        self.primary.current()
    }

    pub fn current_selection(&self) -> &S {
        self.selection.current()
    }

    pub fn live_primary(&self) -> &P {
        self.primary.live()
    }

    pub fn live_selection(&self) -> &S {
        self.selection.live()
    }

    /// Id of the open action, if any.
    pub fn action_id(&self) -> Option<&ActionId> {
        self.primary.action.as_ref().map(|a| &a.id)
    }

    pub fn is_in_flight(&self) -> bool {
        self.primary.action.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.primary.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.primary.preferred_redo.is_some() || self.primary.has_redo_tail()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.primary.list[self.primary.index].name.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        if let Some(redo) = &self.primary.preferred_redo {
            return redo.list.get(redo.index).map(|e| e.name.as_str());
        }
        self.primary
            .list
            .get(self.primary.index + 1)
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Manager = HistoryManager<i32, Vec<&'static str>>;

    fn manager() -> Manager {
        HistoryManager::new(0, Vec::new())
    }

    /// Run one full action: primary += `delta` (if nonzero), selection replaced (if given).
    fn commit(
        h: &mut Manager,
        name: &str,
        delta: i32,
        selection: Option<Vec<&'static str>>,
        allow_index_shift: bool,
    ) {
        let id = ActionId::next();
        assert!(h.start(&id).is_ok());
        if delta != 0 {
            h.dispatch_primary(&id, |p| *p += delta);
        }
        let modified_selection = selection.is_some();
        if let Some(sel) = selection {
            h.set_selection(&id, sel);
        }
        assert!(h
            .submit(&id, name, delta != 0, modified_selection, allow_index_shift)
            .is_ok());
    }

    #[test]
    fn new_manager_has_single_entry() {
        let h = manager();
        assert_eq!(h.primary().list().len(), 1);
        assert_eq!(h.selection().list().len(), 1);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(!h.is_in_flight());
        assert_eq!(h.selection().kind(), HistoryKind::Selection);
    }

    #[test]
    fn submit_appends_to_both_tracks() {
        let mut h = manager();
        commit(&mut h, "Add", 5, None, false);

        assert_eq!(*h.current_primary(), 5);
        assert_eq!(h.primary().index(), 1);
        assert_eq!(h.selection().index(), 1);
        assert_eq!(h.selection().list().len(), 2);
        assert!(h.selection().list()[1].modified_related);
        assert!(!h.primary().list()[1].modified_related);
        assert_eq!(h.undo_label(), Some("Add"));
    }

    #[test]
    fn in_flight_changes_are_not_visible_until_submit() {
        let mut h = manager();
        let id = ActionId::new("a");
        h.start(&id);
        h.dispatch_primary(&id, |p| *p = 9);
        assert_eq!(*h.current_primary(), 0);
        assert_eq!(*h.live_primary(), 9);
        h.submit(&id, "Set", true, false, false);
        assert_eq!(*h.current_primary(), 9);
        assert_eq!(*h.live_primary(), 9);
    }

    #[test]
    fn undo_restores_prior_entry_and_redo_reapplies() {
        let mut h = manager();
        commit(&mut h, "A", 1, None, false);
        commit(&mut h, "B", 10, Some(vec!["k1"]), false);

        assert!(h.undo());
        assert_eq!(*h.current_primary(), 1);
        assert!(h.current_selection().is_empty());
        assert_eq!(h.primary().index_direction(), IndexDirection::Backward);
        assert_eq!(h.redo_label(), Some("B"));

        assert!(h.redo());
        assert_eq!(*h.current_primary(), 11);
        assert_eq!(h.current_selection(), &vec!["k1"]);
        assert!(!h.redo());
    }

    #[test]
    fn undo_at_start_is_noop() {
        let mut h = manager();
        assert!(!h.undo());
        assert_eq!(h.primary().index(), 0);
    }

    #[test]
    fn unmodified_submit_adds_no_entry() {
        let mut h = manager();
        commit(&mut h, "Noop", 0, None, false);
        assert_eq!(h.primary().list().len(), 1);
        assert!(!h.is_in_flight());
    }

    #[test]
    fn double_start_is_rejected() {
        let mut h = manager();
        let a = ActionId::new("a");
        let b = ActionId::new("b");
        assert!(h.start(&a).is_ok());
        h.dispatch_primary(&a, |p| *p = 3);

        let outcome = h.start(&b);
        assert_eq!(outcome, HistoryOutcome::AlreadyInProgress { active: a.clone() });
        assert_eq!(h.action_id(), Some(&a));
        assert_eq!(*h.live_primary(), 3);
    }

    #[test]
    fn stale_id_is_rejected_without_change() {
        let mut h = manager();
        let a = ActionId::new("a");
        let b = ActionId::new("b");
        h.start(&a);

        let outcome = h.dispatch_primary(&b, |p| *p = 100);
        assert!(matches!(outcome, HistoryOutcome::StaleId { .. }));
        assert_eq!(*h.live_primary(), 0);

        assert!(!h.submit(&b, "X", true, false, false).is_ok());
        assert!(!h.cancel(&b).is_ok());
        assert!(h.is_in_flight());
        assert_eq!(h.primary().list().len(), 1);
    }

    #[test]
    fn operations_without_open_action_are_rejected() {
        let mut h = manager();
        let a = ActionId::new("a");
        let outcome = h.submit(&a, "X", true, false, false);
        assert_eq!(
            outcome.into_result(),
            Err(HistoryError::NoActionInProgress { got: a.clone() })
        );
        assert!(!h.cancel(&a).is_ok());
        assert_eq!(h.primary().list().len(), 1);
    }

    #[test]
    fn cancel_discards_in_flight_state() {
        let mut h = manager();
        commit(&mut h, "A", 1, None, false);
        let before = h.primary().list().to_vec();

        let id = ActionId::new("c");
        h.start(&id);
        h.dispatch_primary(&id, |p| *p = 50);
        h.set_selection(&id, vec!["x"]);
        assert!(h.cancel(&id).is_ok());

        assert!(!h.is_in_flight());
        assert_eq!(h.primary().list(), before.as_slice());
        assert_eq!(*h.live_primary(), 1);
        assert!(h.live_selection().is_empty());
    }

    #[test]
    fn undo_and_redo_are_ignored_while_in_flight() {
        let mut h = manager();
        commit(&mut h, "A", 1, None, false);
        let id = ActionId::new("open");
        h.start(&id);
        assert!(!h.undo());
        assert!(!h.redo());
        assert_eq!(h.primary().index(), 1);
    }

    #[test]
    fn new_commit_truncates_redo_tail() {
        let mut h = manager();
        commit(&mut h, "A", 1, None, false);
        commit(&mut h, "B", 1, None, false);
        h.undo();
        commit(&mut h, "C", 5, None, false);

        assert_eq!(h.primary().list().len(), 3);
        assert_eq!(*h.current_primary(), 6);
        assert!(!h.can_redo());
    }

    #[test]
    fn selection_only_commit_after_undo_keeps_primary_recoverable() {
        let mut h = manager();
        commit(&mut h, "Move", 7, None, true);
        h.undo();
        assert_eq!(*h.current_primary(), 0);

        commit(&mut h, "Select", 0, Some(vec!["k"]), true);
        assert_eq!(h.current_selection(), &vec!["k"]);
        assert!(h.primary().preferred_redo().is_some());
        assert!(h.can_redo());
        assert_eq!(h.redo_label(), Some("Move"));

        assert!(h.redo());
        assert_eq!(*h.current_primary(), 7);
        // The selection comes back exactly as it was when "Move" was
        // committed; the later "Select" does not carry over.
        assert!(h.current_selection().is_empty());
        assert!(h.primary().preferred_redo().is_none());
        assert!(h.selection().preferred_redo().is_none());
    }

    #[test]
    fn preferred_redo_survives_consecutive_selection_commits() {
        let mut h = manager();
        commit(&mut h, "Move", 7, None, true);
        h.undo();

        commit(&mut h, "Select 1", 0, Some(vec!["a"]), true);
        commit(&mut h, "Select 2", 0, Some(vec!["b"]), true);

        // The first capture wins: it still points at the undone primary change.
        let redo = h.primary().preferred_redo().unwrap();
        assert_eq!(redo.list[redo.index].name, "Move");

        assert!(h.redo());
        assert_eq!(*h.current_primary(), 7);
    }

    #[test]
    fn primary_commit_clears_preferred_redo() {
        let mut h = manager();
        commit(&mut h, "Move", 7, None, true);
        h.undo();
        commit(&mut h, "Select", 0, Some(vec!["a"]), true);
        assert!(h.primary().preferred_redo().is_some());

        commit(&mut h, "Other move", 2, None, true);
        assert!(h.primary().preferred_redo().is_none());
        assert!(!h.can_redo());
        assert_eq!(*h.current_primary(), 2);
    }

    #[test]
    fn selection_commit_without_redo_tail_captures_nothing() {
        let mut h = manager();
        commit(&mut h, "Move", 7, None, true);
        commit(&mut h, "Select", 0, Some(vec!["a"]), true);
        assert!(h.primary().preferred_redo().is_none());
    }

    #[test]
    fn selection_baseline_shifts_forward_after_undo() {
        let mut h = manager();
        // An action that moves keyframes and selects them.
        commit(&mut h, "Create", 3, Some(vec!["new"]), true);
        h.undo();
        assert!(h.current_selection().is_empty());

        let id = ActionId::new("sel");
        h.start(&id);
        // Baseline selection comes from the undone entry.
        assert_eq!(h.live_selection(), &vec!["new"]);
        // Primary baseline is the cursor entry.
        assert_eq!(*h.live_primary(), 0);
        h.cancel(&id);
    }

    #[test]
    fn no_shift_forward_without_allow_index_shift() {
        let mut h = manager();
        commit(&mut h, "Create", 3, Some(vec!["new"]), false);
        h.undo();

        let id = ActionId::new("sel");
        h.start(&id);
        assert!(h.live_selection().is_empty());
        h.cancel(&id);
    }

    #[test]
    fn no_shift_forward_after_forward_move() {
        let mut h = manager();
        commit(&mut h, "Create", 3, Some(vec!["new"]), true);
        commit(&mut h, "Nudge", 1, None, true);
        h.undo();
        h.undo();
        h.redo();
        // Last move was forward: baseline is the cursor entry.
        let id = ActionId::new("sel");
        h.start(&id);
        assert_eq!(h.live_selection(), &vec!["new"]);
        assert_eq!(h.selection().index_direction(), IndexDirection::Forward);
        h.cancel(&id);
    }

    #[test]
    fn outcome_into_result() {
        assert_eq!(HistoryOutcome::Ok.into_result(), Ok(()));
        let err = HistoryOutcome::StaleId {
            expected: Some(ActionId::new("a")),
            got: ActionId::new("b"),
        }
        .into_result()
        .unwrap_err();
        assert!(err.to_string().contains("expected a"));
    }

    #[test]
    fn action_ids_are_unique() {
        assert_ne!(ActionId::next(), ActionId::next());
    }
}
