//! Explicit transactions over a [`HistoryManager`].
//!
//! A `Transaction` bundles one history action with the ephemeral visuals and
//! the staged view changes that belong to it. The host supplies a
//! [`TransactionListener`] when committing or aborting to learn what happened.
//!
//! ```
//! use ce_app_state::{ActionId, HistoryManager, Transaction, TransactionListener};
//!
//! #[derive(Default)]
//! struct Log(Vec<String>);
//!
//! impl TransactionListener<i32, ()> for Log {
//!     fn on_submit(&mut self, name: &str, primary: &i32, _selection: &()) {
//!         self.0.push(format!("{name}: {primary}"));
//!     }
//! }
//!
//! let mut history = HistoryManager::new(1, ());
//! let mut log = Log::default();
//!
//! let mut tx = Transaction::begin(&mut history, ActionId::next()).unwrap();
//! tx.mutate_primary(&mut history, |p| *p *= 10);
//! tx.commit(&mut history, "Scale", false, &mut log);
//!
//! assert_eq!(log.0, vec!["Scale: 10".to_string()]);
//! ```

use tracing::debug;

use crate::error::HistoryResult;
use crate::history::{ActionId, HistoryManager, HistoryOutcome};
use crate::state::{EphemeralState, ViewState};

/// Host callbacks for transaction results.
pub trait TransactionListener<P, S> {
    /// Called after a commit that added a history entry, with the new state.
    fn on_submit(&mut self, _name: &str, _primary: &P, _selection: &S) {}

    /// Called after the transaction was aborted.
    fn on_cancel(&mut self) {}

    /// Called on commit when the transaction staged a view change.
    fn on_submit_view(&mut self, _view: &ViewState) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default)]
pub struct NoopListener;

impl<P, S> TransactionListener<P, S> for NoopListener {}

/// An open history action plus the visuals that belong to it.
#[derive(Debug)]
pub struct Transaction {
    id: ActionId,
    modified_primary: bool,
    modified_selection: bool,
    ephemeral: EphemeralState,
    view: Option<ViewState>,
}

impl Transaction {
    /// Open a transaction. Fails if the history already has an open action.
    pub fn begin<P: Clone, S: Clone>(
        history: &mut HistoryManager<P, S>,
        id: ActionId,
    ) -> HistoryResult<Self> {
        history.start(&id).into_result()?;
        Ok(Self {
            id,
            modified_primary: false,
            modified_selection: false,
            ephemeral: EphemeralState::default(),
            view: None,
        })
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Mutate the primary working copy and mark the primary track modified.
    pub fn mutate_primary<P: Clone, S: Clone>(
        &mut self,
        history: &mut HistoryManager<P, S>,
        f: impl FnOnce(&mut P),
    ) -> HistoryOutcome {
        let outcome = history.dispatch_primary(&self.id, f);
        self.modified_primary |= outcome.is_ok();
        outcome
    }

    /// Mutate the selection working copy and mark the selection track modified.
    pub fn mutate_selection<P: Clone, S: Clone>(
        &mut self,
        history: &mut HistoryManager<P, S>,
        f: impl FnOnce(&mut S),
    ) -> HistoryOutcome {
        let outcome = history.dispatch_selection(&self.id, f);
        self.modified_selection |= outcome.is_ok();
        outcome
    }

    pub fn ephemeral(&self) -> &EphemeralState {
        &self.ephemeral
    }

    pub fn ephemeral_mut(&mut self) -> &mut EphemeralState {
        &mut self.ephemeral
    }

    /// Stage a view change, reported through `on_submit_view` on commit.
    pub fn set_view(&mut self, view: ViewState) {
        self.view = Some(view);
    }

    /// The staged view, if any.
    pub fn view(&self) -> Option<&ViewState> {
        self.view.as_ref()
    }

    pub fn modified_primary(&self) -> bool {
        self.modified_primary
    }

    pub fn modified_selection(&self) -> bool {
        self.modified_selection
    }

    /// Commit the transaction. A transaction that modified neither track
    /// adds no history entry.
    pub fn commit<P: Clone, S: Clone>(
        self,
        history: &mut HistoryManager<P, S>,
        name: &str,
        allow_index_shift: bool,
        listener: &mut dyn TransactionListener<P, S>,
    ) -> HistoryOutcome {
        let outcome = history.submit(
            &self.id,
            name,
            self.modified_primary,
            self.modified_selection,
            allow_index_shift,
        );
        if !outcome.is_ok() {
            return outcome;
        }

        if let Some(view) = &self.view {
            listener.on_submit_view(view);
        }
        if self.modified_primary || self.modified_selection {
            listener.on_submit(name, history.current_primary(), history.current_selection());
        }
        debug!(id = %self.id, name, view = self.view.is_some(), "Transaction committed");
        outcome
    }

    /// Abort the transaction, discarding all of its changes.
    pub fn abort<P: Clone, S: Clone>(
        self,
        history: &mut HistoryManager<P, S>,
        listener: &mut dyn TransactionListener<P, S>,
    ) -> HistoryOutcome {
        let outcome = history.cancel(&self.id);
        if outcome.is_ok() {
            listener.on_cancel();
            debug!(id = %self.id, "Transaction aborted");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_common::Rect;

    #[derive(Default)]
    struct Recorder {
        submits: Vec<(String, i32, Vec<u8>)>,
        cancels: usize,
        views: Vec<ViewState>,
    }

    impl TransactionListener<i32, Vec<u8>> for Recorder {
        fn on_submit(&mut self, name: &str, primary: &i32, selection: &Vec<u8>) {
            self.submits.push((name.to_string(), *primary, selection.clone()));
        }

        fn on_cancel(&mut self) {
            self.cancels += 1;
        }

        fn on_submit_view(&mut self, view: &ViewState) {
            self.views.push(view.clone());
        }
    }

    fn history() -> HistoryManager<i32, Vec<u8>> {
        HistoryManager::new(0, Vec::new())
    }

    #[test]
    fn commit_records_modified_tracks() {
        let mut h = history();
        let mut rec = Recorder::default();
        let mut tx = Transaction::begin(&mut h, ActionId::new("t")).unwrap();
        tx.mutate_selection(&mut h, |s| s.push(1));
        assert!(!tx.modified_primary());
        assert!(tx.modified_selection());

        assert!(tx.commit(&mut h, "Select", true, &mut rec).is_ok());
        assert_eq!(rec.submits, vec![("Select".to_string(), 0, vec![1])]);
        assert_eq!(h.primary().list().len(), 2);
        assert!(!h.selection().list()[1].modified_related);
        assert!(h.primary().list()[1].modified_related);
    }

    #[test]
    fn view_only_commit_uses_no_undo_slot() {
        let mut h = history();
        let mut rec = Recorder::default();
        let mut tx = Transaction::begin(&mut h, ActionId::new("pan")).unwrap();
        tx.set_view(ViewState::new(50.0, Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(tx.view().is_some());

        tx.commit(&mut h, "Pan", false, &mut rec);
        assert_eq!(rec.views.len(), 1);
        assert!(rec.submits.is_empty());
        assert!(!h.can_undo());
        assert!(!h.is_in_flight());
    }

    #[test]
    fn abort_discards_everything() {
        let mut h = history();
        let mut rec = Recorder::default();
        let mut tx = Transaction::begin(&mut h, ActionId::new("t")).unwrap();
        tx.mutate_primary(&mut h, |p| *p = 5);
        tx.ephemeral_mut().pan = Some(ce_common::Vec2::new(3.0, 4.0));

        tx.abort(&mut h, &mut rec);
        assert_eq!(rec.cancels, 1);
        assert_eq!(*h.live_primary(), 0);
        assert_eq!(h.primary().list().len(), 1);
    }

    #[test]
    fn second_begin_fails_while_open() {
        let mut h = history();
        let tx = Transaction::begin(&mut h, ActionId::new("a")).unwrap();
        let err = Transaction::begin(&mut h, ActionId::new("b")).unwrap_err();
        assert!(err.to_string().contains("already in progress"));
        tx.abort(&mut h, &mut NoopListener);
    }
}
