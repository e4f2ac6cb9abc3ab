//! `ce-app-state` -- Editor state and transactional history for the curve graph editor.
//!
//! This crate provides:
//!
//! - **`HistoryManager`**: Dual-track (primary + selection) undo/redo with
//!   in-flight actions, the shift-forward rule and preferred redo.
//! - **`Transaction`**: Explicit begin/mutate/commit/abort wrapper with a
//!   host-supplied `TransactionListener`.
//! - **`TimelineSelectionState`**: Per-timeline keyframe selection.
//! - **`TimelineState`, `ViewState`, `EphemeralState`, `RenderState`**: The
//!   state handed between the editor and its host.
//!
//! # Architecture
//!
//! ```text
//! HistoryManager<TimelineState, TimelineSelectionState>
//! ├── primary: HistoryState     (timelines, one entry per commit)
//! └── selection: HistoryState   (selection, lockstep with primary)
//!
//! Transaction (one open at a time)
//! ├── action id                 (guards every history call)
//! ├── ephemeral: EphemeralState (discarded on commit and abort)
//! └── view: Option<ViewState>   (reported via on_submit_view)
//! ```

pub mod error;
pub mod history;
pub mod selection;
pub mod state;
pub mod transaction;

// Re-export primary types at crate root for convenience.
pub use error::{HistoryError, HistoryResult};
pub use history::{
    ActionId, HistoryEntry, HistoryKind, HistoryManager, HistoryOutcome, HistoryState,
    InFlightAction, IndexDirection, PreferredRedo,
};
pub use selection::TimelineSelectionState;
pub use state::{Cursor, EphemeralState, RenderState, TimelineState, ViewState, YBounds};
pub use transaction::{NoopListener, Transaction, TransactionListener};

/// The history manager used by the graph editor.
pub type EditorHistory = HistoryManager<TimelineState, TimelineSelectionState>;
