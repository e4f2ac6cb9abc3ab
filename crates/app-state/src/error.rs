//! History error types (thiserror-based).

use thiserror::Error;

use crate::history::ActionId;

/// Errors for history operations that were rejected.
///
/// `HistoryManager` reports rejections as a [`HistoryOutcome`](crate::HistoryOutcome);
/// this type is the `Result` form for callers that prefer `?`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Action already in progress: {active}")]
    AlreadyInProgress { active: ActionId },

    #[error("Stale action id {got}, expected {expected}")]
    StaleId { expected: ActionId, got: ActionId },

    #[error("No action in progress (got {got})")]
    NoActionInProgress { got: ActionId },
}

/// Convenience Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
