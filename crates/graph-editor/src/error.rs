//! Editor error types (thiserror-based).

use ce_app_state::HistoryError;
use ce_common::CurveError;
use thiserror::Error;

/// Errors from direct (non-gesture) editor operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Curve error: {0}")]
    Curve(#[from] CurveError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

/// Convenience Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
