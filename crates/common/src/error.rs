//! Error types for curve editing (thiserror-based).

use thiserror::Error;

/// Errors raised by curve math and timeline editing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("Timeline has no keyframes: {timeline_id}")]
    EmptyTimeline { timeline_id: String },

    #[error("Keyframe not found: {keyframe_id} (timeline {timeline_id})")]
    KeyframeNotFound {
        timeline_id: String,
        keyframe_id: String,
    },

    #[error("Timeline not found: {timeline_id}")]
    TimelineNotFound { timeline_id: String },

    #[error("Invalid curve at segment {segment}: {reason}")]
    InvalidCurve { segment: usize, reason: String },

    #[error("Curves are not contiguous between segment {segment} and {next}")]
    NonContiguousCurves { segment: usize, next: usize },
}

/// Convenience Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;
