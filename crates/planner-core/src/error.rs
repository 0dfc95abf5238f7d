//! Error types for the planner core.

use thiserror::Error;

/// Errors surfaced by the calendar and aggregation layer.
///
/// Lookups never produce these: an empty day is a valid answer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("date out of range: {0}")]
    OutOfRangeDate(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl PlannerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRangeDate(message.into())
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;
