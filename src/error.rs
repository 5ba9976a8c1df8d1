//! Error types for planning.
//!
//! Infeasible items are not errors: they are recorded in the result with a
//! [`FailureReason`](crate::models::FailureReason). Errors here end a
//! planning task in the `Error` state.

use std::time::Duration;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that abort a planning run.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The request failed validation. Nothing was computed.
    #[error(
        "invalid planning request: {}",
        .0.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
    )]
    InvalidRequest(Vec<ValidationError>),

    /// The caller's deadline passed. Partial work is discarded.
    #[error("planning timed out after {elapsed:?}")]
    Timeout {
        /// Time spent before giving up.
        elapsed: Duration,
    },

    /// The caller cancelled the computation.
    #[error("planning was cancelled")]
    Cancelled,

    /// Unexpected failure inside the planner.
    #[error("internal planning fault: {0}")]
    Internal(String),
}

/// Result alias for planning operations.
pub type PlanResult<T> = Result<T, PlanningError>;

/// Errors raised while loading planner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
