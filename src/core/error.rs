//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Store errors are never retried internally; they surface to the caller
/// unmodified. Indefinite blocking while capacity is exhausted is a
/// documented outcome, not an error.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The coordination store cannot be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    /// A bucket constraint failed validation.
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
