//! Error types for validation and code execution.

use thiserror::Error;

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;

/// Errors raised by a [`CodeRunner`](crate::CodeRunner).
///
/// The [`Validator`](crate::Validator) folds all of these into the
/// `ValidationReport` rather than surfacing them to the loop: a candidate that
/// cannot execute is an ordinary validation failure, not a fatal error.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The candidate failed to parse or execute; the message carries the
    /// raised exception and a traceback.
    #[error("Code execution error: {0}")]
    Execution(String),

    /// A single invocation exceeded the runner's time budget.
    #[error("Execution timed out after {0}s")]
    Timeout(u64),

    /// The runner process could not be spawned or driven.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The runner produced output that could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other runner-level failure.
    #[error("Runner error: {0}")]
    Runner(String),
}
