//! Error types for the attempt loop.

use thiserror::Error;

/// Result type for reflexion operations.
pub type Result<T> = std::result::Result<T, ReflexionError>;

/// Errors that abort a run.
///
/// Validation failures are not represented here — they are ordinary loop
/// outcomes carried in the `ValidationReport`. Only collaborator failures are
/// fatal to a run.
#[derive(Debug, Error)]
pub enum ReflexionError {
    /// The Generator collaborator failed.
    #[error("Generator failed: {0}")]
    Generator(String),

    /// The Reflector collaborator failed.
    #[error("Reflector failed: {0}")]
    Reflector(String),
}
