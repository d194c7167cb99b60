//! Error types for the episodic memory store.

use thiserror::Error;

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;

/// Errors that can occur while loading or persisting the store.
///
/// The public `EpisodicMemory` API recovers from these locally (warn and
/// continue); they are exposed for callers that drive persistence directly.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Reading or writing the durable file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The durable file could not be serialized or parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
