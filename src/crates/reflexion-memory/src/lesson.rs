//! Lesson records and aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored takeaway from a task attempt.
///
/// Lessons are immutable once created: the store only ever appends them.
/// `error` is empty for successful attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Task description the attempt was made against.
    pub task: String,

    /// The solution text the lesson was derived from.
    pub solution: String,

    /// Validation error text (empty on success).
    pub error: String,

    /// The natural-language lesson itself.
    pub lesson: String,

    /// Whether the source attempt passed validation.
    pub success: bool,

    /// Creation time, serialized as ISO-8601.
    pub timestamp: DateTime<Utc>,
}

impl Lesson {
    /// Create a lesson stamped with the current time.
    pub fn new(
        task: impl Into<String>,
        solution: impl Into<String>,
        error: impl Into<String>,
        lesson: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            task: task.into(),
            solution: solution.into(),
            error: error.into(),
            lesson: lesson.into(),
            success,
            timestamp: Utc::now(),
        }
    }
}

/// Aggregate view over the store, for the operator surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Total number of stored lessons.
    pub total_memories: usize,

    /// Lessons from successful attempts.
    pub successes: usize,

    /// Lessons from failed attempts.
    pub failures: usize,

    /// `successes / total_memories`, or `0.0` for an empty store.
    pub success_rate: f64,
}
