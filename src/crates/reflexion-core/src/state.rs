//! Per-run state and the final report handed back to the caller.

use reflexion_validate::ValidationReport;
use serde::{Deserialize, Serialize};

/// Mutable context threaded through one run of the attempt loop.
///
/// Owned exclusively by that run; never shared across concurrent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Task description.
    pub task: String,

    /// Latest candidate solution.
    pub solution: String,

    /// Latest validation outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_result: Option<ValidationReport>,

    /// Latest reflection text (failed attempts only).
    pub reflection: String,

    /// Working lesson list: seeded from the global store, grown on each
    /// failure within this run.
    pub lessons: Vec<String>,

    /// 1-based attempt counter (0 before the first Generate).
    pub attempt: u32,

    /// Attempt budget for this run.
    pub max_attempts: u32,

    /// Whether the latest candidate passed validation.
    pub success: bool,
}

impl RunState {
    /// Fresh state for a run against `task`.
    pub fn new(task: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            task: task.into(),
            solution: String::new(),
            validation_result: None,
            reflection: String::new(),
            lessons: Vec::new(),
            attempt: 0,
            max_attempts,
            success: false,
        }
    }
}

/// Final outcome of a run, for the caller and the operator surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Task the run was executed for.
    pub task: String,

    /// Whether a candidate passed validation before the budget ran out.
    pub success: bool,

    /// Attempts actually used.
    pub attempts: u32,

    /// The attempt budget the run started with.
    pub max_attempts: u32,

    /// Final candidate solution (the passing one on success, the last failed
    /// one on give-up).
    pub solution: String,

    /// Lessons this run added beyond its cross-task seeds.
    pub lessons_learned: usize,

    /// Validation detail for the final attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}
