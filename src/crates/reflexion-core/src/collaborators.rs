//! Collaborator seams: the external LLM calls the loop depends on.
//!
//! The loop treats generation and reflection as black boxes with narrow
//! contracts. Implementations live elsewhere (see the `reflexion-llm` crate);
//! tests script them directly.

use crate::error::Result;
use async_trait::async_trait;

/// Produces a candidate solution for a task.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a candidate given the task and every lesson gathered so far
    /// (cross-task seeds first, then this run's own reflections in order).
    ///
    /// Expected to emit code whose entry point is a function named `solve`.
    /// An error here is fatal to the run.
    async fn generate(&self, task: &str, prior_lessons: &[String]) -> Result<String>;
}

/// Distills one lesson from a failed attempt.
#[async_trait]
pub trait Reflector: Send + Sync {
    /// Analyze why `failed_solution` failed with `error` and return a single
    /// actionable lesson. An error here is fatal to the run.
    async fn reflect(&self, task: &str, failed_solution: &str, error: &str) -> Result<String>;
}
