//! # reflexion-core - The Reflexion Attempt Loop
//!
//! **Generate → Validate → Reflect, with memory.** The Reflexion pattern wraps
//! an LLM generator in a retry loop driven by *external* validation: every
//! failed attempt is analyzed into a lesson, the lesson biases the next
//! generation, and lessons persist across tasks through an episodic memory
//! store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Task: "Write a function to reverse a string"               │
//! │  (seeded with recent lessons from EpisodicMemory)           │
//! └─────────────┬───────────────────────────────────────────────┘
//!               │
//!               ↓ START
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Generate (attempt N)                                       │
//! │  • Generator collaborator produces candidate code           │
//! │  • prompt includes every lesson gathered so far             │
//! └─────────────┬───────────────────────────────────────────────┘
//!               │
//!               ↓ always
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Validate                                                   │
//! │  • Validator runs the caller-supplied test suite            │
//! │  • objective pass/fail, per-test detail                     │
//! └──────┬──────────────────────────────┬───────────────────────┘
//!        │ all tests pass               │ any test fails
//!        ↓                              ↓
//! ┌──────────────────┐   ┌─────────────────────────────────────┐
//! │  Succeed         │   │  Reflect                            │
//! │  • store success │   │  • Reflector extracts ONE lesson    │
//! │    lesson        │   │  • lesson appended to run + store   │
//! │  • END (success) │   │  • attempts left? → Generate        │
//! └──────────────────┘   │  • budget exhausted? → END (failed) │
//!                        └─────────────────────────────────────┘
//! ```
//!
//! Attempts are strictly sequential: each generation is a function of all
//! prior lessons in the run, so nothing overlaps.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reflexion_core::create_reflexion_agent;
//! use reflexion_memory::EpisodicMemory;
//! use reflexion_validate::{PythonRunner, TestCase, Validator};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let memory = EpisodicMemory::load_or_default("reflexion_memory.json");
//! let validator = Validator::new(Arc::new(PythonRunner::new()));
//!
//! let agent = create_reflexion_agent(generator, reflector, validator, memory)
//!     .with_max_attempts(5)
//!     .build();
//!
//! let tests = vec![
//!     TestCase::new(json!("hello"), json!("olleh")),
//!     TestCase::new(json!(""), json!("")),
//! ];
//!
//! let report = agent.run("Write a function to reverse a string", &tests).await?;
//! println!("success={} after {} attempts", report.success, report.attempts);
//! ```
//!
//! # Failure Semantics
//!
//! - A validation failure is the normal path: it feeds Reflect and retries.
//! - A Generator or Reflector error is fatal to the run and propagates to the
//!   caller; the loop has no transient-retry policy of its own.
//! - Budget exhaustion is not an error: the run returns `success = false`
//!   with the final attempt count.
//!
//! # Module Organization
//!
//! - **[`agent`]** - `ReflexionConfig` builder and the attempt-loop state machine
//! - **[`collaborators`]** - `Generator` and `Reflector` trait seams
//! - **[`state`]** - per-run state and the final run report
//! - **[`error`]** - error types

pub mod agent;
pub mod collaborators;
pub mod error;
pub mod state;

pub use agent::{
    create_reflexion_agent, ReflexionAgent, ReflexionConfig, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MEMORY_SEED_LIMIT, MAX_ATTEMPTS_CEILING,
};
pub use collaborators::{Generator, Reflector};
pub use error::{ReflexionError, Result};
pub use state::{RunReport, RunState};
