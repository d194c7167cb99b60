//! # reflexion-memory - Episodic Memory for Reflexion Agents
//!
//! **Durable, cross-task lesson storage** for the Reflexion agent pattern. Every
//! attempt the agent makes (failed or successful) leaves behind a [`Lesson`]; the
//! [`EpisodicMemory`] store persists those lessons to disk and serves them back to
//! future runs so new generations are biased by past experience.
//!
//! # Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  Reflexion run (task N)                                    │
//! │  • seeds its lesson list from get_relevant_lessons()       │
//! │  • every Reflect/Success state calls add_lesson()          │
//! └─────────────┬──────────────────────────────────────────────┘
//!               │
//!               ↓
//! ┌────────────────────────────────────────────────────────────┐
//! │  EpisodicMemory (shared handle, append-only)               │
//! │  • in-memory Vec<Lesson>, insertion ordered                │
//! │  • whole-store snapshot persisted on every append          │
//! │  • temp-file + rename so a crash never truncates the file  │
//! └─────────────┬──────────────────────────────────────────────┘
//!               │
//!               ↓
//! ┌────────────────────────────────────────────────────────────┐
//! │  reflexion_memory.json                                     │
//! │  { "memories": [ {task, solution, error, lesson, ...} ] }  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Retrieval is **recency-based, not semantic**: `get_relevant_lessons` returns
//! the most recently appended lessons regardless of task content. That is a
//! deliberate simplification — swap in an embedding store if cross-domain
//! relevance matters.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reflexion_memory::EpisodicMemory;
//!
//! let memory = EpisodicMemory::load_or_default("reflexion_memory.json");
//!
//! memory.add_lesson(
//!     "Reverse a string",
//!     "def solve(s): return s[::-1]",
//!     "Failed on empty string",
//!     "Always check for empty input before processing",
//!     false,
//! );
//!
//! let lessons = memory.get_relevant_lessons("Check palindrome", 5);
//! let stats = memory.get_stats();
//! println!("{} memories, {:.0}% success", stats.total_memories, stats.success_rate * 100.0);
//! ```
//!
//! # Failure Semantics
//!
//! The store never fails its caller over I/O:
//! - a missing or corrupt file on load degrades to an empty store with a warning
//! - a failed persist is warned and ignored; the in-memory append stands and the
//!   store stays usable for the rest of the process

pub mod error;
pub mod lesson;
pub mod store;

pub use error::{MemoryError, Result};
pub use lesson::{Lesson, MemoryStats};
pub use store::{EpisodicMemory, DEFAULT_MEMORY_FILE};
