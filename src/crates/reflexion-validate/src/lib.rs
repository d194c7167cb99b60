//! # reflexion-validate - External Validation for Reflexion Agents
//!
//! **Objective scoring of candidate solutions** against literal test cases. The
//! Reflexion loop needs a signal it cannot argue with: this crate runs the
//! generated code against caller-supplied tests and reports exactly which ones
//! passed.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Candidate code (from the Generator)                     │
//! │  "def solve(s): return s[::-1]"                          │
//! └─────────────┬────────────────────────────────────────────┘
//!               │
//!               ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │  Validator                                               │
//! │  • discovers the entry point (fixed name: `solve`)       │
//! │  • invokes it once per TestCase via a CodeRunner         │
//! │  • compares results with exact equality                  │
//! └─────────────┬────────────────────────────────────────────┘
//!               │
//!               ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │  ValidationReport                                        │
//! │  { success, error, passed_tests, total_tests, details }  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Execution goes through the [`CodeRunner`] trait. The shipped
//! [`PythonRunner`] runs each call in a fresh `python3` subprocess with a
//! per-call timeout, so a hung or crashing candidate takes down one test, not
//! the host process. Note the boundary is process isolation only — the
//! subprocess still runs with the host's privileges. Integrators who feed it
//! untrusted code need a real sandbox on top.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reflexion_validate::{PythonRunner, TestCase, Validator};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let validator = Validator::new(Arc::new(PythonRunner::new()));
//!
//! let tests = vec![
//!     TestCase::new(json!("hello"), json!("olleh")),
//!     TestCase::new(json!(""), json!("")),
//! ];
//!
//! let report = validator.validate("def solve(s):\n    return s[::-1]\n", &tests).await;
//! assert!(report.success);
//! ```
//!
//! Secondary checks ([`validate_logic`], [`validate_format`]) are standalone
//! predicate utilities; the main loop does not depend on them.

pub mod checks;
pub mod error;
pub mod report;
pub mod runner;
pub mod validator;

pub use checks::{validate_format, validate_logic, FormatReport, LogicReport};
pub use error::{Result, ValidateError};
pub use report::{TestCase, TestDetail, ValidationReport};
pub use runner::{CodeRunner, PythonRunner};
pub use validator::{Validator, ENTRY_POINT};
