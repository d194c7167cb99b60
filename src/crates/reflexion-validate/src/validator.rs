//! The main validation contract: candidate code vs a literal test suite.

use crate::error::ValidateError;
use crate::report::{TestCase, TestDetail, ValidationReport};
use crate::runner::CodeRunner;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The fixed entry-point name generators are expected to emit.
pub const ENTRY_POINT: &str = "solve";

/// Scores a candidate solution against a test suite.
///
/// Validation never errors: a candidate that fails to parse, defines no entry
/// point, or blows up at runtime produces a failure report, which is exactly
/// the signal the Reflect state needs.
#[derive(Clone)]
pub struct Validator {
    runner: Arc<dyn CodeRunner>,
}

impl Validator {
    /// Create a validator over the given execution engine.
    pub fn new(runner: Arc<dyn CodeRunner>) -> Self {
        Self { runner }
    }

    /// Run every test against the candidate and report the outcome.
    ///
    /// Entry-point policy: a function named `solve` always wins; a candidate
    /// defining exactly one public function is accepted under that name;
    /// multiple functions without a `solve` is a reported ambiguity, and no
    /// functions at all fails closed. Each test is invoked in isolation, so a
    /// runtime failure in one test never aborts the rest.
    pub async fn validate(&self, code: &str, tests: &[TestCase]) -> ValidationReport {
        let names = match self.runner.discover(code).await {
            Ok(names) => names,
            Err(e) => return ValidationReport::failed_closed(e.to_string(), tests.len()),
        };

        let entry = match resolve_entry(&names) {
            Ok(entry) => entry,
            Err(message) => return ValidationReport::failed_closed(message, tests.len()),
        };
        debug!(entry, candidates = names.len(), "resolved entry point");

        let mut passed = 0;
        let mut details = Vec::with_capacity(tests.len());

        for (i, test) in tests.iter().enumerate() {
            let detail = match self.runner.invoke(code, entry, &test.input).await {
                Ok(result) if result == test.expected => {
                    passed += 1;
                    TestDetail {
                        test: i + 1,
                        passed: true,
                        input: test.input.clone(),
                        expected: test.expected.clone(),
                        got: Some(result),
                        error: None,
                    }
                }
                Ok(result) => TestDetail {
                    test: i + 1,
                    passed: false,
                    input: test.input.clone(),
                    expected: test.expected.clone(),
                    error: Some(format!("Expected {}, got {}", test.expected, result)),
                    got: Some(result),
                },
                Err(e) => TestDetail {
                    test: i + 1,
                    passed: false,
                    input: test.input.clone(),
                    expected: test.expected.clone(),
                    got: None,
                    error: Some(e.to_string()),
                },
            };
            details.push(detail);
        }

        let success = passed == tests.len();
        ValidationReport {
            success,
            error: if success {
                String::new()
            } else {
                format!("Passed {}/{} tests", passed, tests.len())
            },
            passed_tests: passed,
            total_tests: tests.len(),
            details,
        }
    }
}

fn resolve_entry(names: &[String]) -> std::result::Result<&str, String> {
    if names.is_empty() {
        return Err("No function found in code".to_string());
    }
    if let Some(entry) = names.iter().find(|n| *n == ENTRY_POINT) {
        return Ok(entry);
    }
    if names.len() == 1 {
        return Ok(&names[0]);
    }
    Err(format!(
        "Ambiguous entry point: multiple functions defined ({}); define a single function named `{}`",
        names.join(", "),
        ENTRY_POINT
    ))
}
