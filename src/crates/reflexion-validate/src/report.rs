//! Test cases and validation reports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One literal test: an input and the exact expected result.
///
/// A sequence-typed input is unpacked into multiple positional arguments when
/// the entry point is invoked; any other value is passed as a single argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Input value (or argument list) for the entry point.
    pub input: Value,

    /// Expected result, compared with exact equality.
    pub expected: Value,
}

impl TestCase {
    /// Create a test case.
    pub fn new(input: Value, expected: Value) -> Self {
        Self { input, expected }
    }
}

/// Outcome of one test within a validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDetail {
    /// 1-based test index.
    pub test: usize,

    /// Whether the test passed.
    pub passed: bool,

    /// The input that was supplied.
    pub input: Value,

    /// The expected result.
    pub expected: Value,

    /// What the entry point actually returned, if it returned at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub got: Option<Value>,

    /// Mismatch description or runtime error for this test.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full result of validating a candidate against a test suite.
///
/// Invariants: `success` iff `passed_tests == total_tests`, and
/// `passed_tests <= total_tests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether every test passed.
    pub success: bool,

    /// Summary error text; empty on success.
    pub error: String,

    /// Number of tests that passed.
    pub passed_tests: usize,

    /// Number of tests in the suite.
    pub total_tests: usize,

    /// Per-test outcomes, in suite order. Empty when the candidate could not
    /// be executed at all.
    pub details: Vec<TestDetail>,
}

impl ValidationReport {
    /// A fail-closed report: nothing ran, nothing passed.
    pub fn failed_closed(error: impl Into<String>, total_tests: usize) -> Self {
        Self {
            success: false,
            error: error.into(),
            passed_tests: 0,
            total_tests,
            details: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_closed_shape() {
        let report = ValidationReport::failed_closed("No function found in code", 4);
        assert!(!report.success);
        assert_eq!(report.passed_tests, 0);
        assert_eq!(report.total_tests, 4);
        assert!(report.details.is_empty());
        assert_eq!(report.error, "No function found in code");
    }

    #[test]
    fn test_report_serialization() {
        let report = ValidationReport {
            success: false,
            error: "Passed 1/2 tests".to_string(),
            passed_tests: 1,
            total_tests: 2,
            details: vec![TestDetail {
                test: 1,
                passed: true,
                input: json!("a"),
                expected: json!("a"),
                got: Some(json!("a")),
                error: None,
            }],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["passed_tests"], 1);
        assert_eq!(value["details"][0]["test"], 1);
        // Absent fields stay out of the serialized form.
        assert!(value["details"][0].get("error").is_none());
    }
}
