//! Secondary predicate validators.
//!
//! Lightweight alternatives to test-based validation, exposed as standalone
//! utilities. The attempt loop does not call these; they exist for callers
//! whose tasks produce prose or structured text rather than code.

use serde::{Deserialize, Serialize};

/// Result of a rule-presence check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicReport {
    /// Whether every rule was satisfied.
    pub success: bool,

    /// Joined violation summary; empty on success.
    pub error: String,

    /// Number of rules checked.
    pub rules_checked: usize,

    /// Rules the solution failed to satisfy.
    pub violations: Vec<String>,
}

/// Check that each rule phrase appears in the solution (case-insensitive).
pub fn validate_logic(solution: &str, rules: &[String]) -> LogicReport {
    let haystack = solution.to_lowercase();
    let violations: Vec<String> = rules
        .iter()
        .filter(|rule| !haystack.contains(&rule.to_lowercase()))
        .map(|rule| format!("Missing: {}", rule))
        .collect();

    LogicReport {
        success: violations.is_empty(),
        error: violations.join("; "),
        rules_checked: rules.len(),
        violations,
    }
}

/// Result of an output-shape check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatReport {
    /// Whether the output matched the expected shape.
    pub success: bool,

    /// Description of the mismatch; empty on success.
    pub error: String,

    /// The format that was requested.
    pub expected_format: String,
}

/// Check the surface shape of an output: `json`, `list`, `number`, or `text`.
///
/// Unknown format names are accepted as a pass, matching the permissive
/// contract of the original checks.
pub fn validate_format(output: &str, expected_format: &str) -> FormatReport {
    let trimmed = output.trim();
    let success = match expected_format.to_lowercase().as_str() {
        "json" => trimmed.starts_with('{') && trimmed.ends_with('}'),
        "list" => trimmed.starts_with('[') && trimmed.ends_with(']'),
        "number" => {
            let digits: String = trimmed.chars().filter(|c| *c != '.' && *c != '-').collect();
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        "text" => !trimmed.is_empty(),
        _ => true,
    };

    FormatReport {
        success,
        error: if success {
            String::new()
        } else {
            format!("Output does not match expected format: {}", expected_format)
        },
        expected_format: expected_format.to_string(),
    }
}
