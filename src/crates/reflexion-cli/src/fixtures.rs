//! Built-in test suites and suite loading.
//!
//! A run must be told which tests define success; nothing is inferred from the
//! task text. The built-in suites cover the classic demo tasks, and arbitrary
//! suites load from a JSON file of `{"input": ..., "expected": ...}` objects.

use anyhow::{bail, Context, Result};
use reflexion_validate::TestCase;
use serde_json::json;
use std::path::Path;

/// Names of the built-in suites, for help text and error messages.
pub const BUILTIN_SUITES: &[&str] = &["reverse", "palindrome", "count-vowels"];

/// Look up a built-in suite by name.
pub fn builtin_suite(name: &str) -> Option<Vec<TestCase>> {
    match name {
        "reverse" => Some(vec![
            TestCase::new(json!("hello"), json!("olleh")),
            TestCase::new(json!(""), json!("")),
            TestCase::new(json!("a"), json!("a")),
            TestCase::new(json!("racecar"), json!("racecar")),
        ]),
        "palindrome" => Some(vec![
            TestCase::new(json!("racecar"), json!(true)),
            TestCase::new(json!("hello"), json!(false)),
            TestCase::new(json!(""), json!(true)),
            TestCase::new(json!("a"), json!(true)),
        ]),
        "count-vowels" => Some(vec![
            TestCase::new(json!("hello"), json!(2)),
            TestCase::new(json!(""), json!(0)),
            TestCase::new(json!("aeiou"), json!(5)),
            TestCase::new(json!("xyz"), json!(0)),
        ]),
        _ => None,
    }
}

/// Load a suite from a JSON file containing an array of test cases.
pub fn load_suite(path: &Path) -> Result<Vec<TestCase>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read test file {}", path.display()))?;
    let tests: Vec<TestCase> = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse test file {}", path.display()))?;

    if tests.is_empty() {
        bail!("test file {} contains no test cases", path.display());
    }
    Ok(tests)
}
