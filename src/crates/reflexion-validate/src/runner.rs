//! Code execution boundary.
//!
//! The [`CodeRunner`] trait is the seam between validation policy and the
//! mechanics of running generated code. The shipped [`PythonRunner`] executes
//! each call in a fresh `python3` subprocess: per-test isolation comes for
//! free, and a runaway candidate is bounded by a per-call timeout instead of
//! hanging the host.

use crate::error::{Result, ValidateError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Executes candidate code on behalf of the [`Validator`](crate::Validator).
#[async_trait]
pub trait CodeRunner: Send + Sync {
    /// List the public callable names the candidate defines, in definition
    /// order. Fails with [`ValidateError::Execution`] (message carrying the
    /// exception and traceback) when the candidate cannot be loaded at all.
    async fn discover(&self, code: &str) -> Result<Vec<String>>;

    /// Invoke `entry` from the candidate with `input`. A sequence-typed input
    /// is unpacked into positional arguments; anything else is passed as a
    /// single argument. Fails when the invocation raises.
    async fn invoke(&self, code: &str, entry: &str, input: &Value) -> Result<Value>;
}

/// Harness run for discovery: loads the candidate and lists public callables.
///
/// The report goes to the real stdout; the candidate runs against a diverted
/// `sys.stdout` so its own prints cannot corrupt the report channel.
const DISCOVER_HARNESS: &str = r#"
import io, json, sys, traceback
payload = json.load(sys.stdin)
report, sys.stdout = sys.stdout, io.StringIO()
namespace = {}
try:
    exec(payload["code"], namespace)
except Exception:
    print(json.dumps({"ok": False, "error": traceback.format_exc()}), file=report)
    sys.exit(0)
names = [n for n, v in namespace.items() if callable(v) and not n.startswith("_")]
print(json.dumps({"ok": True, "names": names}), file=report)
"#;

/// Harness run per test: loads the candidate and calls one entry point.
/// Same stdout diversion as discovery.
const INVOKE_HARNESS: &str = r#"
import io, json, sys, traceback
payload = json.load(sys.stdin)
report, sys.stdout = sys.stdout, io.StringIO()
namespace = {}
try:
    exec(payload["code"], namespace)
    func = namespace[payload["entry"]]
    arg = payload["input"]
    result = func(*arg) if isinstance(arg, list) else func(arg)
    print(json.dumps({"ok": True, "result": result}, default=str), file=report)
except Exception:
    print(json.dumps({"ok": False, "error": traceback.format_exc()}), file=report)
"#;

#[derive(Deserialize)]
struct HarnessOutput {
    ok: bool,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: String,
}

/// Runs candidates with a local `python3`, one subprocess per call.
#[derive(Debug, Clone)]
pub struct PythonRunner {
    python: String,
    timeout: Duration,
}

impl Default for PythonRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonRunner {
    /// Create a runner using `python3` from `PATH` and a 10 second per-call
    /// timeout.
    pub fn new() -> Self {
        Self {
            python: "python3".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Use a specific Python interpreter.
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run_harness(&self, harness: &str, payload: Value) -> Result<HarnessOutput> {
        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(harness)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ValidateError::Runner("child stdin unavailable".to_string()))?;
        stdin.write_all(payload.to_string().as_bytes()).await?;
        drop(stdin);

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ValidateError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ValidateError::Runner(format!(
                "interpreter exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        debug!(bytes = output.stdout.len(), "harness completed");
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[async_trait]
impl CodeRunner for PythonRunner {
    async fn discover(&self, code: &str) -> Result<Vec<String>> {
        let out = self
            .run_harness(DISCOVER_HARNESS, json!({ "code": code }))
            .await?;
        if out.ok {
            Ok(out.names)
        } else {
            Err(ValidateError::Execution(out.error))
        }
    }

    async fn invoke(&self, code: &str, entry: &str, input: &Value) -> Result<Value> {
        let out = self
            .run_harness(
                INVOKE_HARNESS,
                json!({ "code": code, "entry": entry, "input": input }),
            )
            .await?;
        if out.ok {
            Ok(out.result)
        } else {
            Err(ValidateError::Execution(out.error))
        }
    }
}
