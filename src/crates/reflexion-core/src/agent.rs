//! The attempt-loop state machine.
//!
//! One run walks `Generate → Validate → (Succeed | Reflect)` until a candidate
//! passes or the attempt budget is exhausted. The loop owns the transition
//! policy; everything with side effects beyond the run (LLM calls, test
//! execution, lesson persistence) happens through the collaborator seams and
//! the shared memory handle.

use crate::collaborators::{Generator, Reflector};
use crate::error::Result;
use crate::state::{RunReport, RunState};
use reflexion_memory::EpisodicMemory;
use reflexion_validate::{TestCase, Validator};
use std::sync::Arc;
use tracing::{debug, info};

/// Attempt budget used when the caller does not specify one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Hard ceiling on the attempt budget.
pub const MAX_ATTEMPTS_CEILING: u32 = 10;

/// How many cross-task lessons seed a run's working list.
pub const DEFAULT_MEMORY_SEED_LIMIT: usize = 5;

/// Loop phases. `Succeed` and the give-up exit from `Reflect` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Generate,
    Validate,
    Succeed,
    Reflect,
}

/// Configuration builder for a [`ReflexionAgent`].
pub struct ReflexionConfig {
    generator: Arc<dyn Generator>,
    reflector: Arc<dyn Reflector>,
    validator: Validator,
    memory: EpisodicMemory,
    max_attempts: u32,
    memory_seed_limit: usize,
}

impl ReflexionConfig {
    /// Create a configuration with default budgets.
    pub fn new(
        generator: Arc<dyn Generator>,
        reflector: Arc<dyn Reflector>,
        validator: Validator,
        memory: EpisodicMemory,
    ) -> Self {
        Self {
            generator,
            reflector,
            validator,
            memory,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            memory_seed_limit: DEFAULT_MEMORY_SEED_LIMIT,
        }
    }

    /// Set the attempt budget, clamped to `1..=10`. The loop itself assumes
    /// the budget is already sane, so the clamp happens here.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.clamp(1, MAX_ATTEMPTS_CEILING);
        self
    }

    /// Set how many recent cross-task lessons seed each run.
    pub fn with_memory_seed_limit(mut self, limit: usize) -> Self {
        self.memory_seed_limit = limit;
        self
    }

    /// Build the agent.
    pub fn build(self) -> ReflexionAgent {
        ReflexionAgent {
            generator: self.generator,
            reflector: self.reflector,
            validator: self.validator,
            memory: self.memory,
            max_attempts: self.max_attempts,
            memory_seed_limit: self.memory_seed_limit,
        }
    }
}

/// Create a Reflexion agent configuration.
pub fn create_reflexion_agent(
    generator: Arc<dyn Generator>,
    reflector: Arc<dyn Reflector>,
    validator: Validator,
    memory: EpisodicMemory,
) -> ReflexionConfig {
    ReflexionConfig::new(generator, reflector, validator, memory)
}

/// Runs tasks through the Reflexion attempt loop.
pub struct ReflexionAgent {
    generator: Arc<dyn Generator>,
    reflector: Arc<dyn Reflector>,
    validator: Validator,
    memory: EpisodicMemory,
    max_attempts: u32,
    memory_seed_limit: usize,
}

impl ReflexionAgent {
    /// Run the attempt loop for `task` against an explicitly bound test
    /// suite.
    ///
    /// Attempts are strictly sequential. Returns the final report; only a
    /// Generator/Reflector failure errors, budget exhaustion is a normal
    /// `success = false` outcome.
    pub async fn run(&self, task: &str, tests: &[TestCase]) -> Result<RunReport> {
        let mut state = RunState::new(task, self.max_attempts);
        state.lessons = self
            .memory
            .get_relevant_lessons(task, self.memory_seed_limit);
        let seeded = state.lessons.len();

        info!(task, max_attempts = self.max_attempts, seeded, "starting run");

        let mut phase = Phase::Generate;
        loop {
            match phase {
                Phase::Generate => {
                    state.attempt += 1;
                    info!(
                        attempt = state.attempt,
                        lessons = state.lessons.len(),
                        "generating solution"
                    );
                    state.solution = self.generator.generate(task, &state.lessons).await?;
                    phase = Phase::Validate;
                }
                Phase::Validate => {
                    let report = self.validator.validate(&state.solution, tests).await;
                    info!(
                        passed = report.passed_tests,
                        total = report.total_tests,
                        success = report.success,
                        "validation finished"
                    );
                    state.success = report.success;
                    state.validation_result = Some(report);
                    phase = if state.success {
                        Phase::Succeed
                    } else {
                        Phase::Reflect
                    };
                }
                Phase::Succeed => {
                    self.memory.add_lesson(
                        task,
                        &state.solution,
                        "",
                        format!("Successful approach for: {}", task),
                        true,
                    );
                    break;
                }
                Phase::Reflect => {
                    let error = state
                        .validation_result
                        .as_ref()
                        .map(|r| r.error.clone())
                        .unwrap_or_default();

                    let lesson = self
                        .reflector
                        .reflect(task, &state.solution, &error)
                        .await?;
                    debug!(lesson, "reflection produced");

                    state.reflection = lesson.clone();
                    state.lessons.push(lesson.clone());
                    self.memory
                        .add_lesson(task, &state.solution, &error, &lesson, false);

                    if state.attempt >= state.max_attempts {
                        info!(attempts = state.attempt, "attempt budget exhausted, giving up");
                        break;
                    }
                    phase = Phase::Generate;
                }
            }
        }

        Ok(RunReport {
            task: state.task,
            success: state.success,
            attempts: state.attempt,
            max_attempts: state.max_attempts,
            solution: state.solution,
            lessons_learned: state.lessons.len() - seeded,
            validation: state.validation_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReflexionError;
    use async_trait::async_trait;
    use reflexion_validate::{CodeRunner, ValidateError};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Generator that records what it was asked and replays canned candidates.
    struct ScriptedGenerator {
        candidates: Vec<&'static str>,
        seen_lessons: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedGenerator {
        fn new(candidates: Vec<&'static str>) -> Self {
            Self {
                candidates,
                seen_lessons: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, _task: &str, prior_lessons: &[String]) -> Result<String> {
            let mut seen = self.seen_lessons.lock().unwrap();
            let index = seen.len().min(self.candidates.len() - 1);
            seen.push(prior_lessons.to_vec());
            Ok(self.candidates[index].to_string())
        }
    }

    struct CannedReflector;

    #[async_trait]
    impl Reflector for CannedReflector {
        async fn reflect(&self, _task: &str, _solution: &str, error: &str) -> Result<String> {
            Ok(format!("lesson from: {}", error))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _task: &str, _lessons: &[String]) -> Result<String> {
            Err(ReflexionError::Generator("provider unreachable".to_string()))
        }
    }

    /// Runner that treats the candidate text "pass" as a correct solution.
    struct MarkerRunner;

    #[async_trait]
    impl CodeRunner for MarkerRunner {
        async fn discover(&self, code: &str) -> reflexion_validate::Result<Vec<String>> {
            if code == "broken" {
                return Err(ValidateError::Execution("SyntaxError".to_string()));
            }
            Ok(vec!["solve".to_string()])
        }

        async fn invoke(
            &self,
            code: &str,
            _entry: &str,
            input: &Value,
        ) -> reflexion_validate::Result<Value> {
            if code == "pass" {
                Ok(json!(format!("ok:{}", input)))
            } else {
                Ok(json!("wrong"))
            }
        }
    }

    fn suite() -> Vec<TestCase> {
        vec![
            TestCase::new(json!("a"), json!("ok:\"a\"")),
            TestCase::new(json!("b"), json!("ok:\"b\"")),
        ]
    }

    fn agent_with(
        generator: Arc<dyn Generator>,
        memory: EpisodicMemory,
        max_attempts: u32,
    ) -> ReflexionAgent {
        create_reflexion_agent(
            generator,
            Arc::new(CannedReflector),
            Validator::new(Arc::new(MarkerRunner)),
            memory,
        )
        .with_max_attempts(max_attempts)
        .build()
    }

    #[tokio::test]
    async fn test_first_attempt_success_records_one_success_lesson() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        let agent = agent_with(
            Arc::new(ScriptedGenerator::new(vec!["pass"])),
            memory.clone(),
            5,
        );

        let report = agent.run("reverse a string", &suite()).await.unwrap();

        assert!(report.success);
        assert_eq!(report.attempts, 1);
        assert_eq!(report.lessons_learned, 0);
        assert_eq!(report.solution, "pass");

        assert_eq!(memory.len(), 1);
        let patterns = memory.get_success_patterns();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].lesson, "Successful approach for: reverse a string");
        assert_eq!(patterns[0].error, "");
    }

    #[tokio::test]
    async fn test_always_failing_run_uses_exactly_n_attempts() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        let agent = agent_with(
            Arc::new(ScriptedGenerator::new(vec!["fail"])),
            memory.clone(),
            3,
        );

        let report = agent.run("impossible task", &suite()).await.unwrap();

        assert!(!report.success);
        assert_eq!(report.attempts, 3);
        assert_eq!(report.lessons_learned, 3);
        assert_eq!(memory.get_failure_patterns().len(), 3);
        assert!(memory.get_success_patterns().is_empty());
    }

    #[tokio::test]
    async fn test_lessons_accumulate_across_attempts() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        memory.add_lesson("earlier task", "s", "e", "seeded lesson", false);

        let generator = Arc::new(ScriptedGenerator::new(vec!["fail", "fail", "pass"]));
        let agent = agent_with(generator.clone(), memory.clone(), 5);

        let report = agent.run("task", &suite()).await.unwrap();
        assert!(report.success);
        assert_eq!(report.attempts, 3);
        assert_eq!(report.lessons_learned, 2);

        let seen = generator.seen_lessons.lock().unwrap();
        // First generation sees only the cross-task seed.
        assert_eq!(seen[0], vec!["seeded lesson"]);
        // Each retry sees one more reflection than the last.
        assert_eq!(seen[1].len(), 2);
        assert_eq!(seen[2].len(), 3);
        assert_eq!(seen[2][0], "seeded lesson");
        assert!(seen[2][1].starts_with("lesson from:"));
    }

    #[tokio::test]
    async fn test_validation_execution_failure_feeds_reflect_not_fatal() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        let agent = agent_with(
            Arc::new(ScriptedGenerator::new(vec!["broken", "pass"])),
            memory.clone(),
            5,
        );

        let report = agent.run("task", &suite()).await.unwrap();
        assert!(report.success);
        assert_eq!(report.attempts, 2);

        let failures = memory.get_failure_patterns();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].error.contains("Code execution error"));
    }

    #[tokio::test]
    async fn test_generator_failure_is_fatal() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        let agent = agent_with(Arc::new(FailingGenerator), memory.clone(), 5);

        let err = agent.run("task", &suite()).await.unwrap_err();
        assert!(matches!(err, ReflexionError::Generator(_)));
        // Nothing was recorded for the aborted run.
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_max_attempts_is_clamped() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));

        let agent = agent_with(
            Arc::new(ScriptedGenerator::new(vec!["fail"])),
            memory.clone(),
            0,
        );
        let report = agent.run("task", &suite()).await.unwrap();
        assert_eq!(report.attempts, 1);

        let agent = agent_with(Arc::new(ScriptedGenerator::new(vec!["fail"])), memory, 99);
        let report = agent.run("task", &suite()).await.unwrap();
        assert_eq!(report.attempts, MAX_ATTEMPTS_CEILING);
    }

    #[tokio::test]
    async fn test_memory_seed_respects_limit() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        for i in 0..8 {
            memory.add_lesson("old", "s", "e", format!("old lesson {}", i), false);
        }

        let generator = Arc::new(ScriptedGenerator::new(vec!["pass"]));
        let agent = create_reflexion_agent(
            generator.clone(),
            Arc::new(CannedReflector),
            Validator::new(Arc::new(MarkerRunner)),
            memory,
        )
        .with_memory_seed_limit(3)
        .build();

        agent.run("task", &suite()).await.unwrap();

        let seen = generator.seen_lessons.lock().unwrap();
        assert_eq!(
            seen[0],
            vec!["old lesson 5", "old lesson 6", "old lesson 7"]
        );
    }

    #[tokio::test]
    async fn test_final_report_carries_validation_detail() {
        let dir = tempdir().unwrap();
        let memory = EpisodicMemory::load_or_default(dir.path().join("m.json"));
        let agent = agent_with(Arc::new(ScriptedGenerator::new(vec!["fail"])), memory, 1);

        let report = agent.run("task", &suite()).await.unwrap();
        let validation = report.validation.unwrap();
        assert!(!validation.success);
        assert_eq!(validation.total_tests, 2);
        assert_eq!(validation.error, "Passed 0/2 tests");
    }
}
