//! LLM-backed Generator and Reflector collaborators.
//!
//! These wrap a [`ChatModel`] with the Reflexion prompts: generation feeds the
//! accumulated lessons into the system prompt so the model learns from past
//! mistakes; reflection asks for exactly one transferable lesson from a
//! failure.

use crate::chat::{ChatMessage, ChatModel};
use async_trait::async_trait;
use reflexion_core::{Generator, Reflector, ReflexionError};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

const GENERATION_SYSTEM_PROMPT: &str = "\
You are an expert problem solver. Generate a solution to the task.

IMPORTANT: Learn from past experiences!

Past Lessons Learned:
{memory}

Apply these lessons to avoid repeating past mistakes.

Guidelines:
- Write clean, correct code
- Handle edge cases (empty input, None, etc.)
- Include proper error handling
- Follow best practices";

const REFLECTION_SYSTEM_PROMPT: &str = "\
You are an expert code reviewer analyzing why a solution failed.

Provide a specific, actionable lesson that can be applied to future tasks.

Focus on:
- What went wrong
- Why it failed
- How to avoid this in the future
- General principles that apply beyond this specific task";

/// Render the lesson list for the generation prompt.
fn format_memory(lessons: &[String]) -> String {
    if lessons.is_empty() {
        "No past lessons yet.".to_string()
    } else {
        lessons
            .iter()
            .map(|l| format!("- {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strip a markdown code fence if the model wrapped its answer in one.
fn extract_code(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:python)?\s*\n(.*?)```").expect("valid fence regex")
    });

    match fence.captures(text) {
        Some(caps) => caps[1].trim_end().to_string(),
        None => text.trim().to_string(),
    }
}

/// Generator collaborator backed by a chat model.
pub struct LlmGenerator {
    model: Arc<dyn ChatModel>,
}

impl LlmGenerator {
    /// Wrap a chat model as a Generator.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(
        &self,
        task: &str,
        prior_lessons: &[String],
    ) -> reflexion_core::Result<String> {
        let system = GENERATION_SYSTEM_PROMPT.replace("{memory}", &format_memory(prior_lessons));
        let user = format!(
            "Task: {}\n\nGenerate a Python function named `solve` to solve this task.",
            task
        );

        let response = self
            .model
            .complete(&[ChatMessage::system(system), ChatMessage::user(user)])
            .await
            .map_err(|e| ReflexionError::Generator(e.to_string()))?;

        let code = extract_code(&response);
        debug!(chars = code.len(), "generated candidate");
        Ok(code)
    }
}

/// Reflector collaborator backed by a chat model.
pub struct LlmReflector {
    model: Arc<dyn ChatModel>,
}

impl LlmReflector {
    /// Wrap a chat model as a Reflector.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Reflector for LlmReflector {
    async fn reflect(
        &self,
        task: &str,
        failed_solution: &str,
        error: &str,
    ) -> reflexion_core::Result<String> {
        let user = format!(
            "Task: {}\n\nYour Solution:\n{}\n\nValidation Error:\n{}\n\n\
             Analyze this failure and extract ONE specific lesson to remember.",
            task, failed_solution, error
        );

        let response = self
            .model
            .complete(&[
                ChatMessage::system(REFLECTION_SYSTEM_PROMPT),
                ChatMessage::user(user),
            ])
            .await
            .map_err(|e| ReflexionError::Reflector(e.to_string()))?;

        Ok(response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use std::sync::Mutex;

    struct EchoModel {
        reply: String,
        last_messages: Mutex<Vec<ChatMessage>>,
    }

    impl EchoModel {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                last_messages: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn complete(&self, messages: &[ChatMessage]) -> crate::Result<String> {
            *self.last_messages.lock().unwrap() = messages.to_vec();
            Ok(self.reply.clone())
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    struct DownModel;

    #[async_trait]
    impl ChatModel for DownModel {
        async fn complete(&self, _messages: &[ChatMessage]) -> crate::Result<String> {
            Err(LlmError::ProviderError("503".to_string()))
        }

        async fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_format_memory_empty() {
        assert_eq!(format_memory(&[]), "No past lessons yet.");
    }

    #[test]
    fn test_format_memory_bullets() {
        let lessons = vec!["check empty input".to_string(), "mind types".to_string()];
        assert_eq!(
            format_memory(&lessons),
            "- check empty input\n- mind types"
        );
    }

    #[test]
    fn test_extract_code_from_fence() {
        let text = "Here you go:\n```python\ndef solve(s):\n    return s[::-1]\n```\nEnjoy!";
        assert_eq!(extract_code(text), "def solve(s):\n    return s[::-1]");
    }

    #[test]
    fn test_extract_code_plain_fence() {
        let text = "```\ndef solve(s):\n    return s\n```";
        assert_eq!(extract_code(text), "def solve(s):\n    return s");
    }

    #[test]
    fn test_extract_code_without_fence() {
        let text = "  def solve(s):\n    return s\n";
        assert_eq!(extract_code(text), "def solve(s):\n    return s");
    }

    #[tokio::test]
    async fn test_generator_includes_lessons_in_prompt() {
        let model = Arc::new(EchoModel::new("def solve(s): return s"));
        let generator = LlmGenerator::new(model.clone());

        let lessons = vec!["always check empty input".to_string()];
        generator.generate("reverse a string", &lessons).await.unwrap();

        let messages = model.last_messages.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("- always check empty input"));
        assert!(messages[1].content.contains("reverse a string"));
        assert!(messages[1].content.contains("`solve`"));
    }

    #[tokio::test]
    async fn test_generator_strips_fence() {
        let model = Arc::new(EchoModel::new(
            "```python\ndef solve(s):\n    return s[::-1]\n```",
        ));
        let generator = LlmGenerator::new(model);

        let code = generator.generate("task", &[]).await.unwrap();
        assert_eq!(code, "def solve(s):\n    return s[::-1]");
    }

    #[tokio::test]
    async fn test_reflector_prompt_carries_failure_context() {
        let model = Arc::new(EchoModel::new("  Check for empty strings first.  "));
        let reflector = LlmReflector::new(model.clone());

        let lesson = reflector
            .reflect("reverse a string", "def solve(s): return s", "Passed 2/4 tests")
            .await
            .unwrap();
        assert_eq!(lesson, "Check for empty strings first.");

        let messages = model.last_messages.lock().unwrap();
        assert!(messages[1].content.contains("Passed 2/4 tests"));
        assert!(messages[1].content.contains("ONE specific lesson"));
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_collaborator_error() {
        let generator = LlmGenerator::new(Arc::new(DownModel));
        let err = generator.generate("task", &[]).await.unwrap_err();
        assert!(matches!(err, ReflexionError::Generator(_)));

        let reflector = LlmReflector::new(Arc::new(DownModel));
        let err = reflector.reflect("task", "code", "error").await.unwrap_err();
        assert!(matches!(err, ReflexionError::Reflector(_)));
    }
}
