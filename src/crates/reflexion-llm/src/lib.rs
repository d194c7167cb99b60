//! LLM provider implementations for the Reflexion agent.
//!
//! This crate supplies the `Generator` and `Reflector` collaborators the
//! attempt loop depends on, built on a small [`ChatModel`] abstraction with
//! two providers:
//!
//! - **Ollama** - local inference via an Ollama server
//! - **Gemini** - Google's Gemini API (the provider the original demo used)
//!
//! # Example
//!
//! ```rust,ignore
//! use reflexion_llm::{LlmGenerator, LlmReflector, LocalLlmConfig, OllamaClient};
//! use std::sync::Arc;
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "llama3");
//! let model = Arc::new(OllamaClient::new(config));
//!
//! let generator = Arc::new(LlmGenerator::new(model.clone()));
//! let reflector = Arc::new(LlmReflector::new(model));
//! ```
//!
//! Provider failures surface as `LlmError` and reach the loop as fatal
//! collaborator errors; the loop does not retry them.

pub mod chains;
pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;
pub mod ollama;

pub use chains::{LlmGenerator, LlmReflector};
pub use chat::{ChatMessage, ChatModel, Role};
pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
