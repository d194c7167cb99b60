//! # reflexion
//!
//! CLI for running the Reflexion agent: solve a task against an explicit test
//! suite, and inspect or reset the episodic memory that carries lessons
//! between runs.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reflexion_core::{create_reflexion_agent, RunReport};
use reflexion_llm::{
    ChatModel, GeminiClient, LlmGenerator, LlmReflector, LocalLlmConfig, OllamaClient,
    RemoteLlmConfig,
};
use reflexion_memory::{EpisodicMemory, DEFAULT_MEMORY_FILE};
use reflexion_validate::{PythonRunner, TestCase, Validator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod fixtures;

#[derive(Parser)]
#[command(name = "reflexion")]
#[command(about = "Reflexion agent - solve tasks by generating, validating, and reflecting", long_about = None)]
#[command(version)]
struct Cli {
    /// Durable memory file shared across runs
    #[arg(long, global = true, default_value = DEFAULT_MEMORY_FILE)]
    memory: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent on a task against a test suite
    Run {
        /// Task description, e.g. "Write a function to reverse a string"
        task: String,

        /// Built-in suite to validate against (reverse, palindrome, count-vowels)
        #[arg(long, conflicts_with = "tests")]
        suite: Option<String>,

        /// JSON file with an array of {"input": ..., "expected": ...} tests
        #[arg(long)]
        tests: Option<PathBuf>,

        /// Attempt budget (clamped to 1-10)
        #[arg(long, default_value_t = 5)]
        max_attempts: u32,

        /// LLM provider
        #[arg(long, value_enum, default_value_t = Provider::Ollama)]
        provider: Provider,

        /// Model name
        #[arg(long)]
        model: Option<String>,

        /// Provider base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show memory statistics
    Stats,

    /// List every stored lesson
    Lessons,

    /// Erase the memory store
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Ollama,
    Gemini,
}

fn build_model(
    provider: Provider,
    model: Option<String>,
    base_url: Option<String>,
) -> Result<Arc<dyn ChatModel>> {
    match provider {
        Provider::Ollama => {
            let config = LocalLlmConfig::new(
                base_url.unwrap_or_else(|| "http://localhost:11434".to_string()),
                model.unwrap_or_else(|| "llama3".to_string()),
            );
            Ok(Arc::new(OllamaClient::new(config)))
        }
        Provider::Gemini => {
            let config = RemoteLlmConfig::from_env(
                "GOOGLE_API_KEY",
                base_url.unwrap_or_else(|| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
                model.unwrap_or_else(|| "gemini-2.5-flash-lite".to_string()),
            )?;
            Ok(Arc::new(GeminiClient::new(config)))
        }
    }
}

fn resolve_suite(suite: Option<String>, tests: Option<PathBuf>) -> Result<Vec<TestCase>> {
    match (suite, tests) {
        (Some(name), None) => fixtures::builtin_suite(&name).ok_or_else(|| {
            anyhow!(
                "unknown suite '{}' (built-in suites: {})",
                name,
                fixtures::BUILTIN_SUITES.join(", ")
            )
        }),
        (None, Some(path)) => fixtures::load_suite(&path),
        (None, None) => Err(anyhow!(
            "a test suite is required: pass --suite NAME or --tests FILE"
        )),
        (Some(_), Some(_)) => unreachable!("clap rejects --suite with --tests"),
    }
}

fn print_report(report: &RunReport, memory: &EpisodicMemory) {
    println!("{}", "=".repeat(70));
    if report.success {
        println!("TASK COMPLETED SUCCESSFULLY");
    } else {
        println!("TASK FAILED (max attempts reached)");
    }
    println!("{}", "=".repeat(70));

    if report.success {
        println!("\nFinal solution:\n{}\n", report.solution);
    } else if let Some(validation) = &report.validation {
        println!("\nLast validation: {}", validation.error);
    }

    println!("Attempts: {}/{}", report.attempts, report.max_attempts);
    println!("Lessons learned this task: {}", report.lessons_learned);

    let stats = memory.get_stats();
    println!(
        "\nGlobal memory: {} memories, {:.1}% success rate",
        stats.total_memories,
        stats.success_rate * 100.0
    );
}

async fn run(cli: Cli) -> Result<()> {
    let memory = EpisodicMemory::load_or_default(&cli.memory);

    match cli.command {
        Commands::Run {
            task,
            suite,
            tests,
            max_attempts,
            provider,
            model,
            base_url,
        } => {
            let suite = resolve_suite(suite, tests)?;
            let chat_model = build_model(provider, model, base_url)?;

            let agent = create_reflexion_agent(
                Arc::new(LlmGenerator::new(chat_model.clone())),
                Arc::new(LlmReflector::new(chat_model)),
                Validator::new(Arc::new(PythonRunner::new())),
                memory.clone(),
            )
            .with_max_attempts(max_attempts)
            .build();

            let report = agent.run(&task, &suite).await?;
            print_report(&report, &memory);
        }
        Commands::Stats => {
            let stats = memory.get_stats();
            println!("Memory statistics ({}):", memory.path().display());
            println!("  Total memories: {}", stats.total_memories);
            println!("  Successes: {}", stats.successes);
            println!("  Failures: {}", stats.failures);
            println!("  Success rate: {:.1}%", stats.success_rate * 100.0);
        }
        Commands::Lessons => {
            let lessons = memory.get_all_lessons();
            if lessons.is_empty() {
                println!("No lessons stored yet.");
            } else {
                println!("All lessons learned:");
                for (i, lesson) in lessons.iter().enumerate() {
                    println!("{}. {}", i + 1, lesson);
                }
            }
        }
        Commands::Clear => {
            memory.clear();
            println!("Memory cleared: {}", memory.path().display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    run(Cli::parse()).await
}
