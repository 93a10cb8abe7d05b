//! Language-feedback module.
//!
//! This module provides:
//! * [`FeedbackProvider`]: async trait implemented by all feedback backends.
//! * [`ApiFeedbackClient`]: OpenAI-compatible REST API backend.
//! * [`FallbackProvider`]: wraps any provider; returns empty feedback on failure.
//! * [`PromptBuilder`]: builds German/English feedback prompts.
//! * [`LlmError`]: error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use speech_feedback::config::AppConfig;
//! use speech_feedback::llm::{ApiFeedbackClient, FallbackProvider, FeedbackProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!
//!     // A provider that never fails (falls back to empty feedback).
//!     let provider = FallbackProvider::new(ApiFeedbackClient::from_config(
//!         &config.llm,
//!         &config.analysis.language,
//!     ));
//!
//!     let document = provider.evaluate("ich habe äh der Buch gelesen").await.unwrap();
//!     println!("{} mistakes", document.mistakes.len());
//! }
//! ```

pub mod client;
pub mod fallback;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiFeedbackClient, FeedbackProvider, LlmError};
pub use fallback::FallbackProvider;
pub use prompt::PromptBuilder;
