//! Core `FeedbackProvider` trait and `ApiFeedbackClient` implementation.
//!
//! `ApiFeedbackClient` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint such as Ollama (OpenAI mode), OpenAI, Groq or vLLM.
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::annotation::FeedbackDocument;
use crate::config::LlmConfig;
use crate::llm::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while requesting language feedback.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// FeedbackProvider trait
// ---------------------------------------------------------------------------

/// Async trait for language-model critique of a learner's transcript.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn FeedbackProvider>`).
///
/// `transcript` is the learner's text only, one speaker turn per line.  The
/// returned document's quotes are expected to be verbatim substrings of it.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    async fn evaluate(&self, transcript: &str) -> Result<FeedbackDocument, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiFeedbackClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct ApiFeedbackClient {
    client: reqwest::Client,
    config: LlmConfig,
    prompt_builder: PromptBuilder,
}

impl ApiFeedbackClient {
    /// Build a client from LLM config and the learner's language.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used if the
    /// builder fails.
    pub fn from_config(config: &LlmConfig, language: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(language),
        }
    }

    fn request_body(&self, transcript: &str) -> serde_json::Value {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(transcript);

        serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  self.config.max_tokens,
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl FeedbackProvider for ApiFeedbackClient {
    /// Send the transcript for critique.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn evaluate(&self, transcript: &str) -> Result<FeedbackDocument, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let mut req = self.client.post(&url).json(&self.request_body(transcript));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?.error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let document = FeedbackDocument::parse_lenient(content);
        log::info!(
            "language feedback received: {} mistakes, {} inaccuracies, {} vocabulary hints",
            document.mistakes.len(),
            document.inaccuracies.len(),
            document.vocabularies.len()
        );
        Ok(document)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
