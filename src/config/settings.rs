//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::transcript::DEFAULT_SPEAKER;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the language-feedback step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether language feedback is requested at all.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key; `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Upper bound on generated tokens; feedback documents are long.
    pub max_tokens: u32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:7b".into(),
            temperature: 0.2,
            max_tokens: 2048,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Which speaker is assessed and in which language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// ISO-639-1 code of the language being learned; selects the prompt.
    pub language: String,
    /// Speaker id of the learner.  Their words are phonemized for the
    /// pronunciation diff and their text is sent for language feedback.
    pub primary_speaker: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: "de".into(),
            primary_speaker: DEFAULT_SPEAKER.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LexiconConfig
// ---------------------------------------------------------------------------

/// Pronunciation dictionary used for grapheme-to-phoneme conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Explicit dictionary path.  `None` means the default location in the
    /// data directory, falling back to the built-in dictionary if absent.
    pub path: Option<PathBuf>,
}

impl LexiconConfig {
    /// The configured path, or the default data-dir location.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppPaths::new().lexicon_file)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use speech_feedback::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-feedback LLM settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Learner / language settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Pronunciation dictionary settings.
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
