//! Application entry point: replays a recorded session through the feedback
//! pipeline.
//!
//! ```text
//! speech-feedback <bundle.json> [audio-path]
//! ```
//!
//! The bundle holds what the external collaborators returned for one
//! recording: the diarized transcript, optionally the recognizer's phoneme
//! string and optionally a language-feedback document.  When no feedback is
//! recorded and LLM feedback is enabled, the configured endpoint is asked;
//! its errors surface as a `language_feedback` stage failure in the report.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Read the bundle and build the replay collaborators.
//! 4. Load the pronunciation lexicon (built-in fallback).
//! 5. Run [`FeedbackPipeline`] on a tokio runtime.
//! 6. Print the final [`ProcessInfo`](speech_feedback::pipeline::ProcessInfo)
//!    as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use speech_feedback::{
    annotation::FeedbackDocument,
    config::AppConfig,
    llm::{ApiFeedbackClient, FeedbackProvider, LlmError},
    phoneme::{Lexicon, PhonemeSequence},
    pipeline::{
        CollaboratorError, FeedbackPipeline, PhonemeRecognizer, ProcessRegistry, SpeechToText,
    },
    transcript::Transcript,
};

// ---------------------------------------------------------------------------
// Recorded session
// ---------------------------------------------------------------------------

/// Collaborator outputs captured for one recording.
#[derive(Debug, Deserialize)]
struct RecordingBundle {
    transcript: Transcript,
    /// Space-separated recognizer output, e.g. `"h a l o"`.
    #[serde(default)]
    phonemes: Option<String>,
    #[serde(default)]
    feedback: Option<FeedbackDocument>,
}

impl RecordingBundle {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read bundle {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid bundle {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Replay collaborators
// ---------------------------------------------------------------------------

struct ReplayTranscriber(Transcript);

#[async_trait]
impl SpeechToText for ReplayTranscriber {
    async fn transcribe(&self, _audio: &Path) -> Result<Transcript, CollaboratorError> {
        Ok(self.0.clone())
    }
}

struct ReplayRecognizer(Option<PhonemeSequence>);

#[async_trait]
impl PhonemeRecognizer for ReplayRecognizer {
    async fn recognize(&self, _audio: &Path) -> Result<PhonemeSequence, CollaboratorError> {
        self.0.clone().ok_or_else(|| {
            CollaboratorError::Unavailable("no phonemes recorded in bundle".into())
        })
    }
}

struct ReplayFeedback(FeedbackDocument);

#[async_trait]
impl FeedbackProvider for ReplayFeedback {
    async fn evaluate(&self, _transcript: &str) -> Result<FeedbackDocument, LlmError> {
        Ok(self.0.clone())
    }
}

fn feedback_provider(
    recorded: Option<FeedbackDocument>,
    config: &AppConfig,
) -> Arc<dyn FeedbackProvider> {
    match recorded {
        Some(document) => Arc::new(ReplayFeedback(document)),
        None if config.llm.enabled => {
            log::info!("no recorded feedback; asking {}", config.llm.base_url);
            Arc::new(ApiFeedbackClient::from_config(
                &config.llm,
                &config.analysis.language,
            ))
        }
        None => {
            log::info!("no recorded feedback and LLM disabled; skipping annotations");
            Arc::new(ReplayFeedback(FeedbackDocument::default()))
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(bundle_path) = args.next().map(PathBuf::from) else {
        bail!("usage: speech-feedback <bundle.json> [audio-path]");
    };
    let audio_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| bundle_path.clone());

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Collaborators
    let bundle = RecordingBundle::load(&bundle_path)?;
    log::info!(
        "bundle: {} transcript tokens, phonemes {}, feedback {}",
        bundle.transcript.words.len(),
        if bundle.phonemes.is_some() { "recorded" } else { "missing" },
        if bundle.feedback.is_some() { "recorded" } else { "missing" },
    );

    let stt = Arc::new(ReplayTranscriber(bundle.transcript));
    let recognizer = Arc::new(ReplayRecognizer(
        bundle.phonemes.as_deref().map(PhonemeSequence::parse_spaced),
    ));
    let feedback = feedback_provider(bundle.feedback, &config);

    // 4. Lexicon
    // The default location is optional; an explicitly configured one is not.
    let lexicon_path = config.lexicon.resolved_path();
    let lexicon_path = (config.lexicon.path.is_some() || lexicon_path.exists())
        .then_some(lexicon_path.as_path());
    let lexicon = Arc::new(Lexicon::load_or_builtin(lexicon_path));

    // 5. Pipeline
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let registry = ProcessRegistry::new();
    let pipeline = Arc::new(
        FeedbackPipeline::new(registry.clone(), stt, recognizer, lexicon, feedback)
            .with_primary_speaker(config.analysis.primary_speaker.clone()),
    );

    let id = rt.block_on(async {
        let (id, handle) = pipeline.submit(audio_path);
        handle.await.map(|()| id)
    })
    .context("pipeline task failed")?;

    // 6. Output
    let info = registry
        .get(id)
        .with_context(|| format!("process {id} vanished from the registry"))?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
