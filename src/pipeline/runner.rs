//! Feedback pipeline: drives one recording through STT, phoneme recognition,
//! pronunciation alignment and language feedback.
//!
//! # Pipeline flow
//!
//! ```text
//! run(id, audio)
//!   └─▶ stt.transcribe                       [Transcribing]
//!         ├─ Err → fail(id)                  [Failed]
//!         └─ Ok  → segment once              [Transcribed]
//!               └─▶ recognizer.recognize      [RecognizingPhonemes]
//!                     ├─ Err → stage failure, skip pronunciation
//!                     └─ Ok  → phonemize learner words,
//!                              spawn_blocking(align)   [PhonemesRecognized]
//!               └─▶ feedback.evaluate(learner turns)   [Analyzing]
//!                     ├─ Err → stage failure, empty document
//!                     └─ Ok  → spawn_blocking(locate_all_from)
//!               └─▶ report                    [Complete]
//! ```
//!
//! Only speech-to-text is fatal.  Every other stage records a
//! [`StageFailure`](super::StageFailure) in the report and the run continues.
//!
//! The learner's turns are the segments `first`, `first + 2`, … where `first`
//! is the primary speaker's first turn.  The same segments feed the language
//! model and are searched for its quotes, so offsets always land in text the
//! model actually saw.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::annotation::{learner_text, locate_all_from, FeedbackDocument, LocateReport};
use crate::llm::FeedbackProvider;
use crate::phoneme::{align, Phonemizer, PhonemeSequence};
use crate::transcript::{speaker_words, SpeakerSegment, Word, DEFAULT_SPEAKER};

use super::collaborators::{PhonemeRecognizer, SpeechToText};
use super::registry::ProcessRegistry;
use super::state::{FeedbackReport, ProcessStatus, Stage, WordPronunciation};

// ---------------------------------------------------------------------------
// FeedbackPipeline
// ---------------------------------------------------------------------------

/// Runs recordings through every collaborator and publishes progress in a
/// [`ProcessRegistry`].
///
/// ```rust,no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use speech_feedback::pipeline::{FeedbackPipeline, ProcessRegistry};
///
/// # use speech_feedback::pipeline::{PhonemeRecognizer, SpeechToText};
/// # use speech_feedback::llm::FeedbackProvider;
/// # use speech_feedback::phoneme::Lexicon;
/// # fn make_stt() -> Arc<dyn SpeechToText> { unimplemented!() }
/// # fn make_recognizer() -> Arc<dyn PhonemeRecognizer> { unimplemented!() }
/// # fn make_provider() -> Arc<dyn FeedbackProvider> { unimplemented!() }
/// # async fn example() {
/// let registry = ProcessRegistry::new();
/// let pipeline = Arc::new(FeedbackPipeline::new(
///     registry.clone(),
///     make_stt(),
///     make_recognizer(),
///     Arc::new(Lexicon::builtin()),
///     make_provider(),
/// ));
///
/// let (id, handle) = pipeline.submit(Path::new("recording.wav"));
/// println!("{:?}", registry.get(id).map(|p| p.status)); // still running
/// handle.await.unwrap();
/// println!("{:?}", registry.get(id).map(|p| p.status));
/// # }
/// ```
pub struct FeedbackPipeline {
    registry: ProcessRegistry,
    stt: Arc<dyn SpeechToText>,
    recognizer: Arc<dyn PhonemeRecognizer>,
    phonemizer: Arc<dyn Phonemizer>,
    feedback: Arc<dyn FeedbackProvider>,
    primary_speaker: String,
}

impl FeedbackPipeline {
    /// Create a pipeline assessing [`DEFAULT_SPEAKER`].
    pub fn new(
        registry: ProcessRegistry,
        stt: Arc<dyn SpeechToText>,
        recognizer: Arc<dyn PhonemeRecognizer>,
        phonemizer: Arc<dyn Phonemizer>,
        feedback: Arc<dyn FeedbackProvider>,
    ) -> Self {
        Self {
            registry,
            stt,
            recognizer,
            phonemizer,
            feedback,
            primary_speaker: DEFAULT_SPEAKER.to_string(),
        }
    }

    /// Assess `speaker` instead of the default speaker.
    pub fn with_primary_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.primary_speaker = speaker.into();
        self
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Register a new run for `audio` and process it on a background task.
    ///
    /// Returns immediately with the id to poll in the registry, and the
    /// task's handle.  Must be called from within a tokio runtime.
    pub fn submit(self: &Arc<Self>, audio: impl Into<PathBuf>) -> (Uuid, JoinHandle<()>) {
        let id = self.registry.create(ProcessStatus::Pending);
        let audio = audio.into();
        let pipeline = Arc::clone(self);
        let handle = tokio::spawn(async move { pipeline.run(id, &audio).await });
        (id, handle)
    }

    // -----------------------------------------------------------------------
    // Main run
    // -----------------------------------------------------------------------

    /// Process `audio` for the already-registered run `id`.
    ///
    /// Always leaves `id` in a terminal status.
    pub async fn run(&self, id: Uuid, audio: &Path) {
        log::info!("pipeline: processing {} as {id}", audio.display());

        // ── 1. Speech-to-text (fatal on error) ──────────────────────────
        self.registry.set_status(id, ProcessStatus::Transcribing);

        let transcript = match self.stt.transcribe(audio).await {
            Ok(transcript) => transcript,
            Err(e) => {
                log::error!("pipeline: speech-to-text failed for {id}: {e}");
                self.registry.fail(id, format!("speech-to-text failed: {e}"));
                return;
            }
        };

        // ── 2. Segment once; every later offset refers to this list ─────
        let segments = transcript.segments();
        log::debug!(
            "pipeline: {} words in {} speaker segments",
            transcript.words.len(),
            segments.len()
        );

        let mut report = FeedbackReport {
            segments: segments.clone(),
            ..FeedbackReport::default()
        };
        self.registry.set_result(id, report.clone());
        self.registry.set_status(id, ProcessStatus::Transcribed);

        // ── 3. Phoneme recognition + pronunciation diff (non-fatal) ─────
        self.registry.set_status(id, ProcessStatus::RecognizingPhonemes);

        match self.recognizer.recognize(audio).await {
            Ok(hypothesis) => {
                report.hypothesis = Some(hypothesis.clone());
                self.assess_pronunciation(&transcript.words, hypothesis, &mut report)
                    .await;
            }
            Err(e) => {
                report.record_failure(Stage::PhonemeRecognition, e.to_string());
            }
        }
        self.registry.set_result(id, report.clone());
        self.registry.set_status(id, ProcessStatus::PhonemesRecognized);

        // ── 4. Language feedback + annotation location (non-fatal) ──────
        self.registry.set_status(id, ProcessStatus::Analyzing);

        match self.first_learner_turn(&segments) {
            Some(first) => self.assess_language(segments, first, &mut report).await,
            None => report.record_failure(
                Stage::LanguageFeedback,
                format!("speaker {} has no turns", self.primary_speaker),
            ),
        }

        // ── 5. Finalise ─────────────────────────────────────────────────
        log::info!(
            "pipeline: {id} complete ({} words assessed, {} annotations, {} stage failures)",
            report.pronunciation.len(),
            report.annotations.len(),
            report.failures.len()
        );
        self.registry.set_result(id, report);
        self.registry.set_status(id, ProcessStatus::Complete);
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn first_learner_turn(&self, segments: &[SpeakerSegment]) -> Option<usize> {
        let first = segments
            .iter()
            .position(|s| s.speaker_id == self.primary_speaker)?;
        if first != 0 {
            log::info!(
                "pipeline: {} opens at segment {first}; searching that parity",
                self.primary_speaker
            );
        }
        Some(first)
    }

    /// Ask for language feedback on the learner's turns and locate its quotes
    /// in those same turns.
    async fn assess_language(
        &self,
        segments: Vec<SpeakerSegment>,
        first: usize,
        report: &mut FeedbackReport,
    ) {
        let text = learner_text(&segments, first);
        let document = match self.feedback.evaluate(&text).await {
            Ok(document) => document,
            Err(e) => {
                report.record_failure(Stage::LanguageFeedback, e.to_string());
                return;
            }
        };

        if document.is_empty() {
            return;
        }

        match locate_document(segments, document, first).await {
            Ok(located) => {
                report.dropped_annotations = located.dropped.len();
                report.annotations = located.located;
            }
            Err(e) => report.record_failure(Stage::AnnotationLocation, e.to_string()),
        }
    }

    /// Phonemize the learner's words and align `hypothesis` against them.
    async fn assess_pronunciation(
        &self,
        words: &[Word],
        hypothesis: PhonemeSequence,
        report: &mut FeedbackReport,
    ) {
        let (texts, references): (Vec<String>, Vec<PhonemeSequence>) =
            speaker_words(words, &self.primary_speaker)
                .into_iter()
                .map(|w| (w.text.clone(), self.phonemizer.phonemize_word(&w.text)))
                .filter(|(_, phones)| !phones.is_empty())
                .unzip();

        if references.is_empty() {
            log::debug!("pipeline: no words of {} to assess", self.primary_speaker);
            return;
        }

        let aligned = tokio::task::spawn_blocking(move || align(&hypothesis, &references)).await;

        match aligned {
            Ok(Ok(pairs)) => {
                report.pronunciation = texts
                    .into_iter()
                    .zip(pairs)
                    .map(|(word, pair)| WordPronunciation {
                        word,
                        recognized: pair.recognized,
                        expected: pair.expected,
                    })
                    .collect();
            }
            Ok(Err(e)) => report.record_failure(Stage::PronunciationAlignment, e.to_string()),
            Err(e) => report.record_failure(
                Stage::PronunciationAlignment,
                format!("alignment task panicked: {e}"),
            ),
        }
    }
}

/// Locate every feedback item on the blocking pool.
async fn locate_document(
    segments: Vec<SpeakerSegment>,
    document: FeedbackDocument,
    first: usize,
) -> Result<LocateReport, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || {
        locate_all_from(&segments, &document.into_items(), first)
    })
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
