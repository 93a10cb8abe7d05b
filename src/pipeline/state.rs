//! Process status machine and the aggregated feedback report.
//!
//! [`ProcessStatus`] tracks how far one recording has progressed through
//! [`FeedbackPipeline`](super::FeedbackPipeline).  [`ProcessInfo`] is the
//! snapshot a caller polls; its `result` fills up stage by stage, so partial
//! results are visible before the run completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::annotation::LocatedAnnotation;
use crate::phoneme::PhonemeSequence;
use crate::transcript::SpeakerSegment;

// ---------------------------------------------------------------------------
// ProcessStatus
// ---------------------------------------------------------------------------

/// States of one feedback run.
///
/// ```text
/// Uploaded / Pending
///   ──▶ Transcribing ──STT ok──▶ Transcribed
///         ──▶ RecognizingPhonemes ──▶ PhonemesRecognized
///               ──▶ Analyzing ──▶ Complete
/// Transcribing ──STT error──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Audio has been received but not queued yet.
    Uploaded,
    /// Queued for processing.
    #[default]
    Pending,
    Transcribing,
    Transcribed,
    RecognizingPhonemes,
    PhonemesRecognized,
    /// Waiting for language feedback and locating its quotes.
    Analyzing,
    Complete,
    Failed,
}

impl ProcessStatus {
    /// Returns `true` once the run can no longer change.
    ///
    /// ```
    /// use speech_feedback::pipeline::ProcessStatus;
    ///
    /// assert!(ProcessStatus::Complete.is_terminal());
    /// assert!(ProcessStatus::Failed.is_terminal());
    /// assert!(!ProcessStatus::Analyzing.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessStatus::Complete | ProcessStatus::Failed)
    }

    /// The serialized name, e.g. `"recognizing_phonemes"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Uploaded => "uploaded",
            ProcessStatus::Pending => "pending",
            ProcessStatus::Transcribing => "transcribing",
            ProcessStatus::Transcribed => "transcribed",
            ProcessStatus::RecognizingPhonemes => "recognizing_phonemes",
            ProcessStatus::PhonemesRecognized => "phonemes_recognized",
            ProcessStatus::Analyzing => "analyzing",
            ProcessStatus::Complete => "complete",
            ProcessStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Pipeline stage that can fail without failing the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PhonemeRecognition,
    PronunciationAlignment,
    LanguageFeedback,
    AnnotationLocation,
}

/// A non-fatal stage error carried in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub reason: String,
}

/// Recognized versus expected phonemes for one word of the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPronunciation {
    pub word: String,
    pub recognized: String,
    pub expected: String,
}

/// Everything produced for one recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Speaker turns; annotation offsets index into this list.
    pub segments: Vec<SpeakerSegment>,
    /// Raw phoneme recognizer output, if recognition succeeded.
    pub hypothesis: Option<PhonemeSequence>,
    pub pronunciation: Vec<WordPronunciation>,
    pub annotations: Vec<LocatedAnnotation>,
    /// Number of feedback items whose quote was found nowhere.
    pub dropped_annotations: usize,
    pub failures: Vec<StageFailure>,
}

impl FeedbackReport {
    pub(crate) fn record_failure(&mut self, stage: Stage, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("pipeline: stage {stage:?} failed: {reason}");
        self.failures.push(StageFailure { stage, reason });
    }
}

// ---------------------------------------------------------------------------
// ProcessInfo
// ---------------------------------------------------------------------------

/// Pollable snapshot of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub id: Uuid,
    pub status: ProcessStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub result: Option<FeedbackReport>,
    /// Set when `status` is [`ProcessStatus::Failed`].
    pub error: Option<String>,
}

impl ProcessInfo {
    /// A fresh record with a random id.
    pub fn new(status: ProcessStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
