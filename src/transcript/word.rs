//! Word-level transcript tokens as delivered by the speech-to-text collaborator.

use serde::{Deserialize, Serialize};

use super::segment::{segment_speakers, SpeakerSegment};

/// Speaker id assigned to tokens the diarizer left unattributed.
pub const DEFAULT_SPEAKER: &str = "speaker_0";

// ---------------------------------------------------------------------------
// WordKind
// ---------------------------------------------------------------------------

/// Token category reported by the transcriber.
///
/// Only [`WordKind::Word`] tokens carry spoken text; spacing and audio events
/// (laughter, noise) are skipped by segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordKind {
    Word,
    Spacing,
    AudioEvent,
}

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// A single timed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// End time in seconds.
    #[serde(default)]
    pub end: f64,
    #[serde(rename = "type")]
    pub kind: WordKind,
    #[serde(default)]
    pub speaker_id: Option<String>,
}

impl Word {
    /// Build an untimed `word` token for `speaker`.
    pub fn spoken(text: impl Into<String>, speaker: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: 0.0,
            end: 0.0,
            kind: WordKind::Word,
            speaker_id: Some(speaker.into()),
        }
    }

    /// Speaker id, or [`DEFAULT_SPEAKER`] when the token is unattributed.
    pub fn speaker(&self) -> &str {
        self.speaker_id.as_deref().unwrap_or(DEFAULT_SPEAKER)
    }

    pub fn is_spoken(&self) -> bool {
        self.kind == WordKind::Word
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Diarized transcription of one recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub language_probability: f64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Transcript {
    /// Segment the transcript into speaker turns.
    ///
    /// Call this once per transcript and keep the result: annotation offsets
    /// refer to indices of exactly this list.
    pub fn segments(&self) -> Vec<SpeakerSegment> {
        segment_speakers(&self.words)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
