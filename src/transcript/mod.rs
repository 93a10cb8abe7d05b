//! Diarized transcripts and speaker-turn segmentation.
//!
//! This module provides:
//! * [`Word`] / [`WordKind`]: one timed token from the speech-to-text
//!   collaborator, attributed to a speaker.
//! * [`Transcript`]: the full collaborator output.
//! * [`SpeakerSegment`]: a maximal run of same-speaker words.
//! * [`segment_speakers`]: run-length grouping of words into segments.
//!
//! Segment indices produced here are the coordinate system used by the
//! annotation locator, so a transcript must be segmented exactly once and the
//! resulting list reused.
//!
//! # Quick start
//!
//! ```rust
//! use speech_feedback::transcript::{segment_speakers, Word};
//!
//! let words = vec![
//!     Word::spoken("Hi", "speaker_0"),
//!     Word::spoken("there", "speaker_0"),
//!     Word::spoken("you", "speaker_1"),
//! ];
//! let segments = segment_speakers(&words);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].content, "Hi there");
//! ```

pub mod segment;
pub mod word;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use segment::{segment_speakers, speaker_text, speaker_words, SpeakerSegment};
pub use word::{Transcript, Word, WordKind, DEFAULT_SPEAKER};
