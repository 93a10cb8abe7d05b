//! Phoneme sequences, LCS-based pronunciation alignment, and lexicon G2P.
//!
//! # Architecture
//!
//! ```text
//! transcript words ──▶ Phonemizer (Lexicon) ──▶ per-word reference sequences ─┐
//!                                                                             ▼
//! audio ──▶ PhonemeRecognizer ──▶ flat hypothesis sequence ──▶ align() ──▶ AlignedPhonemePair per word
//! ```
//!
//! * [`PhonemeSequence`]: ordered list of opaque phoneme symbols.
//! * [`longest_common_subsequence`]: DP table + deterministic backtrack.
//! * [`align`]: splits the hypothesis into per-reference-word chunks.
//! * [`Lexicon`]: dictionary-based grapheme-to-phoneme conversion.
//!
//! # Quick start
//!
//! ```rust
//! use speech_feedback::phoneme::{align, PhonemeSequence};
//!
//! let hypothesis = PhonemeSequence::from_chars("abc");
//! let reference = vec![PhonemeSequence::from_chars("a"), PhonemeSequence::from_chars("bc")];
//!
//! let pairs = align(&hypothesis, &reference).unwrap();
//! assert_eq!(pairs[1].recognized, "bc");
//! assert_eq!(pairs[1].expected, "bc");
//! ```

pub mod aligner;
pub mod lcs;
pub mod lexicon;
pub mod sequence;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use aligner::{align, AlignedPhonemePair, AlignmentError};
pub use lcs::{lcs_table, longest_common_subsequence};
pub use lexicon::{Lexicon, LexiconError, Phonemizer, MIN_LEXICON_ENTRIES};
pub use sequence::PhonemeSequence;
