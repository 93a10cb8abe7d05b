//! Language-feedback annotations and their mapping onto the transcript.
//!
//! This module provides:
//! * [`AnnotationItem`] / [`AnnotationKind`]: one quoted finding from the
//!   language-feedback collaborator (mistake, inaccuracy or vocabulary hint).
//! * [`FeedbackDocument`]: the collaborator's JSON document, parsed leniently.
//! * [`locate_all`]: maps every item's quote onto exact
//!   `(segment_index, start, end)` character ranges; items whose quote cannot
//!   be found are dropped and reported, never raised.
//!
//! # Quick start
//!
//! ```rust
//! use speech_feedback::annotation::{locate_all, AnnotationItem};
//! use speech_feedback::transcript::SpeakerSegment;
//!
//! let segments = vec![SpeakerSegment {
//!     speaker_id: "speaker_0".into(),
//!     content: "äh das äh ist".into(),
//! }];
//! let items = vec![AnnotationItem::mistake("äh", "stilistischer Fehler", "")];
//!
//! let report = locate_all(&segments, &items);
//! assert_eq!(report.located[0].occurrences.len(), 2);
//! ```

pub mod locator;
pub mod model;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use locator::{
    find_first, find_occurrences, is_primary_segment, learner_text, locate, locate_all,
    locate_all_from, LocateReport, LocatedAnnotation, Occurrence,
};
pub use model::{
    AnnotationItem, AnnotationKind, Correction, FeedbackDocument, SearchMode, VocabularyHint,
};
