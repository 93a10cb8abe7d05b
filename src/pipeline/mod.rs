//! Pipeline orchestrator module.
//!
//! This module wires transcript segmentation, pronunciation alignment and
//! annotation location behind the external collaborators, and exposes the
//! per-recording progress through a pollable registry.
//!
//! # Architecture
//!
//! ```text
//! audio path
//!     │
//!     ▼
//! FeedbackPipeline::run()  ← async tokio task
//!     │
//!     ├─ SpeechToText::transcribe        → Transcript → segments
//!     ├─ PhonemeRecognizer::recognize    → hypothesis
//!     │     └─ Phonemizer + spawn_blocking(align)      → pronunciation
//!     └─ FeedbackProvider::evaluate      → FeedbackDocument
//!           └─ spawn_blocking(locate_all_from)         → annotations
//!
//! ProcessRegistry (Arc<Mutex<HashMap<Uuid, ProcessInfo>>>) ←─── polled by callers
//! ```

pub mod collaborators;
pub mod registry;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use collaborators::{CollaboratorError, PhonemeRecognizer, SpeechToText};
pub use registry::ProcessRegistry;
pub use runner::FeedbackPipeline;
pub use state::{
    FeedbackReport, ProcessInfo, ProcessStatus, Stage, StageFailure, WordPronunciation,
};
