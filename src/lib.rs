//! Speech feedback for language learners.
//!
//! Turns one recorded conversation into learner feedback:
//!
//! * [`transcript`]: word tokens and speaker-turn segmentation.
//! * [`annotation`]: language-feedback items and their exact character
//!   ranges in the segmented transcript.
//! * [`phoneme`]: phoneme sequences, LCS alignment of recognized against
//!   expected phonemes, and dictionary grapheme-to-phoneme conversion.
//! * [`llm`]: the language-feedback collaborator (OpenAI-compatible API).
//! * [`pipeline`]: orchestration of every collaborator with a pollable
//!   process registry.
//! * [`config`]: `settings.toml` persistence and application paths.

pub mod annotation;
pub mod config;
pub mod llm;
pub mod phoneme;
pub mod pipeline;
pub mod transcript;
