//! External collaborator seams of the pipeline.
//!
//! The speech-to-text service and the phoneme recognizer are remote or
//! model-backed; the pipeline only sees these traits.  Both are
//! `Send + Sync` so they can be shared as `Arc<dyn …>`.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::phoneme::PhonemeSequence;
use crate::transcript::Transcript;

// ---------------------------------------------------------------------------
// CollaboratorError
// ---------------------------------------------------------------------------

/// Errors reported by a collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The audio file could not be read.
    #[error("audio I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The service could not be reached or rejected the request.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Diarized speech-to-text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> Result<Transcript, CollaboratorError>;
}

/// Language-independent phoneme recognition of the raw audio.
///
/// Returns the recognized phonemes as one flat sequence for the whole
/// recording.
#[async_trait]
pub trait PhonemeRecognizer: Send + Sync {
    async fn recognize(&self, audio: &Path) -> Result<PhonemeSequence, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.wav");
        let err: CollaboratorError = io.into();
        assert!(err.to_string().contains("missing.wav"));
    }

    #[test]
    fn traits_are_object_safe() {
        fn _stt(_: Box<dyn SpeechToText>) {}
        fn _phonemes(_: Box<dyn PhonemeRecognizer>) {}
    }
}
