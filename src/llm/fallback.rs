//! Fallback provider: wraps any [`FeedbackProvider`] and returns empty
//! feedback on error.
//!
//! When the underlying LLM call fails for any reason (`Request`, `Timeout`,
//! `Parse`, `EmptyResponse`) [`FallbackProvider`] returns an empty
//! [`FeedbackDocument`] instead of propagating the error, so a recording is
//! still reported with its transcript and pronunciation results.

use async_trait::async_trait;

use crate::annotation::FeedbackDocument;
use crate::llm::client::{FeedbackProvider, LlmError};

// ---------------------------------------------------------------------------
// FallbackProvider
// ---------------------------------------------------------------------------

/// A transparent wrapper around any [`FeedbackProvider`] that never returns
/// an error.
///
/// # Example
/// ```rust
/// use speech_feedback::config::LlmConfig;
/// use speech_feedback::llm::{ApiFeedbackClient, FallbackProvider};
///
/// let inner = ApiFeedbackClient::from_config(&LlmConfig::default(), "de");
/// let provider = FallbackProvider::new(inner);
/// ```
pub struct FallbackProvider<P: FeedbackProvider> {
    inner: P,
}

impl<P: FeedbackProvider> FallbackProvider<P> {
    /// Wrap `inner` with fallback behaviour.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Return a reference to the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: FeedbackProvider> FeedbackProvider for FallbackProvider<P> {
    /// Attempt evaluation; return an empty document if any error occurs.
    async fn evaluate(&self, transcript: &str) -> Result<FeedbackDocument, LlmError> {
        match self.inner.evaluate(transcript).await {
            Ok(document) => Ok(document),
            Err(err) => {
                log::warn!(
                    "language feedback failed ({err}); continuing without annotations (len={})",
                    transcript.len()
                );
                Ok(FeedbackDocument::default())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Correction;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Always succeeds with a fixed document.
    struct AlwaysOk(FeedbackDocument);

    #[async_trait]
    impl FeedbackProvider for AlwaysOk {
        async fn evaluate(&self, _transcript: &str) -> Result<FeedbackDocument, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Always returns the given error.
    struct AlwaysFails(LlmErrorKind);

    enum LlmErrorKind {
        Request,
        Timeout,
        Parse,
        Empty,
    }

    #[async_trait]
    impl FeedbackProvider for AlwaysFails {
        async fn evaluate(&self, _transcript: &str) -> Result<FeedbackDocument, LlmError> {
            let err = match self.0 {
                LlmErrorKind::Request => LlmError::Request("connection refused".into()),
                LlmErrorKind::Timeout => LlmError::Timeout,
                LlmErrorKind::Parse => LlmError::Parse("bad json".into()),
                LlmErrorKind::Empty => LlmError::EmptyResponse,
            };
            Err(err)
        }
    }

    fn sample_document() -> FeedbackDocument {
        FeedbackDocument {
            mistakes: vec![Correction {
                quote: "der Haus".into(),
                error_type: "grammatikalischer Fehler".into(),
                correction: "das Haus".into(),
            }],
            ..FeedbackDocument::default()
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn passes_through_success() {
        let provider = FallbackProvider::new(AlwaysOk(sample_document()));
        let doc = provider.evaluate("der Haus").await.unwrap();
        assert_eq!(doc, sample_document());
    }

    #[tokio::test]
    async fn every_failure_becomes_empty_feedback() {
        for kind in [
            LlmErrorKind::Request,
            LlmErrorKind::Timeout,
            LlmErrorKind::Parse,
            LlmErrorKind::Empty,
        ] {
            let provider = FallbackProvider::new(AlwaysFails(kind));
            let doc = provider.evaluate("text").await.unwrap();
            assert!(doc.is_empty());
        }
    }

    /// FallbackProvider<P> must itself be a valid FeedbackProvider (object-safe).
    #[test]
    fn fallback_is_object_safe() {
        let inner = AlwaysOk(FeedbackDocument::default());
        let _: Box<dyn FeedbackProvider> = Box::new(FallbackProvider::new(inner));
    }
}
