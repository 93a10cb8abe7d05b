//! Annotation data model and lenient parsing of language-model output.
//!
//! Language models do not always honour the requested JSON shape: the
//! document may be wrapped in a Markdown code fence, lists may be missing, or
//! the payload may not be JSON at all.  [`FeedbackDocument::parse_lenient`]
//! accepts the known shape, tolerates missing lists, and otherwise falls back
//! to an empty document with a warning.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// A mistake or inaccuracy as emitted by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub quote: String,
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub correction: String,
}

/// A vocabulary suggestion as emitted by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyHint {
    pub quote: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// The full language-feedback document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDocument {
    #[serde(default)]
    pub mistakes: Vec<Correction>,
    #[serde(default)]
    pub inaccuracies: Vec<Correction>,
    #[serde(default)]
    pub vocabularies: Vec<VocabularyHint>,
}

impl FeedbackDocument {
    /// Parse a raw model response, never failing.
    ///
    /// A surrounding ```` ```json ```` fence is stripped first.  Anything that
    /// still does not deserialize yields [`FeedbackDocument::default`].
    pub fn parse_lenient(raw: &str) -> Self {
        let body = strip_code_fence(raw);
        match serde_json::from_str::<FeedbackDocument>(body) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!(
                    "feedback document did not match the expected shape ({e}); using empty feedback (len={})",
                    raw.len()
                );
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mistakes.is_empty() && self.inaccuracies.is_empty() && self.vocabularies.is_empty()
    }

    /// Total number of annotation items across all lists.
    pub fn len(&self) -> usize {
        self.mistakes.len() + self.inaccuracies.len() + self.vocabularies.len()
    }

    /// Flatten into items: mistakes, then inaccuracies, then vocabularies.
    pub fn into_items(self) -> Vec<AnnotationItem> {
        let mut items = Vec::with_capacity(self.len());
        items.extend(self.mistakes.into_iter().map(|c| AnnotationItem {
            quote: c.quote,
            kind: AnnotationKind::Mistake {
                error_type: c.error_type,
                correction: c.correction,
            },
        }));
        items.extend(self.inaccuracies.into_iter().map(|c| AnnotationItem {
            quote: c.quote,
            kind: AnnotationKind::Inaccuracy {
                error_type: c.error_type,
                correction: c.correction,
            },
        }));
        items.extend(self.vocabularies.into_iter().map(|v| AnnotationItem {
            quote: v.quote,
            kind: AnnotationKind::Vocabulary {
                synonyms: v.synonyms,
            },
        }));
        items
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// ---------------------------------------------------------------------------
// AnnotationItem
// ---------------------------------------------------------------------------

/// How many occurrences of a quote the locator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Every non-overlapping occurrence in every qualifying segment.
    Multiple,
    /// Only the first occurrence.
    First,
}

/// Kind-specific annotation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationKind {
    /// A serious error that hinders understanding.
    Mistake {
        error_type: String,
        correction: String,
    },
    /// Understandable but unnatural phrasing, fillers, repetitions.
    Inaccuracy {
        error_type: String,
        correction: String,
    },
    /// A word worth replacing with a richer synonym.
    Vocabulary { synonyms: Vec<String> },
}

/// One annotation: a verbatim quote from the transcript plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationItem {
    pub quote: String,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl AnnotationItem {
    pub fn mistake(
        quote: impl Into<String>,
        error_type: impl Into<String>,
        correction: impl Into<String>,
    ) -> Self {
        Self {
            quote: quote.into(),
            kind: AnnotationKind::Mistake {
                error_type: error_type.into(),
                correction: correction.into(),
            },
        }
    }

    pub fn inaccuracy(
        quote: impl Into<String>,
        error_type: impl Into<String>,
        correction: impl Into<String>,
    ) -> Self {
        Self {
            quote: quote.into(),
            kind: AnnotationKind::Inaccuracy {
                error_type: error_type.into(),
                correction: correction.into(),
            },
        }
    }

    pub fn vocabulary(quote: impl Into<String>, synonyms: Vec<String>) -> Self {
        Self {
            quote: quote.into(),
            kind: AnnotationKind::Vocabulary { synonyms },
        }
    }

    /// Corrections mark every occurrence; vocabulary hints only the first.
    pub fn search_mode(&self) -> SearchMode {
        match self.kind {
            AnnotationKind::Mistake { .. } | AnnotationKind::Inaccuracy { .. } => {
                SearchMode::Multiple
            }
            AnnotationKind::Vocabulary { .. } => SearchMode::First,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "mistakes": [
            {"quote": "der Mädchen", "error_type": "grammatikalischer Fehler", "correction": "das Mädchen"}
        ],
        "inaccuracies": [
            {"quote": "äh", "error_type": "stilistischer Fehler", "correction": ""}
        ],
        "vocabularies": [
            {"quote": "gut", "synonyms": ["hervorragend", "gelungen"]}
        ]
    }"#;

    #[test]
    fn parses_well_formed_document() {
        let doc = FeedbackDocument::parse_lenient(SAMPLE);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.mistakes[0].correction, "das Mädchen");
        assert_eq!(doc.vocabularies[0].synonyms.len(), 2);
    }

    #[test]
    fn strips_markdown_fence() {
        let fenced = format!("```json\n{SAMPLE}\n```");
        let doc = FeedbackDocument::parse_lenient(&fenced);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let doc = FeedbackDocument::parse_lenient(r#"{"mistakes": []}"#);
        assert!(doc.is_empty());
    }

    #[test]
    fn garbage_falls_back_to_empty_document() {
        let doc = FeedbackDocument::parse_lenient("Here is my feedback: great job!");
        assert_eq!(doc, FeedbackDocument::default());
    }

    #[test]
    fn wrong_shape_falls_back_to_empty_document() {
        let doc = FeedbackDocument::parse_lenient(r#"{"mistakes": "none"}"#);
        assert!(doc.is_empty());
    }

    #[test]
    fn into_items_preserves_category_order() {
        let items = FeedbackDocument::parse_lenient(SAMPLE).into_items();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0].kind, AnnotationKind::Mistake { .. }));
        assert!(matches!(items[1].kind, AnnotationKind::Inaccuracy { .. }));
        assert!(matches!(items[2].kind, AnnotationKind::Vocabulary { .. }));
        assert_eq!(items[1].quote, "äh");
    }

    #[test]
    fn search_mode_follows_kind() {
        assert_eq!(
            AnnotationItem::mistake("a", "b", "c").search_mode(),
            SearchMode::Multiple
        );
        assert_eq!(
            AnnotationItem::inaccuracy("a", "b", "c").search_mode(),
            SearchMode::Multiple
        );
        assert_eq!(
            AnnotationItem::vocabulary("a", vec![]).search_mode(),
            SearchMode::First
        );
    }

    #[test]
    fn item_serializes_with_flattened_kind_tag() {
        let item = AnnotationItem::vocabulary("gut", vec!["prima".into()]);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["quote"], "gut");
        assert_eq!(value["kind"], "vocabulary");
        assert_eq!(value["synonyms"][0], "prima");
    }
}
