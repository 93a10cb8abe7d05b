//! Maps annotation quotes onto exact character ranges of the transcript.
//!
//! The language model is asked to quote the transcript verbatim, so matching
//! is plain literal substring search: no normalisation, no case folding, no
//! fuzzy matching.  A paraphrased quote simply does not locate and the item
//! is dropped.
//!
//! Only segments at even indices are searched; in the alternating two-party
//! segmentation these are the turns of the learner being assessed.  When the
//! learner does not open the conversation, [`locate_all_from`] shifts that
//! parity to start at the learner's first turn, and [`learner_text`] yields
//! exactly the text of the searched segments.
//!
//! Offsets are counted in characters (Unicode scalar values), not bytes, so
//! `"äh"` at the start of a segment spans `0..2`.

use serde::{Deserialize, Serialize};

use super::model::{AnnotationItem, SearchMode};
use crate::transcript::SpeakerSegment;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One located occurrence; `start..end` is a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub segment_index: usize,
    pub start: usize,
    pub end: usize,
}

/// An annotation together with every place its quote was found.
///
/// `occurrences` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedAnnotation {
    #[serde(flatten)]
    pub item: AnnotationItem,
    pub occurrences: Vec<Occurrence>,
}

/// Outcome of locating a batch of annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocateReport {
    pub located: Vec<LocatedAnnotation>,
    /// Items whose quote matched nowhere, kept for diagnostics.
    pub dropped: Vec<AnnotationItem>,
}

// ---------------------------------------------------------------------------
// Search primitives
// ---------------------------------------------------------------------------

/// Whether segment `index` is searched for quotes.
pub fn is_primary_segment(index: usize) -> bool {
    index % 2 == 0
}

/// Every non-overlapping occurrence of `quote`, left to right, across all
/// primary segments.
pub fn find_occurrences(segments: &[SpeakerSegment], quote: &str) -> Vec<Occurrence> {
    occurrences_from(segments, quote, 0)
}

/// The first occurrence of `quote` in the first primary segment containing it.
pub fn find_first(segments: &[SpeakerSegment], quote: &str) -> Option<Occurrence> {
    first_from(segments, quote, 0)
}

/// Newline-joined contents of the segments searched when the learner's first
/// turn is at index `first`.
pub fn learner_text(segments: &[SpeakerSegment], first: usize) -> String {
    searched_segments(segments, first)
        .map(|(_, segment)| segment.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn occurrences_from(segments: &[SpeakerSegment], quote: &str, first: usize) -> Vec<Occurrence> {
    if quote.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for (segment_index, segment) in searched_segments(segments, first) {
        let content = segment.content.as_str();
        let mut from = 0;
        while let Some(pos) = content[from..].find(quote) {
            let byte_start = from + pos;
            let byte_end = byte_start + quote.len();
            found.push(to_occurrence(segment_index, content, byte_start, byte_end));
            from = byte_end;
        }
    }
    found
}

fn first_from(segments: &[SpeakerSegment], quote: &str, first: usize) -> Option<Occurrence> {
    if quote.is_empty() {
        return None;
    }

    searched_segments(segments, first).find_map(|(segment_index, segment)| {
        let content = segment.content.as_str();
        content.find(quote).map(|byte_start| {
            to_occurrence(segment_index, content, byte_start, byte_start + quote.len())
        })
    })
}

/// Segments `first`, `first + 2`, `first + 4`, …
fn searched_segments(
    segments: &[SpeakerSegment],
    first: usize,
) -> impl Iterator<Item = (usize, &SpeakerSegment)> {
    segments
        .iter()
        .enumerate()
        .skip(first)
        .filter(move |(index, _)| is_primary_segment(index - first))
}

fn to_occurrence(
    segment_index: usize,
    content: &str,
    byte_start: usize,
    byte_end: usize,
) -> Occurrence {
    let start = content[..byte_start].chars().count();
    let end = start + content[byte_start..byte_end].chars().count();
    Occurrence {
        segment_index,
        start,
        end,
    }
}

// ---------------------------------------------------------------------------
// Locating annotations
// ---------------------------------------------------------------------------

/// Locate a single item, or `None` when its quote matches nowhere.
pub fn locate(segments: &[SpeakerSegment], item: &AnnotationItem) -> Option<LocatedAnnotation> {
    locate_from(segments, item, 0)
}

fn locate_from(
    segments: &[SpeakerSegment],
    item: &AnnotationItem,
    first: usize,
) -> Option<LocatedAnnotation> {
    let occurrences = match item.search_mode() {
        SearchMode::Multiple => occurrences_from(segments, &item.quote, first),
        SearchMode::First => first_from(segments, &item.quote, first).into_iter().collect(),
    };

    if occurrences.is_empty() {
        return None;
    }

    Some(LocatedAnnotation {
        item: item.clone(),
        occurrences,
    })
}

/// Locate every item independently.
///
/// Unlocatable items are logged and moved to [`LocateReport::dropped`]; the
/// batch itself never fails.
pub fn locate_all(segments: &[SpeakerSegment], items: &[AnnotationItem]) -> LocateReport {
    locate_all_from(segments, items, 0)
}

/// [`locate_all`] with the learner's first turn at index `first`: segments
/// `first`, `first + 2`, … are searched instead of the even ones.
pub fn locate_all_from(
    segments: &[SpeakerSegment],
    items: &[AnnotationItem],
    first: usize,
) -> LocateReport {
    let mut report = LocateReport::default();

    for item in items {
        match locate_from(segments, item, first) {
            Some(located) => report.located.push(located),
            None => {
                log::warn!(
                    "annotation quote not found in transcript, dropping: {:?}",
                    item.quote
                );
                report.dropped.push(item.clone());
            }
        }
    }

    log::debug!(
        "located {} of {} annotations",
        report.located.len(),
        items.len()
    );
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(contents: &[&str]) -> Vec<SpeakerSegment> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| SpeakerSegment {
                speaker_id: format!("speaker_{}", i % 2),
                content: c.to_string(),
            })
            .collect()
    }

    /// Character-indexed slice, mirroring how offsets are defined.
    fn char_slice(s: &str, start: usize, end: usize) -> String {
        s.chars().skip(start).take(end - start).collect()
    }

    #[test]
    fn finds_repeated_filler_with_character_offsets() {
        let segs = segments(&["äh das äh ist"]);
        let found = find_occurrences(&segs, "äh");
        assert_eq!(
            found,
            vec![
                Occurrence {
                    segment_index: 0,
                    start: 0,
                    end: 2
                },
                Occurrence {
                    segment_index: 0,
                    start: 7,
                    end: 9
                },
            ]
        );
    }

    #[test]
    fn occurrences_do_not_overlap() {
        let segs = segments(&["aaaa"]);
        let found = find_occurrences(&segs, "aa");
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].start, found[0].end), (0, 2));
        assert_eq!((found[1].start, found[1].end), (2, 4));
        for pair in found.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn odd_segments_are_not_searched() {
        let segs = segments(&["ich gehe", "also gut", "also ja"]);
        let found = find_occurrences(&segs, "also");
        assert_eq!(
            found,
            vec![Occurrence {
                segment_index: 2,
                start: 0,
                end: 4
            }]
        );
    }

    #[test]
    fn matching_is_case_sensitive_and_literal() {
        let segs = segments(&["Das Haus ist groß"]);
        assert!(find_occurrences(&segs, "das").is_empty());
        assert!(find_occurrences(&segs, "gross").is_empty());
        assert_eq!(find_occurrences(&segs, "groß").len(), 1);
    }

    #[test]
    fn every_occurrence_slices_back_to_the_quote() {
        let segs = segments(&["über über Über", "x", "schön über"]);
        let quote = "über";
        let found = find_occurrences(&segs, quote);
        assert_eq!(found.len(), 3);
        for occ in found {
            assert!(occ.start < occ.end);
            assert_eq!(
                char_slice(&segs[occ.segment_index].content, occ.start, occ.end),
                quote
            );
        }
    }

    #[test]
    fn find_first_stops_at_first_hit() {
        let segs = segments(&["kein Treffer", "hektisch", "sehr hektisch und hektisch"]);
        let first = find_first(&segs, "hektisch");
        assert_eq!(
            first,
            Some(Occurrence {
                segment_index: 2,
                start: 5,
                end: 13
            })
        );
    }

    #[test]
    fn empty_quote_is_never_located() {
        let segs = segments(&["abc"]);
        assert!(find_occurrences(&segs, "").is_empty());
        assert!(find_first(&segs, "").is_none());
    }

    #[test]
    fn vocabulary_items_report_one_occurrence() {
        let segs = segments(&["gut und gut"]);
        let item = AnnotationItem::vocabulary("gut", vec!["prima".into()]);
        let located = locate(&segs, &item).expect("located");
        assert_eq!(located.occurrences.len(), 1);
    }

    #[test]
    fn correction_items_report_all_occurrences() {
        let segs = segments(&["gut und gut"]);
        let item = AnnotationItem::inaccuracy("gut", "stilistischer Fehler", "prima");
        let located = locate(&segs, &item).expect("located");
        assert_eq!(located.occurrences.len(), 2);
    }

    #[test]
    fn unlocatable_item_is_dropped_not_raised() {
        let segs = segments(&["ich habe Hunger"]);
        let items = vec![
            AnnotationItem::mistake("habe", "grammatikalischer Fehler", "hatte"),
            AnnotationItem::mistake("paraphrasiert", "Lexikalischer Fehler", "x"),
            AnnotationItem::vocabulary("Hunger", vec!["Appetit".into()]),
        ];

        let report = locate_all(&segs, &items);
        assert_eq!(report.located.len(), items.len() - 1);
        assert_eq!(report.dropped.len(), 1);
        assert_eq!(report.dropped[0].quote, "paraphrasiert");
        assert_eq!(report.located[0].item.quote, "habe");
        assert_eq!(report.located[1].item.quote, "Hunger");
    }

    #[test]
    fn learner_opening_second_is_searched_at_odd_indices() {
        // speaker_1 opens; the learner's turns are 1 and 3.
        let segs = segments(&["Wie geht's", "äh gut", "und dir", "äh ja"]);
        let items = vec![AnnotationItem::inaccuracy("äh", "stilistischer Fehler", "")];

        assert!(locate_all(&segs, &items).located.is_empty());

        let report = locate_all_from(&segs, &items, 1);
        assert!(report.dropped.is_empty());
        assert_eq!(
            report.located[0].occurrences,
            vec![
                Occurrence {
                    segment_index: 1,
                    start: 0,
                    end: 2
                },
                Occurrence {
                    segment_index: 3,
                    start: 0,
                    end: 2
                },
            ]
        );
    }

    #[test]
    fn learner_text_matches_searched_segments() {
        let segs = segments(&["Wie geht's", "äh gut", "und dir", "äh ja"]);
        assert_eq!(learner_text(&segs, 0), "Wie geht's\nund dir");
        assert_eq!(learner_text(&segs, 1), "äh gut\näh ja");
        assert_eq!(learner_text(&segs, 4), "");
    }

    #[test]
    fn empty_batch_yields_empty_report() {
        let report = locate_all(&segments(&["abc"]), &[]);
        assert_eq!(report, LocateReport::default());
    }
}
