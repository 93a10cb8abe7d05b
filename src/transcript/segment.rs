//! Speaker-turn segmentation.
//!
//! Consecutive `word` tokens from the same speaker are space-joined into one
//! [`SpeakerSegment`].  Non-adjacent runs of the same speaker stay separate,
//! so in a two-party conversation the segments usually alternate between the
//! speakers (index 0, 2, 4, … for whoever spoke first).

use serde::{Deserialize, Serialize};

use super::word::Word;

// ---------------------------------------------------------------------------
// SpeakerSegment
// ---------------------------------------------------------------------------

/// A maximal run of consecutive same-speaker words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub speaker_id: String,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Group `words` into speaker turns, preserving order.
///
/// Spacing and audio-event tokens are ignored.  Unattributed tokens belong to
/// [`DEFAULT_SPEAKER`](super::DEFAULT_SPEAKER).
pub fn segment_speakers(words: &[Word]) -> Vec<SpeakerSegment> {
    let mut segments = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut current: Option<&str> = None;

    for word in words.iter().filter(|w| w.is_spoken()) {
        let speaker = word.speaker();
        if current != Some(speaker) {
            if let Some(prev) = current {
                segments.push(flush(prev, &run));
            }
            run.clear();
            current = Some(speaker);
        }
        run.push(&word.text);
    }

    if let Some(prev) = current {
        segments.push(flush(prev, &run));
    }

    segments
}

fn flush(speaker: &str, run: &[&str]) -> SpeakerSegment {
    SpeakerSegment {
        speaker_id: speaker.to_string(),
        content: run.join(" "),
    }
}

/// Newline-joined contents of every segment spoken by `speaker`.
///
/// This is the text handed to the language-feedback collaborator.
pub fn speaker_text(segments: &[SpeakerSegment], speaker: &str) -> String {
    segments
        .iter()
        .filter(|s| s.speaker_id == speaker)
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The spoken tokens of `speaker`, in transcript order.
pub fn speaker_words<'a>(words: &'a [Word], speaker: &str) -> Vec<&'a Word> {
    words
        .iter()
        .filter(|w| w.is_spoken() && w.speaker() == speaker)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{WordKind, DEFAULT_SPEAKER};

    fn token(text: &str, kind: WordKind, speaker: Option<&str>) -> Word {
        Word {
            text: text.into(),
            start: 0.0,
            end: 0.0,
            kind,
            speaker_id: speaker.map(str::to_string),
        }
    }

    #[test]
    fn groups_consecutive_speaker_runs() {
        let words = vec![
            Word::spoken("Hi", "spk0"),
            Word::spoken("there", "spk0"),
            Word::spoken("you", "spk1"),
        ];

        let segments = segment_speakers(&words);
        assert_eq!(
            segments,
            vec![
                SpeakerSegment {
                    speaker_id: "spk0".into(),
                    content: "Hi there".into()
                },
                SpeakerSegment {
                    speaker_id: "spk1".into(),
                    content: "you".into()
                },
            ]
        );
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(segment_speakers(&[]).is_empty());
    }

    #[test]
    fn single_speaker_yields_one_segment() {
        let words = vec![
            Word::spoken("ich", "speaker_0"),
            Word::spoken("bin", "speaker_0"),
            Word::spoken("hier", "speaker_0"),
        ];
        let segments = segment_speakers(&words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "ich bin hier");
    }

    #[test]
    fn non_adjacent_runs_are_not_merged() {
        let words = vec![
            Word::spoken("a", "s0"),
            Word::spoken("b", "s1"),
            Word::spoken("c", "s0"),
        ];
        let segments = segment_speakers(&words);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].speaker_id, "s0");
        assert_eq!(segments[2].content, "c");
    }

    #[test]
    fn skips_spacing_and_audio_events() {
        let words = vec![
            token("Hallo", WordKind::Word, Some("s0")),
            token(" ", WordKind::Spacing, Some("s0")),
            token("(Husten)", WordKind::AudioEvent, Some("s1")),
            token("Welt", WordKind::Word, Some("s0")),
        ];
        let segments = segment_speakers(&words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, "Hallo Welt");
    }

    #[test]
    fn unattributed_tokens_join_the_placeholder_speaker() {
        let words = vec![
            token("eins", WordKind::Word, None),
            token("zwei", WordKind::Word, Some(DEFAULT_SPEAKER)),
        ];
        let segments = segment_speakers(&words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].speaker_id, DEFAULT_SPEAKER);
        assert_eq!(segments[0].content, "eins zwei");
    }

    #[test]
    fn segmentation_is_repeatable() {
        let words = vec![
            Word::spoken("a", "s0"),
            Word::spoken("b", "s1"),
            Word::spoken("c", "s1"),
        ];
        assert_eq!(segment_speakers(&words), segment_speakers(&words));
    }

    #[test]
    fn segments_cover_every_spoken_token_in_order() {
        let words = vec![
            token("das", WordKind::Word, Some("s0")),
            token(" ", WordKind::Spacing, None),
            token("ist", WordKind::Word, Some("s1")),
            token("(Musik)", WordKind::AudioEvent, None),
            token("gut", WordKind::Word, Some("s1")),
            token("ja", WordKind::Word, Some("s0")),
        ];

        let rebuilt: Vec<String> = segment_speakers(&words)
            .iter()
            .flat_map(|s| s.content.split(' ').map(str::to_string).collect::<Vec<_>>())
            .collect();
        let expected: Vec<String> = words
            .iter()
            .filter(|w| w.is_spoken())
            .map(|w| w.text.clone())
            .collect();

        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn speaker_text_joins_turns_with_newlines() {
        let words = vec![
            Word::spoken("guten", "s0"),
            Word::spoken("Tag", "s0"),
            Word::spoken("hallo", "s1"),
            Word::spoken("wie", "s0"),
            Word::spoken("geht's", "s0"),
        ];
        let segments = segment_speakers(&words);
        assert_eq!(speaker_text(&segments, "s0"), "guten Tag\nwie geht's");
        assert_eq!(speaker_text(&segments, "s1"), "hallo");
        assert_eq!(speaker_text(&segments, "s9"), "");
    }

    #[test]
    fn speaker_words_filters_by_speaker() {
        let words = vec![
            Word::spoken("a", "s0"),
            token(" ", WordKind::Spacing, Some("s0")),
            Word::spoken("b", "s1"),
            Word::spoken("c", "s0"),
        ];
        let texts: Vec<&str> = speaker_words(&words, "s0")
            .iter()
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "c"]);
    }
}
