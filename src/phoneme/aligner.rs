//! LCS-based pronunciation diff.
//!
//! The reference side is produced word by word (grapheme-to-phoneme on each
//! transcript word) and concatenated with no separator; the hypothesis side is
//! a flat recognizer output with no word boundaries at all.  Word boundaries
//! are recovered by walking the reference words and the LCS in lockstep while
//! a cursor advances through the hypothesis:
//!
//! ```text
//! reference words:  [h a l o] [v ɛ l t]
//! hypothesis:        h a l u v ɛ l t
//! LCS:               h a l   v ɛ l t
//!
//! word 0: h a l          ("o" unmatched)          → ("hal",   "halo")
//! word 1: u (skipped) v ɛ l t                     → ("uvɛlt", "vɛlt")
//! ```
//!
//! Every hypothesis symbol skipped on the way to the next LCS match is charged
//! to the word that owns that match.  Symbols after the last match are
//! charged to the last word.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lcs::longest_common_subsequence;
use super::sequence::PhonemeSequence;

// ---------------------------------------------------------------------------
// AlignmentError
// ---------------------------------------------------------------------------

/// Errors that can occur while aligning one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    /// The hypothesis cursor ran past the end before the common subsequence
    /// was fully consumed.  Only possible when the subsequence does not
    /// belong to the hypothesis, i.e. the inputs are inconsistent.
    #[error("hypothesis exhausted while aligning word {word_index} (hypothesis has {hypothesis_len} phonemes)")]
    HypothesisExhausted {
        word_index: usize,
        hypothesis_len: usize,
    },
}

// ---------------------------------------------------------------------------
// AlignedPhonemePair
// ---------------------------------------------------------------------------

/// Recognized vs expected phonemes for one reference word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPhonemePair {
    /// Hypothesis material aligned to the word; may be empty or contain
    /// substituted and extra phonemes.
    pub recognized: String,
    /// The word's reference phonemes, exactly as supplied.
    pub expected: String,
}

// ---------------------------------------------------------------------------
// align
// ---------------------------------------------------------------------------

/// Align a flat `hypothesis` against per-word `reference_words`.
///
/// Returns one pair per reference word, in order.  Concatenating every
/// `expected` reproduces the flattened reference.
pub fn align(
    hypothesis: &PhonemeSequence,
    reference_words: &[PhonemeSequence],
) -> Result<Vec<AlignedPhonemePair>, AlignmentError> {
    if reference_words.is_empty() {
        return Ok(Vec::new());
    }

    let reference = PhonemeSequence::flatten(reference_words);
    let common = longest_common_subsequence(hypothesis, &reference);
    log::debug!(
        "aligning {} hypothesis phonemes against {} reference phonemes ({} words), lcs={}",
        hypothesis.len(),
        reference.len(),
        reference_words.len(),
        common.len()
    );

    split_by_common(hypothesis.symbols(), reference_words, common.symbols())
}

/// Partition `hypothesis` into per-word chunks guided by `common`.
pub(crate) fn split_by_common(
    hypothesis: &[String],
    reference_words: &[PhonemeSequence],
    common: &[String],
) -> Result<Vec<AlignedPhonemePair>, AlignmentError> {
    let mut pairs = Vec::with_capacity(reference_words.len());
    let mut cursor = 0;
    let mut next = 0;

    for (word_index, word) in reference_words.iter().enumerate() {
        let mut recognized = String::new();

        for symbol in word.symbols() {
            if common.get(next) != Some(symbol) {
                continue;
            }
            loop {
                let current =
                    hypothesis
                        .get(cursor)
                        .ok_or_else(|| AlignmentError::HypothesisExhausted {
                            word_index,
                            hypothesis_len: hypothesis.len(),
                        })?;
                cursor += 1;
                recognized.push_str(current);
                if *current == common[next] {
                    break;
                }
            }
            next += 1;
        }

        pairs.push(AlignedPhonemePair {
            recognized,
            expected: word.concat(),
        });
    }

    if let Some(last) = pairs.last_mut() {
        last.recognized.push_str(&hypothesis[cursor..].concat());
    }

    Ok(pairs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> PhonemeSequence {
        PhonemeSequence::from_chars(s)
    }

    fn spaced(s: &str) -> PhonemeSequence {
        PhonemeSequence::parse_spaced(s)
    }

    fn pair(recognized: &str, expected: &str) -> AlignedPhonemePair {
        AlignedPhonemePair {
            recognized: recognized.into(),
            expected: expected.into(),
        }
    }

    #[test]
    fn identical_strings_align_perfectly() {
        let pairs = align(&chars("abc"), &[chars("a"), chars("bc")]).unwrap();
        assert_eq!(pairs, vec![pair("a", "a"), pair("bc", "bc")]);
    }

    #[test]
    fn substitution_is_charged_to_the_following_match() {
        let hyp = spaced("h a l u v ɛ l t");
        let words = [spaced("h a l o"), spaced("v ɛ l t")];
        let pairs = align(&hyp, &words).unwrap();
        assert_eq!(pairs, vec![pair("hal", "halo"), pair("uvɛlt", "vɛlt")]);
    }

    #[test]
    fn trailing_extra_phonemes_go_to_last_word() {
        let pairs = align(&chars("abcx"), &[chars("a"), chars("bc")]).unwrap();
        assert_eq!(pairs, vec![pair("a", "a"), pair("bcx", "bc")]);
    }

    #[test]
    fn unmatched_word_gets_empty_recognized_chunk() {
        let pairs = align(&chars("ab"), &[chars("a"), chars("zz"), chars("b")]).unwrap();
        assert_eq!(pairs, vec![pair("a", "a"), pair("", "zz"), pair("b", "b")]);
    }

    #[test]
    fn empty_reference_yields_no_pairs() {
        assert!(align(&chars("abc"), &[]).unwrap().is_empty());
        assert!(align(&PhonemeSequence::new(), &[]).unwrap().is_empty());
    }

    #[test]
    fn empty_hypothesis_yields_empty_recognized_chunks() {
        let pairs = align(&PhonemeSequence::new(), &[chars("ab"), chars("c")]).unwrap();
        assert_eq!(pairs, vec![pair("", "ab"), pair("", "c")]);
    }

    #[test]
    fn multichar_symbols_stay_whole() {
        let hyp = spaced("ts aɪ t");
        let words = [spaced("ts aɪ t"), spaced("ʊ n t")];
        let pairs = align(&hyp, &words).unwrap();
        assert_eq!(pairs, vec![pair("tsaɪt", "tsaɪt"), pair("", "ʊnt")]);
    }

    #[test]
    fn expected_chunks_reconstruct_the_flat_reference() {
        let cases: Vec<(PhonemeSequence, Vec<PhonemeSequence>)> = vec![
            (chars("ɪçʃpʁɛxədɔYtʃ"), vec![chars("ɪç"), chars("ʃpʁɛçə"), chars("dɔYtʃ")]),
            (chars("xyz"), vec![chars("ab"), chars(""), chars("c")]),
            (chars(""), vec![chars("gu:t")]),
            (chars("aaaa"), vec![chars("a"), chars("a")]),
        ];

        for (hyp, words) in cases {
            let pairs = align(&hyp, &words).unwrap();
            assert_eq!(pairs.len(), words.len());
            let expected: String = pairs.iter().map(|p| p.expected.as_str()).collect();
            assert_eq!(expected, PhonemeSequence::flatten(&words).concat());
            let recognized: String = pairs.iter().map(|p| p.recognized.as_str()).collect();
            assert_eq!(recognized, hyp.concat());
        }
    }

    #[test]
    fn inconsistent_common_subsequence_reports_exhaustion() {
        let hyp = vec!["a".to_string()];
        let words = [chars("ab")];
        let common = vec!["a".to_string(), "b".to_string()];

        let err = split_by_common(&hyp, &words, &common).unwrap_err();
        assert_eq!(
            err,
            AlignmentError::HypothesisExhausted {
                word_index: 0,
                hypothesis_len: 1
            }
        );
    }
}
