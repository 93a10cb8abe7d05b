//! Dictionary-based grapheme-to-phoneme conversion.
//!
//! [`Lexicon`] maps lower-cased words to phoneme symbols.  It is loaded from a
//! pronunciation dictionary in the tab-separated MFA format
//!
//! ```text
//! # comment
//! hallo	h a l o
//! spreche	ʃ p ʁ ɛ ç ə
//! ```
//!
//! or built from the small German table in [`Lexicon::builtin`] when no
//! dictionary file is available.
//!
//! Lookup order for a word:
//! 1. direct entry;
//! 2. two-part compound split (`word[..i] + word[i..]`, both parts known) for
//!    words longer than six characters;
//! 3. one symbol per letter, logged as an approximation.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use super::sequence::PhonemeSequence;

/// A dictionary file with fewer valid entries than this is rejected.
pub const MIN_LEXICON_ENTRIES: usize = 20;

/// Compounds are only attempted for words longer than this many characters.
const COMPOUND_MIN_CHARS: usize = 7;

// ---------------------------------------------------------------------------
// LexiconError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),

    /// The file looks like an HTML page (e.g. a failed download).
    #[error("lexicon file contains HTML, not a pronunciation dictionary")]
    Html,

    #[error("lexicon has only {found} valid entries (minimum {min})", min = MIN_LEXICON_ENTRIES)]
    TooFewEntries { found: usize },
}

// ---------------------------------------------------------------------------
// Phonemizer trait
// ---------------------------------------------------------------------------

/// Grapheme-to-phoneme conversion of a single transcript word.
///
/// Implementations must be `Send + Sync` so the pipeline can share them
/// behind an `Arc<dyn Phonemizer>`.
pub trait Phonemizer: Send + Sync {
    fn phonemize_word(&self, word: &str) -> PhonemeSequence;
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<String>>,
}

impl Lexicon {
    /// Parse a tab-separated pronunciation dictionary from `path`.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let data = std::fs::read_to_string(path)?;
        let lexicon = Self::parse(&data)?;
        log::info!(
            "loaded {} lexicon entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Parse dictionary text.  Malformed lines are skipped.
    pub fn parse(data: &str) -> Result<Self, LexiconError> {
        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for line in data.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.contains("<html") || line.contains("<!DOCTYPE") {
                return Err(LexiconError::Html);
            }
            match line.split_once('\t') {
                Some((word, phones)) if !word.trim().is_empty() => {
                    // MFA dictionaries may carry probability columns before
                    // the phones; the phones are always the last column.
                    let phones = phones.rsplit('\t').next().unwrap_or(phones);
                    entries.insert(
                        word.trim().to_lowercase(),
                        phones.split_whitespace().map(str::to_string).collect(),
                    );
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            log::warn!("lexicon: skipped {skipped} malformed lines");
        }
        if entries.len() < MIN_LEXICON_ENTRIES {
            return Err(LexiconError::TooFewEntries {
                found: entries.len(),
            });
        }

        Ok(Self { entries })
    }

    /// Load from `path` when given and valid, otherwise fall back to
    /// [`Lexicon::builtin`].
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path.map(Self::load) {
            Some(Ok(lexicon)) => lexicon,
            Some(Err(e)) => {
                log::warn!("lexicon unavailable ({e}); using built-in dictionary");
                Self::builtin()
            }
            None => Self::builtin(),
        }
    }

    /// Small built-in German dictionary of common words.
    pub fn builtin() -> Self {
        let entries = BUILTIN_GERMAN
            .iter()
            .map(|(word, phones)| {
                (
                    word.to_string(),
                    phones.split_whitespace().map(str::to_string).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    fn compound(&self, word: &str) -> Option<PhonemeSequence> {
        let chars: Vec<(usize, char)> = word.char_indices().collect();
        if chars.len() < COMPOUND_MIN_CHARS {
            return None;
        }
        // Both parts keep at least three and two characters respectively.
        (3..chars.len() - 2).find_map(|split| {
            let (head, tail) = word.split_at(chars[split].0);
            let head_phones = self.entries.get(head)?;
            let tail_phones = self.entries.get(tail)?;
            log::debug!("lexicon: compound '{word}' split into '{head}' + '{tail}'");
            Some(PhonemeSequence::from_symbols(
                head_phones.iter().chain(tail_phones).cloned(),
            ))
        })
    }
}

impl Phonemizer for Lexicon {
    fn phonemize_word(&self, word: &str) -> PhonemeSequence {
        let normalized = normalize_word(word);
        if normalized.is_empty() {
            return PhonemeSequence::new();
        }

        if let Some(phones) = self.entries.get(&normalized) {
            return PhonemeSequence::from_symbols(phones.iter().cloned());
        }
        if let Some(phones) = self.compound(&normalized) {
            return phones;
        }

        log::warn!("lexicon: '{normalized}' not found, approximating with letters");
        PhonemeSequence::from_chars(&normalized)
    }
}

/// Lower-case and drop punctuation, keeping word characters, `'` and `-`.
fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '\'' || *c == '-')
        .flat_map(char::to_lowercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Built-in dictionary
// ---------------------------------------------------------------------------

static BUILTIN_GERMAN: &[(&str, &str)] = &[
    ("hallo", "h a l o"),
    ("ich", "ɪ ç"),
    ("spreche", "ʃ p ʁ ɛ ç ə"),
    ("deutsch", "d ɔʏ t ʃ"),
    ("wie", "v i:"),
    ("geht", "g e: t"),
    ("es", "ɛ s"),
    ("ihnen", "i: n ə n"),
    ("gut", "g u: t"),
    ("danke", "d a ŋ k ə"),
    ("bitte", "b ɪ t ə"),
    ("ja", "j a:"),
    ("nein", "n aɪ n"),
    ("tag", "t a: k"),
    ("guten", "g u: t ə n"),
    ("morgen", "m ɔ ʁ g ə n"),
    ("abend", "a: b ə n t"),
    ("nacht", "n a x t"),
    ("schön", "ʃ ø: n"),
    ("tschüss", "tʃ ʏ s"),
    ("auf", "aʊ f"),
    ("wiedersehen", "v i: d ɐ z e: ə n"),
    ("heute", "h ɔɪ t ə"),
    ("woche", "v ɔ x ə"),
    ("jahr", "j a: ʁ"),
    ("zeit", "ts aɪ t"),
    ("stunde", "ʃ t ʊ n d ə"),
    ("wasser", "v a s ɐ"),
    ("brot", "b ʁ o: t"),
    ("kaffee", "k a f e:"),
    ("tee", "t e:"),
    ("milch", "m ɪ l ç"),
    ("zucker", "ts ʊ k ɐ"),
    ("heißen", "h aɪ s ə n"),
    ("heiße", "h aɪ s ə"),
    ("sein", "z aɪ n"),
    ("haben", "h a: b ə n"),
    ("können", "k œ n ə n"),
    ("und", "ʊ n t"),
    ("der", "d e: ɐ"),
    ("die", "d i:"),
    ("das", "d a s"),
    ("ein", "aɪ n"),
    ("eine", "aɪ n ə"),
    ("zu", "ts u:"),
    ("von", "f ɔ n"),
    ("mit", "m ɪ t"),
    ("für", "f y: ɐ"),
    ("ist", "ɪ s t"),
    ("sind", "z ɪ n t"),
    ("war", "v a: ɐ"),
    ("machen", "m a x ə n"),
    ("sagen", "z a: g ə n"),
    ("gehen", "g e: ə n"),
    ("kommen", "k ɔ m ə n"),
    ("wissen", "v ɪ s ə n"),
    ("denken", "d ɛ ŋ k ə n"),
    ("finden", "f ɪ n d ə n"),
    ("leben", "l e: b ə n"),
    ("einigermaßen", "aɪ n i g ɐ m a: s ə n"),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
