//! [`PhonemeSequence`]: an ordered list of indivisible phoneme symbols.
//!
//! A symbol may be visually multi-character (`"aɪ"`, `"tʃ"`, `"e:"`) but is
//! always compared as one token.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhonemeSequence {
    symbols: Vec<String>,
}

impl PhonemeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Whitespace-delimited symbols, as phoneme recognizers print them
    /// (`"h a l o"`, `"t aɪ t"`).
    pub fn parse_spaced(text: &str) -> Self {
        Self::from_symbols(text.split_whitespace())
    }

    /// One symbol per non-whitespace character.
    pub fn from_chars(text: &str) -> Self {
        Self::from_symbols(
            text.chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from),
        )
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn push(&mut self, symbol: impl Into<String>) {
        self.symbols.push(symbol.into());
    }

    pub fn extend(&mut self, other: &PhonemeSequence) {
        self.symbols.extend(other.symbols.iter().cloned());
    }

    /// Symbols rendered back to back, with no separator.
    pub fn concat(&self) -> String {
        self.symbols.concat()
    }

    /// Flatten per-word sequences into one, without injecting boundaries.
    pub fn flatten(words: &[PhonemeSequence]) -> Self {
        let mut flat = Self::with_capacity(words.iter().map(PhonemeSequence::len).sum());
        for word in words {
            flat.extend(word);
        }
        flat
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: Vec::with_capacity(capacity),
        }
    }
}

impl fmt::Display for PhonemeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for PhonemeSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_symbols(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spaced_keeps_multichar_symbols_whole() {
        let seq = PhonemeSequence::parse_spaced("  ts aɪ t ");
        assert_eq!(seq.symbols(), &["ts", "aɪ", "t"]);
        assert_eq!(seq.concat(), "tsaɪt");
        assert_eq!(seq.to_string(), "ts aɪ t");
    }

    #[test]
    fn from_chars_splits_per_character() {
        let seq = PhonemeSequence::from_chars("ʃ ø n");
        assert_eq!(seq.symbols(), &["ʃ", "ø", "n"]);
    }

    #[test]
    fn flatten_injects_no_separator() {
        let words = vec![
            PhonemeSequence::parse_spaced("h a l o"),
            PhonemeSequence::new(),
            PhonemeSequence::parse_spaced("v ɛ l t"),
        ];
        let flat = PhonemeSequence::flatten(&words);
        assert_eq!(flat.len(), 8);
        assert_eq!(flat.concat(), "halovɛlt");
    }

    #[test]
    fn serializes_as_plain_list() {
        let seq: PhonemeSequence = ["a", "b"].into_iter().collect();
        assert_eq!(serde_json::to_string(&seq).unwrap(), r#"["a","b"]"#);
    }
}
