//! Prompt builder for learner-language feedback.
//!
//! [`PromptBuilder`] produces a `(system_msg, user_msg)` pair for any
//! OpenAI-compatible `/v1/chat/completions` endpoint.  The system message
//! describes the three feedback categories and the required JSON shape; the
//! user message carries the learner's transcript.
//!
//! German (`"de"`) has dedicated instructions written in German.  Any other
//! language code falls back to English instructions.

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Error type labels the model is told to use for German feedback.
pub const ERROR_TYPES_DE: [&str; 4] = [
    "nicht existierendes Wort",
    "grammatikalischer Fehler",
    "stilistischer Fehler",
    "lexikalischer Fehler",
];

/// Error type labels for every other language.
pub const ERROR_TYPES_EN: [&str; 4] = [
    "non-existent word",
    "grammatical error",
    "stylistic error",
    "lexical error",
];

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

/// German: the learner speaks German; feedback is given in German.
const SYSTEM_INSTRUCTION_DE: &str = "\
Du bewertest die Transkription einer gesprochenen deutschen Aufnahme eines Deutschlernenden.
Finde sprachliche Fehler und Stellen, an denen der Ausdruck natürlicher klingen könnte.

Kategorien:
1. mistakes: Fehler, die das Verständnis erschweren. Dazu gehören falsche Artikel,
   falsche Kasusendungen, falsche Konjugation, falsche Wortstellung, falsche Präpositionen,
   erfundene Wörter und Wörter mit falscher Bedeutung im Kontext.
2. inaccuracies: verständliche, aber unnatürliche Stellen. Markiere jedes Füllwort
   (äh, ähm, also, ja), jede Wiederholung, jedes Stottern und jede Selbstkorrektur.
3. vocabularies: einfache Wörter oder Wendungen, für die es treffendere Alternativen gibt.

Regeln:
- \"quote\" muss Zeichen für Zeichen exakt aus der Transkription kopiert werden.
- Gib für mistakes und inaccuracies eine Korrektur an.
- Gib für vocabularies zwei bis vier Synonyme an.";

/// English and every other language.
const SYSTEM_INSTRUCTION_EN: &str = "\
You review the transcript of a spoken recording made by a language learner.
Find language errors and passages that could sound more natural.

Categories:
1. mistakes: errors that hinder understanding, such as wrong articles or case endings,
   wrong conjugation, wrong word order, wrong prepositions, invented words and
   words used with the wrong meaning.
2. inaccuracies: understandable but unnatural passages. Flag every filler word,
   every repetition, every stutter and every self-correction.
3. vocabularies: plain words or phrases for which better alternatives exist.

Rules:
- \"quote\" must be copied character for character from the transcript.
- Give a correction for every mistake and inaccuracy.
- Give two to four synonyms for every vocabulary entry.";

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

const OUTPUT_FORMAT: &str = r#"
Reply with a single JSON object and nothing else:
{
  "mistakes":     [{"quote": "...", "error_type": "...", "correction": "..."}],
  "inaccuracies": [{"quote": "...", "error_type": "...", "correction": "..."}],
  "vocabularies": [{"quote": "...", "synonyms": ["...", "..."]}]
}
"#;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds feedback prompts in chat-message format.
///
/// # Example
/// ```rust
/// use speech_feedback::llm::PromptBuilder;
///
/// let builder = PromptBuilder::new("de");
/// let (system, user) = builder.build_chat("ich habe äh Hunger");
/// assert!(system.contains("mistakes"));
/// assert!(user.contains("ich habe äh Hunger"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
}

impl PromptBuilder {
    /// Create a new builder for the given ISO-639-1 language code.
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Build a **(system_msg, user_msg)** pair.
    ///
    /// * `system_msg`: categories, allowed error types and the JSON shape.
    /// * `user_msg`: the learner's transcript, one speaker turn per line.
    pub fn build_chat(&self, transcript: &str) -> (String, String) {
        let mut system_msg = String::with_capacity(2048);
        system_msg.push_str(self.system_instruction());
        system_msg.push_str("\n\nerror_type: ");
        system_msg.push_str(&self.error_types().join(", "));
        system_msg.push('\n');
        system_msg.push_str(OUTPUT_FORMAT);

        let user_msg = format!("Transcript:\n{transcript}\n");

        (system_msg, user_msg)
    }

    fn system_instruction(&self) -> &'static str {
        match self.language.as_str() {
            "de" => SYSTEM_INSTRUCTION_DE,
            _ => SYSTEM_INSTRUCTION_EN,
        }
    }

    fn error_types(&self) -> &'static [&'static str; 4] {
        match self.language.as_str() {
            "de" => &ERROR_TYPES_DE,
            _ => &ERROR_TYPES_EN,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
