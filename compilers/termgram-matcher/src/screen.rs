use std::collections::HashSet;

use termgram_protocol::{PartOfSpeech, Token};
use termgram_registry::Registry;

/// Surface made only of ASCII digits and punctuation ("2024", "--", "3.14").
pub fn is_misclassified(token: &Token) -> bool {
    token
        .text
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_punctuation())
}

/// A single-character "word" the analyzer tagged as a content word with no
/// alternative. These are almost always initials or stray letters.
pub fn is_analysis_error(token: &Token) -> bool {
    let mut chars = token.text.chars();
    let single_char = chars.next().is_some() && chars.next().is_none();

    single_char
        && token.readings.len() == 1
        && matches!(
            token.readings[0].pos,
            PartOfSpeech::Adj | PartOfSpeech::Noun | PartOfSpeech::Propn | PartOfSpeech::Verb
        )
}

/// Cheap pre-filters run before any condition check.
#[derive(Debug, Clone, Copy)]
pub struct TokenScreen<'r> {
    registry: &'r Registry,
}

impl<'r> TokenScreen<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Token has readings, is not noise, and some reading carries a part of
    /// speech that any pattern slot uses.
    pub fn is_usable(&self, token: &Token) -> bool {
        !token.readings.is_empty()
            && !token.text.trim().is_empty()
            && !is_misclassified(token)
            && !is_analysis_error(token)
            && token.readings.iter().any(|r| self.registry.is_used_pos(r.pos))
    }

    /// Some reading could fill a head word slot.
    pub fn is_head_candidate(&self, token: &Token) -> bool {
        token.readings.iter().any(|r| self.registry.is_head_pos(r.pos))
    }
}

/// Lowercased words excluded from composite word-slot steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> Self {
        let words = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Checks the lowercased surface form, then the lemma.
    pub fn contains(&self, token: &Token) -> bool {
        self.words.contains(&token.text.to_lowercase()) || self.words.contains(&token.lemma().to_lowercase())
    }
}

impl<'a> FromIterator<&'a str> for StopWords {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut stop_words = StopWords::new();
        for word in iter {
            stop_words.insert(word);
        }
        stop_words
    }
}
