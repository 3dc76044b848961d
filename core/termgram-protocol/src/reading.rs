use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::{DocumentId, SentenceId};
use crate::morphology::{MorphTag, PartOfSpeech};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

#[cfg(feature = "serde")]
fn default_confidence() -> f32 {
    1.0
}

/// One candidate analysis of a token.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Reading {
    pub pos: PartOfSpeech,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tag: MorphTag,
    /// Normalized (dictionary) form.
    pub lemma: String,
    #[cfg_attr(feature = "serde", serde(default = "default_confidence"))]
    pub confidence: f32,
}

impl Reading {
    pub fn new(pos: PartOfSpeech, tag: MorphTag, lemma: impl Into<String>) -> Self {
        Self {
            pos,
            tag,
            lemma: lemma.into(),
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

/// A sentence position: the surface form and every reading the analyzer kept.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Token {
    pub text: String,
    pub readings: Vec<Reading>,
}

impl Token {
    pub fn new(text: impl Into<String>, readings: Vec<Reading>) -> Self {
        Self {
            text: text.into(),
            readings,
        }
    }

    /// Highest-confidence reading; the first one wins a tie.
    pub fn most_probable(&self) -> Option<&Reading> {
        self.readings
            .iter()
            .reduce(|best, reading| if reading.confidence > best.confidence { reading } else { best })
    }

    /// Lemma of the most probable reading, falling back to the surface form.
    pub fn lemma(&self) -> &str {
        self.most_probable()
            .map(|reading| reading.lemma.as_str())
            .unwrap_or(self.text.as_str())
    }

    pub fn has_pos(&self, pos: PartOfSpeech) -> bool {
        self.readings.iter().any(|reading| reading.pos == pos)
    }
}

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Sentence {
    #[cfg_attr(feature = "serde", serde(default))]
    pub document: DocumentId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: SentenceId,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(document: DocumentId, id: SentenceId, tokens: Vec<Token>) -> Self {
        Self { document, id, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
