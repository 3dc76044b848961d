use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{Archive, Deserialize, Serialize};
use termgram_protocol::{MorphTag, PartOfSpeech, Reading, Token};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Syntactic role of a slot inside its pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum SyntaxRole {
    Head,
    #[default]
    Dependent,
    Independent,
}

/// Lexical constraints layered on top of the morphological bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Additional {
    /// The slot may match again on further outward tokens.
    #[cfg_attr(feature = "serde", serde(default))]
    pub repeat: bool,
    /// Exact normalized form the reading must carry.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lexeme: Option<String>,
    /// Theme tags. Parsed and stored; no theme source exists yet, so they never reject.
    #[cfg_attr(feature = "serde", serde(default))]
    pub themes: Vec<String>,
}

impl Additional {
    /// No lexeme and no theme requirement. The repeat flag is not a constraint.
    pub fn is_empty(&self) -> bool {
        self.lexeme.is_none() && self.themes.is_empty()
    }

    pub fn matches_lexeme(&self, reading: &Reading) -> bool {
        match &self.lexeme {
            None => true,
            Some(lexeme) => lexeme.to_lowercase() == reading.lemma.to_lowercase(),
        }
    }

    pub fn themes_match(&self, _reading: &Reading) -> bool {
        true
    }

    pub fn matches(&self, reading: &Reading) -> bool {
        self.matches_lexeme(reading) && self.themes_match(reading)
    }
}

/// Everything a slot demands of the token (or span) it binds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Condition {
    #[cfg_attr(feature = "serde", serde(default))]
    pub role: SyntaxRole,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tag: MorphTag,
    #[cfg_attr(feature = "serde", serde(default))]
    pub additional: Additional,
}

impl Condition {
    pub fn new(role: SyntaxRole) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn head() -> Self {
        Self::new(SyntaxRole::Head)
    }

    pub fn dependent() -> Self {
        Self::new(SyntaxRole::Dependent)
    }

    pub fn with_tag(mut self, tag: MorphTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.additional.lexeme = Some(lexeme.into());
        self
    }

    pub fn repeated(mut self) -> Self {
        self.additional.repeat = true;
        self
    }

    pub fn is_head(&self) -> bool {
        self.role == SyntaxRole::Head
    }

    pub fn is_repeated(&self) -> bool {
        self.additional.repeat
    }

    /// Attribute-subset check of the slot bundle against one reading.
    pub fn matches_attributes(&self, reading: &Reading) -> bool {
        self.tag.accepts(&reading.tag)
    }

    pub fn matches_reading(&self, reading: &Reading) -> bool {
        self.matches_attributes(reading) && self.additional.matches(reading)
    }

    /// Universal check used on raw tokens: every reading must carry `pos` and
    /// satisfy the bundle and the lexical constraints. A token without readings
    /// never matches.
    pub fn matches_token(&self, pos: PartOfSpeech, token: &Token) -> bool {
        if token.readings.is_empty() {
            return false;
        }
        for reading in &token.readings {
            if reading.pos != pos {
                return false;
            }
            if !self.matches_reading(reading) {
                return false;
            }
        }
        true
    }

    /// Existential check: some reading of the token satisfies the bundle.
    /// Part of speech is not consulted.
    pub fn accepts_any_reading<'t>(&self, token: &'t Token) -> Option<&'t Reading> {
        token.readings.iter().find(|reading| self.matches_attributes(reading))
    }
}
