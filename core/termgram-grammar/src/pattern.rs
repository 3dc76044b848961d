use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use rkyv::{Archive, Deserialize, Serialize};
use termgram_protocol::PartOfSpeech;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::condition::Condition;

/// Matches exactly one raw token.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct WordSlot {
    pub pos: PartOfSpeech,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Condition,
}

/// Matches a span already recognized by the named pattern.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct ModelSlot {
    pub pattern: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(tag = "slot", rename_all = "lowercase"))]
#[archive(check_bytes)]
pub enum Component {
    Word(WordSlot),
    Model(ModelSlot),
}

impl Component {
    pub fn word(pos: PartOfSpeech, condition: Condition) -> Self {
        Component::Word(WordSlot { pos, condition })
    }

    pub fn model(pattern: impl Into<String>, condition: Condition) -> Self {
        Component::Model(ModelSlot {
            pattern: pattern.into(),
            condition,
        })
    }

    pub fn condition(&self) -> &Condition {
        match self {
            Component::Word(slot) => &slot.condition,
            Component::Model(slot) => &slot.condition,
        }
    }

    pub fn is_head(&self) -> bool {
        self.condition().is_head()
    }

    pub fn as_word(&self) -> Option<&WordSlot> {
        match self {
            Component::Word(slot) => Some(slot),
            Component::Model(_) => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelSlot> {
        match self {
            Component::Model(slot) => Some(slot),
            Component::Word(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Word slots only.
    Leaf,
    /// At least one model slot.
    Composite,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Leaf => f.write_str("leaf"),
            PatternKind::Composite => f.write_str("composite"),
        }
    }
}

/// A named, ordered spine of slots around its head.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Pattern {
    pub name: String,
    pub components: Vec<Component>,
}

impl Pattern {
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn kind(&self) -> PatternKind {
        if self.components.iter().any(|c| matches!(c, Component::Model(_))) {
            PatternKind::Composite
        } else {
            PatternKind::Leaf
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind() == PatternKind::Leaf
    }

    /// Index of the first head-role slot. Extra head slots are ignored.
    pub fn head_index(&self) -> Option<usize> {
        self.components.iter().position(Component::is_head)
    }

    /// The head slot when it is a word slot.
    pub fn head_word(&self) -> Option<&WordSlot> {
        self.head_index()
            .and_then(|index| self.components.get(index))
            .and_then(Component::as_word)
    }

    /// Index of the first model slot referencing `name`.
    pub fn model_slot_index(&self, name: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|c| matches!(c, Component::Model(slot) if slot.pattern == name))
    }

    /// Names of the patterns this one references, in slot order.
    pub fn references(&self) -> impl Iterator<Item = &str> + '_ {
        self.components
            .iter()
            .filter_map(Component::as_model)
            .map(|slot| slot.pattern.as_str())
    }

    pub fn word_slots(&self) -> impl Iterator<Item = &WordSlot> + '_ {
        self.components.iter().filter_map(Component::as_word)
    }
}

/// The unit a pattern loader hands over: a versioned list of patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct PatternSet {
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: u32,
    pub patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn new(version: u32, patterns: Vec<Pattern>) -> Self {
        Self { version, patterns }
    }
}
