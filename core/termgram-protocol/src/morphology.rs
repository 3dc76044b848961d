use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use alloc::string::{String, ToString};
use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;

use crate::feats::{parse_features, TagParseError};

/// Universal part-of-speech tags, as emitted by the upstream analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum PartOfSpeech {
    Noun = 0,
    Propn = 1,
    Adj = 2,
    Verb = 3,
    Adv = 4,
    Adp = 5,
    Aux = 6,
    Cconj = 7,
    Sconj = 8,
    Det = 9,
    Intj = 10,
    Num = 11,
    Part = 12,
    Pron = 13,
    Punct = 14,
    Sym = 15,
    X = 16,
}

impl PartOfSpeech {
    pub const ALL: &'static [PartOfSpeech] = &[
        PartOfSpeech::Noun,
        PartOfSpeech::Propn,
        PartOfSpeech::Adj,
        PartOfSpeech::Verb,
        PartOfSpeech::Adv,
        PartOfSpeech::Adp,
        PartOfSpeech::Aux,
        PartOfSpeech::Cconj,
        PartOfSpeech::Sconj,
        PartOfSpeech::Det,
        PartOfSpeech::Intj,
        PartOfSpeech::Num,
        PartOfSpeech::Part,
        PartOfSpeech::Pron,
        PartOfSpeech::Punct,
        PartOfSpeech::Sym,
        PartOfSpeech::X,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::X => "X",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PartOfSpeech::ALL
            .iter()
            .copied()
            .find(|pos| pos.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TagParseError::UnknownPartOfSpeech(s.to_string()))
    }
}

/// Declares one morphological attribute: its feature name in `Name=Value`
/// notation and the accepted values.
macro_rules! define_feature {
    ($(#[$meta:meta])* $name:ident, $feature:literal { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
        #[archive(check_bytes)]
        #[repr(u8)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const FEATURE: &'static str = $feature;
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn from_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

define_feature!(Case, "Case" {
    Nominative => "Nom",
    Genitive => "Gen",
    Dative => "Dat",
    Accusative => "Acc",
    Instrumental => "Ins",
    Locative => "Loc",
    Vocative => "Voc",
    Partitive => "Par",
});

define_feature!(Animacy, "Animacy" {
    Animate => "Anim",
    Inanimate => "Inan",
});

define_feature!(Number, "Number" {
    Singular => "Sing",
    Plural => "Plur",
});

define_feature!(Tense, "Tense" {
    Past => "Past",
    Present => "Pres",
    Future => "Fut",
});

define_feature!(
    /// Comparison degree of adjectives and adverbs.
    Degree, "Degree" {
        Positive => "Pos",
        Comparative => "Cmp",
        Superlative => "Sup",
    }
);

define_feature!(VerbForm, "VerbForm" {
    Finite => "Fin",
    Infinitive => "Inf",
    Participle => "Part",
    Converb => "Conv",
});

define_feature!(Mood, "Mood" {
    Indicative => "Ind",
    Imperative => "Imp",
    Conditional => "Cnd",
});

define_feature!(Person, "Person" {
    First => "1",
    Second => "2",
    Third => "3",
});

define_feature!(
    /// Short vs. full form of adjectives and participles.
    Variance, "Variant" {
        Short => "Short",
        Full => "Full",
    }
);

define_feature!(Voice, "Voice" {
    Active => "Act",
    Passive => "Pass",
    Middle => "Mid",
});

define_feature!(Aspect, "Aspect" {
    Perfective => "Perf",
    Imperfective => "Imp",
});

bitflags! {
    /// Which attributes of a [`MorphTag`] are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct AttrMask: u16 {
        const CASE = 1;
        const ANIMACY = 1 << 1;
        const NUMBER = 1 << 2;
        const TENSE = 1 << 3;
        const DEGREE = 1 << 4;
        const VERB_FORM = 1 << 5;
        const MOOD = 1 << 6;
        const PERSON = 1 << 7;
        const VARIANCE = 1 << 8;
        const VOICE = 1 << 9;
        const ASPECT = 1 << 10;
    }
}

/// A morphological attribute bundle. Every attribute is optional; an unset
/// attribute in a condition is a wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[archive(check_bytes)]
pub struct MorphTag {
    pub case: Option<Case>,
    pub animacy: Option<Animacy>,
    pub number: Option<Number>,
    pub tense: Option<Tense>,
    pub degree: Option<Degree>,
    pub verb_form: Option<VerbForm>,
    pub mood: Option<Mood>,
    pub person: Option<Person>,
    pub variance: Option<Variance>,
    pub voice: Option<Voice>,
    pub aspect: Option<Aspect>,
}

/// Subset rule for one attribute: a wanted value must be present and equal.
fn attribute_accepts<T: PartialEq>(wanted: &Option<T>, actual: &Option<T>) -> bool {
    match wanted {
        None => true,
        Some(value) => actual.as_ref() == Some(value),
    }
}

fn assign<T>(slot: &mut Option<T>, parsed: Option<T>, name: &str, value: &str) -> Result<(), TagParseError> {
    if slot.is_some() {
        return Err(TagParseError::DuplicateFeature(name.to_string()));
    }
    let parsed = parsed.ok_or_else(|| TagParseError::UnknownValue {
        feature: name.to_string(),
        value: value.to_string(),
    })?;
    *slot = Some(parsed);
    Ok(())
}

impl MorphTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.specified().is_empty()
    }

    pub fn specified(&self) -> AttrMask {
        let mut mask = AttrMask::empty();
        mask.set(AttrMask::CASE, self.case.is_some());
        mask.set(AttrMask::ANIMACY, self.animacy.is_some());
        mask.set(AttrMask::NUMBER, self.number.is_some());
        mask.set(AttrMask::TENSE, self.tense.is_some());
        mask.set(AttrMask::DEGREE, self.degree.is_some());
        mask.set(AttrMask::VERB_FORM, self.verb_form.is_some());
        mask.set(AttrMask::MOOD, self.mood.is_some());
        mask.set(AttrMask::PERSON, self.person.is_some());
        mask.set(AttrMask::VARIANCE, self.variance.is_some());
        mask.set(AttrMask::VOICE, self.voice.is_some());
        mask.set(AttrMask::ASPECT, self.aspect.is_some());
        mask
    }

    /// Attribute-subset check: every attribute set on `self` must also be set
    /// on `other` with the same value. Unset attributes always pass.
    pub fn accepts(&self, other: &MorphTag) -> bool {
        attribute_accepts(&self.case, &other.case)
            && attribute_accepts(&self.animacy, &other.animacy)
            && attribute_accepts(&self.number, &other.number)
            && attribute_accepts(&self.tense, &other.tense)
            && attribute_accepts(&self.degree, &other.degree)
            && attribute_accepts(&self.verb_form, &other.verb_form)
            && attribute_accepts(&self.mood, &other.mood)
            && attribute_accepts(&self.person, &other.person)
            && attribute_accepts(&self.variance, &other.variance)
            && attribute_accepts(&self.voice, &other.voice)
            && attribute_accepts(&self.aspect, &other.aspect)
    }

    /// Sets one attribute from its `Name=Value` spelling.
    pub fn set_feature(&mut self, name: &str, value: &str) -> Result<(), TagParseError> {
        match name {
            Case::FEATURE => assign(&mut self.case, Case::from_value(value), name, value),
            Animacy::FEATURE => assign(&mut self.animacy, Animacy::from_value(value), name, value),
            Number::FEATURE => assign(&mut self.number, Number::from_value(value), name, value),
            Tense::FEATURE => assign(&mut self.tense, Tense::from_value(value), name, value),
            Degree::FEATURE => assign(&mut self.degree, Degree::from_value(value), name, value),
            VerbForm::FEATURE => assign(&mut self.verb_form, VerbForm::from_value(value), name, value),
            Mood::FEATURE => assign(&mut self.mood, Mood::from_value(value), name, value),
            Person::FEATURE => assign(&mut self.person, Person::from_value(value), name, value),
            Variance::FEATURE => assign(&mut self.variance, Variance::from_value(value), name, value),
            Voice::FEATURE => assign(&mut self.voice, Voice::from_value(value), name, value),
            Aspect::FEATURE => assign(&mut self.aspect, Aspect::from_value(value), name, value),
            _ => Err(TagParseError::UnknownFeature(name.to_string())),
        }
    }
}

impl fmt::Display for MorphTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let features = [
            self.case.map(|v| (Case::FEATURE, v.as_str())),
            self.animacy.map(|v| (Animacy::FEATURE, v.as_str())),
            self.number.map(|v| (Number::FEATURE, v.as_str())),
            self.tense.map(|v| (Tense::FEATURE, v.as_str())),
            self.degree.map(|v| (Degree::FEATURE, v.as_str())),
            self.verb_form.map(|v| (VerbForm::FEATURE, v.as_str())),
            self.mood.map(|v| (Mood::FEATURE, v.as_str())),
            self.person.map(|v| (Person::FEATURE, v.as_str())),
            self.variance.map(|v| (Variance::FEATURE, v.as_str())),
            self.voice.map(|v| (Voice::FEATURE, v.as_str())),
            self.aspect.map(|v| (Aspect::FEATURE, v.as_str())),
        ];

        let mut written = false;
        for (name, value) in features.iter().flatten() {
            if written {
                f.write_str("|")?;
            }
            write!(f, "{}={}", name, value)?;
            written = true;
        }
        if !written {
            f.write_str("_")?;
        }
        Ok(())
    }
}

impl FromStr for MorphTag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_features(s)
    }
}

impl TryFrom<String> for MorphTag {
    type Error = TagParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_features(&value)
    }
}

impl From<MorphTag> for String {
    fn from(tag: MorphTag) -> String {
        tag.to_string()
    }
}
