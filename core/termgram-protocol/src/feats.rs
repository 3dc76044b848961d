//! `Name=Value|Name=Value` feature strings, the notation pattern files and
//! analyzers use for morphological bundles.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::all_consuming,
    multi::separated_list1,
    sequence::separated_pair,
    IResult,
};

use crate::morphology::MorphTag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagParseError {
    Syntax(String),
    UnknownFeature(String),
    UnknownValue { feature: String, value: String },
    DuplicateFeature(String),
    UnknownPartOfSpeech(String),
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagParseError::Syntax(input) => write!(f, "Malformed feature string: '{}'", input),
            TagParseError::UnknownFeature(name) => write!(f, "Unknown feature: '{}'", name),
            TagParseError::UnknownValue { feature, value } => {
                write!(f, "Unknown value '{}' for feature '{}'", value, feature)
            }
            TagParseError::DuplicateFeature(name) => write!(f, "Feature '{}' given twice", name),
            TagParseError::UnknownPartOfSpeech(tag) => write!(f, "Unknown part of speech: '{}'", tag),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TagParseError {}

fn is_feature_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn feature(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(take_while1(is_feature_char), char('='), take_while1(is_feature_char))(input)
}

fn features(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    all_consuming(separated_list1(char('|'), feature))(input)
}

/// Parses a feature string into a [`MorphTag`]. An empty string or `_` is the
/// empty bundle.
pub fn parse_features(input: &str) -> Result<MorphTag, TagParseError> {
    let input = input.trim();
    if input.is_empty() || input == "_" {
        return Ok(MorphTag::default());
    }

    let (_, pairs) = features(input).map_err(|_| TagParseError::Syntax(input.to_string()))?;

    let mut tag = MorphTag::default();
    for (name, value) in pairs {
        tag.set_feature(name, value)?;
    }
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{Case, Number, Person};

    #[test]
    fn test_parse_bundle() {
        let tag = parse_features("Case=Gen|Number=Plur|Person=3").unwrap();
        assert_eq!(tag.case, Some(Case::Genitive));
        assert_eq!(tag.number, Some(Number::Plural));
        assert_eq!(tag.person, Some(Person::Third));
        assert!(tag.animacy.is_none());
    }

    #[test]
    fn test_empty_bundle() {
        assert!(parse_features("_").unwrap().is_empty());
        assert!(parse_features("  ").unwrap().is_empty());
    }

    #[test]
    fn test_display_matches_parse_order() {
        let tag = parse_features("Number=Sing|Case=Nom").unwrap();
        assert_eq!(tag.to_string(), "Case=Nom|Number=Sing");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            parse_features("Case=Foo"),
            Err(TagParseError::UnknownValue { feature: "Case".to_string(), value: "Foo".to_string() })
        );
        assert_eq!(parse_features("Gender=Masc"), Err(TagParseError::UnknownFeature("Gender".to_string())));
        assert_eq!(parse_features("Case=Nom|Case=Gen"), Err(TagParseError::DuplicateFeature("Case".to_string())));
        assert!(matches!(parse_features("Case=Nom|"), Err(TagParseError::Syntax(_))));
        assert!(matches!(parse_features("Case"), Err(TagParseError::Syntax(_))));
    }
}
