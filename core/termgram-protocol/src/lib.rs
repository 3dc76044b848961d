#![no_std] // The reading model stays usable from embedded analyzers

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod feats;
pub mod ids;
pub mod morphology;
pub mod reading;

// Re-export core types for convenience
pub use feats::{parse_features, TagParseError};
pub use ids::{DocumentId, PatternId, SentenceId};
pub use morphology::*;
pub use reading::{Reading, Sentence, Token};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use proptest::prelude::*;
    use rkyv::{from_bytes, to_bytes};

    fn any_tag() -> impl Strategy<Value = MorphTag> {
        (
            proptest::option::of(prop::sample::select(Case::ALL)),
            proptest::option::of(prop::sample::select(Animacy::ALL)),
            proptest::option::of(prop::sample::select(Number::ALL)),
            proptest::option::of(prop::sample::select(Tense::ALL)),
            proptest::option::of(prop::sample::select(Degree::ALL)),
            proptest::option::of(prop::sample::select(VerbForm::ALL)),
            proptest::option::of(prop::sample::select(Mood::ALL)),
            proptest::option::of(prop::sample::select(Person::ALL)),
            proptest::option::of(prop::sample::select(Variance::ALL)),
            proptest::option::of(prop::sample::select(Voice::ALL)),
            proptest::option::of(prop::sample::select(Aspect::ALL)),
        )
            .prop_map(
                |(case, animacy, number, tense, degree, verb_form, mood, person, variance, voice, aspect)| MorphTag {
                    case,
                    animacy,
                    number,
                    tense,
                    degree,
                    verb_form,
                    mood,
                    person,
                    variance,
                    voice,
                    aspect,
                },
            )
    }

    proptest! {
        #[test]
        fn test_subset_law(wanted in any_tag(), actual in any_tag()) {
            let expected = (wanted.case.is_none() || wanted.case == actual.case)
                && (wanted.animacy.is_none() || wanted.animacy == actual.animacy)
                && (wanted.number.is_none() || wanted.number == actual.number)
                && (wanted.tense.is_none() || wanted.tense == actual.tense)
                && (wanted.degree.is_none() || wanted.degree == actual.degree)
                && (wanted.verb_form.is_none() || wanted.verb_form == actual.verb_form)
                && (wanted.mood.is_none() || wanted.mood == actual.mood)
                && (wanted.person.is_none() || wanted.person == actual.person)
                && (wanted.variance.is_none() || wanted.variance == actual.variance)
                && (wanted.voice.is_none() || wanted.voice == actual.voice)
                && (wanted.aspect.is_none() || wanted.aspect == actual.aspect);
            prop_assert_eq!(wanted.accepts(&actual), expected);
        }

        #[test]
        fn test_unset_attribute_is_wildcard(wanted in any_tag(), actual in any_tag(), aspect in prop::sample::select(Aspect::ALL)) {
            // Changing an attribute the condition leaves unset never changes the verdict.
            let mut wanted = wanted;
            wanted.aspect = None;
            let mut flipped = actual;
            flipped.aspect = Some(aspect);
            prop_assert_eq!(wanted.accepts(&actual), wanted.accepts(&flipped));
        }

        #[test]
        fn test_feature_string_round_trip(tag in any_tag()) {
            let text = tag.to_string();
            prop_assert_eq!(text.parse::<MorphTag>().unwrap(), tag);
        }
    }

    #[test]
    fn test_specified_mask() {
        let tag: MorphTag = "Case=Gen|Aspect=Perf".parse().unwrap();
        assert_eq!(tag.specified(), AttrMask::CASE | AttrMask::ASPECT);
        assert!(MorphTag::default().specified().is_empty());
    }

    #[test]
    fn test_part_of_speech_names() {
        assert_eq!("noun".parse::<PartOfSpeech>().unwrap(), PartOfSpeech::Noun);
        assert_eq!(PartOfSpeech::Cconj.to_string(), "CCONJ");
        assert!("GERUND".parse::<PartOfSpeech>().is_err());
    }

    #[test]
    fn test_most_probable_reading() {
        let token = Token::new(
            "стали",
            vec![
                Reading::new(PartOfSpeech::Verb, MorphTag::default(), "стать").with_confidence(0.4),
                Reading::new(PartOfSpeech::Noun, MorphTag::default(), "сталь").with_confidence(0.6),
                Reading::new(PartOfSpeech::Noun, MorphTag::default(), "стали").with_confidence(0.6),
            ],
        );
        assert_eq!(token.lemma(), "сталь");
        assert!(token.has_pos(PartOfSpeech::Verb));

        let bare = Token::new("ну", vec![]);
        assert_eq!(bare.lemma(), "ну");
    }

    #[test]
    fn test_sentence_archive() {
        let sentence = Sentence::new(
            DocumentId::new(3),
            SentenceId::new(7),
            vec![Token::new(
                "дом",
                vec![Reading::new(PartOfSpeech::Noun, "Case=Nom|Number=Sing".parse().unwrap(), "дом")],
            )],
        );

        let bytes = to_bytes::<_, 256>(&sentence).expect("Failed to serialize Sentence");
        let restored: Sentence = from_bytes(&bytes).expect("Failed to deserialize Sentence");

        assert_eq!(restored, sentence);
        assert_eq!(restored.tokens[0].readings[0].tag.to_string(), "Case=Nom|Number=Sing");
    }

    #[test]
    fn test_id_layout() {
        assert_eq!(core::mem::size_of::<PatternId>(), 4);
        assert_eq!(PatternId::new(5).index(), 5);
    }
}
