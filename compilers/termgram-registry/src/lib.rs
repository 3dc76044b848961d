pub mod archive;
pub mod error;
pub mod graph;
pub mod registry;

pub use archive::{decode_patterns, encode_patterns};
pub use error::GrammarError;
pub use graph::ReferenceGraph;
pub use registry::{Registry, RegistryBuilder, DEFAULT_MAX_NESTING};

#[cfg(test)]
mod tests {
    use super::*;
    use termgram_grammar::{Component, Condition, Pattern, PatternSet};
    use termgram_protocol::{PartOfSpeech, PatternId};

    fn leaf(name: &str, pos: PartOfSpeech) -> Pattern {
        Pattern::new(name, vec![Component::word(pos, Condition::head())])
    }

    fn pair(name: &str, left: &str, right: &str) -> Pattern {
        Pattern::new(
            name,
            vec![
                Component::model(left, Condition::head()),
                Component::model(right, Condition::dependent()),
            ],
        )
    }

    #[test]
    fn test_classification_and_order() {
        let registry = Registry::builder()
            .pattern(leaf("Прил", PartOfSpeech::Adj))
            .pattern(pair("Прил+С", "Прил", "С"))
            .pattern(leaf("С", PartOfSpeech::Noun))
            .pattern(Pattern::new(
                "С+С2",
                vec![
                    Component::word(PartOfSpeech::Noun, Condition::head()),
                    Component::word(PartOfSpeech::Propn, Condition::dependent()),
                ],
            ))
            .build()
            .unwrap();

        assert_eq!(registry.len(), 4);
        let leaves: Vec<_> = registry.leaf_patterns().map(|p| p.name.as_str()).collect();
        assert_eq!(leaves, vec!["Прил", "С", "С+С2"]);
        assert_eq!(registry.composite_count(), 1);

        assert!(registry.is_head_pos(PartOfSpeech::Noun));
        assert!(!registry.is_head_pos(PartOfSpeech::Propn));
        assert!(registry.is_used_pos(PartOfSpeech::Propn));
        assert!(!registry.is_used_pos(PartOfSpeech::Verb));

        assert_eq!(registry.by_name("С").map(|p| p.len()), Some(1));
        assert_eq!(registry.id_of("Прил+С"), Some(PatternId(1)));
        assert_eq!(registry.nesting_depth(PatternId(1)), Some(1));
        assert_eq!(registry.nesting_depth(PatternId(0)), Some(0));
    }

    #[test]
    fn test_rejects_bad_grammars() {
        let duplicate = Registry::builder()
            .pattern(leaf("С", PartOfSpeech::Noun))
            .pattern(leaf("С", PartOfSpeech::Propn))
            .build();
        assert_eq!(duplicate.unwrap_err(), GrammarError::DuplicatePattern("С".into()));

        let empty = Registry::builder().pattern(Pattern::new("void", vec![])).build();
        assert_eq!(empty.unwrap_err(), GrammarError::EmptyPattern("void".into()));

        let dangling = Registry::builder().pattern(pair("A+B", "A", "B")).pattern(leaf("A", PartOfSpeech::Noun)).build();
        assert_eq!(
            dangling.unwrap_err(),
            GrammarError::UnknownReference { pattern: "A+B".into(), reference: "B".into() }
        );

        let cyclic = Registry::builder()
            .pattern(leaf("A", PartOfSpeech::Noun))
            .pattern(pair("X", "A", "Y"))
            .pattern(pair("Y", "A", "X"))
            .build();
        assert!(matches!(cyclic, Err(GrammarError::ReferenceCycle(_))));
    }

    #[test]
    fn test_nesting_ceiling() {
        let patterns = vec![
            leaf("A", PartOfSpeech::Noun),
            pair("L1", "A", "A"),
            pair("L2", "L1", "A"),
            pair("L3", "L2", "A"),
        ];

        let registry = Registry::builder().patterns(patterns.clone()).with_max_nesting(3).build().unwrap();
        assert_eq!(registry.nesting_depth(PatternId(3)), Some(3));

        let err = Registry::builder().patterns(patterns).with_max_nesting(2).build().unwrap_err();
        assert_eq!(err, GrammarError::NestingTooDeep { pattern: "L3".into(), depth: 3, limit: 2 });
    }

    #[test]
    fn test_headless_pattern_is_accepted() {
        let registry = Registry::builder()
            .pattern(Pattern::new("N", vec![Component::word(PartOfSpeech::Noun, Condition::dependent())]))
            .build()
            .unwrap();
        assert_eq!(registry.leaf_count(), 1);
        assert!(registry.head_pos().is_empty());
    }

    #[test]
    fn test_pattern_archive() {
        let set = PatternSet::new(
            2,
            vec![
                leaf("Прил", PartOfSpeech::Adj),
                leaf("С", PartOfSpeech::Noun),
                Pattern::new(
                    "Прил+С",
                    vec![
                        Component::model("Прил", Condition::dependent().with_tag("Case=Nom".parse().unwrap())),
                        Component::model("С", Condition::head().with_lexeme("дом").repeated()),
                    ],
                ),
            ],
        );

        let bytes = encode_patterns(&set).expect("Failed to archive patterns");
        let restored = decode_patterns(&bytes).expect("Failed to read archive");
        assert_eq!(restored, set);

        let registry = Registry::from_set(restored).unwrap();
        assert_eq!(registry.to_set(2), set);

        assert!(matches!(decode_patterns(&[1, 2, 3]), Err(GrammarError::Archive(_))));
    }
}
