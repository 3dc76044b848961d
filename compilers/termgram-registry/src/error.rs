use thiserror::Error;

/// Configuration errors found while building a registry. Matching never
/// produces these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("pattern '{0}' is defined twice")]
    DuplicatePattern(String),

    #[error("pattern '{0}' has no components")]
    EmptyPattern(String),

    #[error("pattern '{pattern}' references unknown pattern '{reference}'")]
    UnknownReference { pattern: String, reference: String },

    #[error("pattern '{0}' is part of a reference cycle")]
    ReferenceCycle(String),

    #[error("pattern '{pattern}' nests {depth} levels deep (limit is {limit})")]
    NestingTooDeep {
        pattern: String,
        depth: usize,
        limit: usize,
    },

    #[error("pattern archive is invalid: {0}")]
    Archive(String),
}
