use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The sentence needed more extension steps than allowed.
    #[error("search aborted after {limit} steps")]
    StepBudgetExceeded { limit: usize },

    #[error("search aborted at recursion depth {limit}")]
    DepthExceeded { limit: usize },

    #[error("invalid match options: {0}")]
    InvalidOptions(String),
}
