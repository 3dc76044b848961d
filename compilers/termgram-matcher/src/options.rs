//! Matcher configuration.
//!
//! [`MatchOptions`] is the only knob set the two passes read. It is cheap to
//! clone and loads from JSON; every field has a default, so a partial file
//! works.
//!
//! ```rust
//! use termgram_matcher::MatchOptions;
//!
//! let options = MatchOptions::default()
//!     .with_clean_stop_words(true)
//!     .with_max_steps(10_000);
//! assert!(options.validate().is_ok());
//! ```
use serde::{Deserialize, Serialize};

use crate::error::MatchError;

pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// Runtime options for phrase extraction.
///
/// # Fields
///
/// - `clean_stop_words`: reject stop words in composite word-slot steps
/// - `validate_boundaries`: run the boundary reduction on composite output
/// - `max_depth`: recursion ceiling for the composite walk
/// - `max_steps`: extension steps allowed per sentence, both passes together
///
/// ```json
/// {
///   "clean_stop_words": false,
///   "validate_boundaries": true,
///   "max_depth": 256,
///   "max_steps": 100000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub clean_stop_words: bool,
    pub validate_boundaries: bool,
    pub max_depth: usize,
    pub max_steps: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            clean_stop_words: false,
            validate_boundaries: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl MatchOptions {
    pub fn with_clean_stop_words(mut self, enabled: bool) -> Self {
        self.clean_stop_words = enabled;
        self
    }

    pub fn with_validate_boundaries(mut self, enabled: bool) -> Self {
        self.validate_boundaries = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Both ceilings must leave room for at least one step.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_depth == 0 {
            return Err(MatchError::InvalidOptions("max_depth must be at least 1".into()));
        }
        if self.max_steps == 0 {
            return Err(MatchError::InvalidOptions("max_steps must be at least 1".into()));
        }
        Ok(())
    }
}
