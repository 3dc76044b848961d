/// Bookkeeping for one pattern attempt. Copied into every branch of the
/// search so a failed branch cannot leak state into its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStatus {
    /// A head-role slot has been checked.
    pub head_checked: bool,
    /// ... and it passed.
    pub head_matched: bool,
    pub lexicon_satisfied: bool,
    /// Components successfully bound so far.
    pub consumed: usize,
}

impl MatchStatus {
    /// Status for a pattern that has no head slot at all; there is nothing
    /// left to check.
    pub fn headless() -> Self {
        Self {
            head_checked: true,
            head_matched: true,
            ..Self::default()
        }
    }

    /// Records the outcome of a head check. Only the first one counts.
    pub fn record_head(&mut self, matched: bool) {
        if !self.head_checked {
            self.head_checked = true;
            self.head_matched = matched;
        }
    }

    pub fn is_complete(&self, pattern_len: usize) -> bool {
        self.head_checked && self.head_matched && self.lexicon_satisfied && self.consumed >= pattern_len
    }
}
