use termgram_grammar::Pattern;
use termgram_protocol::{Sentence, Token};
use termgram_registry::Registry;
use tracing::trace;

use crate::budget::SearchBudget;
use crate::error::MatchError;
use crate::options::MatchOptions;
use crate::screen::{StopWords, TokenScreen};
use crate::word_complex::{Side, WordComplex};

/// Appends `wc` unless the previous emission has the same surface text.
pub(crate) fn emit<'a>(collection: &mut Vec<WordComplex<'a>>, wc: WordComplex<'a>) {
    let repeated = collection.last().map_or(false, |prev| prev.text == wc.text);
    if !repeated {
        collection.push(wc);
    }
}

/// Leaf ("simple") pass: anchors every leaf pattern at each head token and
/// grows it token by token toward both pattern ends.
#[derive(Debug, Clone, Copy)]
pub struct LeafMatcher<'r, 'w> {
    registry: &'r Registry,
    screen: TokenScreen<'r>,
    clean_stop_words: bool,
    stop_words: &'w StopWords,
}

impl<'r, 'w> LeafMatcher<'r, 'w> {
    pub fn new(registry: &'r Registry, options: &MatchOptions, stop_words: &'w StopWords) -> Self {
        Self {
            registry,
            screen: TokenScreen::new(registry),
            clean_stop_words: options.clean_stop_words,
            stop_words,
        }
    }

    fn is_stop_word(&self, token: &Token) -> bool {
        self.clean_stop_words && self.stop_words.contains(token)
    }

    /// Every leaf occurrence, ordered by anchor position and then by pattern
    /// registration order.
    pub fn collect<'s>(&self, sentence: &'s Sentence, budget: &mut SearchBudget) -> Result<Vec<WordComplex<'s>>, MatchError>
    where
        'r: 's,
    {
        let mut collection = Vec::new();

        for (index, token) in sentence.tokens.iter().enumerate() {
            // 1. Generic usability, stop word and head pre-filters
            if !self.screen.is_usable(token) || self.is_stop_word(token) || !self.screen.is_head_candidate(token) {
                trace!(index, text = %token.text, "token screened out");
                continue;
            }

            for pattern in self.registry.leaf_patterns() {
                // 2. Head check
                let (Some(head), Some(slot)) = (pattern.head_index(), pattern.head_word()) else {
                    continue;
                };
                if !slot.condition.matches_token(slot.pos, token) {
                    continue;
                }
                budget.step()?;

                // 3. Anchor and extend
                let Some(anchor) = WordComplex::anchor(sentence, index, &pattern.name) else {
                    continue;
                };
                trace!(index, pattern = %pattern.name, "leaf anchor");
                self.extend(pattern, head, anchor, sentence, budget, &mut collection)?;
            }
        }

        Ok(collection)
    }

    fn extend<'s>(
        &self,
        pattern: &'s Pattern,
        head: usize,
        anchor: WordComplex<'s>,
        sentence: &'s Sentence,
        budget: &mut SearchBudget,
        collection: &mut Vec<WordComplex<'s>>,
    ) -> Result<(), MatchError> {
        if pattern.len() == 1 {
            emit(collection, anchor);
            return Ok(());
        }

        // The right side grows from the longest completed left match, or from
        // the bare anchor when the left side did not complete.
        let mut right_seed = anchor.clone();

        if head > 0 {
            let mut completed = Vec::new();
            self.extend_side(pattern, Side::Left, head - 1, anchor, sentence, budget, &mut completed)?;
            if let Some(longest) = completed.last() {
                right_seed = longest.clone();
            }
            for wc in completed {
                emit(collection, wc);
            }
        }

        if head + 1 < pattern.len() {
            let mut completed = Vec::new();
            self.extend_side(pattern, Side::Right, head + 1, right_seed, sentence, budget, &mut completed)?;
            for wc in completed {
                emit(collection, wc);
            }
        }

        Ok(())
    }

    /// Walks one side to its boundary slot. Each time the boundary slot binds
    /// a token, a snapshot goes to `completed`; a repeated boundary slot keeps
    /// binding further outward tokens.
    #[allow(clippy::too_many_arguments)]
    fn extend_side<'s>(
        &self,
        pattern: &'s Pattern,
        side: Side,
        mut component: usize,
        mut wc: WordComplex<'s>,
        sentence: &'s Sentence,
        budget: &mut SearchBudget,
        completed: &mut Vec<WordComplex<'s>>,
    ) -> Result<(), MatchError> {
        let boundary = side.boundary(pattern.len());

        loop {
            budget.step()?;

            let Some(position) = side.next_position(wc.span, sentence.len()) else {
                return Ok(());
            };
            let token = &sentence.tokens[position];
            let Some(slot) = pattern.component(component).and_then(|c| c.as_word()) else {
                return Ok(());
            };

            if !self.screen.is_usable(token) || self.is_stop_word(token) || !slot.condition.matches_token(slot.pos, token) {
                trace!(position, component, ?side, "leaf side failed");
                return Ok(());
            }
            wc.push(side, position, token);

            if component != boundary {
                component = side.next_component(component);
                continue;
            }

            completed.push(wc.clone());
            if !slot.condition.is_repeated() {
                return Ok(());
            }
        }
    }
}
