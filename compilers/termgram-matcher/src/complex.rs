use std::collections::{HashMap, HashSet};

use termgram_grammar::{Component, ModelSlot, Pattern, WordSlot};
use termgram_protocol::Sentence;
use termgram_registry::Registry;
use tracing::{debug, trace};

use crate::budget::SearchBudget;
use crate::error::MatchError;
use crate::options::MatchOptions;
use crate::screen::{StopWords, TokenScreen};
use crate::simple::emit;
use crate::status::MatchStatus;
use crate::word_complex::{Side, Span, WordComplex};

/// Leaf matches addressable by where they start and end.
struct LeafIndex<'l, 's> {
    leaves: &'l [WordComplex<'s>],
    by_start: HashMap<usize, Vec<usize>>,
    by_end: HashMap<usize, Vec<usize>>,
}

impl<'l, 's> LeafIndex<'l, 's> {
    fn new(leaves: &'l [WordComplex<'s>]) -> Self {
        let mut by_start: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut by_end: HashMap<usize, Vec<usize>> = HashMap::new();
        for (index, leaf) in leaves.iter().enumerate() {
            by_start.entry(leaf.span.start).or_default().push(index);
            by_end.entry(leaf.span.end).or_default().push(index);
        }
        Self { leaves, by_start, by_end }
    }

    /// Leaves touching `span` on `side` without overlapping it.
    fn adjacent(&self, side: Side, span: Span) -> &[usize] {
        let found = match side {
            Side::Left => span.start.checked_sub(1).and_then(|end| self.by_end.get(&end)),
            Side::Right => self.by_start.get(&(span.end + 1)),
        };
        found.map(Vec::as_slice).unwrap_or(&[])
    }
}

/// State of one (base phrase, composite pattern) attempt.
struct Attempt<'c, 's> {
    pattern: &'s Pattern,
    /// Index of the model slot the base phrase fills.
    anchor: usize,
    base_index: usize,
    sentence: &'s Sentence,
    index: &'c LeafIndex<'c, 's>,
    /// (side, component, leaf, span) already tried from this attempt.
    visited: HashSet<(Side, usize, usize, Span)>,
    budget: &'c mut SearchBudget,
    collection: &'c mut Vec<WordComplex<'s>>,
}

/// Composite ("complex") pass: grows leaf matches into composite patterns by
/// absorbing neighbouring leaf spans and single tokens.
pub struct CompositeMatcher<'r, 'w> {
    registry: &'r Registry,
    screen: TokenScreen<'r>,
    clean_stop_words: bool,
    stop_words: &'w StopWords,
}

impl<'r, 'w> CompositeMatcher<'r, 'w> {
    pub fn new(registry: &'r Registry, options: &MatchOptions, stop_words: &'w StopWords) -> Self {
        Self {
            registry,
            screen: TokenScreen::new(registry),
            clean_stop_words: options.clean_stop_words,
            stop_words,
        }
    }

    /// Runs every composite pattern over every leaf match. For each base
    /// phrase the first pattern (in registration order) that completes wins.
    pub fn collect<'s>(
        &self,
        sentence: &'s Sentence,
        leaves: &[WordComplex<'s>],
        budget: &mut SearchBudget,
    ) -> Result<Vec<WordComplex<'s>>, MatchError>
    where
        'r: 's,
    {
        let index = LeafIndex::new(leaves);
        let mut collection = Vec::new();

        for (base_index, base) in leaves.iter().enumerate() {
            for pattern in self.registry.composite_patterns() {
                let Some(anchor) = pattern.model_slot_index(base.pattern) else {
                    continue;
                };
                let Some(slot) = pattern.component(anchor).and_then(Component::as_model) else {
                    continue;
                };

                let mut status = match pattern.head_index() {
                    Some(_) => MatchStatus::default(),
                    None => MatchStatus::headless(),
                };
                if !check_base(base, slot, &mut status) {
                    continue;
                }
                status.consumed = 1;
                budget.step()?;

                let mut seed = WordComplex::seeded(base, &pattern.name);
                if !slot.condition.is_head() {
                    seed.head = None;
                }

                let mut attempt = Attempt {
                    pattern,
                    anchor,
                    base_index,
                    sentence,
                    index: &index,
                    visited: HashSet::new(),
                    budget: &mut *budget,
                    collection: &mut collection,
                };
                if self.start(&mut attempt, seed, status)? {
                    debug!(base = %base.text, pattern = %pattern.name, "composite pattern applied");
                    break;
                }
            }
        }

        Ok(collection)
    }

    fn start<'s>(&self, attempt: &mut Attempt<'_, 's>, seed: WordComplex<'s>, status: MatchStatus) -> Result<bool, MatchError> {
        let last = attempt.pattern.len() - 1;
        if attempt.anchor > 0 {
            self.walk(attempt, Side::Left, attempt.anchor - 1, seed, status, 1)
        } else if attempt.anchor < last {
            self.walk(attempt, Side::Right, attempt.anchor + 1, seed, status, 1)
        } else {
            Ok(complete(attempt, seed, status))
        }
    }

    /// Binds `component` on `side` and continues the walk. Returns whether
    /// any branch reached a complete match.
    fn walk<'s>(
        &self,
        attempt: &mut Attempt<'_, 's>,
        side: Side,
        component: usize,
        wc: WordComplex<'s>,
        status: MatchStatus,
        depth: usize,
    ) -> Result<bool, MatchError> {
        attempt.budget.step()?;
        attempt.budget.enter(depth)?;

        let pattern = attempt.pattern;
        match pattern.component(component) {
            Some(Component::Word(slot)) => self.walk_word(attempt, side, component, slot, wc, status, depth),
            Some(Component::Model(slot)) => self.walk_model(attempt, side, component, slot, wc, status, depth),
            None => Ok(false),
        }
    }

    /// Moves past a bound component: further out on the same side, over to the
    /// right side once the left is done, or to completion.
    fn advance<'s>(
        &self,
        attempt: &mut Attempt<'_, 's>,
        side: Side,
        component: usize,
        wc: WordComplex<'s>,
        status: MatchStatus,
        depth: usize,
    ) -> Result<bool, MatchError> {
        let len = attempt.pattern.len();
        if component != side.boundary(len) {
            return self.walk(attempt, side, side.next_component(component), wc, status, depth + 1);
        }
        match side {
            Side::Left if attempt.anchor + 1 < len => {
                let next = attempt.anchor + 1;
                self.walk(attempt, Side::Right, next, wc, status, depth + 1)
            }
            _ => Ok(complete(attempt, wc, status)),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_word<'s>(
        &self,
        attempt: &mut Attempt<'_, 's>,
        side: Side,
        component: usize,
        slot: &WordSlot,
        wc: WordComplex<'s>,
        status: MatchStatus,
        depth: usize,
    ) -> Result<bool, MatchError> {
        let sentence = attempt.sentence;
        let Some(position) = side.next_position(wc.span, sentence.len()) else {
            return Ok(false);
        };
        let token = &sentence.tokens[position];

        if self.clean_stop_words && self.stop_words.contains(token) {
            trace!(position, text = %token.text, "stop word");
            return Ok(false);
        }
        if !self.screen.is_usable(token) || !slot.condition.matches_token(slot.pos, token) {
            return Ok(false);
        }

        let mut wc = wc;
        let mut status = status;
        wc.push(side, position, token);
        status.consumed += 1;
        if slot.condition.is_head() && !status.head_checked {
            status.record_head(true);
            wc.head = Some(position);
        }
        if !slot.condition.additional.is_empty() {
            status.lexicon_satisfied = true;
        }

        let repeat = component == side.boundary(attempt.pattern.len()) && slot.condition.is_repeated();
        if !repeat {
            return self.advance(attempt, side, component, wc, status, depth);
        }

        let mut produced = self.advance(attempt, side, component, wc.clone(), status, depth)?;
        produced |= self.walk(attempt, side, component, wc, status, depth + 1)?;
        Ok(produced)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk_model<'s>(
        &self,
        attempt: &mut Attempt<'_, 's>,
        side: Side,
        component: usize,
        slot: &ModelSlot,
        wc: WordComplex<'s>,
        status: MatchStatus,
        depth: usize,
    ) -> Result<bool, MatchError> {
        let Some(referenced) = self.registry.by_name(&slot.pattern) else {
            return Ok(false);
        };

        let index = attempt.index;
        let sentence = attempt.sentence;
        let mut produced = false;

        for &leaf_index in index.adjacent(side, wc.span) {
            let neighbor = &index.leaves[leaf_index];
            if leaf_index == attempt.base_index || neighbor.pattern != slot.pattern {
                continue;
            }
            if !attempt.visited.insert((side, component, leaf_index, wc.span)) {
                continue;
            }

            let mut status = status;
            let mut grown = wc.clone();

            // 1. First head check, against the referenced pattern's own head slot
            if slot.condition.is_head() && !status.head_checked {
                if !head_matches(referenced, neighbor, sentence) {
                    trace!(leaf = %neighbor.text, "absorbed head rejected");
                    continue;
                }
                status.record_head(true);
                grown.head = neighbor.head;
            }

            // 2. Slot bundle, existential over the absorbed readings
            if !neighbor.tokens.iter().any(|t| slot.condition.accepts_any_reading(t).is_some()) {
                continue;
            }

            // 3. Lexical constraint, met by any absorbed reading
            if !slot.condition.additional.is_empty() {
                let found = neighbor
                    .tokens
                    .iter()
                    .flat_map(|t| t.readings.iter())
                    .any(|r| slot.condition.additional.matches(r));
                if !found {
                    continue;
                }
                status.lexicon_satisfied = true;
            }

            grown.absorb(side, neighbor);
            status.consumed += 1;
            produced |= self.advance(attempt, side, component, grown, status, depth)?;
        }

        Ok(produced)
    }
}

/// Re-validates a leaf match against the model slot it would fill.
fn check_base(base: &WordComplex<'_>, slot: &ModelSlot, status: &mut MatchStatus) -> bool {
    let condition = &slot.condition;
    let Some(reading) = base.tokens.iter().find_map(|t| condition.accepts_any_reading(t)) else {
        return false;
    };
    if condition.is_head() {
        status.record_head(true);
    }
    if condition.additional.matches(reading) {
        status.lexicon_satisfied = true;
    }
    // A lexeme or theme requirement on the base slot is never satisfied.
    condition.additional.is_empty()
}

fn head_matches(referenced: &Pattern, neighbor: &WordComplex<'_>, sentence: &Sentence) -> bool {
    let Some(slot) = referenced.head_word() else {
        return false;
    };
    let Some(token) = neighbor.head.and_then(|head| sentence.tokens.get(head)) else {
        return false;
    };
    slot.condition.matches_token(slot.pos, token)
}

fn complete<'s>(attempt: &mut Attempt<'_, 's>, wc: WordComplex<'s>, status: MatchStatus) -> bool {
    if !status.is_complete(attempt.pattern.len()) {
        trace!(text = %wc.text, ?status, "composite incomplete");
        return false;
    }
    trace!(text = %wc.text, pattern = %wc.pattern, "composite match");
    emit(&mut *attempt.collection, wc);
    true
}

/// Drops every match that another match with the same start outlasts.
/// Matches with different starts are never compared.
///
/// Of several matches with the exact same span only the first survives. This
/// changes observable output: a strict "drop the smaller end" rule would keep
/// all of them, and a `>=` comparison would drop all of them.
pub fn reduce_boundaries(matches: Vec<WordComplex<'_>>) -> Vec<WordComplex<'_>> {
    let mut longest: HashMap<usize, usize> = HashMap::new();
    for m in &matches {
        let end = longest.entry(m.span.start).or_insert(m.span.end);
        *end = (*end).max(m.span.end);
    }

    let mut kept = HashSet::new();
    matches
        .into_iter()
        .filter(|m| longest.get(&m.span.start) == Some(&m.span.end) && kept.insert(m.span))
        .collect()
}
