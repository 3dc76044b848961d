use std::collections::{BTreeSet, HashMap, HashSet};

use termgram_grammar::{Component, Pattern, PatternKind, PatternSet};
use termgram_protocol::{PartOfSpeech, PatternId};
use tracing::{debug, info, warn};

use crate::error::GrammarError;
use crate::graph::ReferenceGraph;

pub const DEFAULT_MAX_NESTING: usize = 16;

/// Collects patterns and validates them into a [`Registry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    patterns: Vec<Pattern>,
    max_nesting: usize,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn patterns(mut self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    pub fn build(self) -> Result<Registry, GrammarError> {
        let RegistryBuilder { patterns, max_nesting } = self;

        // 1. Names must be unique and every pattern needs at least one slot
        let mut by_name = HashMap::with_capacity(patterns.len());
        for (index, pattern) in patterns.iter().enumerate() {
            if pattern.is_empty() {
                return Err(GrammarError::EmptyPattern(pattern.name.clone()));
            }
            let id = PatternId::new(index as u32);
            if by_name.insert(pattern.name.clone(), id).is_some() {
                return Err(GrammarError::DuplicatePattern(pattern.name.clone()));
            }
        }

        // 2. Resolve model slot references into the graph
        let mut graph = ReferenceGraph::new();
        for (index, pattern) in patterns.iter().enumerate() {
            let id = PatternId::new(index as u32);
            graph.add_pattern(id);
            for reference in pattern.references() {
                let target = by_name.get(reference).ok_or_else(|| GrammarError::UnknownReference {
                    pattern: pattern.name.clone(),
                    reference: reference.to_string(),
                })?;
                graph.add_reference(id, *target);
            }
        }

        // 3. No cycles, bounded nesting
        let depths = graph
            .nesting_depths()
            .map_err(|id| GrammarError::ReferenceCycle(patterns[id.index()].name.clone()))?;
        let mut nesting = vec![0; patterns.len()];
        for (id, depth) in depths {
            if depth > max_nesting {
                return Err(GrammarError::NestingTooDeep {
                    pattern: patterns[id.index()].name.clone(),
                    depth,
                    limit: max_nesting,
                });
            }
            nesting[id.index()] = depth;
        }

        // 4. Classify and index parts of speech
        let mut leaves = Vec::new();
        let mut composites = Vec::new();
        let mut head_pos = HashSet::new();
        let mut used_pos = HashSet::new();

        for (index, pattern) in patterns.iter().enumerate() {
            let id = PatternId::new(index as u32);
            match pattern.kind() {
                PatternKind::Leaf => leaves.push(id),
                PatternKind::Composite => composites.push(id),
            }

            if pattern.head_index().is_none() {
                warn!(pattern = %pattern.name, "pattern has no head slot and can never anchor a match");
            }
            if let Some(head) = pattern.head_word() {
                head_pos.insert(head.pos);
            }
            for slot in pattern.word_slots() {
                used_pos.insert(slot.pos);
            }

            for component in &pattern.components {
                if let Component::Model(slot) = component {
                    if let Some(target) = by_name.get(&slot.pattern) {
                        if !patterns[target.index()].is_leaf() {
                            warn!(
                                pattern = %pattern.name,
                                reference = %slot.pattern,
                                "model slot references a composite pattern; only leaf matches can fill it"
                            );
                        }
                    }
                }
            }
        }

        info!(
            patterns = patterns.len(),
            leaves = leaves.len(),
            composites = composites.len(),
            head_pos = head_pos.len(),
            "registry_built"
        );

        Ok(Registry {
            patterns,
            by_name,
            leaves,
            composites,
            head_pos,
            used_pos,
            nesting,
        })
    }
}

/// Read-only store of every pattern. Registration order is iteration order.
#[derive(Debug, Clone)]
pub struct Registry {
    patterns: Vec<Pattern>,
    by_name: HashMap<String, PatternId>,
    leaves: Vec<PatternId>,
    composites: Vec<PatternId>,
    head_pos: HashSet<PartOfSpeech>,
    used_pos: HashSet<PartOfSpeech>,
    nesting: Vec<usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn from_set(set: PatternSet) -> Result<Self, GrammarError> {
        debug!(version = set.version, patterns = set.patterns.len(), "loading pattern set");
        RegistryBuilder::new().patterns(set.patterns).build()
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<PatternId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Pattern> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> + '_ {
        self.patterns
            .iter()
            .enumerate()
            .map(|(index, pattern)| (PatternId::new(index as u32), pattern))
    }

    pub fn leaf_patterns(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.leaves.iter().map(|id| &self.patterns[id.index()])
    }

    pub fn composite_patterns(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.composites.iter().map(|id| &self.patterns[id.index()])
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn composite_count(&self) -> usize {
        self.composites.len()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Parts of speech of every head word slot, sorted.
    pub fn head_pos(&self) -> BTreeSet<PartOfSpeech> {
        self.head_pos.iter().copied().collect()
    }

    /// Parts of speech of every word slot, sorted.
    pub fn used_pos(&self) -> BTreeSet<PartOfSpeech> {
        self.used_pos.iter().copied().collect()
    }

    pub fn is_head_pos(&self, pos: PartOfSpeech) -> bool {
        self.head_pos.contains(&pos)
    }

    pub fn is_used_pos(&self, pos: PartOfSpeech) -> bool {
        self.used_pos.contains(&pos)
    }

    pub fn nesting_depth(&self, id: PatternId) -> Option<usize> {
        self.nesting.get(id.index()).copied()
    }

    /// Back into the loadable form, in registration order.
    pub fn to_set(&self, version: u32) -> PatternSet {
        PatternSet::new(version, self.patterns.clone())
    }
}
