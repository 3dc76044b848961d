use petgraph::algo::toposort;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use std::collections::HashMap;
use termgram_protocol::PatternId;

/// Which patterns reference which. An edge `a -> b` means a model slot of `a`
/// names `b`.
pub struct ReferenceGraph {
    graph: Graph<PatternId, (), Directed>,
    index_map: HashMap<PatternId, NodeIndex>,
}

impl Default for ReferenceGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            index_map: HashMap::new(),
        }
    }

    pub fn add_pattern(&mut self, id: PatternId) {
        if !self.index_map.contains_key(&id) {
            let idx = self.graph.add_node(id);
            self.index_map.insert(id, idx);
        }
    }

    pub fn add_reference(&mut self, from: PatternId, to: PatternId) {
        let from_idx = *self.index_map.entry(from).or_insert_with(|| self.graph.add_node(from));
        let to_idx = *self.index_map.entry(to).or_insert_with(|| self.graph.add_node(to));

        // Two slots naming the same pattern need only one edge.
        if self.graph.find_edge(from_idx, to_idx).is_none() {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    pub fn references(&self, id: PatternId) -> Vec<PatternId> {
        let mut refs = Vec::new();
        if let Some(idx) = self.index_map.get(&id) {
            for edge in self.graph.edges(*idx) {
                refs.push(self.graph[edge.target()]);
            }
        }
        refs
    }

    /// Reference depth of every pattern: 0 for a pattern that references
    /// nothing, otherwise one more than its deepest reference. Fails with a
    /// pattern on a cycle (self references included).
    pub fn nesting_depths(&self) -> Result<HashMap<PatternId, usize>, PatternId> {
        let order = toposort(&self.graph, None).map_err(|cycle| self.graph[cycle.node_id()])?;

        // Topological order puts referrers first; walk it backwards so every
        // reference is resolved before its referrer.
        let mut depths: HashMap<PatternId, usize> = HashMap::with_capacity(order.len());
        for idx in order.into_iter().rev() {
            let depth = self
                .graph
                .edges(idx)
                .map(|edge| depths.get(&self.graph[edge.target()]).copied().unwrap_or(0) + 1)
                .max()
                .unwrap_or(0);
            depths.insert(self.graph[idx], depth);
        }
        Ok(depths)
    }
}
