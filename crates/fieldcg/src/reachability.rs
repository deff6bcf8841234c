//! Depth-first transitive closure over the flow graph.
//!
//! Every user of this module only ever asks "what can flow out of this
//! vertex" (the strategies ask it of `Func` vertices, the extractor asks it
//! of `Func`/`Native`/`Unknown` vertices), so a single forward-closure
//! primitive covers both: the extractor's "which functions reach this
//! call-site" is the same question as "does this function's closure contain
//! that call-site," just asked from the function's side.

use ahash::{AHashMap, AHashSet};

use crate::flow_graph::FlowGraph;
use crate::ids::VertexId;

/// Per-source memoized closures over one [`FlowGraph`]. Cheap to construct;
/// callers that mutate the graph between fix-point iterations must drop and
/// recreate this (or call [`Self::invalidate`]) since a cached closure
/// becomes stale the moment an edge is added anywhere it could reach.
pub struct Reachability<'g> {
    graph: &'g FlowGraph,
    cache: AHashMap<VertexId, AHashSet<VertexId>>,
}

impl<'g> Reachability<'g> {
    #[must_use]
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self { graph, cache: AHashMap::default() }
    }

    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// The set of vertices reachable from `source` by one or more edges
    /// (does not include `source` itself unless a cycle flows back to it).
    pub fn closure(&mut self, source: VertexId) -> &AHashSet<VertexId> {
        if !self.cache.contains_key(&source) {
            let mut visited = AHashSet::default();
            let mut stack = vec![source];
            while let Some(v) = stack.pop() {
                for &succ in self.graph.successors(v) {
                    if visited.insert(succ) {
                        stack.push(succ);
                    }
                }
            }
            self.cache.insert(source, visited);
        }
        self.cache.get(&source).expect("just inserted")
    }

    #[must_use]
    pub fn reaches(&mut self, source: VertexId, target: VertexId) -> bool {
        self.closure(source).contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_graph::Vertex;

    #[test]
    fn finds_transitive_targets() {
        let mut graph = FlowGraph::new();
        let a = graph.intern(Vertex::Unknown);
        let b = graph.intern(Vertex::Glob("b".to_owned()));
        let c = graph.intern(Vertex::Glob("c".to_owned()));
        graph.add_edge(a, b);
        graph.add_edge(b, c);

        let mut reach = Reachability::new(&graph);
        assert!(reach.reaches(a, c));
        assert!(!reach.reaches(c, a));
    }

    #[test]
    fn handles_cycles() {
        let mut graph = FlowGraph::new();
        let a = graph.intern(Vertex::Glob("a".to_owned()));
        let b = graph.intern(Vertex::Glob("b".to_owned()));
        graph.add_edge(a, b);
        graph.add_edge(b, a);

        let mut reach = Reachability::new(&graph);
        assert!(reach.reaches(a, b));
        assert!(reach.reaches(a, a));
    }
}
