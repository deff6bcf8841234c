//! The field-based flow graph: vertices are program values, edges are
//! potential data flow.
//!
//! Vertex identity is structural — asking for the `Var` vertex of the same
//! declaration twice returns the same [`VertexId`] — so vertices live in an
//! [`IndexMap`] keyed by the [`Vertex`] value itself. `Prop` vertices key
//! only on the property name, which is the field-based approximation that
//! keeps the analysis from blowing up on receiver identity.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::ids::{CallId, DeclId, FunctionId, NodeId, VertexId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vertex {
    /// A local or parameter binding.
    Var(DeclId),
    /// A global variable, identified by name only.
    Glob(String),
    /// Any `.name` access, conflated across every receiver (field-based).
    Prop(String),
    /// The function value itself.
    Func(FunctionId),
    /// The callee slot of a call expression.
    Callee(CallId),
    /// The `i`-th argument position of a call.
    Arg(CallId, u32),
    /// The return-value slot at a call-site.
    Res(CallId),
    /// Values returned from a function.
    Ret(FunctionId),
    /// A generic computed expression value.
    Expr(NodeId),
    /// A modeled built-in, identified by name.
    Native(String),
    /// Sink/source for values outside the model.
    Unknown,
}

/// A directed multigraph over [`Vertex`]. Adjacency is stored as
/// `SmallVec`s since most vertices have very few outgoing edges; iteration
/// order is insertion order throughout, which is what makes the crate's
/// output deterministic.
#[derive(Debug, Default)]
pub struct FlowGraph {
    vertices: IndexMap<Vertex, VertexId>,
    adjacency: Vec<SmallVec<[VertexId; 4]>>,
    /// Parallel to `adjacency`; used to reject duplicate edges in O(1)
    /// amortized without scanning the adjacency list on every insert.
    edge_set: Vec<ahash::AHashSet<VertexId>>,
}

impl FlowGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `vertex`, interning it if this is the first
    /// request for it.
    pub fn intern(&mut self, vertex: Vertex) -> VertexId {
        if let Some(&id) = self.vertices.get(&vertex) {
            return id;
        }
        let id = VertexId::new(self.vertices.len());
        self.vertices.insert(vertex, id);
        self.adjacency.push(SmallVec::new());
        self.edge_set.push(ahash::AHashSet::default());
        id
    }

    /// Look up an already-interned vertex without creating it.
    #[must_use]
    pub fn get(&self, vertex: &Vertex) -> Option<VertexId> {
        self.vertices.get(vertex).copied()
    }

    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        self.vertices
            .get_index(id.index())
            .map(|(vertex, _)| vertex)
            .expect("VertexId is always valid for its originating graph")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a directed edge `from -> to`, asserting that values flowing
    /// into `from` may also appear at `to`. Returns `true` if this edge is
    /// new (callers in the DEMAND fix-point use this to detect "changed").
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        if self.edge_set[from.index()].insert(to) {
            self.adjacency[from.index()].push(to);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn successors(&self, id: VertexId) -> &[VertexId] {
        &self.adjacency[id.index()]
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter().map(|(vertex, &id)| (id, vertex))
    }
}
