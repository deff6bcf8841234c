//! Small `u32` newtypes identifying entities threaded through [`crate::context::AnalysisContext`].
//!
//! None of these carry a process-wide table; each is only meaningful as an
//! index into the owning context's arenas (`files`, `functions`, `calls`,
//! `scopes`, and the flow graph's vertex list).

use std::fmt;

macro_rules! index_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            #[must_use]
            pub fn new(index: usize) -> Self {
                Self(u32::try_from(index).expect("index fits in u32"))
            }

            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

index_id!(NodeId);
index_id!(FileId);
index_id!(FunctionId);
index_id!(CallId);
index_id!(ScopeId);
index_id!(DeclId);
index_id!(VertexId);

/// Hands out monotonically increasing [`NodeId`]s while an AST is being
/// built. Every node gets its id at construction time; ids are never reused
/// or derived from source position.
#[derive(Debug, Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next as usize);
        self.next += 1;
        id
    }
}
