//! `AnalysisContext` is the single owned value threaded explicitly through
//! every phase (decorator, binder, native model, edge builder, module
//! linker, strategy, reachability, extractor). Nothing here is a
//! process-wide singleton: a fresh context is created per `analyze()` call
//! and dropped at the end of it.

use ahash::AHashMap;

use crate::ast::{Program, Span};
use crate::diagnostics::Diagnostics;
use crate::flow_graph::FlowGraph;
use crate::ids::{CallId, DeclId, FileId, FunctionId, NodeId, ScopeId};

#[derive(Debug)]
pub struct ParsedFile {
    pub id: FileId,
    pub path: String,
    pub program: Program,
}

/// How a function came by its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Naming {
    /// A declared `function` name, or a class/object-literal method name.
    Declared(String),
    /// Contributed by an enclosing assignment or variable declarator
    /// (`x = function(){}`, `const x = function(){}`).
    Assigned(String),
    /// The immediate array-position argument of a call or `new` expression.
    Callback {
        call: CallId,
        /// Total number of function-typed arguments in that call.
        total_fn_args: u32,
        /// 1-based position of this function among the function-typed
        /// arguments.
        position: u32,
    },
    /// Neither declared, assigned, nor a callback: a free anonymous
    /// function, indexed per enclosing function (or the global file scope).
    FreeAnonymous { index: u32 },
}

#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub id: FunctionId,
    pub node: NodeId,
    pub file: FileId,
    pub span: Span,
    pub enclosing_function: Option<FunctionId>,
    pub param_count: u32,
    /// The `NodeId` of each parameter's pattern root, in declaration order.
    /// Lets `strategy.rs` wire `Arg(call, i) -> Expr(param_nodes[i])` for a
    /// resolved callee without re-walking the AST; the edge builder wires
    /// that same `Expr` vertex into the pattern's own bindings.
    pub param_nodes: Vec<NodeId>,
    pub is_arrow: bool,
    pub naming: Naming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    New,
}

#[derive(Debug, Clone)]
pub struct CallInfo {
    pub id: CallId,
    pub node: NodeId,
    pub file: FileId,
    pub span: Span,
    pub enclosing_function: Option<FunctionId>,
    pub kind: CallKind,
    pub arg_count: u32,
    /// Number of the call's arguments that are function expressions/arrows
    /// written directly in the argument list (needed for callback naming
    /// and `countCB` statistics).
    pub fn_arg_count: u32,
    /// The `C` in `clb(C)`: the callee's identifier name, or
    /// its dotted member-access chain with `[computed]` segments for
    /// computed properties. `None` when the callee is neither an
    /// identifier nor a member expression, in which case a callback
    /// argument of this call falls back to a free-anonymous label.
    pub callee_label: Option<String>,
    /// The `NodeId` of each argument expression, captured at registration
    /// time so later phases can build `Vertex::Expr`/`Vertex::Arg` pairs
    /// without re-walking the AST.
    pub arg_node_ids: Vec<NodeId>,
    /// Set by the edge builder when this call's callee is itself a function
    /// literal (directly, or through `.call`/`.apply`): the one-shot
    /// strategy uses this to wire direct parameter/return edges without
    /// re-deriving the IIFE shape.
    pub iife_target: Option<FunctionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Catch,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub bindings: AHashMap<String, DeclId>,
}

#[derive(Debug, Clone)]
pub struct DeclInfo {
    pub id: DeclId,
    pub node: NodeId,
    pub file: FileId,
    pub name: String,
}

/// Where an identifier *use* (as opposed to a binding site) resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local(DeclId),
    Global(String),
}

#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub files: Vec<ParsedFile>,
    pub functions: Vec<FunctionInfo>,
    pub calls: Vec<CallInfo>,
    pub decls: Vec<DeclInfo>,
    pub scopes: Vec<Scope>,
    pub flow_graph: FlowGraph,
    pub diagnostics: Diagnostics,

    /// Per-node attribute side-tables, populated once by the decorator and
    /// binder and never mutated afterward.
    node_enclosing_function: AHashMap<(FileId, NodeId), FunctionId>,
    node_scope: AHashMap<(FileId, NodeId), ScopeId>,
    node_resolution: AHashMap<(FileId, NodeId), Resolution>,
    /// Maps a function's own declaration node back to its `FunctionId`,
    /// populated by the decorator. Lets later phases recognize "this
    /// resolved declaration is itself a function" without re-walking the
    /// AST (used by the sequential-flow combinator model).
    node_function_id: AHashMap<(FileId, NodeId), FunctionId>,
    /// Memoized `label(fn)` results.
    label_cache: AHashMap<FunctionId, String>,
    /// Maps a call/`new` expression's own node back to its `CallId`,
    /// populated by the decorator, mirroring `node_function_id`.
    node_call_id: AHashMap<(FileId, NodeId), CallId>,
    /// Maps a binding pattern leaf's own node to the `DeclId` it was
    /// declared against (populated by every `declare`/`declare_checked`
    /// call, including repeats that resolve to an existing declaration).
    /// Lets the edge builder write into a declaration's `Var` vertex
    /// without re-deriving scope lookups, which would be wrong here anyway
    /// since a declaration site is not a use site (`ctx.resolution` is
    /// never set for it).
    node_decl: AHashMap<(FileId, NodeId), DeclId>,
}

impl AnalysisContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: String, program: Program) -> FileId {
        let id = FileId::new(self.files.len());
        self.files.push(ParsedFile { id, path, program });
        id
    }

    pub fn register_function(
        &mut self,
        node: NodeId,
        file: FileId,
        span: Span,
        enclosing_function: Option<FunctionId>,
        param_count: u32,
        param_nodes: Vec<NodeId>,
        is_arrow: bool,
        naming: Naming,
    ) -> FunctionId {
        let id = FunctionId::new(self.functions.len());
        self.functions.push(FunctionInfo {
            id,
            node,
            file,
            span,
            enclosing_function,
            param_count,
            param_nodes,
            is_arrow,
            naming,
        });
        self.node_function_id.insert((file, node), id);
        id
    }

    /// Registers a pseudo function with no backing AST node, used by the
    /// native model to give a callback-accepting built-in (`setTimeout`,
    /// `forEach`, ...) a `Func`/`Ret` identity to wire edges against.
    /// Deliberately does not populate `node_function_id`: there is no real
    /// node for it to collide with, and the map must stay a faithful
    /// node-to-function index for [`Self::function_of_decl`].
    pub fn register_native_function(&mut self, naming: Naming) -> FunctionId {
        let id = FunctionId::new(self.functions.len());
        self.functions.push(FunctionInfo {
            id,
            node: NodeId::new(0),
            file: FileId::new(0),
            span: Span::dummy(),
            enclosing_function: None,
            param_count: 0,
            param_nodes: Vec::new(),
            is_arrow: false,
            naming,
        });
        id
    }

    /// The `FunctionId` whose declaration node is `node`, if any.
    #[must_use]
    pub fn function_at_node(&self, file: FileId, node: NodeId) -> Option<FunctionId> {
        self.node_function_id.get(&(file, node)).copied()
    }

    /// If `decl` is bound at a function's own declaration node (as function
    /// declarations are, via hoisting), the corresponding `FunctionId`.
    #[must_use]
    pub fn function_of_decl(&self, decl: DeclId) -> Option<FunctionId> {
        let info = &self.decls[decl.index()];
        self.function_at_node(info.file, info.node)
    }

    pub fn register_call(
        &mut self,
        node: NodeId,
        file: FileId,
        span: Span,
        enclosing_function: Option<FunctionId>,
        kind: CallKind,
        arg_count: u32,
        fn_arg_count: u32,
        callee_label: Option<String>,
        arg_node_ids: Vec<NodeId>,
    ) -> CallId {
        let id = CallId::new(self.calls.len());
        self.calls.push(CallInfo {
            id,
            node,
            file,
            span,
            enclosing_function,
            kind,
            arg_count,
            fn_arg_count,
            callee_label,
            arg_node_ids,
            iife_target: None,
        });
        self.node_call_id.insert((file, node), id);
        id
    }

    /// The `CallId` registered at `node`, if any.
    #[must_use]
    pub fn call_at_node(&self, file: FileId, node: NodeId) -> Option<CallId> {
        self.node_call_id.get(&(file, node)).copied()
    }

    /// Registers a pseudo call-site with no AST node of its own (the native
    /// model's sequential-combinator expansion). Deliberately does not
    /// populate `node_call_id`: synthetic call-sites borrow a real call's
    /// node/span for labeling only and must not shadow that call's own
    /// entry in the index.
    pub fn register_synthetic_call(
        &mut self,
        node: NodeId,
        file: FileId,
        span: Span,
        enclosing_function: Option<FunctionId>,
    ) -> CallId {
        let id = CallId::new(self.calls.len());
        self.calls.push(CallInfo {
            id,
            node,
            file,
            span,
            enclosing_function,
            kind: CallKind::Call,
            arg_count: 0,
            fn_arg_count: 0,
            callee_label: None,
            arg_node_ids: Vec::new(),
            iife_target: None,
        });
        id
    }

    pub fn set_iife_target(&mut self, call: CallId, target: FunctionId) {
        self.calls[call.index()].iife_target = Some(target);
    }

    /// Reassigns a call's enclosing function. Used only for pseudo
    /// call-sites synthesized by the native model, which are registered
    /// against the real call's enclosing function and then re-homed once
    /// the actual source of the implicit invocation is known.
    pub fn set_call_enclosing(&mut self, call: CallId, function: FunctionId) {
        self.calls[call.index()].enclosing_function = Some(function);
    }

    pub fn push_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push(Scope {
            id,
            parent,
            kind,
            bindings: AHashMap::default(),
        });
        id
    }

    /// Binds `name` to `node` in `scope`. If `scope` already binds `name`
    /// directly (not in an ancestor), the existing declaration wins and its
    /// `DeclId` is returned unchanged — this is what makes repeated `var x`
    /// statements in one function share a single `Var` vertex.
    pub fn declare(&mut self, scope: ScopeId, node: NodeId, file: FileId, name: String) -> DeclId {
        let id = if let Some(&existing) = self.scopes[scope.index()].bindings.get(&name) {
            existing
        } else {
            let id = DeclId::new(self.decls.len());
            self.decls.push(DeclInfo { id, node, file, name: name.clone() });
            self.scopes[scope.index()].bindings.insert(name, id);
            id
        };
        self.node_decl.insert((file, node), id);
        id
    }

    /// The `DeclId` a binding pattern leaf at `node` was declared against.
    #[must_use]
    pub fn decl_at_node(&self, file: FileId, node: NodeId) -> Option<DeclId> {
        self.node_decl.get(&(file, node)).copied()
    }

    /// Like [`Self::declare`], but records a [`Diagnostic::DuplicateBinding`]
    /// if `scope` already binds `name`. Used for `let`/`const`/`class`
    /// bindings, where redeclaration in the same block is a diagnostic
    /// rather than ordinary JavaScript shadowing.
    pub fn declare_checked(
        &mut self,
        scope: ScopeId,
        node: NodeId,
        file: FileId,
        name: String,
        span: Span,
    ) -> DeclId {
        if self.scopes[scope.index()].bindings.contains_key(&name) {
            self.diagnostics.push(crate::diagnostics::Diagnostic::DuplicateBinding {
                file,
                span,
                name: name.clone(),
            });
        }
        self.declare(scope, node, file, name)
    }

    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(&decl) = scope.bindings.get(name) {
                return Some(decl);
            }
            current = scope.parent;
        }
        None
    }

    pub fn set_enclosing_function(&mut self, file: FileId, node: NodeId, function: FunctionId) {
        self.node_enclosing_function.insert((file, node), function);
    }

    #[must_use]
    pub fn enclosing_function(&self, file: FileId, node: NodeId) -> Option<FunctionId> {
        self.node_enclosing_function.get(&(file, node)).copied()
    }

    pub fn set_node_scope(&mut self, file: FileId, node: NodeId, scope: ScopeId) {
        self.node_scope.insert((file, node), scope);
    }

    #[must_use]
    pub fn node_scope(&self, file: FileId, node: NodeId) -> Option<ScopeId> {
        self.node_scope.get(&(file, node)).copied()
    }

    pub fn set_resolution(&mut self, file: FileId, node: NodeId, resolution: Resolution) {
        self.node_resolution.insert((file, node), resolution);
    }

    #[must_use]
    pub fn resolution(&self, file: FileId, node: NodeId) -> Option<&Resolution> {
        self.node_resolution.get(&(file, node))
    }

    #[must_use]
    pub fn cached_label(&self, function: FunctionId) -> Option<&str> {
        self.label_cache.get(&function).map(String::as_str)
    }

    pub fn cache_label(&mut self, function: FunctionId, label: String) {
        self.label_cache.insert(function, label);
    }
}
