//! A field-based, name-only approximate call-graph builder for JavaScript
//! (see `README.md` for the model this crate implements).
//!
//! The crate owns no I/O and no concrete parser: a front end (`fieldcg-cli`)
//! builds an [`ast::Program`] per file, hands the set to [`analyze`], and
//! gets back a populated [`context::AnalysisContext`] plus the extracted
//! call-graph edges. Everything in between runs as an ordered sequence of
//! phases over one shared, mutable context — see each module's own doc
//! comment for what it reads and writes.

pub mod ast;
pub mod binder;
pub mod config;
pub mod context;
pub mod decorator;
pub mod diagnostics;
pub mod edge_builder;
pub mod extractor;
pub mod flow_graph;
pub mod ids;
pub mod label;
pub mod module_linker;
pub mod native_model;
pub mod reachability;
pub mod strategy;

pub use ast::Program;
pub use config::{AnalysisConfig, AnalyzerType, Strategy, UnknownStrategyError};
pub use context::AnalysisContext;
pub use diagnostics::Diagnostic;
pub use extractor::{CallGraphEdge, Endpoint, ExtractionResult, Position, Range};

/// Runs every phase in order and returns the extracted call graph alongside
/// the context it was built against (callers that want diagnostics or raw
/// flow-graph access, e.g. `fieldcg-cli`'s `--fg` dump, keep the context).
///
/// `files` is `(path, program)` per already-parsed source file. Order is
/// preserved into `ctx.files`, which is what gives every `FileId` a stable,
/// deterministic meaning for the rest of the run.
#[must_use]
pub fn analyze(
    files: Vec<(String, ast::Program)>,
    config: AnalysisConfig,
) -> (AnalysisContext, ExtractionResult) {
    let mut ctx = AnalysisContext::new();
    for (path, program) in files {
        ctx.add_file(path, program);
    }

    decorator::decorate(&mut ctx);
    binder::bind(&mut ctx);
    edge_builder::build(&mut ctx);
    let native_model = native_model::seed(&mut ctx);
    native_model::wire_callbacks(&mut ctx, &native_model);
    native_model::wire_sequential_combinators(&mut ctx);
    module_linker::link(&mut ctx);
    strategy::apply(&mut ctx, config.strategy);
    let result = extractor::extract(&mut ctx, config.analyzer_type);

    (ctx, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, ExprKind, Function, FunctionBody, Program, Span, Stmt, StmtKind};
    use crate::ids::NodeId;

    /// `function f(){} f();` should produce one edge from the call-site back
    /// to `f` under every strategy, since this never needs inter-procedural
    /// reasoning at all — NONE's open-world parameter/return edges don't
    /// even participate.
    #[test]
    fn analyze_wires_a_direct_named_call() {
        let mut next = 0u32;
        let mut id = || {
            let n = NodeId::new(next as usize);
            next += 1;
            n
        };

        let fn_decl_id = id();
        let function = Function {
            id: fn_decl_id,
            span: Span::dummy(),
            name: Some("f".to_owned()),
            params: Vec::new(),
            body: FunctionBody::Block(Vec::new()),
            is_arrow: false,
            is_async: false,
            is_generator: false,
        };
        let call_expr = Expr {
            id: id(),
            span: Span::dummy(),
            kind: ExprKind::Call {
                callee: Box::new(Expr {
                    id: id(),
                    span: Span::dummy(),
                    kind: ExprKind::Identifier("f".to_owned()),
                }),
                args: Vec::new(),
                optional: false,
            },
        };
        let program = Program {
            id: id(),
            span: Span::dummy(),
            body: vec![
                Stmt { id: id(), span: Span::dummy(), kind: StmtKind::FunctionDecl(function) },
                Stmt { id: id(), span: Span::dummy(), kind: StmtKind::Expr(call_expr) },
            ],
        };

        let (_ctx, result) =
            analyze(vec![("main.js".to_owned(), program)], AnalysisConfig::default());

        assert!(result.edges.iter().any(|e| e.source.label == "global" && e.target.label == "f"));
    }
}
