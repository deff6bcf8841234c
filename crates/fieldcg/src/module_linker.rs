//! Resolves module-level imports and exports into flow-graph edges.
//! Runs after the intraprocedural edge builder so ordinary
//! property/variable edges already exist; this pass adds the edges that
//! require cross-file knowledge: which file a specifier resolves to, and
//! which `Var`/`Prop` vertex its bindings correspond to.
//!
//! Named imports/exports reuse the ordinary `Prop(name)` vertex — this is
//! equivalent to treating each name as a dedicated shared module vertex,
//! and it is the same field-based conflation every other property access
//! already gets. Default exports and whole-module (`require`/namespace)
//! imports are module-specific, so they use a synthetic `Glob("<default:
//! path>")` vertex keyed by the resolved file's path, since the flow graph
//! has no dedicated `ModuleDefault` variant and `Glob` is already "a value
//! identified by name only."

use crate::ast::{Expr, ExprKind, ExportKind, ImportSpecifier, Pattern, Program, Stmt, StmtKind};
use crate::context::AnalysisContext;
use crate::diagnostics::Diagnostic;
use crate::flow_graph::Vertex;
use crate::ids::{FileId, ScopeId};

pub fn link(ctx: &mut AnalysisContext) {
    for idx in 0..ctx.files.len() {
        let file = ctx.files[idx].id;
        let empty = Program { id: ctx.files[idx].program.id, span: crate::ast::Span::dummy(), body: Vec::new() };
        let program = std::mem::replace(&mut ctx.files[idx].program, empty);
        // The binder always opens one global scope per file at the
        // program's own node, so this is always present once binding ran.
        let global_scope = ctx.node_scope(file, program.id).expect("binder runs before module_linker");
        link_program(ctx, file, global_scope, &program);
        ctx.files[idx].program = program;
    }
}

fn default_vertex(ctx: &mut AnalysisContext, target: FileId) -> crate::ids::VertexId {
    let path = ctx.files[target.index()].path.clone();
    ctx.flow_graph.intern(Vertex::Glob(format!("<default:{path}>")))
}

fn link_program(ctx: &mut AnalysisContext, file: FileId, global_scope: ScopeId, program: &Program) {
    for stmt in &program.body {
        link_stmt(ctx, file, global_scope, stmt);
    }
}

fn link_stmt(ctx: &mut AnalysisContext, file: FileId, global_scope: ScopeId, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Import(import) => {
            let Some(target) = resolve_specifier(ctx, file, &import.source) else {
                ctx.diagnostics.push(Diagnostic::UnresolvedModule {
                    importer: file,
                    specifier: import.source.clone(),
                });
                let unknown = ctx.flow_graph.intern(Vertex::Unknown);
                for spec in &import.specifiers {
                    if let Some(decl) = ctx.decl_at_node(file, specifier_node(spec)) {
                        let v = ctx.flow_graph.intern(Vertex::Var(decl));
                        ctx.flow_graph.add_edge(unknown, v);
                    }
                }
                return;
            };
            for spec in &import.specifiers {
                let Some(decl) = ctx.decl_at_node(file, specifier_node(spec)) else { continue };
                let local_var = ctx.flow_graph.intern(Vertex::Var(decl));
                match spec {
                    ImportSpecifier::Default { .. } | ImportSpecifier::Namespace { .. } => {
                        let module_vertex = default_vertex(ctx, target);
                        ctx.flow_graph.add_edge(module_vertex, local_var);
                    }
                    ImportSpecifier::Named { imported, .. } => {
                        let prop = ctx.flow_graph.intern(Vertex::Prop(imported.clone()));
                        ctx.flow_graph.add_edge(prop, local_var);
                    }
                }
            }
        }
        StmtKind::Export(export) => match &export.kind {
            ExportKind::Default(e) => {
                let value = expr_source_vertex(ctx, file, e);
                let module_vertex = default_vertex(ctx, file);
                ctx.flow_graph.add_edge(value, module_vertex);
            }
            ExportKind::Named { specifiers, source } => {
                if let Some(source) = source {
                    // `export {p} from "m"`: re-export, connecting the
                    // source module's named property straight to this
                    // module's same-named property.
                    if resolve_specifier(ctx, file, source).is_none() {
                        ctx.diagnostics.push(Diagnostic::UnresolvedModule {
                            importer: file,
                            specifier: source.clone(),
                        });
                    }
                    for spec in specifiers {
                        let imported = ctx.flow_graph.intern(Vertex::Prop(spec.local.clone()));
                        let exported = ctx.flow_graph.intern(Vertex::Prop(spec.exported.clone()));
                        ctx.flow_graph.add_edge(imported, exported);
                    }
                } else {
                    for spec in specifiers {
                        if let Some(decl) = ctx.lookup(global_scope, &spec.local) {
                            let local_var = ctx.flow_graph.intern(Vertex::Var(decl));
                            let exported = ctx.flow_graph.intern(Vertex::Prop(spec.exported.clone()));
                            ctx.flow_graph.add_edge(local_var, exported);
                        }
                    }
                }
            }
            ExportKind::All { source } => {
                if resolve_specifier(ctx, file, source).is_none() {
                    ctx.diagnostics.push(Diagnostic::UnresolvedModule {
                        importer: file,
                        specifier: source.clone(),
                    });
                }
                // Field-based re-export of everything: every `Prop(p)` that
                // exists at all is a candidate, which the conflated model
                // already expresses with no further edges needed.
            }
            ExportKind::Decl(inner) => link_export_decl(ctx, file, global_scope, inner),
        },
        StmtKind::Expr(e) => link_commonjs_assignment(ctx, file, e),
        StmtKind::Block(body) => {
            for s in body {
                link_stmt(ctx, file, global_scope, s);
            }
        }
        StmtKind::If { cons, alt, .. } => {
            link_stmt(ctx, file, global_scope, cons);
            if let Some(alt) = alt {
                link_stmt(ctx, file, global_scope, alt);
            }
        }
        StmtKind::Try { block, handler, finalizer } => {
            for s in block {
                link_stmt(ctx, file, global_scope, s);
            }
            if let Some(handler) = handler {
                for s in &handler.body {
                    link_stmt(ctx, file, global_scope, s);
                }
            }
            if let Some(finalizer) = finalizer {
                for s in finalizer {
                    link_stmt(ctx, file, global_scope, s);
                }
            }
        }
        _ => {}
    }
}

/// `export function foo(){}` / `export class Foo{}` / `export const x = ...`:
/// the shorthand forms that declare and export in the same statement. Each
/// declared name gets the same `Var(decl) -> Prop(name)` wiring the plain
/// `export {x}` form gets further down.
fn link_export_decl(ctx: &mut AnalysisContext, _file: FileId, global_scope: ScopeId, inner: &Stmt) {
    let mut names: Vec<&str> = Vec::new();
    match &inner.kind {
        StmtKind::FunctionDecl(f) => {
            if let Some(name) = &f.name {
                names.push(name);
            }
        }
        StmtKind::ClassDecl(c) => {
            if let Some(name) = &c.name {
                names.push(name);
            }
        }
        StmtKind::VarDecl(decl) => {
            for declarator in &decl.declarators {
                if let Pattern::Identifier { name, .. } = &declarator.name {
                    names.push(name);
                }
            }
        }
        _ => {}
    }
    for name in names {
        if let Some(decl) = ctx.lookup(global_scope, name) {
            let local_var = ctx.flow_graph.intern(Vertex::Var(decl));
            let exported = ctx.flow_graph.intern(Vertex::Prop(name.to_owned()));
            ctx.flow_graph.add_edge(local_var, exported);
        }
    }
}

fn specifier_node(spec: &ImportSpecifier) -> crate::ids::NodeId {
    match spec {
        ImportSpecifier::Default { id, .. }
        | ImportSpecifier::Namespace { id, .. }
        | ImportSpecifier::Named { id, .. } => *id,
    }
}

/// The vertex an exported expression's value lives at: for a bare
/// identifier this is the variable it resolves to (so later reassignment is
/// picked up via that `Var`'s own edges), otherwise the expression's own
/// computed-value vertex from the intraprocedural pass.
fn expr_source_vertex(ctx: &mut AnalysisContext, file: FileId, expr: &Expr) -> crate::ids::VertexId {
    if let ExprKind::Identifier(_) = &expr.kind {
        if let Some(crate::context::Resolution::Local(decl)) = ctx.resolution(file, expr.id).cloned() {
            return ctx.flow_graph.intern(Vertex::Var(decl));
        }
    }
    ctx.flow_graph.intern(Vertex::Expr(expr.id))
}

/// `module.exports = e` / `exports.p = e` / AMD `define(deps, factory)`:
/// CommonJS and AMD module syntax modeled as ordinary expressions rather
/// than dedicated import/export statements.
fn link_commonjs_assignment(ctx: &mut AnalysisContext, file: FileId, expr: &Expr) {
    match &expr.kind {
        ExprKind::Assign { target: crate::ast::AssignTarget::Member(member), value, .. } => {
            let ExprKind::Member { object, property, computed: false, .. } = &member.kind else { return };
            let Some(prop_name) = property.static_name() else { return };
            let ExprKind::Identifier(object_name) = &object.kind else { return };
            let value_vertex = expr_source_vertex(ctx, file, value);
            if object_name == "exports" {
                let exported = ctx.flow_graph.intern(Vertex::Prop(prop_name.to_owned()));
                ctx.flow_graph.add_edge(value_vertex, exported);
            } else if object_name == "module" && prop_name == "exports" {
                let module_vertex = default_vertex(ctx, file);
                ctx.flow_graph.add_edge(value_vertex, module_vertex);
            }
        }
        ExprKind::Call { callee, args, .. } => {
            if let ExprKind::Identifier(name) = &callee.kind {
                if name == "define" {
                    link_amd_define(ctx, file, args);
                }
            }
        }
        _ => {}
    }
}

/// `define([deps...], function(a, b) {...})` or `define(function(require,
/// exports, module) {...})`: the factory's parameters receive the resolved
/// dependency modules' default vertices, positionally.
fn link_amd_define(ctx: &mut AnalysisContext, file: FileId, args: &[Expr]) {
    let (deps, factory) = match args {
        [deps_expr, factory] => (Some(deps_expr), factory),
        [factory] => (None, factory),
        _ => return,
    };
    let (ExprKind::Function(f) | ExprKind::Arrow(f)) = &factory.kind else { return };
    let dep_specifiers: Vec<String> = deps.map_or_else(Vec::new, |deps_expr| {
        let ExprKind::Array(elements) = &deps_expr.kind else { return Vec::new() };
        elements
            .iter()
            .flatten()
            .filter_map(|el| {
                let crate::ast::ArrayElement::Item(e) = el else { return None };
                match &e.kind {
                    ExprKind::Literal(crate::ast::Literal::String(s)) => Some(s.clone()),
                    _ => None,
                }
            })
            .collect()
    });
    for (param, specifier) in f.params.iter().zip(dep_specifiers.iter()) {
        let crate::ast::Pattern::Identifier { id, .. } = param else { continue };
        let Some(decl) = ctx.decl_at_node(file, *id) else { continue };
        let Some(target) = resolve_specifier(ctx, file, specifier) else {
            ctx.diagnostics.push(Diagnostic::UnresolvedModule { importer: file, specifier: specifier.clone() });
            continue;
        };
        let module_vertex = default_vertex(ctx, target);
        let param_var = ctx.flow_graph.intern(Vertex::Var(decl));
        ctx.flow_graph.add_edge(module_vertex, param_var);
    }
}

/// Resolves a specifier against the importer's path using relative
/// (`./`, `../`), absolute, and directory-index conventions, matching
/// against the set of already-parsed files' paths. Bare specifiers (`"fs"`,
/// `"lodash"`, package names) never resolve — the embedder's file list
/// contains source files only, no `node_modules`.
fn resolve_specifier(ctx: &AnalysisContext, importer: FileId, specifier: &str) -> Option<FileId> {
    if !(specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')) {
        return None;
    }
    let importer_path = &ctx.files[importer.index()].path;
    let base = if specifier.starts_with('/') {
        String::new()
    } else {
        importer_path.rsplit_once('/').map_or_else(String::new, |(dir, _)| format!("{dir}/"))
    };
    let joined = normalize_path(&format!("{base}{specifier}"));
    let candidates = [
        joined.clone(),
        format!("{joined}.js"),
        format!("{joined}.mjs"),
        format!("{joined}.jsx"),
        format!("{joined}/index.js"),
    ];
    ctx.files.iter().find(|f| candidates.contains(&f.path)).map(|f| f.id)
}

fn normalize_path(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}
