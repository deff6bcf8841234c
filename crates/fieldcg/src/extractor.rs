//! Turns the finished flow graph into call-graph edges.
//!
//! Every question this module answers is a forward reachability question
//! from the *value* side: "does this function's value flow into that
//! call-site's callee slot" is the same closure membership test whether the
//! value is a real function, a native model stub, or the open-world
//! `Unknown` sink — so [`crate::reachability::Reachability`]'s single
//! forward-closure primitive is reused for all three (edges, escaping
//! functions, unknown call-sites), never a reverse graph.

use ahash::AHashMap;
use serde::Serialize;

use crate::ast::Span;
use crate::config::AnalyzerType;
use crate::context::AnalysisContext;
use crate::flow_graph::Vertex;
use crate::ids::{CallId, FileId, FunctionId, VertexId};
use crate::label;
use crate::reachability::Reachability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

/// One end of a [`CallGraphEdge`]. Native targets carry `file: "Native"`
/// and `None` positions: there is no source range to report for a
/// built-in the analysis never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub label: String,
    pub file: String,
    pub start: Option<Position>,
    pub end: Option<Position>,
    pub range: Option<Range>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallGraphEdge {
    pub source: Endpoint,
    pub target: Endpoint,
}

/// Everything the extractor reports: the edge set for
/// the configured projection, the raw `acg` strings (only populated for
/// [`AnalyzerType::Acg`]), and the two flag sets that exist independently
/// of projection.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    pub edges: Vec<CallGraphEdge>,
    pub acg: Vec<String>,
    /// Functions whose value reaches `Unknown`: they escape the model, so
    /// any call made *through* a value this function was assigned to can no
    /// longer be tracked precisely.
    pub escaping_functions: Vec<FunctionId>,
    /// Call-sites reachable from `Unknown`: the callee could be anything the
    /// open world contributed, so the edge set at this site is known to be
    /// incomplete rather than merely empty.
    pub unknown_call_sites: Vec<CallId>,
}

struct VertexIndex {
    funcs: Vec<(VertexId, FunctionId)>,
    natives: Vec<(VertexId, String)>,
    callees: AHashMap<VertexId, CallId>,
    unknown: Option<VertexId>,
}

fn build_index(ctx: &AnalysisContext) -> VertexIndex {
    let mut funcs = Vec::new();
    let mut natives = Vec::new();
    let mut callees = AHashMap::default();
    let mut unknown = None;
    for (id, vertex) in ctx.flow_graph.iter() {
        match vertex {
            Vertex::Func(f) => funcs.push((id, *f)),
            Vertex::Native(name) => natives.push((id, name.clone())),
            Vertex::Callee(c) => {
                callees.insert(id, *c);
            }
            Vertex::Unknown => unknown = Some(id),
            _ => {}
        }
    }
    VertexIndex { funcs, natives, callees, unknown }
}

fn reachable_call_function_pairs(
    ctx: &AnalysisContext,
    index: &VertexIndex,
) -> Vec<(CallId, FunctionId)> {
    let mut reach = Reachability::new(&ctx.flow_graph);
    let mut pairs = Vec::new();
    for (&callee_vertex, &call) in &index.callees {
        for &(func_vertex, f) in &index.funcs {
            if reach.reaches(func_vertex, callee_vertex) {
                pairs.push((call, f));
            }
        }
    }
    pairs
}

fn reachable_call_native_pairs(ctx: &AnalysisContext, index: &VertexIndex) -> Vec<(CallId, String)> {
    let mut reach = Reachability::new(&ctx.flow_graph);
    let mut pairs = Vec::new();
    for (&callee_vertex, &call) in &index.callees {
        for (native_vertex, name) in &index.natives {
            if reach.reaches(*native_vertex, callee_vertex) {
                pairs.push((call, name.clone()));
            }
        }
    }
    pairs
}

fn escaping_and_unknown(
    ctx: &AnalysisContext,
    index: &VertexIndex,
) -> (Vec<FunctionId>, Vec<CallId>) {
    let Some(unknown) = index.unknown else {
        return (Vec::new(), Vec::new());
    };
    let mut reach = Reachability::new(&ctx.flow_graph);
    let escaping: Vec<FunctionId> = index
        .funcs
        .iter()
        .filter(|&&(vid, _)| reach.reaches(vid, unknown))
        .map(|&(_, f)| f)
        .collect();
    let reachable_from_unknown = reach.closure(unknown).clone();
    let unknown_sites: Vec<CallId> = index
        .callees
        .iter()
        .filter(|(vid, _)| reachable_from_unknown.contains(vid))
        .map(|(_, &call)| call)
        .collect();
    (escaping, unknown_sites)
}

fn position_of(span: Span) -> (Position, Position, Range) {
    (
        Position { row: span.start_row, column: span.start_col },
        Position { row: span.end_row, column: span.end_col },
        Range { start: span.start_byte, end: span.end_byte },
    )
}

fn endpoint_from(ctx: &AnalysisContext, file: FileId, label: String, span: Span) -> Endpoint {
    let (start, end, range) = position_of(span);
    Endpoint {
        label,
        file: ctx.files[file.index()].path.clone(),
        start: Some(start),
        end: Some(end),
        range: Some(range),
    }
}

fn native_endpoint(name: &str) -> Endpoint {
    Endpoint {
        label: name.to_owned(),
        file: "Native".to_owned(),
        start: None,
        end: None,
        range: None,
    }
}

/// The calling side of an edge. `use_enclosing_range` selects between the
/// `static` projection's "caller range is the enclosing function's own
/// range" rule and the narrower call-site range the other projections use.
fn caller_endpoint(ctx: &mut AnalysisContext, call: CallId, use_enclosing_range: bool) -> Endpoint {
    let file = ctx.calls[call.index()].file;
    let enclosing = ctx.calls[call.index()].enclosing_function;
    let call_span = ctx.calls[call.index()].span;
    let rendered_label = match enclosing {
        Some(f) => label::label(ctx, f),
        None => "global".to_owned(),
    };
    let span = if use_enclosing_range {
        match enclosing {
            Some(f) => ctx.functions[f.index()].span,
            None => ctx.files[file.index()].program.span,
        }
    } else {
        call_span
    };
    endpoint_from(ctx, file, rendered_label, span)
}

fn function_endpoint(ctx: &mut AnalysisContext, f: FunctionId) -> Endpoint {
    let file = ctx.functions[f.index()].file;
    let span = ctx.functions[f.index()].span;
    let rendered_label = label::label(ctx, f);
    endpoint_from(ctx, file, rendered_label, span)
}

fn extract_static(ctx: &mut AnalysisContext, index: &VertexIndex) -> Vec<CallGraphEdge> {
    let pairs = reachable_call_function_pairs(ctx, index);
    pairs
        .into_iter()
        .map(|(call, f)| CallGraphEdge {
            source: caller_endpoint(ctx, call, true),
            target: function_endpoint(ctx, f),
        })
        .collect()
}

/// `nativecalls`: a call into a modeled built-in is only interesting when a
/// function value actually reaches it, so each edge attributes the
/// function-typed argument literal found at that call-site as the target
/// rather than the native name itself — the native is the delivery
/// mechanism, the argument is what actually runs. A call whose native
/// target got its callback from a variable rather than a literal (no
/// `arg_node_ids` entry resolves to a `FunctionId`) still reports the
/// native by name, since no more specific target is known.
fn extract_nativecalls(ctx: &mut AnalysisContext, index: &VertexIndex) -> Vec<CallGraphEdge> {
    let pairs = reachable_call_native_pairs(ctx, index);
    let mut edges = Vec::new();
    for (call, name) in pairs {
        let file = ctx.calls[call.index()].file;
        let arg_nodes = ctx.calls[call.index()].arg_node_ids.clone();
        let callbacks: Vec<FunctionId> =
            arg_nodes.iter().filter_map(|&node| ctx.function_at_node(file, node)).collect();
        if callbacks.is_empty() {
            edges.push(CallGraphEdge {
                source: caller_endpoint(ctx, call, false),
                target: native_endpoint(&name),
            });
        } else {
            for callback in callbacks {
                edges.push(CallGraphEdge {
                    source: caller_endpoint(ctx, call, false),
                    target: function_endpoint(ctx, callback),
                });
            }
        }
    }
    edges
}

fn acg_position(ctx: &AnalysisContext, file: FileId, span: Span) -> String {
    format!(
        "{}@{}:{}-{}:{}",
        ctx.files[file.index()].path,
        span.start_row,
        span.start_col,
        span.end_row,
        span.end_col
    )
}

fn extract_acg(ctx: &AnalysisContext, index: &VertexIndex) -> Vec<String> {
    let mut out = Vec::new();
    for (call, f) in reachable_call_function_pairs(ctx, index) {
        let call_pos = acg_position(ctx, ctx.calls[call.index()].file, ctx.calls[call.index()].span);
        let fn_pos = acg_position(ctx, ctx.functions[f.index()].file, ctx.functions[f.index()].span);
        out.push(format!("{call_pos} -> {fn_pos}"));
    }
    for (call, name) in reachable_call_native_pairs(ctx, index) {
        let call_pos = acg_position(ctx, ctx.calls[call.index()].file, ctx.calls[call.index()].span);
        out.push(format!("{call_pos} -> Native@{name}"));
    }
    out
}

/// Runs the extraction pass configured by `analyzer_type`.
/// Escaping-function and unknown-call-site detection run unconditionally:
/// they're cheap, and every projection benefits from knowing where the
/// model's precision broke down.
pub fn extract(ctx: &mut AnalysisContext, analyzer_type: AnalyzerType) -> ExtractionResult {
    let index = build_index(ctx);
    let (escaping_functions, unknown_call_sites) = escaping_and_unknown(ctx, &index);
    let (edges, acg) = match analyzer_type {
        AnalyzerType::Static => (extract_static(ctx, &index), Vec::new()),
        AnalyzerType::NativeCalls => (extract_nativecalls(ctx, &index), Vec::new()),
        AnalyzerType::Acg => (Vec::new(), extract_acg(ctx, &index)),
    };
    ExtractionResult { edges, acg, escaping_functions, unknown_call_sites }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::context::{CallKind, Naming};
    use crate::ids::NodeId;

    fn new_file_ctx() -> (AnalysisContext, FileId) {
        let mut ctx = AnalysisContext::new();
        let file = ctx.add_file(
            "main.js".to_owned(),
            Program { id: NodeId::new(0), span: Span::dummy(), body: Vec::new() },
        );
        (ctx, file)
    }

    #[test]
    fn static_extraction_finds_reachable_function() {
        let (mut ctx, file) = new_file_ctx();
        let f = ctx.register_function(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            false,
            Naming::Declared("f".to_owned()),
        );
        let call = ctx.register_call(
            NodeId::new(2),
            file,
            Span::dummy(),
            None,
            CallKind::Call,
            0,
            0,
            Some("f".to_owned()),
            Vec::new(),
        );
        let func_vertex = ctx.flow_graph.intern(Vertex::Func(f));
        let callee_vertex = ctx.flow_graph.intern(Vertex::Callee(call));
        ctx.flow_graph.add_edge(func_vertex, callee_vertex);

        let result = extract(&mut ctx, AnalyzerType::Static);
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].source.label, "global");
        assert_eq!(result.edges[0].target.label, "f");
        assert!(result.edges[0].target.start.is_some());
    }

    #[test]
    fn escaping_function_detected_via_unknown_edge() {
        let (mut ctx, file) = new_file_ctx();
        let f = ctx.register_function(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            false,
            Naming::Declared("f".to_owned()),
        );
        let func_vertex = ctx.flow_graph.intern(Vertex::Func(f));
        let unknown = ctx.flow_graph.intern(Vertex::Unknown);
        ctx.flow_graph.add_edge(func_vertex, unknown);

        let result = extract(&mut ctx, AnalyzerType::Static);
        assert_eq!(result.escaping_functions, vec![f]);
    }

    #[test]
    fn unknown_call_site_detected_via_unknown_reaching_callee() {
        let (mut ctx, file) = new_file_ctx();
        let call = ctx.register_call(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            CallKind::Call,
            0,
            0,
            None,
            Vec::new(),
        );
        let unknown = ctx.flow_graph.intern(Vertex::Unknown);
        let callee_vertex = ctx.flow_graph.intern(Vertex::Callee(call));
        ctx.flow_graph.add_edge(unknown, callee_vertex);

        let result = extract(&mut ctx, AnalyzerType::Static);
        assert_eq!(result.unknown_call_sites, vec![call]);
    }

    #[test]
    fn nativecalls_attributes_literal_callback_as_target() {
        let (mut ctx, file) = new_file_ctx();
        let callback = ctx.register_function(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            true,
            Naming::Callback { call: CallId::new(0), total_fn_args: 1, position: 1 },
        );
        let call = ctx.register_call(
            NodeId::new(2),
            file,
            Span::dummy(),
            None,
            CallKind::Call,
            1,
            1,
            Some("setTimeout".to_owned()),
            vec![NodeId::new(1)],
        );
        let native = ctx.flow_graph.intern(Vertex::Native("setTimeout".to_owned()));
        let callee_vertex = ctx.flow_graph.intern(Vertex::Callee(call));
        ctx.flow_graph.add_edge(native, callee_vertex);

        let result = extract(&mut ctx, AnalyzerType::NativeCalls);
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].target.label, "clb(setTimeout)");
        assert_eq!(result.edges[0].target.file, "main.js");
        let _ = callback;
    }

    #[test]
    fn acg_mode_emits_raw_position_strings() {
        let (mut ctx, file) = new_file_ctx();
        let f = ctx.register_function(
            NodeId::new(1),
            file,
            Span::dummy(),
            None,
            0,
            Vec::new(),
            false,
            Naming::Declared("f".to_owned()),
        );
        let call = ctx.register_call(
            NodeId::new(2),
            file,
            Span::dummy(),
            None,
            CallKind::Call,
            0,
            0,
            Some("f".to_owned()),
            Vec::new(),
        );
        let func_vertex = ctx.flow_graph.intern(Vertex::Func(f));
        let callee_vertex = ctx.flow_graph.intern(Vertex::Callee(call));
        ctx.flow_graph.add_edge(func_vertex, callee_vertex);

        let result = extract(&mut ctx, AnalyzerType::Acg);
        assert_eq!(result.edges.len(), 0);
        assert_eq!(result.acg.len(), 1);
        assert!(result.acg[0].contains("->"));
    }
}
