//! Inter-procedural edge construction: NONE, ONESHOT, and
//! DEMAND each extend the intraprocedural flow graph with parameter/return
//! edges, differing only in which call-sites earn them.
//!
//! All three route a call's argument into a parameter through the same
//! vertex the edge builder already wired a parameter pattern's expansion
//! against (`Expr(param_nodes[i])`, see `edge_builder.rs::function`), so a
//! destructured or defaulted parameter receives the argument the same way a
//! plain identifier parameter does — no special-casing needed here.

use crate::config::Strategy;
use crate::context::AnalysisContext;
use crate::flow_graph::Vertex;
use crate::ids::{CallId, FunctionId};
use crate::reachability::Reachability;

pub fn apply(ctx: &mut AnalysisContext, strategy: Strategy) {
    match strategy {
        Strategy::None => apply_none(ctx),
        Strategy::OneShot => apply_oneshot(ctx),
        Strategy::Demand => apply_demand(ctx),
    }
}

/// Connects every function's parameters to `Unknown` and every function's
/// return slot to `Unknown`, the baseline every strategy builds on (NONE).
fn wire_open_world(ctx: &mut AnalysisContext) {
    let unknown = ctx.flow_graph.intern(Vertex::Unknown);
    let function_ids: Vec<FunctionId> = ctx.functions.iter().map(|f| f.id).collect();
    for fn_id in function_ids {
        let param_nodes = ctx.functions[fn_id.index()].param_nodes.clone();
        for node in param_nodes {
            let param_vertex = ctx.flow_graph.intern(Vertex::Expr(node));
            ctx.flow_graph.add_edge(unknown, param_vertex);
        }
        let ret = ctx.flow_graph.intern(Vertex::Ret(fn_id));
        ctx.flow_graph.add_edge(ret, unknown);
    }
}

/// Binds a call's arguments to a callee function's parameters and the
/// callee's return slot to the call's result, positionally, by index.
/// Extra arguments beyond the parameter count have nowhere positional to
/// go, so each is routed to `Unknown` instead — without that edge an
/// argument expression dropped into the void at an over-applied call would
/// look unreachable to escape analysis even though the callee may still
/// read it via `arguments`. Returns whether any edge added was new, for the
/// DEMAND fix-point's change detection.
fn bind_call(ctx: &mut AnalysisContext, call: CallId, target: FunctionId) -> bool {
    let param_nodes = ctx.functions[target.index()].param_nodes.clone();
    let arg_count = ctx.calls[call.index()].arg_count;
    let param_count = u32::try_from(param_nodes.len()).expect("param count fits in u32");
    let bound = arg_count.min(param_count);
    let mut changed = false;
    for i in 0..bound {
        let arg_vertex = ctx.flow_graph.intern(Vertex::Arg(call, i));
        let param_vertex = ctx.flow_graph.intern(Vertex::Expr(param_nodes[i as usize]));
        changed |= ctx.flow_graph.add_edge(arg_vertex, param_vertex);
    }
    if arg_count > param_count {
        let unknown = ctx.flow_graph.intern(Vertex::Unknown);
        for i in param_count..arg_count {
            let arg_vertex = ctx.flow_graph.intern(Vertex::Arg(call, i));
            changed |= ctx.flow_graph.add_edge(arg_vertex, unknown);
        }
    }
    let ret = ctx.flow_graph.intern(Vertex::Ret(target));
    let res = ctx.flow_graph.intern(Vertex::Res(call));
    changed |= ctx.flow_graph.add_edge(ret, res);
    changed
}

/// NONE: only the open-world parameter/return edges, no call-specific
/// wiring.
pub fn apply_none(ctx: &mut AnalysisContext) {
    wire_open_world(ctx);
}

/// ONESHOT (default): NONE's edges plus direct parameter/return binding for
/// every call whose callee the edge builder recognized as an IIFE shape
/// (`CallInfo::iife_target`).
pub fn apply_oneshot(ctx: &mut AnalysisContext) {
    wire_open_world(ctx);
    let targets: Vec<(CallId, FunctionId)> =
        ctx.calls.iter().filter_map(|c| c.iife_target.map(|t| (c.id, t))).collect();
    for (call, target) in targets {
        bind_call(ctx, call, target);
    }
}

/// DEMAND: NONE's edges plus a fix-point over reachability — every
/// `(Func(fn), Callee(c))` pair currently in the transitive closure gets
/// its parameter/return edges realized, repeated until nothing changes.
/// Reachability is recomputed from scratch at the start of every round
/// since the previous round's `bind_call` calls mutated the graph out from
/// under any cached closure: memoized reachability must be invalidated
/// whenever the graph is extended between fix-point iterations.
pub fn apply_demand(ctx: &mut AnalysisContext) {
    wire_open_world(ctx);
    let function_ids: Vec<FunctionId> = ctx.functions.iter().map(|f| f.id).collect();
    let call_ids: Vec<CallId> = ctx.calls.iter().map(|c| c.id).collect();

    loop {
        let to_bind: Vec<(CallId, FunctionId)> = {
            let mut reach = Reachability::new(&ctx.flow_graph);
            let mut pairs = Vec::new();
            for &fn_id in &function_ids {
                let Some(func_vertex) = ctx.flow_graph.get(&Vertex::Func(fn_id)) else { continue };
                for &call_id in &call_ids {
                    let Some(callee_vertex) = ctx.flow_graph.get(&Vertex::Callee(call_id)) else {
                        continue;
                    };
                    if reach.reaches(func_vertex, callee_vertex) {
                        pairs.push((call_id, fn_id));
                    }
                }
            }
            pairs
        };

        let mut changed = false;
        for (call, target) in to_bind {
            changed |= bind_call(ctx, call, target);
        }
        if !changed {
            break;
        }
    }
}
