//! Seeds the flow graph with a fixed table of built-in functions and their
//! callback wiring, plus the sequential-flow combinator model for
//! built-ins that invoke a list of functions one after another.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::context::{AnalysisContext, Naming};
use crate::flow_graph::Vertex;
use crate::ids::FunctionId;

/// The name js-callgraph's field-based model treats as a sequential
/// combinator. Matched against the
/// trailing segment of a call's callee, so both `waterfall(...)` and
/// `async.waterfall(...)` trigger it — the field-based approximation does
/// not distinguish receivers.
pub const SEQUENTIAL_COMBINATOR: &str = "waterfall";

struct NativeSpec {
    /// 0-based argument indices that the native invokes as callbacks.
    callback_args: SmallVec<[u32; 2]>,
}

fn standard_table() -> AHashMap<&'static str, NativeSpec> {
    let mut table = AHashMap::default();
    let mut add = |name: &'static str, args: &[u32]| {
        table.insert(name, NativeSpec { callback_args: SmallVec::from_slice(args) });
    };
    add("forEach", &[0]);
    add("map", &[0]);
    add("filter", &[0]);
    add("reduce", &[0]);
    add("reduceRight", &[0]);
    add("some", &[0]);
    add("every", &[0]);
    add("find", &[0]);
    add("findIndex", &[0]);
    add("sort", &[0]);
    add("flatMap", &[0]);
    add("setTimeout", &[0]);
    add("setInterval", &[0]);
    add("setImmediate", &[0]);
    add("nextTick", &[0]);
    add("requestAnimationFrame", &[0]);
    add("then", &[0, 1]);
    add("catch", &[0]);
    add("finally", &[0]);
    add("addEventListener", &[1]);
    add("removeEventListener", &[1]);
    add("on", &[1]);
    add("once", &[1]);
    // The sequential combinator still gets ordinary Native/Prop visibility;
    // its callback args are wired separately by `wire_sequential_combinators`.
    table.insert(SEQUENTIAL_COMBINATOR, NativeSpec { callback_args: SmallVec::new() });
    table
}

/// One pseudo `Func`/`Ret` identity per native name that accepts a
/// callback, used purely as a flow-graph anchor (natives have no AST node
/// of their own).
pub struct NativeModel {
    table: AHashMap<&'static str, NativeSpec>,
    pseudo_functions: AHashMap<&'static str, FunctionId>,
}

fn bare_name(callee_label: &str) -> &str {
    callee_label.rsplit('.').next().unwrap_or(callee_label)
}

/// Seeds `Native(name) -> Prop(name)` and `Native(name) -> Glob(name)` for
/// every modeled built-in (covering both `obj.forEach(...)` member-style
/// access and bare global calls like `setTimeout(...)`), and registers a
/// pseudo function per callback-accepting native.
pub fn seed(ctx: &mut AnalysisContext) -> NativeModel {
    let table = standard_table();
    let mut pseudo_functions = AHashMap::default();
    for (&name, spec) in &table {
        let native = ctx.flow_graph.intern(Vertex::Native(name.to_owned()));
        let prop = ctx.flow_graph.intern(Vertex::Prop(name.to_owned()));
        ctx.flow_graph.add_edge(native, prop);
        let glob = ctx.flow_graph.intern(Vertex::Glob(name.to_owned()));
        ctx.flow_graph.add_edge(native, glob);
        if !spec.callback_args.is_empty() {
            let id = ctx.register_native_function(Naming::Declared(format!("<native:{name}>")));
            pseudo_functions.insert(name, id);
        }
    }
    NativeModel { table, pseudo_functions }
}

/// For every call recognized as invoking a modeled native, wires
/// `Arg(call, i) -> Ret(native)` and, to close the loop back to the
/// call-site so the callback shows up as a call-graph target of it,
/// `Ret(native) -> Callee(call)`.
pub fn wire_callbacks(ctx: &mut AnalysisContext, model: &NativeModel) {
    let call_ids: Vec<_> = ctx.calls.iter().map(|c| c.id).collect();
    for call_id in call_ids {
        let call = &ctx.calls[call_id.index()];
        let Some(label) = call.callee_label.as_deref() else { continue };
        let name = bare_name(label);
        let Some(spec) = model.table.get(name) else { continue };
        let Some(&pseudo_fn) = model.pseudo_functions.get(name) else { continue };
        let arg_count = call.arg_count;
        let callee_vertex = ctx.flow_graph.intern(Vertex::Callee(call_id));
        let ret_vertex = ctx.flow_graph.intern(Vertex::Ret(pseudo_fn));
        ctx.flow_graph.add_edge(ret_vertex, callee_vertex);
        for &idx in &spec.callback_args.clone() {
            if idx >= arg_count {
                continue;
            }
            let arg_vertex = ctx.flow_graph.intern(Vertex::Arg(call_id, idx));
            ctx.flow_graph.add_edge(arg_vertex, ret_vertex);
        }
    }
}

/// Models `Step(a, b, c)`-style combinators: for each adjacent pair of
/// arguments, a pseudo call-site whose callee is reachable from the next
/// argument's function value, and (when the preceding argument resolves to
/// a known declared function) from that function's return slot too.
pub fn wire_sequential_combinators(ctx: &mut AnalysisContext) {
    let call_ids: Vec<_> = ctx.calls.iter().map(|c| c.id).collect();
    for call_id in call_ids {
        let call = ctx.calls[call_id.index()].clone();
        let Some(label) = &call.callee_label else { continue };
        if bare_name(label) != SEQUENTIAL_COMBINATOR {
            continue;
        }
        if call.arg_node_ids.len() < 2 {
            continue;
        }
        for window in call.arg_node_ids.windows(2) {
            let [prev_node, next_node] = [window[0], window[1]];
            let pseudo_call =
                ctx.register_synthetic_call(call.node, call.file, call.span, call.enclosing_function);
            let pseudo_callee = ctx.flow_graph.intern(Vertex::Callee(pseudo_call));
            let next_expr = ctx.flow_graph.intern(Vertex::Expr(next_node));
            ctx.flow_graph.add_edge(next_expr, pseudo_callee);

            if let Some(crate::context::Resolution::Local(decl)) = ctx.resolution(call.file, prev_node) {
                if let Some(prev_fn) = ctx.function_of_decl(*decl) {
                    let prev_ret = ctx.flow_graph.intern(Vertex::Ret(prev_fn));
                    ctx.flow_graph.add_edge(prev_ret, pseudo_callee);
                    // The extractor attributes this implicit call to the
                    // function that precedes it in the chain.
                    ctx.set_call_enclosing(pseudo_call, prev_fn);
                }
            }
        }
        // The combinator's own call-site is reachable from the first
        // function's value, mirroring the others in the chain.
        if let Some(&first_node) = call.arg_node_ids.first() {
            let callee_vertex = ctx.flow_graph.intern(Vertex::Callee(call_id));
            let first_expr = ctx.flow_graph.intern(Vertex::Expr(first_node));
            ctx.flow_graph.add_edge(first_expr, callee_vertex);
        }
    }
}
