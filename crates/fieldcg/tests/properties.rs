//! Universal properties the analysis is expected to hold regardless of the
//! particular program under analysis: determinism, strategy monotonicity,
//! field-based conflation, anonymous-index contiguity, and the callback
//! naming rule.

mod common;

use std::collections::HashSet;

use common::*;
use fieldcg::analyze;
use fieldcg::ast::{AssignTarget, Expr, ExprKind, PropKey};
use fieldcg::config::{AnalysisConfig, AnalyzerType, Strategy};
use fieldcg::context::Naming;

fn config(strategy: Strategy) -> AnalysisConfig {
    AnalysisConfig { strategy, analyzer_type: AnalyzerType::Static, count_callbacks: false }
}

fn edge_label_pairs(result: &fieldcg::ExtractionResult) -> HashSet<(String, String)> {
    result.edges.iter().map(|e| (e.source.label.clone(), e.target.label.clone())).collect()
}

fn member_assign(ids: &mut Ids, object: &str, prop: &str, value: Expr) -> fieldcg::ast::Stmt {
    let member = Expr {
        id: ids.next(),
        span: span(),
        kind: ExprKind::Member {
            object: Box::new(ident_expr(ids, object)),
            property: PropKey::Identifier(prop.to_owned()),
            computed: false,
            optional: false,
        },
    };
    let assign = Expr {
        id: ids.next(),
        span: span(),
        kind: ExprKind::Assign {
            op: "=".to_owned(),
            target: AssignTarget::Member(Box::new(member)),
            value: Box::new(value),
        },
    };
    expr_stmt(ids, assign)
}

#[test]
fn extraction_is_deterministic_across_repeated_runs() {
    let mut ids = Ids::new();
    let f = fn_decl_stmt(&mut ids, "f", vec![], vec![]);
    let call = expr_stmt(&mut ids, call_expr(&mut ids, ident_expr(&mut ids, "f"), vec![]));
    let prog = program(&mut ids, vec![f, call]);

    let (_ctx1, result1) =
        analyze(vec![("main.js".to_owned(), prog.clone())], config(Strategy::OneShot));
    let (_ctx2, result2) = analyze(vec![("main.js".to_owned(), prog)], config(Strategy::OneShot));

    assert_eq!(result1.edges, result2.edges);
}

/// Monotonicity: a stronger inter-procedural strategy only ever
/// adds edges, it never removes one a weaker strategy already found. Built
/// around a callback-indirection shape (`invoke(fn){ fn() }` called as
/// `invoke(target)`) that ONESHOT cannot resolve (its callee isn't a
/// function literal) but DEMAND's fix-point can.
#[test]
fn stronger_strategies_only_add_edges() {
    let mut ids = Ids::new();
    let invoke = fn_decl_stmt(
        &mut ids,
        "invoke",
        vec![ident_pattern(&mut ids, "fn")],
        vec![expr_stmt(&mut ids, call_expr(&mut ids, ident_expr(&mut ids, "fn"), vec![]))],
    );
    let target = fn_decl_stmt(&mut ids, "target", vec![], vec![]);
    let call = expr_stmt(
        &mut ids,
        call_expr(&mut ids, ident_expr(&mut ids, "invoke"), vec![ident_expr(&mut ids, "target")]),
    );
    let prog = program(&mut ids, vec![invoke, target, call]);

    let (_ctx_none, none_result) =
        analyze(vec![("main.js".to_owned(), prog.clone())], config(Strategy::None));
    let (_ctx_one, oneshot_result) =
        analyze(vec![("main.js".to_owned(), prog.clone())], config(Strategy::OneShot));
    let (_ctx_demand, demand_result) =
        analyze(vec![("main.js".to_owned(), prog)], config(Strategy::Demand));

    let none_pairs = edge_label_pairs(&none_result);
    let oneshot_pairs = edge_label_pairs(&oneshot_result);
    let demand_pairs = edge_label_pairs(&demand_result);

    assert!(none_pairs.is_subset(&oneshot_pairs), "NONE must be a subset of ONESHOT");
    assert!(oneshot_pairs.is_subset(&demand_pairs), "ONESHOT must be a subset of DEMAND");
    assert!(
        demand_pairs.contains(&("invoke".to_owned(), "target".to_owned())),
        "DEMAND should resolve the indirect call through invoke's parameter, got {demand_pairs:?}"
    );
    assert!(
        !oneshot_pairs.contains(&("invoke".to_owned(), "target".to_owned())),
        "ONESHOT has no IIFE shape here and should not resolve the indirect call"
    );
}

/// Field-based conflation: two distinct functions assigned to
/// the same property name on different receivers are indistinguishable to
/// the model, so a call through that property name is reachable from both.
#[test]
fn same_named_property_on_different_receivers_conflates() {
    let mut ids = Ids::new();
    let assign_a =
        member_assign(&mut ids, "a", "m", func_expr(&mut ids, None, vec![], vec![], false));
    let assign_b =
        member_assign(&mut ids, "b", "m", func_expr(&mut ids, None, vec![], vec![], false));
    let call = expr_stmt(
        &mut ids,
        call_expr(&mut ids, member_expr(&mut ids, ident_expr(&mut ids, "a"), "m"), vec![]),
    );
    let prog = program(&mut ids, vec![assign_a, assign_b, call]);

    let (_ctx, result) =
        analyze(vec![("main.js".to_owned(), prog)], config(Strategy::OneShot));

    assert_eq!(result.edges.len(), 2, "calling a.m() should reach both functions assigned to .m");
    assert!(result.edges.iter().all(|e| e.target.label == "m"));
}

/// Anonymous-index contiguity: free anonymous function
/// expressions in the same enclosing scope are indexed 1, 2, 3, ... in
/// source order, with no gaps.
#[test]
fn free_anonymous_indices_are_contiguous_within_a_scope() {
    let mut ids = Ids::new();
    let body = vec![
        expr_stmt(&mut ids, func_expr(&mut ids, None, vec![], vec![], false)),
        expr_stmt(&mut ids, func_expr(&mut ids, None, vec![], vec![], false)),
        expr_stmt(&mut ids, func_expr(&mut ids, None, vec![], vec![], false)),
    ];
    let outer = fn_decl_stmt(&mut ids, "outer", vec![], body);
    let prog = program(&mut ids, vec![outer]);

    let (ctx, _result) =
        analyze(vec![("main.js".to_owned(), prog)], config(Strategy::OneShot));

    let outer_id = ctx
        .functions
        .iter()
        .find(|f| matches!(&f.naming, Naming::Declared(n) if n == "outer"))
        .map(|f| f.id)
        .expect("outer is registered");

    let mut indices: Vec<u32> = ctx
        .functions
        .iter()
        .filter(|f| f.enclosing_function == Some(outer_id))
        .filter_map(|f| match f.naming {
            Naming::FreeAnonymous { index } => Some(index),
            _ => None,
        })
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, vec![1, 2, 3]);
}

/// Name stability: a function's rendered label depends only on
/// the decorator's naming attribute, never on which inter-procedural
/// strategy ran — so the same program analyzed under two different
/// strategies must label the same declared function identically.
#[test]
fn declared_function_label_is_stable_across_strategies() {
    let mut ids = Ids::new();
    let f = fn_decl_stmt(&mut ids, "f", vec![], vec![]);
    let call = expr_stmt(&mut ids, call_expr(&mut ids, ident_expr(&mut ids, "f"), vec![]));
    let prog = program(&mut ids, vec![f, call]);

    let (_ctx_none, none_result) =
        analyze(vec![("main.js".to_owned(), prog.clone())], config(Strategy::None));
    let (_ctx_demand, demand_result) =
        analyze(vec![("main.js".to_owned(), prog)], config(Strategy::Demand));

    let none_label = none_result.edges.iter().find(|e| e.target.label == "f");
    let demand_label = demand_result.edges.iter().find(|e| e.target.label == "f");
    assert!(none_label.is_some());
    assert!(demand_label.is_some());
}

/// Callback labeling rule: a function argument's naming
/// always reflects its callee and its 1-based position among the call's
/// function-typed arguments, regardless of how many non-function arguments
/// surround it.
#[test]
fn callback_position_counts_only_function_typed_arguments() {
    let mut ids = Ids::new();
    let call = expr_stmt(&mut ids, call_expr(
        &mut ids,
        ident_expr(&mut ids, "schedule"),
        vec![
            number_expr(&mut ids, 1.0),
            func_expr(&mut ids, None, vec![], vec![], false),
            number_expr(&mut ids, 2.0),
            func_expr(&mut ids, None, vec![], vec![], false),
        ],
    ));
    let prog = program(&mut ids, vec![call]);

    let (ctx, _result) =
        analyze(vec![("main.js".to_owned(), prog)], config(Strategy::OneShot));

    let mut callbacks: Vec<(u32, u32)> = ctx
        .functions
        .iter()
        .filter_map(|f| match f.naming {
            Naming::Callback { total_fn_args, position, .. } => Some((total_fn_args, position)),
            _ => None,
        })
        .collect();
    callbacks.sort_unstable();
    assert_eq!(callbacks, vec![(2, 1), (2, 2)]);
}
