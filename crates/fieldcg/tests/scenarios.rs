//! End-to-end scenarios mirroring the worked examples: build a small program
//! by hand, run it through [`fieldcg::analyze`], and check the call-graph
//! edges/labels it produces.

mod common;

use common::*;
use fieldcg::config::{AnalysisConfig, AnalyzerType, Strategy};
use fieldcg::context::Naming;
use fieldcg::{analyze, label};

fn config(analyzer_type: AnalyzerType, strategy: Strategy) -> AnalysisConfig {
    AnalysisConfig { strategy, analyzer_type, count_callbacks: false }
}

#[test]
fn named_and_anonymous_functions_get_distinct_labels() {
    let mut ids = Ids::new();
    let decl = fn_decl_stmt(&mut ids, "f", vec![], vec![]);
    let assigned = var_decl_stmt(
        &mut ids,
        fieldcg::ast::VarDeclKind::Const,
        "g",
        Some(func_expr(&mut ids, None, vec![], vec![], false)),
    );
    let iife = expr_stmt(
        &mut ids,
        call_expr(&mut ids, func_expr(&mut ids, None, vec![], vec![], false), vec![]),
    );
    let call_f = expr_stmt(&mut ids, call_expr(&mut ids, ident_expr(&mut ids, "f"), vec![]));
    let call_g = expr_stmt(&mut ids, call_expr(&mut ids, ident_expr(&mut ids, "g"), vec![]));
    let prog = program(&mut ids, vec![decl, assigned, iife, call_f, call_g]);

    let (_ctx, result) = analyze(
        vec![("main.js".to_owned(), prog)],
        config(AnalyzerType::Static, Strategy::OneShot),
    );

    let targets: Vec<&str> = result.edges.iter().map(|e| e.target.label.as_str()).collect();
    assert!(targets.contains(&"f"), "expected an edge to declared function f, got {targets:?}");
    assert!(targets.contains(&"g"), "expected an edge to assigned function g, got {targets:?}");
    assert!(
        targets.iter().any(|t| t.starts_with("global:anon[")),
        "expected an edge to the IIFE's free-anonymous label, got {targets:?}"
    );
}

#[test]
fn single_callback_is_labeled_without_position_suffix() {
    let mut ids = Ids::new();
    let call = expr_stmt(
        &mut ids,
        call_expr(
            &mut ids,
            ident_expr(&mut ids, "setTimeout"),
            vec![func_expr(&mut ids, None, vec![], vec![], false), number_expr(&mut ids, 100.0)],
        ),
    );
    let prog = program(&mut ids, vec![call]);

    let (_ctx, result) = analyze(
        vec![("main.js".to_owned(), prog)],
        config(AnalyzerType::NativeCalls, Strategy::OneShot),
    );

    assert_eq!(result.edges.len(), 1);
    assert_eq!(result.edges[0].target.label, "clb(setTimeout)");
}

#[test]
fn multiple_callbacks_get_their_position_in_the_label() {
    let mut ids = Ids::new();
    let call = expr_stmt(
        &mut ids,
        call_expr(
            &mut ids,
            ident_expr(&mut ids, "processData"),
            vec![
                func_expr(&mut ids, None, vec![], vec![], false),
                func_expr(&mut ids, None, vec![], vec![], false),
            ],
        ),
    );
    let prog = program(&mut ids, vec![call]);

    let (mut ctx, _result) = analyze(
        vec![("main.js".to_owned(), prog)],
        config(AnalyzerType::Static, Strategy::OneShot),
    );

    let callback_fns: Vec<_> = (0..ctx.functions.len())
        .filter(|&i| matches!(ctx.functions[i].naming, Naming::Callback { .. }))
        .collect();
    assert_eq!(callback_fns.len(), 2);

    let labels: Vec<String> = callback_fns
        .iter()
        .map(|&i| label::label(&mut ctx, ctx.functions[i].id))
        .collect();
    assert!(labels.contains(&"clb(processData)[1]".to_owned()));
    assert!(labels.contains(&"clb(processData)[2]".to_owned()));
}

#[test]
fn dotted_member_chain_callee_names_the_callback() {
    let mut ids = Ids::new();
    let chain = member_expr(&mut ids, member_expr(&mut ids, ident_expr(&mut ids, "foo"), "bar"), "forEach");
    let call = expr_stmt(
        &mut ids,
        call_expr(&mut ids, chain, vec![func_expr(&mut ids, None, vec![], vec![], false)]),
    );
    let prog = program(&mut ids, vec![call]);

    let (mut ctx, _result) = analyze(
        vec![("main.js".to_owned(), prog)],
        config(AnalyzerType::Static, Strategy::OneShot),
    );

    let callback = (0..ctx.functions.len())
        .find(|&i| matches!(ctx.functions[i].naming, Naming::Callback { .. }))
        .expect("forEach's callback argument is registered as a function");
    assert_eq!(label::label(&mut ctx, ctx.functions[callback].id), "clb(foo.bar.forEach)");
}

#[test]
fn waterfall_chains_its_arguments_sequentially() {
    let mut ids = Ids::new();
    let a = fn_decl_stmt(&mut ids, "a", vec![], vec![]);
    let b = fn_decl_stmt(&mut ids, "b", vec![], vec![]);
    let call = expr_stmt(
        &mut ids,
        call_expr(
            &mut ids,
            ident_expr(&mut ids, "waterfall"),
            vec![ident_expr(&mut ids, "a"), ident_expr(&mut ids, "b")],
        ),
    );
    let prog = program(&mut ids, vec![a, b, call]);

    let (_ctx, result) = analyze(
        vec![("main.js".to_owned(), prog)],
        config(AnalyzerType::Static, Strategy::OneShot),
    );

    let pairs: Vec<(&str, &str)> =
        result.edges.iter().map(|e| (e.source.label.as_str(), e.target.label.as_str())).collect();
    assert!(pairs.contains(&("global", "a")), "expected global -> a, got {pairs:?}");
    assert!(pairs.contains(&("a", "b")), "expected a -> b, got {pairs:?}");
}

#[test]
fn imported_function_call_wires_across_modules() {
    let mut main_ids = Ids::new();
    let import = import_named_stmt(&mut main_ids, "k", "k", "./m");
    let call = expr_stmt(&mut main_ids, call_expr(&mut main_ids, ident_expr(&mut main_ids, "k"), vec![]));
    let main_prog = program(&mut main_ids, vec![import, call]);

    let mut m_ids = Ids::new();
    let export = export_decl_stmt(&mut m_ids, fn_decl_stmt(&mut m_ids, "k", vec![], vec![]));
    let m_prog = program(&mut m_ids, vec![export]);

    let (_ctx, result) = analyze(
        vec![("main.js".to_owned(), main_prog), ("m.js".to_owned(), m_prog)],
        config(AnalyzerType::Static, Strategy::OneShot),
    );

    assert_eq!(result.edges.len(), 1);
    let edge = &result.edges[0];
    assert_eq!(edge.source.label, "global");
    assert_eq!(edge.source.file, "main.js");
    assert_eq!(edge.target.label, "k");
    assert_eq!(edge.target.file, "m.js");
}
