//! Direct tests against `CallGraph`'s two reverse-BFS queries, independent
//! of the rest of the pipeline.

mod support;

use loopsentry_analysis::ast::{Decl, Expr, Stmt};
use loopsentry_analysis::pass::call_graph;
use loopsentry_core::types::collections::FxHashSet;

use support::*;

const FILE: &str = "main.go";

#[test]
fn called_by_bfs_descends_only_along_pointer_carrying_edges() {
    // leaf(p *int) is called by mid(p *int), which forwards p; mid is
    // called by top(x int), which passes a *value*, not a pointer.
    let leaf_p = next_obj_id();
    let leaf = func_decl("leaf", FILE, 5, vec![ptr_param("p", leaf_p)], block(vec![]));
    let leaf_sig = leaf.signature.clone();

    let mid_p = next_obj_id();
    let mid = func_decl(
        "mid",
        FILE,
        10,
        vec![ptr_param("p", mid_p)],
        block(vec![Stmt::Expr(Expr::Call(Box::new(call_in_unit(
            leaf_sig.clone(),
            vec![plain_ident(ident("p", FILE, 11, Some(mid_p)))],
            FILE,
            11,
        ))))]),
    );
    let mid_sig = mid.signature.clone();

    let top_x = next_obj_id();
    let top = func_decl(
        "top",
        FILE,
        20,
        vec![value_param("x", top_x)],
        block(vec![Stmt::Expr(Expr::Call(Box::new(call_in_unit(
            mid_sig.clone(),
            vec![plain_ident(ident("x", FILE, 21, Some(top_x)))],
            FILE,
            21,
        ))))]),
    );

    let u = unit(vec![source_file(
        FILE,
        "pkg",
        vec![Decl::Func(leaf), Decl::Func(mid), Decl::Func(top)],
    )]);
    let result = call_graph::run(&u);

    let mut reached: FxHashSet<String> = FxHashSet::default();
    result.graph.called_by_bfs(&[leaf_sig], |sig| {
        reached.insert(sig.qualified_name.clone());
    });

    assert!(reached.contains("pkg.mid"), "mid forwards a pointer to leaf, so it must be reached");
    assert!(
        !reached.contains("pkg.top"),
        "top's call to mid passes a plain int, not a pointer, so the edge must not carry pointer"
    );
}

#[test]
fn called_by_bfs_arg_tracking_propagates_through_a_chain_of_passthroughs() {
    let c_p = next_obj_id();
    let c = func_decl("c", FILE, 5, vec![ptr_param("p", c_p)], block(vec![]));
    let c_sig = c.signature.clone();

    let b_p = next_obj_id();
    let b = func_decl(
        "b",
        FILE,
        10,
        vec![ptr_param("p", b_p)],
        block(vec![Stmt::Expr(Expr::Call(Box::new(call_in_unit(
            c_sig.clone(),
            vec![plain_ident(ident("p", FILE, 11, Some(b_p)))],
            FILE,
            11,
        ))))]),
    );
    let b_sig = b.signature.clone();

    let a_p = next_obj_id();
    let a = func_decl(
        "a",
        FILE,
        20,
        vec![ptr_param("p", a_p)],
        block(vec![Stmt::Expr(Expr::Call(Box::new(call_in_unit(
            b_sig.clone(),
            vec![plain_ident(ident("p", FILE, 21, Some(a_p)))],
            FILE,
            21,
        ))))]),
    );

    let u = unit(vec![source_file(
        FILE,
        "pkg",
        vec![Decl::Func(c), Decl::Func(b), Decl::Func(a)],
    )]);
    let result = call_graph::run(&u);

    let mut reached: FxHashSet<(String, usize)> = FxHashSet::default();
    result
        .graph
        .called_by_bfs_arg_tracking(&[(c_sig, 0)], |sig, idx| {
            reached.insert((sig.qualified_name.clone(), idx));
        });

    assert!(reached.contains(&("pkg.b".to_string(), 0)));
    assert!(reached.contains(&("pkg.a".to_string(), 0)));
}

#[test]
fn non_passthrough_argument_does_not_propagate() {
    // b's call to c constructs a fresh value rather than forwarding its own
    // parameter, so the edge carries no pass-through fact.
    let c_p = next_obj_id();
    let c = func_decl("c", FILE, 5, vec![ptr_param("p", c_p)], block(vec![]));
    let c_sig = c.signature.clone();

    let b_p = next_obj_id();
    let other = next_obj_id();
    let b = func_decl(
        "b",
        FILE,
        10,
        vec![ptr_param("p", b_p)],
        block(vec![Stmt::Expr(Expr::Call(Box::new(call_in_unit(
            c_sig.clone(),
            vec![plain_ident(ident("other", FILE, 11, Some(other)))],
            FILE,
            11,
        ))))]),
    );

    let u = unit(vec![source_file(FILE, "pkg", vec![Decl::Func(c), Decl::Func(b)])]);
    let result = call_graph::run(&u);

    let mut reached: FxHashSet<(String, usize)> = FxHashSet::default();
    result
        .graph
        .called_by_bfs_arg_tracking(&[(c_sig, 0)], |sig, idx| {
            reached.insert((sig.qualified_name.clone(), idx));
        });

    assert!(reached.is_empty());
}
