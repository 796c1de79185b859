mod support;

use loopsentry_analysis::ast::{Decl, Expr, Stmt};
use loopsentry_analysis::pass::loop_closure;

use support::*;

const FILE: &str = "main.go";

#[test]
fn defer_of_func_literal_referencing_loop_var_is_reported() {
    let v = next_obj_id();
    let lit = func_lit(block(vec![Stmt::Expr(Expr::Call(Box::new(call_external(
        Some("fmt.Println"),
        vec![plain_ident(ident("v", FILE, 12, Some(v)))],
        FILE,
        12,
    ))))]));
    let f = func_decl(
        "caller",
        FILE,
        10,
        vec![],
        block(vec![Stmt::Range(range_stmt(
            None,
            Some(ident("v", FILE, 11, Some(v))),
            block(vec![defer_stmt(call_literal(lit, vec![], FILE, 12), FILE, 12)]),
            FILE,
            11,
        ))]),
    );

    let u = unit(vec![source_file(FILE, "pkg", vec![Decl::Func(f)])]);
    let diags = loop_closure::run(&u);

    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("v"));
}

#[test]
fn each_occurrence_of_the_loop_var_inside_the_literal_is_reported_separately() {
    let v = next_obj_id();
    let lit = func_lit(block(vec![
        Stmt::Expr(Expr::Call(Box::new(call_external(
            Some("fmt.Println"),
            vec![plain_ident(ident("v", FILE, 12, Some(v)))],
            FILE,
            12,
        )))),
        Stmt::Expr(Expr::Call(Box::new(call_external(
            Some("fmt.Println"),
            vec![plain_ident(ident("v", FILE, 13, Some(v)))],
            FILE,
            13,
        )))),
    ]));
    let f = func_decl(
        "caller",
        FILE,
        10,
        vec![],
        block(vec![Stmt::Range(range_stmt(
            None,
            Some(ident("v", FILE, 11, Some(v))),
            block(vec![go_stmt(call_literal(lit, vec![], FILE, 12), FILE, 12)]),
            FILE,
            11,
        ))]),
    );

    let u = unit(vec![source_file(FILE, "pkg", vec![Decl::Func(f)])]);
    let diags = loop_closure::run(&u);

    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0].start().line, 12);
    assert_eq!(diags[1].start().line, 13);
}

#[test]
fn literal_not_referencing_any_enclosing_loop_var_is_not_reported() {
    let v = next_obj_id();
    let other = next_obj_id();
    let lit = func_lit(block(vec![Stmt::Expr(Expr::Call(Box::new(call_external(
        Some("fmt.Println"),
        vec![plain_ident(ident("other", FILE, 12, Some(other)))],
        FILE,
        12,
    ))))]));
    let f = func_decl(
        "caller",
        FILE,
        10,
        vec![],
        block(vec![Stmt::Range(range_stmt(
            None,
            Some(ident("v", FILE, 11, Some(v))),
            block(vec![go_stmt(call_literal(lit, vec![], FILE, 12), FILE, 12)]),
            FILE,
            11,
        ))]),
    );

    let u = unit(vec![source_file(FILE, "pkg", vec![Decl::Func(f)])]);
    let diags = loop_closure::run(&u);

    assert!(diags.is_empty());
}

#[test]
fn a_go_of_an_ordinary_in_unit_call_is_not_a_closure_capture() {
    // `go helper(v)` passes v by value at the call boundary and isn't a
    // func-literal capture at all — LoopClosure only concerns itself with
    // `Callee::Literal`.
    let v = next_obj_id();
    let helper_sig = func_sig("pkg.helper", FILE, 5, 1);
    let f = func_decl(
        "caller",
        FILE,
        10,
        vec![],
        block(vec![Stmt::Range(range_stmt(
            None,
            Some(ident("v", FILE, 11, Some(v))),
            block(vec![go_stmt(
                call_in_unit(helper_sig, vec![plain_ident(ident("v", FILE, 12, Some(v)))], FILE, 12),
                FILE,
                12,
            )]),
            FILE,
            11,
        ))]),
    );

    let u = unit(vec![source_file(FILE, "pkg", vec![Decl::Func(f)])]);
    let diags = loop_closure::run(&u);

    assert!(diags.is_empty());
}

#[test]
fn key_of_a_composite_literal_key_value_pair_is_not_descended_into() {
    // The loop var appears only as a composite-literal *key* inside the
    // literal's body; §4.7 descends into the value only, not the key.
    let v = next_obj_id();
    let lit = func_lit(block(vec![Stmt::Expr(composite_lit(
        vec![Expr::KeyValue(
            Box::new(plain_ident(ident("v", FILE, 12, Some(v)))),
            Box::new(plain_ident(ident("unrelated", FILE, 12, None))),
        )],
        FILE,
        12,
    ))]));
    let f = func_decl(
        "caller",
        FILE,
        10,
        vec![],
        block(vec![Stmt::Range(range_stmt(
            None,
            Some(ident("v", FILE, 11, Some(v))),
            block(vec![go_stmt(call_literal(lit, vec![], FILE, 12), FILE, 12)]),
            FILE,
            11,
        ))]),
    );

    let u = unit(vec![source_file(FILE, "pkg", vec![Decl::Func(f)])]);
    let diags = loop_closure::run(&u);

    assert!(diags.is_empty());
}
