//! Exercises `Pipeline::analyze_unit`'s own control flow (spec §7):
//! the too-large-unit abort, `fail_fast` vs. best-effort continuation,
//! and the cancellation check at the unit boundary.

mod support;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use loopsentry_analysis::ast::{Decl, Stmt};
use loopsentry_analysis::Pipeline;
use loopsentry_core::AnalysisConfig;

use support::*;

fn escaping_loop_unit() -> loopsentry_analysis::AnalysisUnit {
    let v = next_obj_id();
    let body = block(vec![assign(
        plain_ident(ident("global", "main.go", 12, None)),
        addr_of(ident("v", "main.go", 12, Some(v))),
        "main.go",
        12,
    )]);
    let range = range_stmt(None, Some(ident("v", "main.go", 11, Some(v))), body, "main.go", 11);
    let f = func_decl("caller", "main.go", 10, vec![], block(vec![Stmt::Range(range)]));
    unit(vec![source_file("main.go", "pkg", vec![Decl::Func(f)])])
}

#[test]
fn a_unit_over_the_configured_function_limit_aborts_without_diagnostics() {
    let config = AnalysisConfig {
        max_functions: Some(0),
        ..Default::default()
    };
    let pipeline = Pipeline::new(config);
    let u = escaping_loop_unit();

    let outcome = pipeline.analyze_unit(&u, &Arc::new(AtomicBool::new(false)));

    assert!(outcome.aborted);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn a_unit_within_the_configured_function_limit_runs_to_completion() {
    let config = AnalysisConfig {
        max_functions: Some(10),
        ..Default::default()
    };
    let pipeline = Pipeline::new(config);
    let u = escaping_loop_unit();

    let outcome = pipeline.analyze_unit(&u, &Arc::new(AtomicBool::new(false)));

    assert!(!outcome.aborted);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.stats.func_decls, 1);
}

#[test]
fn a_pre_set_cancellation_token_aborts_before_any_pass_runs() {
    let pipeline = Pipeline::new(AnalysisConfig::default());
    let u = escaping_loop_unit();

    let outcome = pipeline.analyze_unit(&u, &Arc::new(AtomicBool::new(true)));

    assert!(outcome.aborted);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.stats.func_decls, 0);
}

#[test]
fn fail_fast_and_best_effort_agree_on_a_unit_with_no_pass_failures() {
    let u = escaping_loop_unit();

    let fail_fast_outcome = Pipeline::new(AnalysisConfig {
        fail_fast: Some(true),
        ..Default::default()
    })
    .analyze_unit(&u, &Arc::new(AtomicBool::new(false)));

    let best_effort_outcome = Pipeline::new(AnalysisConfig {
        fail_fast: Some(false),
        ..Default::default()
    })
    .analyze_unit(&u, &Arc::new(AtomicBool::new(false)));

    assert!(!fail_fast_outcome.aborted);
    assert!(!best_effort_outcome.aborted);
    assert_eq!(fail_fast_outcome.diagnostics.len(), best_effort_outcome.diagnostics.len());
}

#[test]
fn an_empty_unit_produces_no_diagnostics_and_is_not_aborted() {
    let pipeline = Pipeline::new(AnalysisConfig::default());
    let u = unit(vec![]);

    let outcome = pipeline.analyze_unit(&u, &Arc::new(AtomicBool::new(false)));

    assert!(!outcome.aborted);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.stats.func_decls, 0);
}
