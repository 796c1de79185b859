//! LoopPointer (spec §4.6): the main diagnostic-producing pass. For every
//! ranged loop variable, find every site where its address is taken and
//! apply the fixed precedence table to decide what (if anything) to report.

use loopsentry_core::types::position::{SourcePos, Span};
use loopsentry_core::Diagnostic;

use crate::allowlist::AllowList;
use crate::ast::{Block, Callee, Decl, Expr, Ident, ObjId, Stmt};
use crate::pass::call_graph::{resolve_param_index, CallGraphResult};
use crate::pass::goroutine_reach::GoroutineReachResult;
use crate::pass::package_identity::PackageIdentityResult;
use crate::pass::pointer_escape::PointerEscapeResult;
use crate::unit::AnalysisUnit;

/// Where `&v` was found, independent of what (if anything) it means.
enum SiteKind<'a> {
    CallArg { callee: &'a Callee, arg_index: usize },
    CompositeLit,
    AssignRhs,
}

struct EscapeSite<'a> {
    pos: SourcePos,
    end_pos: SourcePos,
    kind: SiteKind<'a>,
}

pub fn run(
    unit: &AnalysisUnit,
    call_graph: &CallGraphResult,
    pointer_escape: &PointerEscapeResult,
    goroutine_reach: &GoroutineReachResult,
    package_identity: &PackageIdentityResult,
    allow_list: &AllowList,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for file in &unit.files {
        for decl in &file.decls {
            let Decl::Func(f) = decl else { continue };
            let Some(body) = &f.body else { continue };
            walk_block_for_loops(
                body,
                call_graph,
                pointer_escape,
                goroutine_reach,
                package_identity,
                allow_list,
                &file.path,
                &mut diagnostics,
            );
        }
    }

    diagnostics
}

fn walk_block_for_loops(
    block: &Block,
    call_graph: &CallGraphResult,
    pointer_escape: &PointerEscapeResult,
    goroutine_reach: &GoroutineReachResult,
    package_identity: &PackageIdentityResult,
    allow_list: &AllowList,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    for stmt in &block.stmts {
        walk_stmt_for_loops(
            stmt,
            call_graph,
            pointer_escape,
            goroutine_reach,
            package_identity,
            allow_list,
            path,
            out,
        );
    }
}

fn walk_stmt_for_loops(
    stmt: &Stmt,
    call_graph: &CallGraphResult,
    pointer_escape: &PointerEscapeResult,
    goroutine_reach: &GoroutineReachResult,
    package_identity: &PackageIdentityResult,
    allow_list: &AllowList,
    path: &str,
    out: &mut Vec<Diagnostic>,
) {
    match stmt {
        Stmt::Range(r) => {
            for v in r.loop_vars() {
                if let Some(obj_id) = v.obj_id {
                    let mut sites = Vec::new();
                    collect_sites(&r.body, obj_id, &mut sites);
                    for site in &sites {
                        if let Some(diag) = classify(
                            site,
                            v,
                            call_graph,
                            pointer_escape,
                            goroutine_reach,
                            package_identity,
                            allow_list,
                            path,
                        ) {
                            out.push(diag);
                        }
                    }
                }
            }
            walk_block_for_loops(
                &r.body,
                call_graph,
                pointer_escape,
                goroutine_reach,
                package_identity,
                allow_list,
                path,
                out,
            );
        }
        Stmt::For(f) => walk_block_for_loops(
            &f.body,
            call_graph,
            pointer_escape,
            goroutine_reach,
            package_identity,
            allow_list,
            path,
            out,
        ),
        Stmt::If(i) => {
            walk_block_for_loops(
                &i.body,
                call_graph,
                pointer_escape,
                goroutine_reach,
                package_identity,
                allow_list,
                path,
                out,
            );
            if let Some(e) = &i.else_branch {
                walk_stmt_for_loops(
                    e,
                    call_graph,
                    pointer_escape,
                    goroutine_reach,
                    package_identity,
                    allow_list,
                    path,
                    out,
                );
            }
        }
        Stmt::Switch(s) => walk_block_for_loops(
            &s.body,
            call_graph,
            pointer_escape,
            goroutine_reach,
            package_identity,
            allow_list,
            path,
            out,
        ),
        Stmt::Block(b) => walk_block_for_loops(
            b,
            call_graph,
            pointer_escape,
            goroutine_reach,
            package_identity,
            allow_list,
            path,
            out,
        ),
        Stmt::Go(_) | Stmt::Defer(_) | Stmt::Assign(_) | Stmt::Expr(_) | Stmt::Other => {}
    }
}

/// Collect every site within `block` where `obj_id`'s address is taken,
/// descending into nested loops, control flow, `go`/`defer` calls, and
/// function literals — a reference can escape through any of them.
fn collect_sites<'a>(block: &'a Block, obj_id: ObjId, out: &mut Vec<EscapeSite<'a>>) {
    for stmt in &block.stmts {
        collect_sites_stmt(stmt, obj_id, out);
    }
}

fn collect_sites_stmt<'a>(stmt: &'a Stmt, obj_id: ObjId, out: &mut Vec<EscapeSite<'a>>) {
    match stmt {
        Stmt::Range(r) => collect_sites(&r.body, obj_id, out),
        Stmt::For(f) => collect_sites(&f.body, obj_id, out),
        Stmt::If(i) => {
            collect_sites(&i.body, obj_id, out);
            if let Some(e) = &i.else_branch {
                collect_sites_stmt(e, obj_id, out);
            }
        }
        Stmt::Switch(s) => collect_sites(&s.body, obj_id, out),
        Stmt::Go(g) => collect_sites_call(&g.call, obj_id, out),
        Stmt::Defer(d) => collect_sites_call(&d.call, obj_id, out),
        Stmt::Assign(a) => {
            if is_addr_of(&a.rhs, obj_id) {
                out.push(EscapeSite {
                    pos: a.pos.clone(),
                    end_pos: a.pos.clone(),
                    kind: SiteKind::AssignRhs,
                });
            }
            collect_sites_expr(&a.lhs, obj_id, out);
            collect_sites_expr(&a.rhs, obj_id, out);
        }
        Stmt::Expr(e) => collect_sites_expr(e, obj_id, out),
        Stmt::Block(b) => collect_sites(b, obj_id, out),
        Stmt::Other => {}
    }
}

fn collect_sites_expr<'a>(expr: &'a Expr, obj_id: ObjId, out: &mut Vec<EscapeSite<'a>>) {
    match expr {
        Expr::Call(call) => collect_sites_call(call, obj_id, out),
        Expr::AddrOf(inner) => collect_sites_expr(inner, obj_id, out),
        Expr::CompositeLit(lit) => {
            for field in &lit.fields {
                if is_addr_of(field, obj_id) {
                    out.push(EscapeSite {
                        pos: lit.pos.clone(),
                        end_pos: lit.pos.clone(),
                        kind: SiteKind::CompositeLit,
                    });
                }
                collect_sites_expr(field, obj_id, out);
            }
        }
        Expr::KeyValue(_, value) => collect_sites_expr(value, obj_id, out),
        Expr::Selector(base, _) => collect_sites_expr(base, obj_id, out),
        Expr::FuncLit(lit) => collect_sites(&lit.body, obj_id, out),
        Expr::Ident(_) | Expr::Other => {}
    }
}

fn collect_sites_call<'a>(call: &'a crate::ast::CallExpr, obj_id: ObjId, out: &mut Vec<EscapeSite<'a>>) {
    for (i, arg) in call.args.iter().enumerate() {
        if is_addr_of(arg, obj_id) {
            out.push(EscapeSite {
                pos: call.pos.clone(),
                end_pos: call.end_pos.clone(),
                kind: SiteKind::CallArg {
                    callee: &call.callee,
                    arg_index: i,
                },
            });
        }
        collect_sites_expr(arg, obj_id, out);
    }
    if let Callee::Literal(lit) = &call.callee {
        collect_sites(&lit.body, obj_id, out);
    }
}

fn is_addr_of(expr: &Expr, obj_id: ObjId) -> bool {
    expr.as_addr_of_ident().map(|id| id.obj_id == Some(obj_id)).unwrap_or(false)
}

/// Apply the fixed precedence table (spec §4.6) to a single site.
fn classify(
    site: &EscapeSite,
    var: &Ident,
    call_graph: &CallGraphResult,
    pointer_escape: &PointerEscapeResult,
    goroutine_reach: &GoroutineReachResult,
    package_identity: &PackageIdentityResult,
    allow_list: &AllowList,
    path: &str,
) -> Option<Diagnostic> {
    let span = Span::new(site.pos.clone(), site.end_pos.clone());

    match &site.kind {
        SiteKind::CompositeLit => Some(Diagnostic::new(
            span,
            format!(
                "reference to {} was used in a composite literal at line {}",
                var.name, site.pos.line
            ),
            path,
        )),
        SiteKind::AssignRhs => Some(Diagnostic::new(
            span,
            format!("reference to {} is reassigned at line {}", var.name, site.pos.line),
            path,
        )),
        SiteKind::CallArg { callee, arg_index } => match callee {
            Callee::Builtin | Callee::Cast => None,
            Callee::InUnit(sig) => {
                let declared = call_graph.declared.get(sig)?;
                let param_index = resolve_param_index(declared, *arg_index)?;
                let unsafe_param = !pointer_escape.safe_params.contains(&(sig.clone(), param_index));
                if !unsafe_param {
                    return None;
                }
                let mut diag = if goroutine_reach.async_set.contains(sig) {
                    Diagnostic::new(
                        span,
                        format!(
                            "function call which takes a reference to {} at line {} may start a goroutine",
                            var.name, site.pos.line
                        ),
                        path,
                    )
                } else {
                    Diagnostic::new(
                        span,
                        format!(
                            "function call at line {} may store a reference to {}",
                            site.pos.line, var.name
                        ),
                        path,
                    )
                };
                if let Some(qualified_name) = package_identity.qualified_names.get(sig) {
                    diag = diag.with_supplementary(format!("callee: {qualified_name}"));
                }
                Some(diag)
            }
            Callee::External(Some(name)) => {
                if allow_list.contains(name) {
                    None
                } else {
                    Some(Diagnostic::new(
                        span,
                        format!(
                            "function call at line {} passes reference to {} to third-party code",
                            site.pos.line, var.name
                        ),
                        path,
                    ))
                }
            }
            Callee::External(None) | Callee::Unknown => Some(Diagnostic::new(
                span,
                format!(
                    "function call at line {} passes reference to {} to third-party code",
                    site.pos.line, var.name
                ),
                path,
            )),
            // An immediately-invoked closure's body isn't part of the
            // call graph, so its fate can't be proven safe — treated the
            // same as an unsafe in-unit store (spec §9 divergence).
            Callee::Literal(_) => Some(Diagnostic::new(
                span,
                format!(
                    "function call at line {} may store a reference to {}",
                    site.pos.line, var.name
                ),
                path,
            )),
        },
    }
}
