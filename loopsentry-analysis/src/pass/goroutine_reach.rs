//! GoroutineReach (spec §4.4): which declared functions start a goroutine
//! directly, and which ones start one transitively through a chain of
//! pointer-carrying calls.

use loopsentry_core::types::collections::FxHashSet;
use loopsentry_core::types::signature::Signature;

use crate::ast::{Block, Decl, Expr, Stmt};
use crate::pass::call_graph::CallGraphResult;
use crate::unit::AnalysisUnit;

#[derive(Debug, Clone, Default)]
pub struct GoroutineReachResult {
    /// Functions containing a `go` statement directly in their body (spec
    /// §4.4 edge case: a `go` nested inside a function literal is still
    /// attributed to the outermost enclosing declared function — the same
    /// over-approximation `TypeGraph` applies to call attribution).
    pub starts_goroutine: FxHashSet<Signature>,
    /// The closure of `starts_goroutine` under reverse pointer-carrying
    /// call edges: every function that starts a goroutine itself, or calls
    /// (directly or transitively, via a chain of pointer-carrying calls)
    /// one that does.
    pub async_set: FxHashSet<Signature>,
}

pub fn run(unit: &AnalysisUnit, call_graph: &CallGraphResult) -> GoroutineReachResult {
    let mut result = GoroutineReachResult::default();

    for file in &unit.files {
        for decl in &file.decls {
            if let Decl::Func(f) = decl {
                if let Some(body) = &f.body {
                    if block_contains_go(body) {
                        result.starts_goroutine.insert(f.signature.clone());
                    }
                }
            }
        }
    }

    let roots: Vec<Signature> = result.starts_goroutine.iter().cloned().collect();
    result.async_set = result.starts_goroutine.clone();
    call_graph.graph.called_by_bfs(&roots, |sig| {
        result.async_set.insert(sig.clone());
    });

    result
}

/// Does `block` contain a `go` statement, searching into nested function
/// literals and control-flow bodies but not into other declared functions
/// (there are none nested inside a block — only literals).
fn block_contains_go(block: &Block) -> bool {
    block.stmts.iter().any(stmt_contains_go)
}

fn stmt_contains_go(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Go(_) => true,
        Stmt::Range(r) => block_contains_go(&r.body),
        Stmt::For(f) => block_contains_go(&f.body),
        Stmt::If(i) => {
            block_contains_go(&i.body) || i.else_branch.as_deref().map(stmt_contains_go).unwrap_or(false)
        }
        Stmt::Switch(s) => block_contains_go(&s.body),
        Stmt::Defer(d) => call_contains_go(&d.call),
        Stmt::Assign(a) => expr_contains_go(&a.lhs) || expr_contains_go(&a.rhs),
        Stmt::Expr(e) => expr_contains_go(e),
        Stmt::Block(b) => block_contains_go(b),
        Stmt::Other => false,
    }
}

fn expr_contains_go(expr: &Expr) -> bool {
    match expr {
        Expr::Call(call) => call_contains_go(call),
        Expr::AddrOf(inner) => expr_contains_go(inner),
        Expr::CompositeLit(lit) => lit.fields.iter().any(expr_contains_go),
        Expr::KeyValue(_, value) => expr_contains_go(value),
        Expr::Selector(base, _) => expr_contains_go(base),
        // A `go` inside this literal is attributed to whichever outermost
        // declared function this literal is nested in — the search keeps
        // descending with the same "contains a go anywhere under here"
        // question, since the caller of `block_contains_go` is always that
        // outermost `FuncDecl`'s own body walk.
        Expr::FuncLit(lit) => block_contains_go(&lit.body),
        Expr::Ident(_) | Expr::Other => false,
    }
}

fn call_contains_go(call: &crate::ast::CallExpr) -> bool {
    if let crate::ast::Callee::Literal(lit) = &call.callee {
        if block_contains_go(&lit.body) {
            return true;
        }
    }
    call.args.iter().any(expr_contains_go)
}
