//! LoopClosure (spec §4.7): an independent recursive descent that flags a
//! range-loop variable captured by reference inside a `go`/`defer` function
//! literal — the implicit-closure-capture bug, as distinct from the
//! explicit `&v` patterns `LoopPointer` covers.

use loopsentry_core::types::position::{SourcePos, Span};
use loopsentry_core::Diagnostic;

use crate::ast::{Block, Callee, Decl, Expr, FuncLit, Ident, ObjId, Stmt};
use crate::unit::AnalysisUnit;

pub fn run(unit: &AnalysisUnit) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for file in &unit.files {
        for decl in &file.decls {
            let Decl::Func(f) = decl else { continue };
            let Some(body) = &f.body else { continue };
            walk_block(body, &[], &file.path, &mut diagnostics);
        }
    }
    diagnostics
}

/// `enclosing` accumulates the range variables of every ranged loop
/// currently open on the path from the function's top-level body down to
/// the statement being visited.
fn walk_block(block: &Block, enclosing: &[&Ident], path: &str, out: &mut Vec<Diagnostic>) {
    for stmt in &block.stmts {
        walk_stmt(stmt, enclosing, path, out);
    }
}

fn walk_stmt(stmt: &Stmt, enclosing: &[&Ident], path: &str, out: &mut Vec<Diagnostic>) {
    match stmt {
        Stmt::Range(r) => {
            let vars = r.loop_vars();
            let mut extended: Vec<&Ident> = enclosing.to_vec();
            extended.extend(vars);
            walk_block(&r.body, &extended, path, out);
        }
        Stmt::For(f) => walk_block(&f.body, enclosing, path, out),
        Stmt::If(i) => {
            walk_block(&i.body, enclosing, path, out);
            if let Some(e) = &i.else_branch {
                walk_stmt(e, enclosing, path, out);
            }
        }
        Stmt::Switch(s) => walk_block(&s.body, enclosing, path, out),
        Stmt::Go(g) => check_call(&g.call, enclosing, path, out),
        Stmt::Defer(d) => check_call(&d.call, enclosing, path, out),
        Stmt::Assign(_) | Stmt::Expr(_) | Stmt::Other => {}
        Stmt::Block(b) => walk_block(b, enclosing, path, out),
    }
}

fn check_call(call: &crate::ast::CallExpr, enclosing: &[&Ident], path: &str, out: &mut Vec<Diagnostic>) {
    if enclosing.is_empty() {
        return;
    }
    let Callee::Literal(lit) = &call.callee else {
        return;
    };
    for var in enclosing {
        for occurrence in funclit_references(lit, var.obj_id) {
            out.push(Diagnostic::new(
                Span::point(occurrence),
                format!("loop variable {} captured by func literal", var.name),
                path,
            ));
        }
    }
}

/// Every position within `lit`'s body where `obj_id` is referenced (spec
/// §4.7: identifier identity, not name, decides a match; one diagnostic per
/// occurrence, not one per captured variable).
fn funclit_references(lit: &FuncLit, obj_id: Option<ObjId>) -> Vec<SourcePos> {
    let Some(obj_id) = obj_id else { return Vec::new() };
    let mut out = Vec::new();
    block_references(&lit.body, obj_id, &mut out);
    out
}

fn block_references(block: &Block, obj_id: ObjId, out: &mut Vec<SourcePos>) {
    for s in &block.stmts {
        stmt_references(s, obj_id, out);
    }
}

fn stmt_references(stmt: &Stmt, obj_id: ObjId, out: &mut Vec<SourcePos>) {
    match stmt {
        Stmt::Range(r) => {
            for v in r.loop_vars() {
                if v.obj_id == Some(obj_id) {
                    out.push(v.pos.clone());
                }
            }
            block_references(&r.body, obj_id, out);
        }
        Stmt::For(f) => block_references(&f.body, obj_id, out),
        Stmt::If(i) => {
            block_references(&i.body, obj_id, out);
            if let Some(e) = &i.else_branch {
                stmt_references(e, obj_id, out);
            }
        }
        Stmt::Switch(s) => block_references(&s.body, obj_id, out),
        Stmt::Go(g) => call_references(&g.call, obj_id, out),
        Stmt::Defer(d) => call_references(&d.call, obj_id, out),
        Stmt::Assign(a) => {
            expr_references(&a.lhs, obj_id, out);
            expr_references(&a.rhs, obj_id, out);
        }
        Stmt::Expr(e) => expr_references(e, obj_id, out),
        Stmt::Block(b) => block_references(b, obj_id, out),
        Stmt::Other => {}
    }
}

fn expr_references(expr: &Expr, obj_id: ObjId, out: &mut Vec<SourcePos>) {
    match expr {
        Expr::Ident(id) => {
            if id.obj_id == Some(obj_id) {
                out.push(id.pos.clone());
            }
        }
        Expr::Call(call) => call_references(call, obj_id, out),
        Expr::AddrOf(inner) => expr_references(inner, obj_id, out),
        Expr::CompositeLit(lit) => {
            for f in &lit.fields {
                expr_references(f, obj_id, out);
            }
        }
        // Key/value expressions inside literal initializers are descended
        // into for their value only; their keys are not (spec §4.7).
        Expr::KeyValue(_, value) => expr_references(value, obj_id, out),
        Expr::Selector(base, _) => expr_references(base, obj_id, out),
        Expr::FuncLit(nested) => block_references(&nested.body, obj_id, out),
        Expr::Other => {}
    }
}

fn call_references(call: &crate::ast::CallExpr, obj_id: ObjId, out: &mut Vec<SourcePos>) {
    if let Callee::Literal(lit) = &call.callee {
        block_references(&lit.body, obj_id, out);
    }
    for a in &call.args {
        expr_references(a, obj_id, out);
    }
}
