//! PointerEscape (spec §4.5): which declared pointer parameters are
//! provably confined to the call they arrived in ("safe"), and which ones
//! may be retained past it — either directly, by evidence in the
//! function's own body, or transitively, because they're forwarded
//! unchanged into a parameter already known to be unsafe.

use loopsentry_core::types::collections::FxHashSet;
use loopsentry_core::types::signature::Signature;

use crate::allowlist::AllowList;
use crate::ast::{Block, Callee, Decl, Expr, ObjId, Stmt};
use crate::pass::call_graph::CallGraphResult;
use crate::unit::AnalysisUnit;

#[derive(Debug, Clone, Default)]
pub struct PointerEscapeResult {
    /// `(Signature, paramIdx)` pairs proven not to escape the call that
    /// supplied them. Starts as every pointer parameter of every declared
    /// function and only ever shrinks (spec §4.5 "monotonically shrinking
    /// set").
    pub safe_params: FxHashSet<(Signature, usize)>,
}

impl PointerEscapeResult {
    pub fn is_safe(&self, sig: &Signature, idx: usize) -> bool {
        self.safe_params.contains(&(sig.clone(), idx))
    }
}

pub fn run(unit: &AnalysisUnit, call_graph: &CallGraphResult, allow_list: &AllowList) -> PointerEscapeResult {
    let mut safe: FxHashSet<(Signature, usize)> = FxHashSet::default();
    for decl in call_graph.declared.values() {
        for idx in &decl.pointer_param_indices {
            safe.insert((decl.signature.clone(), *idx));
        }
    }

    let mut initially_unsafe: Vec<(Signature, usize)> = Vec::new();
    for file in &unit.files {
        for decl in &file.decls {
            let Decl::Func(f) = decl else { continue };
            let Some(body) = &f.body else { continue };
            for idx in f.pointer_param_indices() {
                let Some(obj_id) = f.params[idx].obj_id else { continue };
                if escapes_locally(body, obj_id, allow_list) {
                    safe.remove(&(f.signature.clone(), idx));
                    initially_unsafe.push((f.signature.clone(), idx));
                }
            }
        }
    }

    call_graph.graph.called_by_bfs_arg_tracking(&initially_unsafe, |sig, idx| {
        safe.remove(&(sig.clone(), idx));
    });

    PointerEscapeResult { safe_params: safe }
}

/// Does `body` contain direct evidence that the parameter identified by
/// `obj_id` escapes: stored into a struct field, reassigned to another
/// variable, placed in a composite literal, or passed to an external call
/// not on the allow-list. Forwarding to another in-unit function is not
/// evidence here — that's the call-graph's job, propagated separately.
fn escapes_locally(body: &Block, obj_id: ObjId, allow_list: &AllowList) -> bool {
    block_escapes(body, obj_id, allow_list)
}

fn block_escapes(block: &Block, obj_id: ObjId, allow_list: &AllowList) -> bool {
    block.stmts.iter().any(|s| stmt_escapes(s, obj_id, allow_list))
}

fn stmt_escapes(stmt: &Stmt, obj_id: ObjId, allow_list: &AllowList) -> bool {
    match stmt {
        Stmt::Range(r) => block_escapes(&r.body, obj_id, allow_list),
        Stmt::For(f) => block_escapes(&f.body, obj_id, allow_list),
        Stmt::If(i) => {
            block_escapes(&i.body, obj_id, allow_list)
                || i.else_branch
                    .as_deref()
                    .map(|e| stmt_escapes(e, obj_id, allow_list))
                    .unwrap_or(false)
        }
        Stmt::Switch(s) => block_escapes(&s.body, obj_id, allow_list),
        Stmt::Go(g) => call_escapes(&g.call, obj_id, allow_list),
        Stmt::Defer(d) => call_escapes(&d.call, obj_id, allow_list),
        Stmt::Assign(a) => {
            let rhs_is_param = a.rhs.as_ident().map(|id| id.obj_id == Some(obj_id)).unwrap_or(false);
            if rhs_is_param && matches!(a.lhs, Expr::Selector(_, _) | Expr::Ident(_)) {
                return true;
            }
            expr_escapes(&a.lhs, obj_id, allow_list) || expr_escapes(&a.rhs, obj_id, allow_list)
        }
        Stmt::Expr(e) => expr_escapes(e, obj_id, allow_list),
        Stmt::Block(b) => block_escapes(b, obj_id, allow_list),
        Stmt::Other => false,
    }
}

fn expr_escapes(expr: &Expr, obj_id: ObjId, allow_list: &AllowList) -> bool {
    match expr {
        Expr::Call(call) => call_escapes(call, obj_id, allow_list),
        Expr::AddrOf(inner) => expr_escapes(inner, obj_id, allow_list),
        Expr::CompositeLit(lit) => lit.fields.iter().any(|field| {
            field.as_ident().map(|id| id.obj_id == Some(obj_id)).unwrap_or(false)
                || expr_escapes(field, obj_id, allow_list)
        }),
        Expr::KeyValue(_, value) => expr_escapes(value, obj_id, allow_list),
        Expr::Selector(base, _) => expr_escapes(base, obj_id, allow_list),
        Expr::FuncLit(lit) => block_escapes(&lit.body, obj_id, allow_list),
        Expr::Ident(_) | Expr::Other => false,
    }
}

fn call_escapes(call: &crate::ast::CallExpr, obj_id: ObjId, allow_list: &AllowList) -> bool {
    if call.args.iter().any(|a| expr_escapes(a, obj_id, allow_list)) {
        return true;
    }

    if let Callee::Literal(lit) = &call.callee {
        if block_escapes(&lit.body, obj_id, allow_list) {
            return true;
        }
    }

    let passed_directly = call.args.iter().any(|a| {
        a.as_ident().map(|id| id.obj_id == Some(obj_id)).unwrap_or(false)
    });
    if !passed_directly {
        return false;
    }

    match &call.callee {
        Callee::Builtin | Callee::Cast | Callee::InUnit(_) | Callee::Literal(_) => false,
        Callee::External(Some(name)) => !allow_list.contains(name),
        Callee::External(None) | Callee::Unknown => true,
    }
}
