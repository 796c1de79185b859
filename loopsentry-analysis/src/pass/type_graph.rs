//! TypeGraph (spec §4.1): a precise call graph restricted to functions
//! that traffic in pointer/interface arguments, built by walking the AST
//! with an ancestor stack.

use loopsentry_core::types::collections::FxHashMap;
use loopsentry_core::types::position::SourcePos;
use loopsentry_core::types::signature::Signature;

use crate::ast::{Callee, Decl, Expr, FuncDecl, InterfaceMethod, Param, SourceFile, Stmt, Type};
use crate::unit::AnalysisUnit;

/// A call into code this unit doesn't declare (spec §4.1 "Everything else
/// is added to the `ExternalCalls` list").
#[derive(Debug, Clone)]
pub struct ExternalCallSite {
    pub pos: SourcePos,
    pub end_pos: SourcePos,
    /// `Some` when the callee resolved to a named external symbol (e.g.
    /// `fmt.Println`); `None` when the callee couldn't be resolved at all.
    pub name: Option<String>,
    /// The `Signature` of the enclosing declared function, used by
    /// `LoopPointer` to find the external calls reachable from a given
    /// loop body.
    pub enclosing: Option<Signature>,
}

/// A caller→callee edge with no positional argument tracking — just "this
/// interesting function calls that interesting function", used by
/// `CallGraph` (approx.) to seed its richer, positionally-tracked edges.
#[derive(Debug, Clone)]
pub struct TypeGraphEdge {
    pub caller: Signature,
    pub callee: Signature,
}

#[derive(Debug, Clone, Default)]
pub struct TypeGraphResult {
    pub declarations: FxHashMap<Signature, bool>, // Signature -> has_body
    pub external_calls: Vec<ExternalCallSite>,
    pub edges: Vec<TypeGraphEdge>,
}

/// True iff the signature is "interesting" (spec §3): a pointer receiver,
/// any pointer parameter, any empty-capability parameter, or a variadic of
/// such.
pub fn is_interesting_func(f: &FuncDecl) -> bool {
    f.has_pointer_receiver() || has_interesting_param(&f.params, f.variadic)
}

pub fn is_interesting_method(m: &InterfaceMethod) -> bool {
    has_interesting_param(&m.params, m.variadic)
}

fn has_interesting_param(params: &[Param], variadic: bool) -> bool {
    if params.iter().any(|p| p.ty.is_pointer_like()) {
        return true;
    }
    if variadic {
        if let Some(last) = params.last() {
            // The type-checker guarantees a variadic parameter's declared
            // type is a slice; if it isn't, there's nothing to do here —
            // mirrors `typegraph.go`'s defensive `ok` check on the
            // slice-of-T assertion.
            if let Type::Slice(elem) = &last.ty {
                return elem.is_pointer_like();
            }
        }
    }
    false
}

/// Run the TypeGraph pass over a whole unit.
///
/// Two phases are required because a call may target a function declared
/// in a file processed later in `unit.files`: phase one records every
/// interesting declaration across *all* files; phase two walks bodies and
/// can then correctly decide whether a given callee is interesting,
/// regardless of file order.
pub fn run(unit: &AnalysisUnit) -> TypeGraphResult {
    let mut result = TypeGraphResult::default();

    for file in &unit.files {
        for decl in &file.decls {
            match decl {
                Decl::Func(f) => {
                    if is_interesting_func(f) {
                        result.declarations.insert(f.signature.clone(), true);
                    }
                }
                Decl::Interface(iface) => {
                    for m in &iface.methods {
                        if is_interesting_method(m) {
                            result.declarations.insert(m.signature.clone(), false);
                        }
                    }
                }
            }
        }
    }

    for file in &unit.files {
        for decl in &file.decls {
            if let Decl::Func(f) = decl {
                if let Some(body) = &f.body {
                    walk_block(body, f, file, &mut result);
                }
            }
        }
    }

    result
}

/// Walk statements within `caller`'s body. Nested function literals never
/// become the "caller" for a call expression inside them — the innermost
/// *declared* function on the ancestor stack always is (spec §4.1 edge
/// case), so this walk never descends into `FuncLit` bodies as a new
/// caller context; it simply doesn't recurse into them at all, since a
/// `FuncLit`'s only call sites of interest (those passed to `go`/`defer`)
/// are handled by `LoopClosure`, not `TypeGraph`.
fn walk_block(block: &crate::ast::Block, caller: &FuncDecl, file: &SourceFile, result: &mut TypeGraphResult) {
    for stmt in &block.stmts {
        walk_stmt(stmt, caller, file, result);
    }
}

fn walk_stmt(stmt: &Stmt, caller: &FuncDecl, file: &SourceFile, result: &mut TypeGraphResult) {
    match stmt {
        Stmt::Range(r) => walk_block(&r.body, caller, file, result),
        Stmt::For(f) => walk_block(&f.body, caller, file, result),
        Stmt::If(i) => {
            walk_block(&i.body, caller, file, result);
            if let Some(else_branch) = &i.else_branch {
                walk_stmt(else_branch, caller, file, result);
            }
        }
        Stmt::Switch(s) => walk_block(&s.body, caller, file, result),
        Stmt::Go(g) => walk_call(&g.call, caller, file, result),
        Stmt::Defer(d) => walk_call(&d.call, caller, file, result),
        Stmt::Assign(a) => {
            walk_expr(&a.lhs, caller, file, result);
            walk_expr(&a.rhs, caller, file, result);
        }
        Stmt::Expr(e) => walk_expr(e, caller, file, result),
        Stmt::Block(b) => walk_block(b, caller, file, result),
        Stmt::Other => {}
    }
}

fn walk_expr(expr: &Expr, caller: &FuncDecl, file: &SourceFile, result: &mut TypeGraphResult) {
    match expr {
        Expr::Call(call) => walk_call(call, caller, file, result),
        Expr::AddrOf(inner) => walk_expr(inner, caller, file, result),
        Expr::CompositeLit(lit) => {
            for field in &lit.fields {
                walk_expr(field, caller, file, result);
            }
        }
        Expr::KeyValue(_, value) => walk_expr(value, caller, file, result),
        Expr::Selector(base, _) => walk_expr(base, caller, file, result),
        // Function literals are not walked here: a call inside a FuncLit
        // is still attributed to the outermost enclosing FuncDecl, so we
        // recurse into its body with the same `caller` instead of
        // skipping it.
        Expr::FuncLit(lit) => walk_block(&lit.body, caller, file, result),
        Expr::Ident(_) | Expr::Other => {}
    }
}

fn walk_call(call: &crate::ast::CallExpr, caller: &FuncDecl, file: &SourceFile, result: &mut TypeGraphResult) {
    for arg in &call.args {
        walk_expr(arg, caller, file, result);
    }

    match &call.callee {
        Callee::Builtin | Callee::Cast => {
            // Neither an edge nor an external call (spec §4.1).
        }
        Callee::Literal(lit) => {
            // `go func() { ... }()` — the literal's body executes inline
            // under the same caller, exactly like a `FuncLit` reached
            // through an ordinary expression.
            walk_block(&lit.body, caller, file, result);
        }
        Callee::External(name) => {
            result.external_calls.push(ExternalCallSite {
                pos: call.pos.clone(),
                end_pos: call.end_pos.clone(),
                name: name.clone(),
                enclosing: Some(caller.signature.clone()),
            });
        }
        Callee::Unknown => {
            result.external_calls.push(ExternalCallSite {
                pos: call.pos.clone(),
                end_pos: call.end_pos.clone(),
                name: None,
                enclosing: Some(caller.signature.clone()),
            });
        }
        Callee::InUnit(callee_sig) => {
            if !file.type_checked {
                // TypeGraph strictly needs type info (spec §4.8); without
                // it, the call cannot be proven to resolve in-unit, so it
                // degrades to an (unnamed) external call rather than an
                // edge.
                result.external_calls.push(ExternalCallSite {
                    pos: call.pos.clone(),
                    end_pos: call.end_pos.clone(),
                    name: None,
                    enclosing: Some(caller.signature.clone()),
                });
                return;
            }
            let caller_interesting = is_interesting_func(caller);
            let callee_interesting = result.declarations.contains_key(callee_sig);
            if caller_interesting && callee_interesting {
                result.edges.push(TypeGraphEdge {
                    caller: caller.signature.clone(),
                    callee: callee_sig.clone(),
                });
            }
        }
    }
}
