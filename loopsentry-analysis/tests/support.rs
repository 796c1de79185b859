//! Hand-built AST fixtures shared across the integration tests. There is no
//! parser in this crate (spec §1: the front end is out of scope), so tests
//! construct the already-resolved AST directly instead of parsing source
//! text.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};

use loopsentry_analysis::ast::{
    AssignStmt, Block, Callee, CallExpr, CompositeLit, Decl, DeferStmt, Expr, ForStmt, FuncDecl, FuncLit, GoStmt,
    Ident, IfStmt, ObjId, Param, RangeStmt, SourceFile, Stmt, SwitchStmt, Type,
};
use loopsentry_analysis::AnalysisUnit;
use loopsentry_core::types::collections::FxHashMap;
use loopsentry_core::types::position::SourcePos;
use loopsentry_core::types::signature::{ReceiverKind, Signature};

static NEXT_OBJ: AtomicU32 = AtomicU32::new(1);

pub fn next_obj_id() -> ObjId {
    ObjId(NEXT_OBJ.fetch_add(1, Ordering::Relaxed))
}

pub fn pos(file: &str, line: u32) -> SourcePos {
    SourcePos::new(file, line, 1, 0)
}

pub fn func_sig(qualified_name: &str, file: &str, line: u32, arity: usize) -> Signature {
    Signature::new(qualified_name, pos(file, line), arity, ReceiverKind::Function)
}

pub fn ident(name: &str, file: &str, line: u32, obj_id: Option<ObjId>) -> Ident {
    Ident {
        name: name.to_string(),
        pos: pos(file, line),
        obj_id,
    }
}

pub fn ptr_param(name: &str, obj_id: ObjId) -> Param {
    Param {
        name: Some(name.to_string()),
        obj_id: Some(obj_id),
        ty: Type::Pointer(Box::new(Type::Named("int".to_string()))),
    }
}

pub fn value_param(name: &str, obj_id: ObjId) -> Param {
    Param {
        name: Some(name.to_string()),
        obj_id: Some(obj_id),
        ty: Type::Named("int".to_string()),
    }
}

/// A free function declaration with entirely pointer-typed parameters, the
/// common shape in the escape/call-graph fixtures below.
pub fn func_decl(
    name: &str,
    file: &str,
    line: u32,
    params: Vec<Param>,
    body: Block,
) -> FuncDecl {
    let arity = params.len();
    FuncDecl {
        name: name.to_string(),
        pos: pos(file, line),
        end_pos: pos(file, line),
        receiver: None,
        params,
        variadic: false,
        signature: func_sig(&format!("pkg.{name}"), file, line, arity),
        body: Some(body),
    }
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block { stmts }
}

pub fn call_in_unit(callee: Signature, args: Vec<Expr>, file: &str, line: u32) -> CallExpr {
    CallExpr {
        pos: pos(file, line),
        end_pos: pos(file, line),
        callee: Callee::InUnit(callee),
        args,
    }
}

pub fn call_external(name: Option<&str>, args: Vec<Expr>, file: &str, line: u32) -> CallExpr {
    CallExpr {
        pos: pos(file, line),
        end_pos: pos(file, line),
        callee: Callee::External(name.map(|s| s.to_string())),
        args,
    }
}

pub fn call_literal(lit: FuncLit, args: Vec<Expr>, file: &str, line: u32) -> CallExpr {
    CallExpr {
        pos: pos(file, line),
        end_pos: pos(file, line),
        callee: Callee::Literal(Box::new(lit)),
        args,
    }
}

pub fn addr_of(id: Ident) -> Expr {
    Expr::AddrOf(Box::new(Expr::Ident(id)))
}

pub fn plain_ident(id: Ident) -> Expr {
    Expr::Ident(id)
}

pub fn range_stmt(key: Option<Ident>, value: Option<Ident>, body: Block, file: &str, line: u32) -> RangeStmt {
    RangeStmt {
        pos: pos(file, line),
        end_pos: pos(file, line),
        key,
        value,
        body,
    }
}

pub fn source_file(path: &str, package: &str, decls: Vec<Decl>) -> SourceFile {
    SourceFile {
        path: path.to_string(),
        package: package.to_string(),
        type_checked: true,
        decls,
    }
}

pub fn go_stmt(call: CallExpr, file: &str, line: u32) -> Stmt {
    Stmt::Go(GoStmt { pos: pos(file, line), call })
}

pub fn defer_stmt(call: CallExpr, file: &str, line: u32) -> Stmt {
    Stmt::Defer(DeferStmt { pos: pos(file, line), call })
}

pub fn assign(lhs: Expr, rhs: Expr, file: &str, line: u32) -> Stmt {
    Stmt::Assign(AssignStmt { pos: pos(file, line), lhs, rhs })
}

pub fn composite_lit(fields: Vec<Expr>, file: &str, line: u32) -> Expr {
    Expr::CompositeLit(CompositeLit { pos: pos(file, line), fields })
}

pub fn func_lit(body: Block) -> FuncLit {
    FuncLit { body }
}

pub fn if_stmt(body: Block, else_branch: Option<Box<Stmt>>) -> Stmt {
    Stmt::If(IfStmt { body, else_branch })
}

pub fn for_stmt(body: Block) -> Stmt {
    Stmt::For(ForStmt { body })
}

pub fn switch_stmt(body: Block) -> Stmt {
    Stmt::Switch(SwitchStmt { body })
}

pub fn unit(files: Vec<SourceFile>) -> AnalysisUnit {
    AnalysisUnit::new(files, FxHashMap::default())
}
