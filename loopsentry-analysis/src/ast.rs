//! A minimal, already-resolved AST shape (spec §1/§6: the parser and type
//! checker are out-of-scope external collaborators; this module is the
//! contract they deliver against — one file's worth of declarations,
//! statements, and expressions, with identifiers already resolved to a
//! stable [`Signature`] wherever they refer to a declared function).
//!
//! Only the node kinds the seven passes actually inspect are modeled:
//! function/interface declarations, call expressions, ranged loops,
//! `go`/`defer` statements, assignments, address-of expressions, and
//! composite literals. Everything else collapses into [`Stmt::Other`] /
//! [`Expr::Other`] — the passes never need to distinguish a `return` from
//! a `break`, for example.

use loopsentry_core::types::position::SourcePos;
use loopsentry_core::types::signature::Signature;

/// A stable identity for a single variable *declaration* (as opposed to
/// occurrences of its name) — the equivalent of `go/ast.Object` identity.
/// Two [`Ident`]s that refer to the same declared variable carry the same
/// `ObjId`; this is what lets the loop-pointer and loop-closure passes tell
/// "the loop variable" apart from an unrelated variable that happens to
/// share its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32);

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub package: String,
    /// Whether type-checking succeeded for this file. [`pass::type_graph`]
    /// treats calls inside a file with `type_checked = false` as
    /// unresolved (spec §4.8: a pass degrades gracefully on partial type
    /// info). The type-free [`pass::call_graph`] pass ignores this flag
    /// entirely — it resolves calls through the `Signature`s the front end
    /// already attached to every [`Expr::Ident`]/[`Callee::InUnit`], so it
    /// never needs [`pass::package_identity`]'s qualified names to match a
    /// call edge across files. `PackageIdentity` still runs every unit and
    /// its output reaches diagnostics directly, as the qualified callee
    /// name attached to `LoopPointer`'s in-unit-call findings.
    pub type_checked: bool,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Func(FuncDecl),
    Interface(InterfaceDecl),
}

/// A function or method declaration.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: String,
    pub pos: SourcePos,
    pub end_pos: SourcePos,
    /// Present for methods; `None` for free functions.
    pub receiver: Option<Param>,
    pub params: Vec<Param>,
    pub variadic: bool,
    /// The identity this declaration resolves to. Always present — name
    /// resolution (unlike full type inference) is assumed to succeed for
    /// every declared function (spec §1: "resolved identifiers").
    pub signature: Signature,
    /// `None` for a declaration with no body (shouldn't occur for
    /// in-unit functions, kept for symmetry with [`InterfaceMethod`]).
    pub body: Option<Block>,
}

impl FuncDecl {
    pub fn pointer_param_indices(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.ty.is_pointer_like())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_pointer_receiver(&self) -> bool {
        self.receiver
            .as_ref()
            .map(|r| matches!(r.ty, Type::Pointer(_)))
            .unwrap_or(false)
    }

    pub fn variadic_of_pointer(&self) -> bool {
        self.variadic
            && self
                .params
                .last()
                .map(|p| p.ty.is_pointer_like())
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: String,
    pub pos: SourcePos,
    pub methods: Vec<InterfaceMethod>,
}

/// An interface method field — a `Signature` whose body is absent
/// (spec §3: "Interface methods are Signatures whose bodies are absent").
#[derive(Debug, Clone)]
pub struct InterfaceMethod {
    pub name: String,
    pub pos: SourcePos,
    pub params: Vec<Param>,
    pub variadic: bool,
    pub signature: Signature,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Option<String>,
    pub obj_id: Option<ObjId>,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Pointer(Box<Type>),
    /// `interface{}` (or any interface type with zero methods) — the
    /// "empty-capability" parameter of spec §3.
    EmptyInterface,
    Named(String),
    Slice(Box<Type>),
}

impl Type {
    /// True for a bare pointer type or an empty interface (spec §3
    /// "Interesting predicate").
    pub fn is_pointer_like(&self) -> bool {
        matches!(self, Type::Pointer(_) | Type::EmptyInterface)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Range(RangeStmt),
    For(ForStmt),
    If(IfStmt),
    Switch(SwitchStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Assign(AssignStmt),
    Expr(Expr),
    Block(Block),
    /// Anything the passes never need to look inside (return, break,
    /// plain var decl, …).
    Other,
}

/// A ranged loop (spec glossary: "binds one or more per-iteration
/// variables to successive elements of a collection, reusing the same
/// variable storage across iterations").
#[derive(Debug, Clone)]
pub struct RangeStmt {
    pub pos: SourcePos,
    pub end_pos: SourcePos,
    pub key: Option<Ident>,
    pub value: Option<Ident>,
    pub body: Block,
}

impl RangeStmt {
    /// The loop variables bound by this statement (key and/or value).
    pub fn loop_vars(&self) -> Vec<&Ident> {
        self.key.iter().chain(self.value.iter()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub body: Block,
    pub else_branch: Option<Box<Stmt>>,
}

/// A `switch` statement. Individual `case` bodies are not modeled
/// separately — their statements are flattened into one body, which is
/// sufficient for both the loop-pointer and loop-closure descents (neither
/// pass needs to know which case a statement came from).
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct GoStmt {
    pub pos: SourcePos,
    pub call: CallExpr,
}

#[derive(Debug, Clone)]
pub struct DeferStmt {
    pub pos: SourcePos,
    pub call: CallExpr,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub pos: SourcePos,
    pub lhs: Expr,
    pub rhs: Expr,
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub pos: SourcePos,
    /// `None` for identifiers that don't refer to a variable (e.g. a
    /// package qualifier) — the loop-closure pass skips these (spec
    /// §4.7: "Identifier is not referring to a variable").
    pub obj_id: Option<ObjId>,
}

/// How a call's callee resolved (spec §4.1).
#[derive(Debug, Clone)]
pub enum Callee {
    /// A call into a function or interface method declared in this unit.
    InUnit(Signature),
    /// A call to a compiler builtin (`len`, `make`, `append`, …) — never
    /// an edge, never external.
    Builtin,
    /// A conversion to a known type (`T(x)`) — never an edge, never
    /// external.
    Cast,
    /// A resolved call into code outside the analyzed unit, with its
    /// fully-qualified name (e.g. `fmt.Println`) when available.
    External(Option<String>),
    /// The callee could not be resolved at all (spec §4.1: "a
    /// dynamically dispatched value of unknown type") — treated as
    /// external with no name.
    Unknown,
    /// An immediately-invoked function literal (`go func() { ... }()`).
    /// Its body executes inline, so every pass treats it the same way it
    /// treats a `FuncLit` reached through an ordinary expression.
    Literal(Box<FuncLit>),
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub pos: SourcePos,
    pub end_pos: SourcePos,
    pub callee: Callee,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct CompositeLit {
    pub pos: SourcePos,
    pub fields: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct FuncLit {
    pub body: Block,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    Call(Box<CallExpr>),
    /// `&x`
    AddrOf(Box<Expr>),
    CompositeLit(CompositeLit),
    FuncLit(Box<FuncLit>),
    /// `key: value` inside a composite literal (spec §4.7: "Key/value
    /// expressions inside literal initializers are descended into; their
    /// keys are not").
    KeyValue(Box<Expr>, Box<Expr>),
    /// `x.Sel` — only the base expression is modeled; selector-name
    /// resolution happens during call construction, not here.
    Selector(Box<Expr>, String),
    /// Anything else (literals, binary expressions, …).
    Other,
}

impl Expr {
    /// If this expression is `&ident`, return the identifier.
    pub fn as_addr_of_ident(&self) -> Option<&Ident> {
        match self {
            Expr::AddrOf(inner) => match inner.as_ref() {
                Expr::Ident(id) => Some(id),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(id) => Some(id),
            _ => None,
        }
    }
}
