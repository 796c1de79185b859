//! CallGraph, approximate (spec §4.3): a coarser, type-free call graph
//! keyed by `Signature`, tracking which formal-argument index at a call
//! site is forwarded to which formal-argument index of the callee, and —
//! when the argument is itself the caller's own parameter — the
//! pass-through fact the escape pass needs.

use std::collections::VecDeque;

use loopsentry_core::types::collections::{FxHashMap, FxHashSet};
use loopsentry_core::types::signature::{DeclaredSignature, Signature};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::ast::{Callee, Decl, Expr, FuncDecl, Stmt};
use crate::unit::AnalysisUnit;

/// One call-graph edge (spec §3 `CallGraph`).
#[derive(Debug, Clone)]
pub struct CallEdge {
    /// The local argument index at the call site (`i`).
    pub arg_index: usize,
    /// The callee's parameter index that receives it (`j`).
    pub param_index: usize,
    /// `Some(k)` when the argument expression is a bare reference to the
    /// caller's own parameter `k` (spec §3 "pass-through fact").
    pub passthrough: Option<usize>,
    /// Whether the callee's `param_index` is itself a declared pointer
    /// parameter — the edges `CalledByBFS` descends along.
    pub carries_pointer: bool,
}

/// A directed multigraph over Signatures (spec §3).
#[derive(Debug, Default)]
pub struct CallGraph {
    graph: StableDiGraph<Signature, CallEdge>,
    index: FxHashMap<Signature, NodeIndex>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_func(&mut self, sig: Signature) -> NodeIndex {
        if let Some(idx) = self.index.get(&sig) {
            return *idx;
        }
        let idx = self.graph.add_node(sig.clone());
        self.index.insert(sig, idx);
        idx
    }

    pub fn add_call(&mut self, caller: Signature, callee: Signature, edge: CallEdge) {
        let caller_idx = self.add_func(caller);
        let callee_idx = self.add_func(callee);
        self.graph.add_edge(caller_idx, callee_idx, edge);
    }

    pub fn contains(&self, sig: &Signature) -> bool {
        self.index.contains_key(sig)
    }

    /// Breadth-first traversal of the reverse graph (spec §4.3 query 2):
    /// starting from `roots`, `visit` is invoked once per Signature
    /// reachable by descending only along pointer-carrying edges.
    pub fn called_by_bfs<F: FnMut(&Signature)>(&self, roots: &[Signature], mut visit: F) {
        let mut seen: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        for root in roots {
            if let Some(&idx) = self.index.get(root) {
                if seen.insert(idx) {
                    queue.push_back(idx);
                }
            }
        }

        while let Some(idx) = queue.pop_front() {
            for edge_ref in self.graph.edges_directed(idx, Direction::Incoming) {
                if !edge_ref.weight().carries_pointer {
                    continue;
                }
                let caller_idx = edge_ref.source();
                if seen.insert(caller_idx) {
                    visit(&self.graph[caller_idx]);
                    queue.push_back(caller_idx);
                }
            }
        }
    }

    /// Reverse BFS with argument tracking (spec §4.3 query 3): the
    /// frontier is keyed by `(Signature, paramIdx)`; when an edge records
    /// pass-through `caller.param[k] -> callee.param[j]` and
    /// `(callee, j)` is in the frontier, `(caller, k)` is added.
    pub fn called_by_bfs_arg_tracking<F: FnMut(&Signature, usize)>(
        &self,
        roots: &[(Signature, usize)],
        mut visit: F,
    ) {
        let mut seen: FxHashSet<(NodeIndex, usize)> = FxHashSet::default();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();

        for (sig, idx) in roots {
            if let Some(&node) = self.index.get(sig) {
                if seen.insert((node, *idx)) {
                    queue.push_back((node, *idx));
                }
            }
        }

        while let Some((callee_idx, callee_param)) = queue.pop_front() {
            for edge_ref in self.graph.edges_directed(callee_idx, Direction::Incoming) {
                let edge = edge_ref.weight();
                if edge.param_index != callee_param {
                    continue;
                }
                let Some(k) = edge.passthrough else { continue };
                let caller_idx = edge_ref.source();
                let key = (caller_idx, k);
                if seen.insert(key) {
                    let caller_sig = &self.graph[caller_idx];
                    visit(caller_sig, k);
                    queue.push_back(key);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[derive(Debug, Default)]
pub struct CallGraphResult {
    pub graph: CallGraph,
    /// Every declared Signature in the unit (not filtered to "interesting"
    /// — the approximate pass is type-free and keeps whatever parameter
    /// facts the AST itself carries).
    pub declared: FxHashMap<Signature, DeclaredSignature>,
}

/// Build the approximate call graph (spec §4.3). Deliberately does not
/// consult `file.type_checked` — unlike `TypeGraph`, this pass resolves
/// calls via the identifiers the front end already resolved, regardless of
/// whether full type information is available for the file.
pub fn run(unit: &AnalysisUnit) -> CallGraphResult {
    let mut result = CallGraphResult::default();
    result.declared = collect_declared_signatures(unit);

    for sig in result.declared.keys() {
        result.graph.add_func(sig.clone());
    }

    for file in &unit.files {
        for decl in &file.decls {
            if let Decl::Func(f) = decl {
                if let Some(body) = &f.body {
                    walk_block(body, f, &mut result);
                }
            }
        }
    }

    result
}

fn collect_declared_signatures(unit: &AnalysisUnit) -> FxHashMap<Signature, DeclaredSignature> {
    let mut map = FxHashMap::default();
    for file in &unit.files {
        for decl in &file.decls {
            match decl {
                Decl::Func(f) => {
                    map.insert(
                        f.signature.clone(),
                        DeclaredSignature::new(
                            f.signature.clone(),
                            f.pointer_param_indices(),
                            f.variadic_of_pointer(),
                        ),
                    );
                }
                Decl::Interface(iface) => {
                    for m in &iface.methods {
                        let pointer_param_indices: Vec<usize> = m
                            .params
                            .iter()
                            .enumerate()
                            .filter(|(_, p)| p.ty.is_pointer_like())
                            .map(|(i, _)| i)
                            .collect();
                        let variadic_of_pointer = m.variadic
                            && m.params
                                .last()
                                .map(|p| p.ty.is_pointer_like())
                                .unwrap_or(false);
                        map.insert(
                            m.signature.clone(),
                            DeclaredSignature::new(m.signature.clone(), pointer_param_indices, variadic_of_pointer),
                        );
                    }
                }
            }
        }
    }
    map
}

fn walk_block(block: &crate::ast::Block, caller: &FuncDecl, result: &mut CallGraphResult) {
    for stmt in &block.stmts {
        walk_stmt(stmt, caller, result);
    }
}

fn walk_stmt(stmt: &Stmt, caller: &FuncDecl, result: &mut CallGraphResult) {
    match stmt {
        Stmt::Range(r) => walk_block(&r.body, caller, result),
        Stmt::For(f) => walk_block(&f.body, caller, result),
        Stmt::If(i) => {
            walk_block(&i.body, caller, result);
            if let Some(e) = &i.else_branch {
                walk_stmt(e, caller, result);
            }
        }
        Stmt::Switch(s) => walk_block(&s.body, caller, result),
        Stmt::Go(g) => walk_call(&g.call, caller, result),
        Stmt::Defer(d) => walk_call(&d.call, caller, result),
        Stmt::Assign(a) => {
            walk_expr(&a.lhs, caller, result);
            walk_expr(&a.rhs, caller, result);
        }
        Stmt::Expr(e) => walk_expr(e, caller, result),
        Stmt::Block(b) => walk_block(b, caller, result),
        Stmt::Other => {}
    }
}

fn walk_expr(expr: &Expr, caller: &FuncDecl, result: &mut CallGraphResult) {
    match expr {
        Expr::Call(call) => walk_call(call, caller, result),
        Expr::AddrOf(inner) => walk_expr(inner, caller, result),
        Expr::CompositeLit(lit) => {
            for field in &lit.fields {
                walk_expr(field, caller, result);
            }
        }
        Expr::KeyValue(_, value) => walk_expr(value, caller, result),
        Expr::Selector(base, _) => walk_expr(base, caller, result),
        Expr::FuncLit(lit) => walk_block(&lit.body, caller, result),
        Expr::Ident(_) | Expr::Other => {}
    }
}

fn walk_call(call: &crate::ast::CallExpr, caller: &FuncDecl, result: &mut CallGraphResult) {
    for arg in &call.args {
        walk_expr(arg, caller, result);
    }

    if let Callee::Literal(lit) = &call.callee {
        walk_block(&lit.body, caller, result);
        return;
    }

    let Callee::InUnit(callee_sig) = &call.callee else {
        return;
    };
    let Some(callee_decl) = result.declared.get(callee_sig).cloned() else {
        return;
    };

    for (i, arg) in call.args.iter().enumerate() {
        let param_index = resolve_param_index(&callee_decl, i);
        let Some(param_index) = param_index else {
            continue;
        };
        let passthrough = arg_passthrough_index(arg, caller);
        let carries_pointer = callee_decl.is_pointer_param(param_index);
        result.graph.add_call(
            caller.signature.clone(),
            callee_sig.clone(),
            CallEdge {
                arg_index: i,
                param_index,
                passthrough,
                carries_pointer,
            },
        );
    }
}

/// Map a call-site argument index to the callee's parameter index, folding
/// trailing variadic arguments onto the variadic parameter's own index
/// (spec §9 Open Questions: "a pointer passed as a variadic element ...
/// attributed to the variadic's element index").
pub(crate) fn resolve_param_index(callee: &DeclaredSignature, arg_index: usize) -> Option<usize> {
    let arity = callee.signature.arity;
    if arity == 0 {
        return None;
    }
    if arg_index < arity {
        Some(arg_index)
    } else if let Some(variadic_idx) = callee.variadic_pointer_index() {
        Some(variadic_idx)
    } else {
        Some(arity - 1)
    }
}

/// If `arg` is a bare reference to one of `caller`'s own pointer
/// parameters, return that parameter's index (spec §3 pass-through fact).
fn arg_passthrough_index(arg: &Expr, caller: &FuncDecl) -> Option<usize> {
    let ident = arg.as_ident()?;
    let obj_id = ident.obj_id?;
    caller.params.iter().position(|p| p.obj_id == Some(obj_id))
}
