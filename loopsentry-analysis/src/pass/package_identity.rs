//! PackageIdentity (spec §4.2): resolve a stable package-qualified name for
//! every declared function, independent of whether type-checking succeeded
//! for its file — this is what lets `CallGraph` (approx.) match call
//! edges across file boundaries even when `TypeGraph`'s type-backed view
//! is incomplete.

use loopsentry_core::types::collections::FxHashMap;
use loopsentry_core::types::signature::Signature;

use crate::ast::{Decl, FuncDecl, InterfaceMethod};
use crate::unit::AnalysisUnit;

#[derive(Debug, Clone, Default)]
pub struct PackageIdentityResult {
    /// Signature → package-qualified name, e.g. `pkg.Type.Method` or
    /// `pkg.Func`.
    pub qualified_names: FxHashMap<Signature, String>,
}

pub fn run(unit: &AnalysisUnit) -> PackageIdentityResult {
    let mut result = PackageIdentityResult::default();

    for file in &unit.files {
        for decl in &file.decls {
            match decl {
                Decl::Func(f) => {
                    let qn = qualified_func_name(&file.package, f);
                    result.qualified_names.insert(f.signature.clone(), qn);
                }
                Decl::Interface(iface) => {
                    for m in &iface.methods {
                        let qn = qualified_method_name(&file.package, &iface.name, m);
                        result.qualified_names.insert(m.signature.clone(), qn);
                    }
                }
            }
        }
    }

    result
}

fn qualified_func_name(package: &str, f: &FuncDecl) -> String {
    match &f.receiver {
        Some(recv) => {
            let recv_type = receiver_type_name(&recv.ty);
            format!("{package}.{recv_type}.{}", f.name)
        }
        None => format!("{package}.{}", f.name),
    }
}

fn qualified_method_name(package: &str, iface_name: &str, m: &InterfaceMethod) -> String {
    format!("{package}.{iface_name}.{}", m.name)
}

fn receiver_type_name(ty: &crate::ast::Type) -> String {
    match ty {
        crate::ast::Type::Pointer(inner) => receiver_type_name(inner),
        crate::ast::Type::Named(name) => name.clone(),
        crate::ast::Type::EmptyInterface => "interface{}".to_string(),
        crate::ast::Type::Slice(inner) => format!("[]{}", receiver_type_name(inner)),
    }
}
