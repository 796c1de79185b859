//! `Signature` and `DeclaredSignature` (spec §3 Data Model).

use std::fmt;

use smallvec::SmallVec;

use crate::types::position::SourcePos;

/// Parameter indices rarely exceed a handful of entries, so this avoids a
/// heap allocation for the common case, matching the teacher's use of
/// `smallvec` for similarly small, per-declaration lists.
pub type PointerParamIndices = SmallVec<[usize; 4]>;

/// Whether a `Signature` belongs to a free function, a pointer-receiver
/// method, a value-receiver method, or an interface method (whose body is
/// absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    Function,
    PointerMethod,
    ValueMethod,
    InterfaceMethod,
}

/// A stable identity for a declared function or interface method
/// (spec §3): `(package-qualified name, source position, arity, receiver-kind)`.
///
/// Two distinct declarations never share a `Signature`; the same
/// declaration observed from two call sites always produces the same one —
/// `PartialEq`/`Hash`/`Ord` are derived from the tuple, not from identity,
/// so a `Signature` can be freely cloned, hashed, and used as a map key
/// across passes without a backing arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub qualified_name: String,
    pub pos: SourcePos,
    pub arity: usize,
    pub receiver_kind: ReceiverKind,
}

impl Signature {
    pub fn new(
        qualified_name: impl Into<String>,
        pos: SourcePos,
        arity: usize,
        receiver_kind: ReceiverKind,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            pos,
            arity,
            receiver_kind,
        }
    }

    pub fn is_interface_method(&self) -> bool {
        matches!(self.receiver_kind, ReceiverKind::InterfaceMethod)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.qualified_name, self.pos)
    }
}

/// A `Signature` augmented with the facts the call-graph and escape passes
/// need about its parameter list (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredSignature {
    pub signature: Signature,
    /// Positions in the parameter list whose declared type is a pointer.
    pub pointer_param_indices: PointerParamIndices,
    /// True if the last parameter is variadic-of-pointer; a pointer passed
    /// at a variadic call site is attributed to the last entry of
    /// `pointer_param_indices` (spec §9 Open Questions).
    pub variadic_of_pointer: bool,
}

impl DeclaredSignature {
    pub fn new(
        signature: Signature,
        pointer_param_indices: impl Into<PointerParamIndices>,
        variadic_of_pointer: bool,
    ) -> Self {
        Self {
            signature,
            pointer_param_indices: pointer_param_indices.into(),
            variadic_of_pointer,
        }
    }

    pub fn is_pointer_param(&self, idx: usize) -> bool {
        self.pointer_param_indices.contains(&idx)
    }

    /// The parameter index that a variadic pointer argument at the call
    /// site should be attributed to, if any.
    pub fn variadic_pointer_index(&self) -> Option<usize> {
        if self.variadic_of_pointer {
            self.pointer_param_indices.last().copied()
        } else {
            None
        }
    }
}
