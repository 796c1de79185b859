//! Per-unit statistics (spec §9 "Global mutable state"): the original
//! implementation accumulates counters in a package-level global; this
//! spec replaces that with a plain record returned alongside each
//! pipeline result, which the driver aggregates across units.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassStats {
    pub func_decls: usize,
    pub func_calls: usize,
    pub external_calls: usize,
    pub ptr_func_starts_goroutine: usize,
    pub loop_pointer_diagnostics: usize,
    pub loop_closure_diagnostics: usize,
}

impl PassStats {
    pub fn merge(&mut self, other: &PassStats) {
        self.func_decls += other.func_decls;
        self.func_calls += other.func_calls;
        self.external_calls += other.external_calls;
        self.ptr_func_starts_goroutine += other.ptr_func_starts_goroutine;
        self.loop_pointer_diagnostics += other.loop_pointer_diagnostics;
        self.loop_closure_diagnostics += other.loop_closure_diagnostics;
    }
}
