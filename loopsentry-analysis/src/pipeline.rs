//! The seven-pass pipeline (spec §2/§4/§8), run once per `AnalysisUnit`.
//!
//! Failure semantics (spec §7): `TypeGraph` and `CallGraph` are structural —
//! every later pass assumes they succeeded, so a failure there aborts the
//! unit outright. Every other pass is non-structural: a failure is logged
//! and the pipeline continues with whatever partial result survived,
//! producing fewer diagnostics rather than none.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loopsentry_core::errors::{AnalysisErrorCode, PassError, StructuralError};
use loopsentry_core::{AnalysisConfig, Diagnostic, PassStats};

use crate::allowlist::AllowList;
use crate::pass::{call_graph, goroutine_reach, loop_closure, loop_pointer, package_identity, pointer_escape, type_graph};
use crate::unit::AnalysisUnit;

/// The result of running the pipeline over one unit.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub diagnostics: Vec<Diagnostic>,
    pub stats: PassStats,
    /// True if a structural failure aborted the unit before any
    /// diagnostics could be produced, or the cancellation token fired.
    pub aborted: bool,
}

pub struct Pipeline {
    config: AnalysisConfig,
    allow_list: AllowList,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        let allow_list = AllowList::new(config.effective_allow_list());
        Self { config, allow_list }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Analyze one unit. `cancel`, if set, is checked once before work
    /// begins — the boundary the driver's worker pool cancels at (spec §5).
    pub fn analyze_unit(&self, unit: &AnalysisUnit, cancel: &Arc<AtomicBool>) -> PipelineOutcome {
        if cancel.load(Ordering::Relaxed) {
            return PipelineOutcome {
                aborted: true,
                ..Default::default()
            };
        }

        let max_functions = self.config.effective_max_functions();
        let declared = unit.declared_function_count();
        if declared > max_functions {
            let err = StructuralError::UnitTooLarge {
                functions: declared,
                limit: max_functions,
            };
            tracing::error!(error_code = err.error_code(), functions = declared, limit = max_functions, "unit too large");
            return PipelineOutcome {
                aborted: true,
                ..Default::default()
            };
        }

        let mut stats = PassStats {
            func_decls: declared,
            ..Default::default()
        };

        let type_graph_result = match guard(|| type_graph::run(unit)) {
            Ok(r) => r,
            Err(message) => {
                let err = StructuralError::TypeGraph {
                    file: unit.files.first().map(|f| f.path.clone()).unwrap_or_default(),
                    message,
                };
                tracing::error!(error_code = err.error_code(), "{err}");
                return PipelineOutcome {
                    stats,
                    aborted: true,
                    diagnostics: Vec::new(),
                };
            }
        };
        stats.external_calls = type_graph_result.external_calls.len();
        stats.func_calls = type_graph_result.edges.len() + type_graph_result.external_calls.len();

        let call_graph_result = match guard(|| call_graph::run(unit)) {
            Ok(r) => r,
            Err(message) => {
                let err = StructuralError::CallGraph { message };
                tracing::error!(error_code = err.error_code(), "{err}");
                return PipelineOutcome {
                    stats,
                    aborted: true,
                    diagnostics: Vec::new(),
                };
            }
        };

        let fail_fast = self.config.effective_fail_fast();
        macro_rules! abort_or_default {
            ($stats:expr) => {{
                if fail_fast {
                    return PipelineOutcome {
                        stats: $stats,
                        aborted: true,
                        diagnostics: Vec::new(),
                    };
                }
                Default::default()
            }};
        }

        let package_identity_result = match guard(|| package_identity::run(unit)) {
            Ok(r) => r,
            Err(message) => {
                let err = PassError::PackageIdentity { message };
                tracing::warn!(error_code = err.error_code(), "{err}");
                abort_or_default!(stats)
            }
        };

        let goroutine_reach_result = match guard(|| goroutine_reach::run(unit, &call_graph_result)) {
            Ok(r) => r,
            Err(message) => {
                let err = PassError::GoroutineReach { message };
                tracing::warn!(error_code = err.error_code(), "{err}");
                abort_or_default!(stats)
            }
        };
        stats.ptr_func_starts_goroutine = goroutine_reach_result.starts_goroutine.len();

        let allow_list = &self.allow_list;
        let pointer_escape_result = match guard(|| pointer_escape::run(unit, &call_graph_result, allow_list)) {
            Ok(r) => r,
            Err(message) => {
                let err = PassError::PointerEscape { message };
                tracing::warn!(error_code = err.error_code(), "{err}");
                abort_or_default!(stats)
            }
        };

        let mut diagnostics = match guard(|| {
            loop_pointer::run(
                unit,
                &call_graph_result,
                &pointer_escape_result,
                &goroutine_reach_result,
                &package_identity_result,
                allow_list,
            )
        }) {
            Ok(d) => d,
            Err(message) => {
                let err = PassError::LoopPointer { message };
                tracing::warn!(error_code = err.error_code(), "{err}");
                if fail_fast {
                    return PipelineOutcome {
                        stats,
                        aborted: true,
                        diagnostics: Vec::new(),
                    };
                }
                Vec::new()
            }
        };
        stats.loop_pointer_diagnostics = diagnostics.len();

        let loop_closure_diagnostics = match guard(|| loop_closure::run(unit)) {
            Ok(d) => d,
            Err(message) => {
                let err = PassError::LoopClosure { message };
                tracing::warn!(error_code = err.error_code(), "{err}");
                if fail_fast {
                    return PipelineOutcome {
                        stats,
                        aborted: true,
                        diagnostics: Vec::new(),
                    };
                }
                Vec::new()
            }
        };
        stats.loop_closure_diagnostics = loop_closure_diagnostics.len();

        diagnostics.extend(loop_closure_diagnostics);

        PipelineOutcome {
            diagnostics,
            stats,
            aborted: false,
        }
    }
}

/// Run `f`, converting a panic into an `Err` message instead of unwinding
/// past the unit boundary (spec §7: a pass failure must never take down
/// the rest of the run).
fn guard<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "pass panicked with a non-string payload".to_string())
    })
}
