//! Structural pass errors (spec §7 kind 2): failures in TypeGraph or
//! CallGraph construction, which are prerequisites for every other pass.
//! A structural error aborts the current unit; the unit is not recorded
//! as visited, so the driver retries it.

use super::error_code::{self, AnalysisErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StructuralError {
    #[error("type graph construction failed for {file}: {message}")]
    TypeGraph { file: String, message: String },

    #[error("call graph construction failed: {message}")]
    CallGraph { message: String },

    #[error("unit exceeds the configured in-memory threshold: {functions} functions (limit {limit})")]
    UnitTooLarge { functions: usize, limit: usize },
}

impl AnalysisErrorCode for StructuralError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TypeGraph { .. } => error_code::TYPE_GRAPH_FAILED,
            Self::CallGraph { .. } => error_code::CALL_GRAPH_FAILED,
            Self::UnitTooLarge { .. } => error_code::UNIT_TOO_LARGE,
        }
    }
}
