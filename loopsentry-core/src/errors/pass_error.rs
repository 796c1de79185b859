//! Non-structural pass errors (spec §7 kind 3): PackageIdentity,
//! GoroutineReach, PointerEscape, LoopPointer, LoopClosure. These are
//! logged and the pipeline continues with whatever partial result the
//! failing pass already produced.

use super::error_code::{self, AnalysisErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("package identity resolution failed: {message}")]
    PackageIdentity { message: String },

    #[error("goroutine reachability pass failed: {message}")]
    GoroutineReach { message: String },

    #[error("pointer escape pass failed: {message}")]
    PointerEscape { message: String },

    #[error("loop pointer diagnostic pass failed: {message}")]
    LoopPointer { message: String },

    #[error("loop closure diagnostic pass failed: {message}")]
    LoopClosure { message: String },
}

impl AnalysisErrorCode for PassError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PackageIdentity { .. } => error_code::PACKAGE_IDENTITY_FAILED,
            Self::GoroutineReach { .. } => error_code::GOROUTINE_REACH_FAILED,
            Self::PointerEscape { .. } => error_code::POINTER_ESCAPE_FAILED,
            Self::LoopPointer { .. } => error_code::LOOP_POINTER_FAILED,
            Self::LoopClosure { .. } => error_code::LOOP_CLOSURE_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_variant_reports_its_own_stable_error_code() {
        let cases: [(PassError, &str); 5] = [
            (PassError::PackageIdentity { message: "x".to_string() }, error_code::PACKAGE_IDENTITY_FAILED),
            (PassError::GoroutineReach { message: "x".to_string() }, error_code::GOROUTINE_REACH_FAILED),
            (PassError::PointerEscape { message: "x".to_string() }, error_code::POINTER_ESCAPE_FAILED),
            (PassError::LoopPointer { message: "x".to_string() }, error_code::LOOP_POINTER_FAILED),
            (PassError::LoopClosure { message: "x".to_string() }, error_code::LOOP_CLOSURE_FAILED),
        ];
        for (err, expected) in cases {
            assert_eq!(err.error_code(), expected);
        }
    }
}
