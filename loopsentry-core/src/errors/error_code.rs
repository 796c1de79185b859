//! Stable string error codes, surfaced alongside `tracing` spans so a
//! dashboard can bucket failures without parsing the error message.

/// Implemented by every error enum in the workspace so logging call sites
/// can attach a stable `error_code` field regardless of which pass failed.
pub trait AnalysisErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const TYPE_GRAPH_FAILED: &str = "TYPE_GRAPH_FAILED";
pub const CALL_GRAPH_FAILED: &str = "CALL_GRAPH_FAILED";
pub const PACKAGE_IDENTITY_FAILED: &str = "PACKAGE_IDENTITY_FAILED";
pub const GOROUTINE_REACH_FAILED: &str = "GOROUTINE_REACH_FAILED";
pub const POINTER_ESCAPE_FAILED: &str = "POINTER_ESCAPE_FAILED";
pub const LOOP_POINTER_FAILED: &str = "LOOP_POINTER_FAILED";
pub const LOOP_CLOSURE_FAILED: &str = "LOOP_CLOSURE_FAILED";
pub const INPUT_FILE_SKIPPED: &str = "INPUT_FILE_SKIPPED";
pub const UNIT_TOO_LARGE: &str = "UNIT_TOO_LARGE";
