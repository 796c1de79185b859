//! Error taxonomy for the analysis pipeline (spec §7).
//!
//! Errors are split by the kind of failure they represent, not by which
//! pass raised them: a structural error always aborts the current unit, a
//! pass error is always logged and survived.

pub mod error_code;
pub mod pass_error;
pub mod structural_error;

pub use error_code::AnalysisErrorCode;
pub use pass_error::PassError;
pub use structural_error::StructuralError;
