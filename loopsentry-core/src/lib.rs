//! # loopsentry-core
//!
//! Foundation crate for the loopsentry loop-pointer escape analyzer.
//! Defines the shared types, errors, config, constants, and tracing setup
//! consumed by every other crate in the workspace.

#![allow(dead_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing_init;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::AnalysisConfig;
pub use errors::error_code::AnalysisErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::diagnostic::{Diagnostic, Related};
pub use types::position::{SourcePos, Span};
pub use types::signature::{DeclaredSignature, ReceiverKind, Signature};
pub use types::stats::PassStats;
