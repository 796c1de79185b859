//! # loopsentry-analysis
//!
//! The analysis engine: the `AnalysisUnit` input model (spec §6), the
//! seven-pass pipeline (spec §2/§4), and the `Pipeline` orchestrator that
//! runs them in dependency order with the failure semantics of spec §4.8/§7.

#![allow(clippy::module_inception)]

pub mod allowlist;
pub mod ast;
pub mod pass;
pub mod pipeline;
pub mod unit;

pub use pipeline::{Pipeline, PipelineOutcome};
pub use unit::AnalysisUnit;
