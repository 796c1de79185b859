//! # loopsentry-driver
//!
//! The external-interface layer (spec §5/§6): a repository sampler reading
//! the all-units/visited-units file format, a diagnostic sink handing off
//! to a `crossbeam-channel`, a `rayon`-backed parallel worker pool running
//! `loopsentry_analysis::Pipeline` across units, and permalink/quote
//! report rendering. The archive fetcher and the parser/type-checker front
//! end that turns a fetched tree into an `AnalysisUnit` are out of scope
//! (spec §1) and modeled here only as a trait boundary.

pub mod fetch;
pub mod report;
pub mod sampler;
pub mod sink;
pub mod worker_pool;

pub use fetch::{ArchiveFetcher, FetchError, UnimplementedFetcher};
pub use report::{permalink, render_finding, PermalinkConfig};
pub use sampler::{FileBackedSampler, RepoId, UnitSampler};
pub use sink::{ChannelSink, DiagnosticSink, ReportedDiagnostic};
pub use worker_pool::{DriverStats, WorkerPool};
