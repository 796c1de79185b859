//! Parallel worker pool (spec §5): runs `loopsentry_analysis::Pipeline`
//! over a batch of units across a `rayon::ThreadPool`, each worker owning
//! its unit exclusively. Grounded in the teacher's `Scanner::scan`
//! `par_iter` fan-out (`drift-analysis`'s `scanner/scanner.rs`), adapted
//! from a file-level phase to a unit-level one, with a `reduce` replacing
//! the teacher's `AtomicUsize` progress counter since there is no
//! incremental-progress event channel here (spec §6 leaves that to the
//! caller).
//!
//! Each unit is removed from the sampling pool's accounting exactly once
//! per spec §5: `mark_visited` on a clean completion, `requeue` on a
//! structural abort, never both.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loopsentry_analysis::{AnalysisUnit, Pipeline};
use loopsentry_core::PassStats;
use rayon::prelude::*;

use crate::sampler::{RepoId, UnitSampler};
use crate::sink::DiagnosticSink;

/// Aggregated result of a driver run, merged across every unit processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverStats {
    pub units_processed: usize,
    pub units_aborted: usize,
    pub pass_stats: PassStats,
}

impl DriverStats {
    fn merge(&mut self, other: &DriverStats) {
        self.units_processed += other.units_processed;
        self.units_aborted += other.units_aborted;
        self.pass_stats.merge(&other.pass_stats);
    }
}

pub struct WorkerPool {
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// `worker_threads == 0` lets rayon auto-detect, matching
    /// `AnalysisConfig::effective_worker_threads`.
    pub fn new(worker_threads: usize) -> Self {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if worker_threads > 0 {
            builder = builder.num_threads(worker_threads);
        }
        let pool = builder
            .thread_name(|i| format!("loopsentry-worker-{i}"))
            .build()
            .expect("failed to build loopsentry worker thread pool");
        Self { pool }
    }

    /// Run `pipeline` over every `(repo, unit)` pair in parallel, feeding
    /// each diagnostic produced to `sink`. `cancel` is checked once per
    /// unit boundary — passes themselves are never interrupted mid-pass
    /// (spec §5). `sampler` is the same one the pairs were drawn from:
    /// a successful, non-aborted unit is marked visited exactly once
    /// (spec §5); a unit aborted by a structural pass error is re-enqueued
    /// instead (spec §7), never marked visited.
    pub fn run(
        &self,
        units: Vec<(RepoId, AnalysisUnit)>,
        pipeline: &Pipeline,
        sink: &dyn DiagnosticSink,
        sampler: &dyn UnitSampler,
        cancel: &Arc<AtomicBool>,
    ) -> DriverStats {
        self.pool.install(|| {
            units
                .into_par_iter()
                .map(|(repo, unit)| analyze_one(&repo, &unit, pipeline, sink, sampler, cancel))
                .reduce(DriverStats::default, |mut acc, next| {
                    acc.merge(&next);
                    acc
                })
        })
    }
}

fn analyze_one(
    repo: &RepoId,
    unit: &AnalysisUnit,
    pipeline: &Pipeline,
    sink: &dyn DiagnosticSink,
    sampler: &dyn UnitSampler,
    cancel: &Arc<AtomicBool>,
) -> DriverStats {
    if cancel.load(Ordering::Relaxed) {
        return DriverStats::default();
    }

    let outcome = pipeline.analyze_unit(unit, cancel);
    if outcome.aborted {
        tracing::warn!(repo = %repo, "unit aborted before producing diagnostics, re-enqueuing");
        sampler.requeue(repo.clone());
        return DriverStats {
            units_processed: 0,
            units_aborted: 1,
            pass_stats: PassStats::default(),
        };
    }

    for diagnostic in outcome.diagnostics {
        sink.report(&repo.to_string(), diagnostic);
    }
    sampler.mark_visited(repo);

    DriverStats {
        units_processed: 1,
        units_aborted: 0,
        pass_stats: outcome.stats,
    }
}
