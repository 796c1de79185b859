//! Diagnostic sink (spec §6): the interface the pipeline's results are
//! reported through, called synchronously once per diagnostic and
//! responsible for its own synchronization (spec §5). The provided
//! implementation hands off to an unbounded `crossbeam_channel` so a
//! worker is never blocked on I/O, the same separation the teacher's
//! `BatchWriter` (drift-storage's `batch::writer`) draws between the
//! thread producing records and the thread consuming them — simplified
//! here since there is no batching concern, one diagnostic is one send.

use crossbeam_channel::{Receiver, Sender};
use loopsentry_core::Diagnostic;

/// Called once per diagnostic found; implementations must tolerate being
/// called concurrently from multiple worker threads (spec §5).
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, repo: &str, diagnostic: Diagnostic);
}

/// A diagnostic paired with the repository it was found in, the unit the
/// channel consumer actually sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedDiagnostic {
    pub repo: String,
    pub diagnostic: Diagnostic,
}

/// A `DiagnosticSink` that forwards every report down an unbounded
/// channel. The receiving end is returned from `ChannelSink::new` so the
/// caller decides what consumption looks like — print to stdout, post an
/// issue comment, accumulate into a report (spec §6 leaves the concrete
/// reporter out of scope).
pub struct ChannelSink {
    tx: Sender<ReportedDiagnostic>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<ReportedDiagnostic>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl DiagnosticSink for ChannelSink {
    fn report(&self, repo: &str, diagnostic: Diagnostic) {
        let _ = self.tx.send(ReportedDiagnostic {
            repo: repo.to_string(),
            diagnostic,
        });
    }
}
