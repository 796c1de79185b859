//! `tracing-subscriber` bootstrap shared by the driver binary and by tests
//! that want human-readable output instead of the default no-op subscriber.

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber honoring `RUST_LOG`, defaulting to
/// `info` when the variable is unset. Safe to call more than once — later
/// calls are no-ops once a global subscriber is set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
