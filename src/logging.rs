//! Diagnostic logging to stderr.
//!
//! User-facing output (listings, ✓/✗ lines, dry-run commands) goes through
//! [`crate::ui`] and is always shown.  `tracing` events are for debugging
//! the tool itself and stay silent unless `--verbose` or `RUST_LOG` asks for
//! them.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default = if verbose { "bp_rs=debug" } else { "bp_rs=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) is harmless; ignore it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
