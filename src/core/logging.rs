//! Diagnostic logging setup
//!
//! Log output goes to stderr so it never mixes with command output on
//! stdout. `RUST_LOG` takes precedence over the `--verbose` flag.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber for the CLI
pub fn init(verbose: bool) {
    let default_level = if verbose { "plateq=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) is not an error worth surfacing
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
