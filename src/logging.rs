//! Logging setup
//!
//! Structured `tracing` events written to stderr. `RUST_LOG` wins when set;
//! otherwise the level follows the `--verbose` flag.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "cylc_graph=debug,warn"
    } else {
        "cylc_graph=info,warn"
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
