//! Logging setup
//!
//! Logs go to stderr so they never mix with `--json` output on stdout.
//! `RUST_LOG` overrides the default filter.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global tracing subscriber (once per process).
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let default_filter = if verbose {
            "siftcopy=info"
        } else {
            "siftcopy=warn"
        };
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init();
    });
}
