//! Diagnostic output on stderr
//!
//! The libraries log through the `log` facade; the subscriber's log bridge
//! turns those records into events so they are filtered and printed here.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the subscriber: warnings by default, debug with `--verbose`.
/// `TIERFLOW_LOG` overrides both. Calling it twice keeps the first one.
pub(crate) fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TIERFLOW_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
