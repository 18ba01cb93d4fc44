//! Log setup
//!
//! All progress, per-item results and the final table go through `tracing`.
//! Logs are written to stderr so stdout stays free for serialized reports.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` takes precedence over the flags.
///
/// Calling it again keeps the first subscriber.
pub fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,concur_bench={level}")));

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        tracing::debug!("keeping existing log subscriber: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_keeps_first_subscriber() {
        setup_logging(true, false);
        setup_logging(false, true);
        tracing::debug!("still logging");
    }
}
