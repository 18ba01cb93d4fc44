//! Error kinds for the comparison harness
//!
//! Per-item check failures never show up here: the operations absorb and log
//! them. What remains are failures of the execution primitives themselves and
//! harness misconfiguration.

use crate::parallel::Strategy;
use thiserror::Error;

/// Failure while managing the concurrency primitives of one strategy.
///
/// These are logged at trial scope; the trial's elapsed time is still recorded.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to start {strategy} worker for item {item}")]
    Spawn {
        strategy: Strategy,
        item: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build cooperative runtime")]
    Runtime(#[source] std::io::Error),

    #[error("{count} {strategy} worker(s) panicked")]
    Panicked { strategy: Strategy, count: usize },

    #[error("failed to wait for worker process of item {item}")]
    Wait {
        item: String,
        #[source]
        source: std::io::Error,
    },
}

/// Harness construction errors; the only kind that aborts a run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
