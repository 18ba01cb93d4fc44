//! # concur-bench - execution strategy comparison for I/O-bound checks
//!
//! Runs the same host check (HTTP status probe or TLS certificate expiry)
//! over a list of hosts under four execution strategies and reports the
//! wall-clock time of each trial:
//!
//! - **Sequential**: one host after another on the calling thread
//! - **Threaded**: one OS thread per host
//! - **Multiprocess**: one child process per host
//! - **Cooperative async**: one task per host on a single-threaded runtime
//!
//! A full comparison is 23 trials: a sequential baseline, seven groups of the
//! three concurrent strategies in fixed permuted orders, and a closing
//! sequential baseline.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the trial plan
//! concur-bench --dry-run run
//!
//! # Compare strategies for certificate checks against two hosts
//! concur-bench run --kind cert --hosts github.com,velog.io
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod parallel;

pub use cli::{Cli, Output};
pub use config::BenchConfig;
pub use harness::{Harness, ResultTable};
pub use parallel::Strategy;

/// Result type alias for concur-bench operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
