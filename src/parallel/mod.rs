//! Execution strategies for batches of independent I/O-bound work
//!
//! This module knows how to apply a per-item operation to every work item
//! under one of four execution models, and how to wait until all items are done.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Sequential**: runs the synchronous operation item by item on the caller's thread
//! - **Threaded**: one OS thread per item (`crossbeam` scoped threads), joined as a barrier
//! - **Multiprocess**: one OS process per item, built from a [`WorkerCommand`]
//! - **Cooperative async**: one task per item on a fresh single-threaded tokio runtime
//!
//! ## What This Module Does NOT Do:
//! - **Bounding**: concurrency always equals the item count
//! - **Timing**: measurement and trial ordering belong to [`crate::harness`]
//! - **Result collection**: operations are side-effect only and absorb their own errors
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use concur_bench::parallel::{Operations, Strategy, WorkerCommand, async_op, sync_op};
//!
//! let items = vec!["github.com".to_string(), "www.bing.com".to_string()];
//! let operations = Operations::new(
//!     sync_op(|host: &String| println!("checking {host}")),
//!     async_op(|host: String| async move { println!("checking {host}") }),
//!     WorkerCommand::new("echo"),
//! );
//!
//! Strategy::Threaded.execute(&items, &operations)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod ops;

// Re-export main types for easier access
pub use self::core::{
    CooperativeExecutor, ProcessExecutor, SequentialExecutor, Strategy, ThreadedExecutor,
};
pub use ops::{AsyncOp, BoxFuture, Operations, SyncOp, WorkerCommand, async_op, sync_op};
