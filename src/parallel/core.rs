use crossbeam::thread;
use serde::Serialize;
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::ops::{AsyncOp, Operations, SyncOp, WorkerCommand};
use crate::error::ExecutorError;

/// Runs the synchronous operation over every item, in order, on the caller's thread
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<T>(work_items: &[T], operation: &SyncOp<T>) -> Result<(), ExecutorError> {
        // A panicking operation ends the loop, like an exception escaping it would
        panic::catch_unwind(AssertUnwindSafe(|| {
            for work_item in work_items {
                operation(work_item);
            }
        }))
        .map_err(|_| ExecutorError::Panicked {
            strategy: Strategy::Sequential,
            count: 1,
        })?;

        debug!("sequential execution done");
        Ok(())
    }
}

/// One OS thread per item, all started, then all joined
pub struct ThreadedExecutor;

impl ThreadedExecutor {
    pub fn execute<T>(work_items: &[T], operation: &SyncOp<T>) -> Result<(), ExecutorError>
    where
        T: Display + Sync,
    {
        let (spawn_error, panicked) = thread::scope(|s| {
            let mut handles = Vec::with_capacity(work_items.len());
            let mut spawn_error = None;

            for (index, work_item) in work_items.iter().enumerate() {
                let operation = Arc::clone(operation);
                let spawned = s
                    .builder()
                    .name(format!("worker-{index}"))
                    .spawn(move |_| operation(work_item));

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        spawn_error = Some(ExecutorError::Spawn {
                            strategy: Strategy::Threaded,
                            item: work_item.to_string(),
                            source,
                        });
                        break;
                    }
                }
            }

            // Workers that did start are always joined, even after a spawn failure
            let panicked = handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count();

            (spawn_error, panicked)
        })
        // Every handle was joined above, so only a panic in the scope body lands here
        .map_err(|_| ExecutorError::Panicked {
            strategy: Strategy::Threaded,
            count: 1,
        })?;

        if let Some(err) = spawn_error {
            return Err(err);
        }
        if panicked > 0 {
            return Err(ExecutorError::Panicked {
                strategy: Strategy::Threaded,
                count: panicked,
            });
        }

        debug!("threaded execution done");
        Ok(())
    }
}

/// One OS process per item, all spawned, then all waited for
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn execute<T: Display>(
        work_items: &[T],
        worker: &WorkerCommand,
    ) -> Result<(), ExecutorError> {
        let mut children = Vec::with_capacity(work_items.len());
        let mut failure = None;

        for work_item in work_items {
            let item = work_item.to_string();
            match worker.command_for(&item).spawn() {
                Ok(child) => children.push((item, child)),
                Err(source) => {
                    failure = Some(ExecutorError::Spawn {
                        strategy: Strategy::Multiprocess,
                        item,
                        source,
                    });
                    break;
                }
            }
        }

        for (item, mut child) in children {
            match child.wait() {
                Ok(status) if !status.success() => {
                    debug!(item = %item, %status, "worker process exited unsuccessfully");
                }
                Ok(_) => {}
                Err(source) => {
                    failure.get_or_insert(ExecutorError::Wait { item, source });
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => {
                debug!("multiprocess execution done");
                Ok(())
            }
        }
    }
}

/// One task per item on a fresh single-threaded runtime, joined as a barrier
pub struct CooperativeExecutor;

impl CooperativeExecutor {
    pub fn execute<T>(work_items: &[T], operation: &AsyncOp<T>) -> Result<(), ExecutorError>
    where
        T: Clone + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ExecutorError::Runtime)?;

        let panicked = runtime.block_on(async {
            let mut tasks = JoinSet::new();
            for work_item in work_items {
                tasks.spawn(operation(work_item.clone()));
            }

            let mut panicked = 0;
            while let Some(joined) = tasks.join_next().await {
                if let Err(err) = joined {
                    warn!(error = %err, "cooperative task failed");
                    panicked += 1;
                }
            }
            panicked
        });
        drop(runtime);

        if panicked > 0 {
            return Err(ExecutorError::Panicked {
                strategy: Strategy::CooperativeAsync,
                count: panicked,
            });
        }

        debug!("cooperative execution done");
        Ok(())
    }
}

/// The four execution models being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Sequential,
    Threaded,
    Multiprocess,
    CooperativeAsync,
}

impl Strategy {
    /// Concurrent strategies in report row order
    pub const CONCURRENT: [Strategy; 3] = [
        Strategy::CooperativeAsync,
        Strategy::Threaded,
        Strategy::Multiprocess,
    ];

    /// Apply the matching operation to every item and wait for all of them
    pub fn execute<T>(&self, work_items: &[T], operations: &Operations<T>) -> Result<(), ExecutorError>
    where
        T: Clone + Display + Send + Sync + 'static,
    {
        match self {
            Strategy::Sequential => SequentialExecutor::execute(work_items, &operations.sync_op),
            Strategy::Threaded => ThreadedExecutor::execute(work_items, &operations.sync_op),
            Strategy::Multiprocess => ProcessExecutor::execute(work_items, &operations.worker),
            Strategy::CooperativeAsync => {
                CooperativeExecutor::execute(work_items, &operations.async_op)
            }
        }
    }

    /// Three-letter label used as the report row header
    pub fn row_label(&self) -> &'static str {
        match self {
            Strategy::Sequential => "seq",
            Strategy::Threaded => "thr",
            Strategy::Multiprocess => "mul",
            Strategy::CooperativeAsync => "asy",
        }
    }

    /// Single-letter code used in trial group labels
    pub fn code(&self) -> char {
        match self {
            Strategy::Sequential => 's',
            Strategy::Threaded => 't',
            Strategy::Multiprocess => 'm',
            Strategy::CooperativeAsync => 'a',
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Sequential => "sequential",
            Strategy::Threaded => "threading",
            Strategy::Multiprocess => "multiprocessing",
            Strategy::CooperativeAsync => "async",
        };
        f.write_str(name)
    }
}
