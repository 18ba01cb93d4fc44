//! Comparison harness
//!
//! Runs one batch of work items under every execution strategy, following the
//! fixed [`RunPlan`], and reports the elapsed seconds of each trial as a table.
//!
//! ```text
//! seq ─▶ [group 1: a t m] ─▶ [group 2: a t m] ─▶ ... ─▶ [group 7: m t a] ─▶ seq
//! ```
//!
//! Trials never overlap: each one finishes, teardown included, before the next
//! starts. A failing trial is logged and its elapsed time still recorded.

mod plan;
mod report;

pub use plan::{RunPlan, ScheduledTrial, TrialGroup};
pub use report::{COLUMN_WIDTH, ResultTable, StrategyRow, TrialRecord};

use std::fmt::Display;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::HarnessError;
use crate::parallel::{AsyncOp, Operations, Strategy, SyncOp, WorkerCommand, async_op, sync_op};

pub struct Harness<T> {
    items: Vec<T>,
    operations: Operations<T>,
    plan: RunPlan,
}

impl<T> Harness<T>
where
    T: Clone + Display + Send + Sync + 'static,
{
    pub fn builder(items: impl IntoIterator<Item = T>) -> HarnessBuilder<T> {
        HarnessBuilder {
            items: items.into_iter().collect(),
            sync_op: None,
            async_op: None,
            worker: None,
        }
    }

    /// Build a harness from a complete operation set
    pub fn new(items: Vec<T>, operations: Operations<T>) -> Result<Self, HarnessError> {
        if items.is_empty() {
            return Err(HarnessError::InvalidConfiguration(
                "work item list is empty".to_string(),
            ));
        }

        Ok(Self {
            items,
            operations,
            plan: RunPlan::standard(),
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    /// Run the full plan and log the result table
    pub fn compare(&self) -> ResultTable {
        info!("--- Main Start ---");
        debug!(
            items = self.items.len(),
            trials = self.plan.trial_count(),
            cpus = num_cpus::get(),
            worker = %self.operations.worker(),
            "starting comparison"
        );

        let mut table = ResultTable::new();

        let first = self.measure(Strategy::Sequential, None, &mut table);
        info!("first synchronous for execution time :{first:.2}");

        for group in self.plan.groups() {
            info!("test {} - order : {}", group.number, group.describe());
            table.begin_group(group.label());
            for strategy in group.order {
                self.measure(strategy, Some(group.number), &mut table);
            }
        }

        let last = self.measure(Strategy::Sequential, None, &mut table);
        info!("last synchronous for execution time :{last:.2}");

        for line in table.render() {
            info!("{line}");
        }

        info!("--- Main End ---");
        table
    }

    /// Time one strategy over every item and record it
    fn measure(&self, strategy: Strategy, group: Option<usize>, table: &mut ResultTable) -> f64 {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            strategy.execute(&self.items, &self.operations)
        }));
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!("{strategy} trial failed: {:#}", anyhow::Error::from(err));
            }
            Err(_) => error!("{strategy} trial panicked"),
        }

        let seconds = table.record(group, strategy, elapsed);
        debug!(%strategy, ?group, seconds, "trial finished");
        seconds
    }
}

/// Collects the operation pair and worker command for a [`Harness`]
pub struct HarnessBuilder<T> {
    items: Vec<T>,
    sync_op: Option<SyncOp<T>>,
    async_op: Option<AsyncOp<T>>,
    worker: Option<WorkerCommand>,
}

impl<T> HarnessBuilder<T>
where
    T: Clone + Display + Send + Sync + 'static,
{
    pub fn sync_op<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.sync_op = Some(sync_op(f));
        self
    }

    pub fn async_op<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.async_op = Some(async_op(f));
        self
    }

    /// Use already boxed operations
    pub fn operations(mut self, sync: SyncOp<T>, asynchronous: AsyncOp<T>) -> Self {
        self.sync_op = Some(sync);
        self.async_op = Some(asynchronous);
        self
    }

    pub fn worker(mut self, worker: WorkerCommand) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn build(self) -> Result<Harness<T>, HarnessError> {
        let missing = |what: &str| HarnessError::InvalidConfiguration(format!("{what} is required"));

        let sync_op = self.sync_op.ok_or_else(|| missing("synchronous operation"))?;
        let async_op = self.async_op.ok_or_else(|| missing("asynchronous operation"))?;
        let worker = self.worker.ok_or_else(|| missing("worker command"))?;

        Harness::new(self.items, Operations::new(sync_op, async_op, worker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<String> {
        vec!["github.com".to_string(), "velog.io".to_string()]
    }

    #[test]
    fn test_builder_requires_sync_operation() {
        let result = Harness::builder(items())
            .async_op(|_: String| async {})
            .worker(WorkerCommand::new("true"))
            .build();
        assert!(matches!(result, Err(HarnessError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_builder_requires_async_operation() {
        let result = Harness::builder(items())
            .sync_op(|_: &String| {})
            .worker(WorkerCommand::new("true"))
            .build();
        assert!(matches!(result, Err(HarnessError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_builder_requires_worker() {
        let result = Harness::builder(items())
            .sync_op(|_: &String| {})
            .async_op(|_: String| async {})
            .build();
        match result {
            Err(HarnessError::InvalidConfiguration(msg)) => assert!(msg.contains("worker")),
            Ok(_) => panic!("expected invalid configuration"),
        }
    }

    #[test]
    fn test_empty_items_rejected() {
        let result = Harness::builder(Vec::<String>::new())
            .sync_op(|_: &String| {})
            .async_op(|_: String| async {})
            .worker(WorkerCommand::new("true"))
            .build();
        match result {
            Err(HarnessError::InvalidConfiguration(msg)) => assert!(msg.contains("empty")),
            Ok(_) => panic!("expected invalid configuration"),
        }
    }

    #[test]
    fn test_builder_keeps_item_order() {
        let harness = Harness::builder(items())
            .sync_op(|_: &String| {})
            .async_op(|_: String| async {})
            .worker(WorkerCommand::new("true"))
            .build()
            .unwrap();
        assert_eq!(harness.items(), items().as_slice());
        assert_eq!(harness.plan().trial_count(), 23);
    }
}
