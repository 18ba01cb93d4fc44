use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::checks::{self, CheckKind};
use crate::cli::{GlobalArgs, Output, ReportFormat};
use crate::config::BenchConfig;
use crate::harness::{Harness, RunPlan};
use crate::parallel::WorkerCommand;
use crate::parallel::ops::ITEM_PLACEHOLDER;

#[derive(Args)]
pub struct RunArgs {
    /// Check to benchmark (defaults to bench.kind from the configuration)
    #[arg(short, long, value_enum)]
    pub kind: Option<CheckKind>,

    /// Hosts to check, replacing bench.hosts (comma-separated or repeated)
    #[arg(long, value_delimiter = ',')]
    pub hosts: Vec<String>,
}

pub fn execute(
    args: RunArgs,
    global: &GlobalArgs,
    config: &BenchConfig,
    output: &Output,
) -> Result<()> {
    let mut settings = config.extract()?;
    if let Some(kind) = args.kind {
        settings.bench.kind = kind;
    }
    if !args.hosts.is_empty() {
        settings.bench.hosts = args.hosts;
    }
    settings.validate()?;
    let kind = settings.bench.kind;

    if global.dry_run {
        show_plan(kind, &settings.bench.hosts, &RunPlan::standard(), output);
        return Ok(());
    }

    let worker = worker_command(kind, global)?;
    let operations = checks::operations(kind, &settings, worker)?;
    let harness = Harness::new(settings.bench.hosts.clone(), operations)?;

    info!(check = %kind, hosts = harness.items().len(), "running comparison");
    let table = harness.compare();

    match global.format {
        ReportFormat::Text => {}
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        ReportFormat::Yaml => print!("{}", serde_yml::to_string(&table)?),
    }

    Ok(())
}

/// Re-run this binary's `check` command, one process per host
fn worker_command(kind: CheckKind, global: &GlobalArgs) -> Result<WorkerCommand> {
    let mut worker =
        WorkerCommand::current_exe().context("failed to locate the running executable")?;

    if let Some(path) = &global.config {
        worker = worker.args(["--config", path.as_str()]);
    }
    if global.verbose {
        worker = worker.arg("--verbose");
    } else if global.quiet {
        worker = worker.arg("--quiet");
    }

    Ok(worker
        .arg("check")
        .arg("--kind")
        .arg(kind.to_string())
        .arg(ITEM_PLACEHOLDER))
}

fn show_plan(kind: CheckKind, hosts: &[String], plan: &RunPlan, output: &Output) {
    output.header("Run plan");
    output.key_value("Check:", &kind.to_string(), true);
    output.key_value("Hosts:", &hosts.len().to_string(), false);
    output.key_value("Trials:", &plan.trial_count().to_string(), false);

    if output.is_verbose() {
        output.category("Hosts");
        for host in hosts {
            output.list_item(host);
        }
    }

    output.category("Schedule");
    for trial in plan.schedule() {
        let group = trial
            .group
            .and_then(|number| plan.groups().iter().find(|g| g.number == number))
            .map(|g| g.label())
            .unwrap_or_else(|| "baseline".to_string());
        output.list_item(&format!(
            "{:>2}  {:<10}  {}",
            trial.ordinal + 1,
            group,
            trial.strategy
        ));
    }
}
