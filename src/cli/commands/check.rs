use anyhow::Result;
use clap::Args;

use crate::checks::{self, CheckKind};
use crate::config::BenchConfig;

#[derive(Args)]
pub struct CheckArgs {
    /// Check to run (defaults to bench.kind from the configuration)
    #[arg(short, long, value_enum)]
    pub kind: Option<CheckKind>,

    /// Host to check
    pub host: String,
}

/// Run one check. Check failures are logged, never turned into a failing exit status.
pub fn execute(args: CheckArgs, config: &BenchConfig) -> Result<()> {
    let settings = config.extract()?;
    settings.validate_checks()?;
    let kind = args.kind.unwrap_or(settings.bench.kind);
    checks::run_once(kind, &settings, &args.host)
}
