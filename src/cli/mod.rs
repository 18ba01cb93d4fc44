//! Command-line interface for concur-bench
//!
//! This module provides the main CLI structure and command dispatch.
//! It uses clap for argument parsing; logging is set up before any command runs.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

mod commands;
mod output;

pub use commands::check::CheckArgs;
pub use commands::run::RunArgs;
pub use output::Output;

use crate::config::BenchConfig;
use crate::logging::setup_logging;

/// concur-bench - compare execution strategies for I/O-bound host checks
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Enable verbose output (per-host results, executor details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the trial plan without running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Report format written to stdout after a run
    #[arg(long, value_enum, default_value_t = ReportFormat::Text, global = true)]
    pub format: ReportFormat,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full strategy comparison
    Run(RunArgs),
    /// Check a single host (also used by process-per-item workers)
    Check(CheckArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate the configuration
    Validate,
}

/// How the result table is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Table in the log only
    Text,
    Json,
    Yaml,
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: Option<String>,
    pub verbose: bool,
    pub quiet: bool,
    pub dry_run: bool,
    pub format: ReportFormat,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose, self.quiet);
        let global = GlobalArgs {
            config: self.config,
            verbose: self.verbose,
            quiet: self.quiet,
            dry_run: self.dry_run,
            format: self.format,
        };

        let Some(command) = self.command else {
            // Show help when no command is provided
            let mut cmd = Cli::command();
            cmd.print_help()?;
            return Ok(());
        };

        let load = || BenchConfig::load_with_custom_config(global.config.as_deref());

        match command {
            Commands::Run(args) => commands::run::execute(args, &global, &load()?, &output),
            Commands::Check(args) => commands::check::execute(args, &load()?),
            Commands::Config(cmd) => {
                commands::config::execute(cmd, &load()?, global.format, &output)
            }
            Commands::Version => commands::version::execute(&output),
        }
    }
}
