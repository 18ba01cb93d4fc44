use anyhow::Result;
use clap::Parser;

use concur_bench::cli::Cli;

fn main() -> Result<()> {
    // No runtime here: each cooperative trial owns one
    let cli = Cli::parse();
    cli.run()
}
