//! Configuration command implementations

use anyhow::Result;

use crate::cli::{ConfigCommands, Output, ReportFormat};
use crate::config::BenchConfig;

/// Execute config commands
pub fn execute(
    cmd: ConfigCommands,
    config: &BenchConfig,
    format: ReportFormat,
    output: &Output,
) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config, format, output),
        ConfigCommands::Validate => validate(config, output),
    }
}

fn show(config: &BenchConfig, format: ReportFormat, output: &Output) -> Result<()> {
    let settings = config.settings()?;
    match format {
        ReportFormat::Text => {
            output.header("Effective configuration");
            print!("{}", toml::to_string_pretty(&settings)?);
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
        ReportFormat::Yaml => print!("{}", serde_yml::to_string(&settings)?),
    }
    Ok(())
}

fn validate(config: &BenchConfig, output: &Output) -> Result<()> {
    output.header("Validating configuration");

    match config.settings() {
        Ok(settings) => {
            output.success("Configuration is valid");
            output.key_value("Check:", &settings.bench.kind.to_string(), false);
            output.key_value("Hosts:", &settings.bench.hosts.len().to_string(), false);
            output.key_value("Certificate port:", &settings.cert.port.to_string(), false);
            Ok(())
        }
        Err(err) => {
            output.error(&format!("{err:#}"));
            Err(err)
        }
    }
}
