//! Configuration management for concur-bench
//!
//! Settings are layered with figment: embedded defaults, then user and
//! repository config files (TOML, JSON or YAML), then `CONCUR_BENCH_`
//! environment variables. Command-line flags are applied on top by the CLI.

mod core;

pub use self::core::{BenchConfig, DEFAULT_CONFIG};

use anyhow::{Result, bail};
use figment::Figment;
use figment::providers::{Format, Toml};
use serde::{Deserialize, Serialize};

use crate::checks::CheckKind;

/// Typed view of the merged configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub bench: BenchSettings,
    pub http: HttpSettings,
    pub cert: CertSettings,
}

/// What to benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchSettings {
    /// Check payload run for every host
    pub kind: CheckKind,

    /// Work items, in order; duplicates are checked independently
    pub hosts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertSettings {
    #[serde(default = "default_cert_port")]
    pub port: u16,
}

fn default_expected_status() -> u16 {
    200
}

fn default_cert_port() -> u16 {
    443
}

impl Settings {
    /// Settings from the embedded defaults only
    pub fn defaults() -> Result<Self> {
        Ok(Figment::from(Toml::string(DEFAULT_CONFIG)).extract()?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bench.hosts.is_empty() {
            bail!("bench.hosts must list at least one host");
        }
        if let Some(blank) = self.bench.hosts.iter().position(|h| h.trim().is_empty()) {
            bail!("bench.hosts[{blank}] is blank");
        }
        self.validate_checks()
    }

    /// Validate only what a single check needs; the host list is ignored
    pub fn validate_checks(&self) -> Result<()> {
        if self.cert.port == 0 {
            bail!("cert.port must be non-zero");
        }
        Ok(())
    }
}
