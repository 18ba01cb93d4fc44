use anyhow::{Context, Result, ensure};
use std::path::Path;
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};

use super::Settings;

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct BenchConfig {
    figment: Figment,
}

impl BenchConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            ensure!(
                Path::new(custom_path).is_file(),
                "config file not found: {custom_path}"
            );
            figment = match custom_path.rsplit('.').next() {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            // Standard priority: user config -> repo config
            let user_config = Self::user_config_path();
            figment = figment
                .merge(Toml::file(&user_config))
                .merge(Json::file(user_config.replace(".toml", ".json")))
                .merge(Yaml::file(user_config.replace(".toml", ".yaml")))
                .merge(Toml::file("concur-bench.toml"))
                .merge(Json::file("concur-bench.json"))
                .merge(Yaml::file("concur-bench.yaml"))
                .merge(Yaml::file("concur-bench.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("CONCUR_BENCH_").split("__"));

        Ok(BenchConfig { figment })
    }

    /// Extract and validate the typed settings
    pub fn settings(&self) -> Result<Settings> {
        let settings = self.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Extract the typed settings without validating them, so callers can
    /// apply command-line overrides first
    pub fn extract(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("failed to parse configuration")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/concur-bench/config.toml"),
            Err(_) => "~/.config/concur-bench/config.toml".to_string(),
        }
    }
}
