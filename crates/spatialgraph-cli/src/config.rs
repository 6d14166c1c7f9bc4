//! CLI configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use spatialgraph_core::CostAggregate;

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SPATIALGRAPH_CONFIG";

/// Path of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spatialgraph")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format when `--format` is not given
    pub format: OutputFormat,
    /// Aggregate used by `aggregate` when `--kind` is not given
    pub aggregate: CostAggregate,
    /// Whether aggregation only follows outgoing edges
    pub directed: bool,
    /// Cost type queried when `--cost-type` is not given
    pub cost_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            aggregate: CostAggregate::Sum,
            directed: true,
            cost_type: String::new(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults if it is missing or invalid
    pub fn load() -> Self {
        let path = config_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => {
                tracing::debug!("No config at {:?}, using defaults", path);
                return Self::default();
            }
        };

        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid config at {:?}: {}", path, e);
            Self::default()
        })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["format", "aggregate", "directed", "cost_type"]
    }

    /// Value of `key` as it is written in the config file
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "format" => Some(self.format.to_string()),
            "aggregate" => Some(self.aggregate.to_string()),
            "directed" => Some(self.directed.to_string()),
            "cost_type" => Some(self.cost_type.clone()),
            _ => None,
        }
    }
}
