//! Config command for the CLI defaults

use clap::{ArgAction, Args, Subcommand};
use spatialgraph_core::CostAggregate;

use crate::config::{config_file_path, Config};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one config value
    Get {
        /// One of: format, aggregate, directed, cost_type
        key: String,
    },
    /// Change a config value
    #[command(subcommand)]
    Set(Setting),
    /// List all config values
    List,
    /// Show config file path
    Path,
    /// Write a config file with the defaults
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// A typed config assignment; clap rejects values of the wrong kind
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Setting {
    /// Output format when --format is not given
    Format {
        #[arg(value_enum, ignore_case = true)]
        value: OutputFormat,
    },
    /// Aggregate computed when --kind is not given
    Aggregate {
        #[arg(value_enum, ignore_case = true)]
        value: CostAggregate,
    },
    /// Follow outgoing edges only when aggregating
    Directed {
        #[arg(action = ArgAction::Set)]
        value: bool,
    },
    /// Cost type queried when --cost-type is not given ("" for structural costs)
    #[command(name = "cost_type")]
    CostType {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

impl Setting {
    /// Config key this setting writes
    pub fn key(&self) -> &'static str {
        match self {
            Self::Format { .. } => "format",
            Self::Aggregate { .. } => "aggregate",
            Self::Directed { .. } => "directed",
            Self::CostType { .. } => "cost_type",
        }
    }

    pub fn apply(&self, config: &mut Config) {
        match self {
            Self::Format { value } => config.format = *value,
            Self::Aggregate { value } => config.aggregate = *value,
            Self::Directed { value } => config.directed = *value,
            Self::CostType { value } => config.cost_type = value.clone(),
        }
    }
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => run_get(key),
        ConfigCommands::Set(setting) => run_set(setting),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init { force } => run_init(*force),
    }
}

fn run_get(key: &str) -> anyhow::Result<()> {
    let Some(value) = Config::load().get(key) else {
        anyhow::bail!(
            "Unknown config key: {}. Available keys: {}",
            key,
            Config::keys().join(", ")
        );
    };
    println!("{}", value);
    Ok(())
}

fn run_set(setting: &Setting) -> anyhow::Result<()> {
    let mut config = Config::load();
    setting.apply(&mut config);
    config.save()?;

    let key = setting.key();
    println!("Set {} = {}", key, config.get(key).unwrap_or_default());
    Ok(())
}

fn run_list() -> anyhow::Result<()> {
    let config = Config::load();
    println!("Config file: {}", config_file_path().display());
    println!();
    for key in Config::keys() {
        println!("{} = {}", key, config.get(key).unwrap_or_default());
    }
    Ok(())
}

fn run_path() -> anyhow::Result<()> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_init(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default().save()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::{Cli, Commands};

    fn parse_setting(args: &[&str]) -> Result<Setting, clap::Error> {
        let argv = ["spatialgraph", "config", "set"].iter().chain(args).copied();
        match Cli::try_parse_from(argv)?.command {
            Commands::Config(ConfigArgs {
                command: ConfigCommands::Set(setting),
            }) => Ok(setting),
            _ => panic!("not a config set command"),
        }
    }

    #[test]
    fn test_settings_are_typed() {
        assert_eq!(
            parse_setting(&["aggregate", "avg"]).unwrap(),
            Setting::Aggregate {
                value: CostAggregate::Average
            }
        );
        assert_eq!(
            parse_setting(&["format", "JSON"]).unwrap(),
            Setting::Format {
                value: OutputFormat::Json
            }
        );
        assert_eq!(
            parse_setting(&["directed", "false"]).unwrap(),
            Setting::Directed { value: false }
        );
        assert_eq!(
            parse_setting(&["cost_type", "-energy"]).unwrap().key(),
            "cost_type"
        );

        assert!(parse_setting(&["directed", "maybe"]).is_err());
        assert!(parse_setting(&["format", "xml"]).is_err());
        assert!(parse_setting(&["aggregate", "median"]).is_err());
        assert!(parse_setting(&["colour", "red"]).is_err());
    }

    #[test]
    fn test_apply_updates_one_field() {
        let mut config = Config::default();
        Setting::Directed { value: false }.apply(&mut config);
        Setting::Aggregate {
            value: CostAggregate::Min,
        }
        .apply(&mut config);

        assert!(!config.directed);
        assert_eq!(config.aggregate, CostAggregate::Min);
        assert_eq!(config.format, Config::default().format);
    }
}
