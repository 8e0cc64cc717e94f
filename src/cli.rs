//! CLI argument parsing using clap

use crate::config::{Config, OutputFormat, UsageFilter};
use crate::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Block usage detection for WordPress content
#[derive(Parser, Debug)]
#[command(name = "block-usage")]
#[command(version)]
#[command(about = "Find where registered blocks are used in site content", long_about = None)]
pub struct Cli {
    /// SQLite database holding posts, options and usage records
    #[arg(long = "db", value_name = "PATH", default_value = "block-usage.db", global = true)]
    pub db: PathBuf,

    /// Block registry JSON file
    #[arg(short = 'r', long = "registry", value_name = "FILE", global = true)]
    pub registry: Option<PathBuf>,

    /// Table prefix
    #[arg(long = "prefix", value_name = "PREFIX", default_value = "wp_", global = true)]
    pub prefix: String,

    /// Output in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Admin base URL for edit links
    #[arg(long = "admin-url", value_name = "URL", default_value = "/wp-admin/", global = true)]
    pub admin_url: String,

    /// Active theme, used for template links
    #[arg(long = "theme", value_name = "SLUG", default_value = "twentytwentyfour", global = true)]
    pub theme: String,

    /// Secret for security tokens (a random per-site secret is stored when unset)
    #[arg(
        long = "secret",
        env = "BLOCK_USAGE_SECRET",
        hide_env_values = true,
        global = true
    )]
    pub secret: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered blocks with cached usage
    Blocks,

    /// Check every registered block and cache the results
    Scan {
        /// Blocks per batch
        #[arg(long = "batch-size", value_name = "N", default_value = "5")]
        batch_size: usize,

        /// Pause between batches in milliseconds
        #[arg(long = "delay-ms", value_name = "MS", default_value = "500")]
        delay_ms: u64,

        /// Which blocks to list afterwards
        #[arg(long = "filter", value_enum, default_value = "all")]
        filter: FilterArg,
    },

    /// Count usage of one block and cache it
    Check {
        /// Block name, e.g. core/paragraph
        #[arg(value_name = "BLOCK")]
        block: String,

        /// Search token (derived from the block name by default)
        #[arg(short = 'p', long = "pattern", value_name = "TOKEN")]
        pattern: Option<String>,
    },

    /// List published content using one block
    Find {
        /// Block name, e.g. core/paragraph
        #[arg(value_name = "BLOCK")]
        block: String,

        /// Search token (derived from the block name by default)
        #[arg(short = 'p', long = "pattern", value_name = "TOKEN")]
        pattern: Option<String>,

        /// Maximum number of results
        #[arg(short = 'n', long = "limit", value_name = "N", default_value = "50")]
        limit: usize,
    },

    /// Run an AJAX-style action and print its response envelope
    Ajax {
        /// Action name, e.g. block_usage_check_usage
        #[arg(value_name = "ACTION")]
        action: String,

        /// Request parameter as key=value (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Print a currently valid security token
    Nonce,

    /// Store the data retention setting
    Settings {
        /// Keep usage data when uninstalling
        #[arg(long = "keep-data", value_enum)]
        keep_data: KeepDataArg,
    },

    /// Show scan timestamps and whether cached data is stale
    Status,

    /// Record activation
    Activate,

    /// Record deactivation
    Deactivate,

    /// Remove usage data and settings unless configured to keep them
    Uninstall,

    /// Import posts from a JSON array, marking content as changed
    Import {
        /// JSON file with post objects
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Used,
    Unused,
}

impl From<FilterArg> for UsageFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => UsageFilter::All,
            FilterArg::Used => UsageFilter::Used,
            FilterArg::Unused => UsageFilter::Unused,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeepDataArg {
    Yes,
    No,
}

impl Cli {
    /// Build the configuration shared by all commands
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config {
            db_path: self.db.clone(),
            registry_path: self.registry.clone(),
            table_prefix: self.prefix.clone(),
            output_format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Console
            },
            admin_url: self.admin_url.clone(),
            theme: self.theme.clone(),
            secret: self.secret.clone(),
            ..Config::default()
        };

        match &self.command {
            Command::Scan {
                batch_size,
                delay_ms,
                ..
            } => {
                config.batch_size = *batch_size;
                config.batch_delay_ms = *delay_ms;
            }
            Command::Find { limit, .. } => config.find_limit = *limit,
            _ => {}
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UsageError;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["block-usage", "blocks"]);
        let config = cli.to_config().unwrap();

        assert_eq!(config.db_path, PathBuf::from("block-usage.db"));
        assert_eq!(config.table_prefix, "wp_");
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.find_limit, 50);
        assert_eq!(config.output_format, OutputFormat::Console);
    }

    #[test]
    fn test_cli_json_after_subcommand() {
        let cli = Cli::parse_from(["block-usage", "status", "--json"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_scan_options() {
        let cli = Cli::parse_from([
            "block-usage",
            "scan",
            "--batch-size",
            "10",
            "--delay-ms",
            "0",
            "--filter",
            "unused",
        ]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.batch_delay_ms, 0);
        match cli.command {
            Command::Scan { filter, .. } => assert_eq!(filter, FilterArg::Unused),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_zero_batch_size_rejected() {
        let cli = Cli::parse_from(["block-usage", "scan", "--batch-size", "0"]);
        assert!(matches!(
            cli.to_config(),
            Err(UsageError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_cli_ajax_params() {
        let cli = Cli::parse_from([
            "block-usage",
            "ajax",
            "block_usage_check_usage",
            "--param",
            "block_name=core/list",
            "--param",
            "nonce=abc",
        ]);
        match cli.command {
            Command::Ajax { action, params } => {
                assert_eq!(action, "block_usage_check_usage");
                assert_eq!(params.len(), 2);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["block-usage"]).is_err());
    }
}
