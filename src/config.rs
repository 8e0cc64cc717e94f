//! Configuration types for block-usage

use crate::error::{Result, UsageError};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Console,
    /// JSON output with structured data
    Json,
}

/// Which blocks a scan summary should list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageFilter {
    #[default]
    All,
    Used,
    Unused,
}

/// Configuration options for block-usage
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database holding posts, options and usage records
    pub db_path: PathBuf,

    /// JSON block registry (None = no blocks registered)
    pub registry_path: Option<PathBuf>,

    /// Table prefix, `wp_` by default
    pub table_prefix: String,

    /// Output format (console or json)
    pub output_format: OutputFormat,

    /// Blocks checked per batch during a full scan (default: 5)
    pub batch_size: usize,

    /// Pause between batches in milliseconds (default: 500)
    pub batch_delay_ms: u64,

    /// Maximum number of posts returned by the post finder (default: 50)
    pub find_limit: usize,

    /// Admin base URL used to build edit links
    pub admin_url: String,

    /// Active theme stylesheet, used for templates whose slug carries no theme
    pub theme: String,

    /// Secret used to derive security tokens; `None` uses the site's stored secret
    pub secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("block-usage.db"),
            registry_path: None,
            table_prefix: String::from("wp_"),
            output_format: OutputFormat::Console,
            batch_size: 5,
            batch_delay_ms: 500,
            find_limit: 50,
            admin_url: String::from("/wp-admin/"),
            theme: String::from("twentytwentyfour"),
            secret: None,
        }
    }
}

impl Config {
    /// Check values that would otherwise surface as confusing SQL or URL errors
    pub fn validate(&self) -> Result<()> {
        if !self
            .table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(UsageError::InvalidConfig(format!(
                "table prefix '{}' may only contain letters, digits and underscores",
                self.table_prefix
            )));
        }
        if self.batch_size == 0 {
            return Err(UsageError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if matches!(&self.secret, Some(secret) if secret.is_empty()) {
            return Err(UsageError::InvalidConfig(
                "secret must not be empty".to_string(),
            ));
        }
        if self.find_limit == 0 {
            return Err(UsageError::InvalidConfig(
                "result limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Admin URL with a guaranteed trailing slash
    pub fn admin_base(&self) -> String {
        if self.admin_url.ends_with('/') {
            self.admin_url.clone()
        } else {
            format!("{}/", self.admin_url)
        }
    }
}
