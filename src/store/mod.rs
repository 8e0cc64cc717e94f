//! SQLite-backed site storage
//!
//! One database stands in for the host site: the posts table that content
//! is scanned from, the options table holding scalar settings and scan
//! timestamps, and the usage table caching per-block counts. Each concern
//! is exposed through its own trait so the scanner and hooks can be driven
//! by other backends in tests.

mod content;
mod options;
mod usage;

pub use content::{like_pattern, ContentSource, Post, PostMatch, TypeCount};
pub use options::{
    OptionsStore, ACTIVATION_TIME, ALL_OPTIONS, CONTENT_UPDATED, DEACTIVATION_TIME, KEEP_DATA,
    LAST_SCAN, NONCE_SECRET,
};
pub use usage::{UsageCache, UsageRecord};

use crate::config::Config;
use crate::error::{Result, UsageError};
use rusqlite::Connection;
use std::fs;
use std::time::Duration;
use tracing::debug;

/// Handle to the site database
pub struct SiteStore {
    conn: Connection,
    prefix: String,
}

impl SiteStore {
    /// Open (creating if needed) the database named in the configuration
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    UsageError::InvalidConfig(format!(
                        "Failed to create database directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(&config.db_path)?;
        conn.busy_timeout(Duration::from_millis(5_000))?;
        debug!(path = %config.db_path.display(), "opened site database");

        Self::with_connection(conn, &config.table_prefix)
    }

    /// Open a private in-memory database
    #[cfg(test)]
    pub fn open_in_memory(prefix: &str) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, prefix)
    }

    fn with_connection(conn: Connection, prefix: &str) -> Result<Self> {
        let store = Self {
            conn,
            prefix: prefix.to_string(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Fully qualified table name
    pub(crate) fn table(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    ID INTEGER PRIMARY KEY,
                    post_title TEXT NOT NULL DEFAULT '',
                    post_name TEXT NOT NULL DEFAULT '',
                    post_type TEXT NOT NULL DEFAULT 'post',
                    post_status TEXT NOT NULL DEFAULT 'publish',
                    post_content TEXT NOT NULL DEFAULT ''
                )",
                self.table("posts")
            ),
            [],
        )?;

        self.conn.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS {0}idx_status_type ON {1}(post_status, post_type)",
                self.prefix,
                self.table("posts")
            ),
            [],
        )?;

        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    option_name TEXT PRIMARY KEY,
                    option_value TEXT NOT NULL
                )",
                self.table("options")
            ),
            [],
        )?;

        self.ensure_usage_table()
    }

    /// Create the usage table if an uninstall dropped it
    pub fn ensure_usage_table(&self) -> Result<()> {
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    block_name TEXT NOT NULL UNIQUE,
                    usage_count INTEGER NOT NULL DEFAULT 0,
                    last_updated TEXT NOT NULL
                )",
                self.table("block_usage_stats")
            ),
            [],
        )?;
        Ok(())
    }

    /// Whether a table exists in the database
    #[cfg(test)]
    pub fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [self.table(name)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
