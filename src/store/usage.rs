//! Per-block usage cache
//!
//! Counts are written whole after each scan of a block; nothing here is
//! maintained incrementally, so a record is only as fresh as its
//! `last_updated` stamp.

use super::SiteStore;
use crate::error::Result;
use rusqlite::params;
use serde::Serialize;
use std::collections::BTreeMap;

/// Cached usage count for one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub block_name: String,
    pub usage_count: u64,
    pub last_updated: String,
}

/// Storage for usage records keyed by block name
pub trait UsageCache {
    /// Insert or replace the record for `block_name`
    fn replace_usage(&self, block_name: &str, usage_count: u64, last_updated: &str) -> Result<()>;

    /// All cached records keyed by block name
    fn usage_stats(&self) -> Result<BTreeMap<String, UsageRecord>>;

    /// Remove the cache entirely
    fn drop_usage(&self) -> Result<()>;
}

impl UsageCache for SiteStore {
    fn replace_usage(&self, block_name: &str, usage_count: u64, last_updated: &str) -> Result<()> {
        self.ensure_usage_table()?;
        let count = i64::try_from(usage_count).unwrap_or(i64::MAX);
        self.conn().execute(
            &format!(
                "REPLACE INTO {} (block_name, usage_count, last_updated) VALUES (?1, ?2, ?3)",
                self.table("block_usage_stats")
            ),
            params![block_name, count, last_updated],
        )?;
        Ok(())
    }

    fn usage_stats(&self) -> Result<BTreeMap<String, UsageRecord>> {
        self.ensure_usage_table()?;
        let mut stmt = self.conn().prepare(&format!(
            "SELECT block_name, usage_count, last_updated FROM {}",
            self.table("block_usage_stats")
        ))?;

        let rows = stmt.query_map([], |row| {
            let count: i64 = row.get(1)?;
            Ok(UsageRecord {
                block_name: row.get(0)?,
                usage_count: count.max(0) as u64,
                last_updated: row.get(2)?,
            })
        })?;

        let mut stats = BTreeMap::new();
        for record in rows {
            let record = record?;
            stats.insert(record.block_name.clone(), record);
        }
        Ok(stats)
    }

    fn drop_usage(&self) -> Result<()> {
        self.conn().execute(
            &format!("DROP TABLE IF EXISTS {}", self.table("block_usage_stats")),
            [],
        )?;
        Ok(())
    }
}
