//! Scalar settings and timestamps

use super::SiteStore;
use crate::error::Result;
use rusqlite::{params, OptionalExtension};

pub const ACTIVATION_TIME: &str = "block_usage_activation_time";
pub const DEACTIVATION_TIME: &str = "block_usage_deactivation_time";
pub const LAST_SCAN: &str = "block_usage_last_scan";
pub const CONTENT_UPDATED: &str = "block_usage_content_updated";
pub const KEEP_DATA: &str = "usage_monitor_keep_data";
pub const NONCE_SECRET: &str = "block_usage_nonce_secret";

/// Every option this tool owns, removed together on uninstall
pub const ALL_OPTIONS: [&str; 6] = [
    ACTIVATION_TIME,
    DEACTIVATION_TIME,
    LAST_SCAN,
    CONTENT_UPDATED,
    KEEP_DATA,
    NONCE_SECRET,
];

/// Process-wide key/value settings
pub trait OptionsStore {
    fn get_option(&self, name: &str) -> Result<Option<String>>;
    fn update_option(&self, name: &str, value: &str) -> Result<()>;
    fn delete_option(&self, name: &str) -> Result<()>;

    /// Integer option; missing or unparsable values read as 0
    fn get_timestamp(&self, name: &str) -> Result<i64> {
        Ok(self
            .get_option(name)?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0))
    }

    fn set_timestamp(&self, name: &str, value: i64) -> Result<()> {
        self.update_option(name, &value.to_string())
    }
}

impl OptionsStore for SiteStore {
    fn get_option(&self, name: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                &format!(
                    "SELECT option_value FROM {} WHERE option_name = ?1",
                    self.table("options")
                ),
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn update_option(&self, name: &str, value: &str) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO {} (option_name, option_value) VALUES (?1, ?2)
                 ON CONFLICT(option_name) DO UPDATE SET option_value = excluded.option_value",
                self.table("options")
            ),
            params![name, value],
        )?;
        Ok(())
    }

    fn delete_option(&self, name: &str) -> Result<()> {
        self.conn().execute(
            &format!(
                "DELETE FROM {} WHERE option_name = ?1",
                self.table("options")
            ),
            [name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_option() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        assert_eq!(store.get_option(KEEP_DATA).unwrap(), None);
        assert_eq!(store.get_timestamp(LAST_SCAN).unwrap(), 0);
    }

    #[test]
    fn test_update_overwrites() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store.update_option(KEEP_DATA, "yes").unwrap();
        store.update_option(KEEP_DATA, "no").unwrap();
        assert_eq!(store.get_option(KEEP_DATA).unwrap().as_deref(), Some("no"));
    }

    #[test]
    fn test_timestamp_roundtrip_and_garbage() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store.set_timestamp(LAST_SCAN, 1_700_000_000).unwrap();
        assert_eq!(store.get_timestamp(LAST_SCAN).unwrap(), 1_700_000_000);

        store.update_option(CONTENT_UPDATED, "not a number").unwrap();
        assert_eq!(store.get_timestamp(CONTENT_UPDATED).unwrap(), 0);
    }

    #[test]
    fn test_delete_option() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store.set_timestamp(ACTIVATION_TIME, 5).unwrap();
        store.delete_option(ACTIVATION_TIME).unwrap();
        assert_eq!(store.get_option(ACTIVATION_TIME).unwrap(), None);
    }
}
