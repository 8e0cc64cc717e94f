//! Stale usage data detection

use crate::error::Result;
use crate::store::{
    OptionsStore, ACTIVATION_TIME, CONTENT_UPDATED, DEACTIVATION_TIME, LAST_SCAN,
};
use serde::Serialize;

/// Timestamps deciding whether cached usage may be outdated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanMetadata {
    pub last_scan: i64,
    pub content_updated: i64,
    pub activation: i64,
    pub deactivation: i64,
}

impl ScanMetadata {
    pub fn load(options: &impl OptionsStore) -> Result<Self> {
        Ok(Self {
            last_scan: options.get_timestamp(LAST_SCAN)?,
            content_updated: options.get_timestamp(CONTENT_UPDATED)?,
            activation: options.get_timestamp(ACTIVATION_TIME)?,
            deactivation: options.get_timestamp(DEACTIVATION_TIME)?,
        })
    }

    /// Content changed after the last scan, or the tool was reactivated
    /// after a deactivation and has not scanned since
    pub fn is_stale(&self) -> bool {
        let content_changed = self.content_updated > self.last_scan;
        let reactivated = self.activation > self.last_scan && self.deactivation > 0;
        content_changed || reactivated
    }
}
