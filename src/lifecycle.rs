//! Lifecycle hooks
//!
//! Explicit replacements for the host's activation, deactivation, save and
//! uninstall events. Each hook only touches the options store and the usage
//! cache; timestamps are passed in so callers control the clock.

use crate::error::Result;
use crate::store::{
    OptionsStore, Post, UsageCache, ACTIVATION_TIME, ALL_OPTIONS, CONTENT_UPDATED,
    DEACTIVATION_TIME, KEEP_DATA, LAST_SCAN,
};
use tracing::{debug, info};

/// Post types whose changes never affect block usage
const IGNORED_POST_TYPES: [&str; 4] = [
    "attachment",
    "nav_menu_item",
    "custom_css",
    "customize_changeset",
];

const REVISION_TYPE: &str = "revision";

/// Data retention choice applied on uninstall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepData {
    Yes,
    No,
}

impl KeepData {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    /// Stored setting; data is kept only when the option is absent or "yes"
    pub fn load(options: &impl OptionsStore) -> Result<Self> {
        Ok(match options.get_option(KEEP_DATA)?.as_deref() {
            None | Some("yes") => Self::Yes,
            Some(_) => Self::No,
        })
    }
}

/// What an uninstall did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    Kept,
    Removed,
}

/// Hooks bound to one store
pub struct LifecycleHooks<'a, S> {
    store: &'a S,
}

impl<'a, S> LifecycleHooks<'a, S>
where
    S: OptionsStore + UsageCache,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn activated(&self, now: i64) -> Result<()> {
        info!(now, "activated");
        self.store.set_timestamp(ACTIVATION_TIME, now)
    }

    pub fn deactivated(&self, now: i64) -> Result<()> {
        info!(now, "deactivated");
        self.store.set_timestamp(DEACTIVATION_TIME, now)
    }

    /// Mark content as changed unless the save cannot affect usage.
    /// Returns whether the timestamp moved.
    pub fn post_saved(&self, post: &Post, now: i64) -> Result<bool> {
        if post.is_autosave
            || post.post_type == REVISION_TYPE
            || IGNORED_POST_TYPES.contains(&post.post_type.as_str())
        {
            debug!(id = post.id, post_type = %post.post_type, "save ignored");
            return Ok(false);
        }
        self.store.set_timestamp(CONTENT_UPDATED, now)?;
        Ok(true)
    }

    /// A full scan finished: stamp it and clear the activation marker.
    /// The deactivation time is kept for future comparisons.
    pub fn scan_recorded(&self, now: i64) -> Result<()> {
        self.store.set_timestamp(LAST_SCAN, now)?;
        self.store.set_timestamp(ACTIVATION_TIME, 0)
    }

    /// Store the retention setting as given; only "yes" keeps data
    pub fn save_settings(&self, keep_data: &str) -> Result<()> {
        self.store.update_option(KEEP_DATA, keep_data)
    }

    /// Remove usage records and settings unless the user chose to keep them
    pub fn uninstall(&self) -> Result<UninstallOutcome> {
        if KeepData::load(self.store)? == KeepData::Yes {
            info!("uninstall keeping usage data");
            return Ok(UninstallOutcome::Kept);
        }

        self.store.drop_usage()?;
        for option in ALL_OPTIONS {
            self.store.delete_option(option)?;
        }
        info!("uninstall removed usage data and settings");
        Ok(UninstallOutcome::Removed)
    }
}
