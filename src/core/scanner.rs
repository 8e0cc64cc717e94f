//! Block usage scanner
//!
//! Counts published posts whose content contains a block's serialized
//! comment, breaks the count down by post type and caches the total.
//! Query failures never propagate: a block whose count cannot be read is
//! reported (and cached) as unused.

use crate::core::block::{block_marker, search_token, BlockDescriptor};
use crate::core::post_type::PostTypeLabels;
use crate::store::{like_pattern, ContentSource, TypeCount, UsageCache};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Format of `last_updated` in the usage table
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Usage of one block within one post type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub count: u64,
    pub label: String,
}

/// Result of checking a single block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    pub is_used: bool,
    pub usage_count: u64,
    pub block_name: String,
    pub breakdown: BTreeMap<String, BreakdownEntry>,
}

/// Anything able to report a block's usage, one block at a time
pub trait UsageProbe {
    fn probe(&self, block: &BlockDescriptor) -> UsageReport;
}

/// Scanner over a content source that caches its results
pub struct UsageScanner<'a, S> {
    store: &'a S,
    labels: &'a PostTypeLabels,
}

impl<'a, S> UsageScanner<'a, S>
where
    S: ContentSource + UsageCache,
{
    pub fn new(store: &'a S, labels: &'a PostTypeLabels) -> Self {
        Self { store, labels }
    }

    /// Count usage of `block_name`, searching for `token` (derived from the
    /// name when empty) and replace its cached record
    pub fn check(&self, block_name: &str, token: &str) -> UsageReport {
        let token = if token.is_empty() {
            search_token(block_name)
        } else {
            token
        };
        let like = like_pattern(&block_marker(token));

        let usage_count = match self.store.count_matching(&like) {
            Ok(count) => count,
            Err(e) => {
                warn!(block = block_name, error = %e, "usage count failed, treating as unused");
                0
            }
        };

        let mut breakdown = BTreeMap::new();
        if usage_count > 0 {
            match self.store.count_matching_by_type(&like) {
                Ok(rows) => {
                    for TypeCount { post_type, count } in rows {
                        let label = self.labels.breakdown(&post_type);
                        breakdown.insert(post_type, BreakdownEntry { count, label });
                    }
                }
                Err(e) => warn!(block = block_name, error = %e, "usage breakdown failed"),
            }
        }

        let now = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        if let Err(e) = self.store.replace_usage(block_name, usage_count, &now) {
            warn!(block = block_name, error = %e, "failed to cache usage count");
        }

        debug!(block = block_name, token, usage_count, "checked block usage");

        UsageReport {
            is_used: usage_count > 0,
            usage_count,
            block_name: block_name.to_string(),
            breakdown,
        }
    }
}

impl<S> UsageProbe for UsageScanner<'_, S>
where
    S: ContentSource + UsageCache,
{
    fn probe(&self, block: &BlockDescriptor) -> UsageReport {
        self.check(&block.name, block.search_token())
    }
}
