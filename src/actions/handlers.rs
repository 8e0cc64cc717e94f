//! The four AJAX-style actions

use super::{ActionContext, ActionHandler, ActionRequest, Envelope};
use crate::core::{PostFinder, UsageScanner};
use crate::lifecycle::{KeepData, LifecycleHooks};
use serde::Serialize;
use tracing::warn;

pub const FIND_POSTS: &str = "block_usage_find_posts";
pub const CHECK_USAGE: &str = "block_usage_check_usage";
pub const RECORD_SCAN: &str = "block_usage_record_scan";
pub const SAVE_SETTINGS: &str = "block_usage_save_settings";

const MISSING_PARAMETERS: &str = "Missing required parameters.";

/// Lists published posts containing a block
pub struct FindPostsHandler;

#[derive(Serialize)]
struct FindPostsData<'a> {
    posts: &'a [crate::core::FoundPost],
    count: usize,
    search_pattern: &'a str,
}

impl ActionHandler for FindPostsHandler {
    fn handle(&self, ctx: &ActionContext<'_>, request: &ActionRequest) -> Envelope {
        let (Some(_block_name), Some(token)) = (
            request.param("block_name"),
            request.param("search_pattern"),
        ) else {
            return Envelope::error(MISSING_PARAMETERS);
        };

        let posts = PostFinder::new(ctx.store, ctx.labels, &ctx.links, ctx.find_limit).find(&token);
        Envelope::success(&FindPostsData {
            posts: &posts,
            count: posts.len(),
            search_pattern: &token,
        })
    }
}

/// Counts a block's usage and refreshes its cached record
pub struct CheckUsageHandler;

impl ActionHandler for CheckUsageHandler {
    fn handle(&self, ctx: &ActionContext<'_>, request: &ActionRequest) -> Envelope {
        let Some(block_name) = request.param("block_name") else {
            return Envelope::error(MISSING_PARAMETERS);
        };
        let token = request.param("search_pattern").unwrap_or_default();

        let report = UsageScanner::new(ctx.store, ctx.labels).check(&block_name, &token);
        Envelope::success(&report)
    }
}

/// Stamps the end of a client-driven scan
pub struct RecordScanHandler;

impl ActionHandler for RecordScanHandler {
    fn handle(&self, ctx: &ActionContext<'_>, _request: &ActionRequest) -> Envelope {
        match LifecycleHooks::new(ctx.store).scan_recorded(ctx.now) {
            Ok(()) => Envelope::message("Scan timestamp recorded."),
            Err(e) => {
                warn!(error = %e, "failed to record scan timestamp");
                Envelope::error("Could not record scan timestamp.")
            }
        }
    }
}

/// Stores the data retention choice
pub struct SaveSettingsHandler;

impl ActionHandler for SaveSettingsHandler {
    fn handle(&self, ctx: &ActionContext<'_>, request: &ActionRequest) -> Envelope {
        let keep_data = request
            .param("keep_data")
            .unwrap_or_else(|| KeepData::Yes.as_str().to_string());

        match LifecycleHooks::new(ctx.store).save_settings(&keep_data) {
            Ok(()) => Envelope::message("Settings saved."),
            Err(e) => {
                warn!(error = %e, "failed to save settings");
                Envelope::error("Could not save settings.")
            }
        }
    }
}
