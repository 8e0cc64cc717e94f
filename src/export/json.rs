//! JSON exporter

use crate::core::{BlockStatus, FoundPost};
use crate::error::Result;
use crate::export::{Exporter, Report};
use serde::Serialize;
use std::io::Write;

/// JSON output exporter
pub struct JsonExporter;

#[derive(Serialize)]
struct JsonScan<'a> {
    blocks: Vec<&'a BlockStatus>,
    summary: JsonScanSummary,
}

#[derive(Serialize)]
struct JsonScanSummary {
    blocks_checked: usize,
    used: usize,
    unused: usize,
    batches: usize,
    scanned_at: i64,
}

#[derive(Serialize)]
struct JsonPosts<'a> {
    block_name: &'a str,
    search_pattern: &'a str,
    count: usize,
    posts: &'a [FoundPost],
}

impl Exporter for JsonExporter {
    fn export(&self, report: &Report<'_>, writer: &mut dyn Write) -> Result<()> {
        let json = match report {
            Report::Blocks(listing) => serde_json::to_string_pretty(listing)?,
            Report::Scan(summary, filter) => serde_json::to_string_pretty(&JsonScan {
                blocks: summary.filtered(*filter),
                summary: JsonScanSummary {
                    blocks_checked: summary.blocks.len(),
                    used: summary.used_count(),
                    unused: summary.unused_count(),
                    batches: summary.batches,
                    scanned_at: summary.scanned_at,
                },
            })?,
            Report::Usage(usage) => serde_json::to_string_pretty(usage)?,
            Report::Posts {
                block_name,
                search_pattern,
                posts,
            } => serde_json::to_string_pretty(&JsonPosts {
                block_name: *block_name,
                search_pattern: *search_pattern,
                count: posts.len(),
                posts: *posts,
            })?,
            Report::Status(status) => serde_json::to_string_pretty(status)?,
        };
        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
