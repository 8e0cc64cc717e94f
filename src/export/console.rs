//! Console (human-readable) exporter

use crate::core::{FoundPost, ScanSummary, UsageReport};
use crate::config::UsageFilter;
use crate::error::Result;
use crate::export::{Exporter, Report};
use crate::report::{BlockListing, StatusReport};
use std::io::Write;

const STALE_WARNING: &str =
    "Warning: content has changed since the last scan. Usage data may be outdated; run `scan` to refresh it.";

/// Human-readable console output exporter
pub struct ConsoleExporter;

impl Exporter for ConsoleExporter {
    fn export(&self, report: &Report<'_>, writer: &mut dyn Write) -> Result<()> {
        match report {
            Report::Blocks(listing) => write_blocks(listing, writer),
            Report::Scan(summary, filter) => write_scan(summary, *filter, writer),
            Report::Usage(usage) => write_usage(usage, writer),
            Report::Posts {
                block_name, posts, ..
            } => write_posts(block_name, posts, writer),
            Report::Status(status) => write_status(status, writer),
        }
    }
}

fn write_blocks(listing: &BlockListing, writer: &mut dyn Write) -> Result<()> {
    if listing.stale {
        writeln!(writer, "{}", STALE_WARNING)?;
        writeln!(writer)?;
    }

    if listing.is_empty() {
        writeln!(writer, "No blocks found.")?;
        return Ok(());
    }

    for group in &listing.groups {
        writeln!(writer, "{}", group.heading)?;
        for block in &group.blocks {
            let usage = match block.usage_count {
                None => "not scanned".to_string(),
                Some(0) => "unused".to_string(),
                Some(n) => used_in(n),
            };
            writeln!(writer, "  {} ({}): {}", block.title, block.name, usage)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn write_scan(summary: &ScanSummary, filter: UsageFilter, writer: &mut dyn Write) -> Result<()> {
    for block in summary.filtered(filter) {
        let status = if block.is_used { "used" } else { "unused" };
        writeln!(
            writer,
            "{:<8} {:>6}  {} ({})",
            status, block.usage_count, block.title, block.block_name
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "Summary:")?;
    writeln!(writer, "  Blocks checked: {}", summary.blocks.len())?;
    writeln!(writer, "  Used: {}", summary.used_count())?;
    writeln!(writer, "  Unused: {}", summary.unused_count())?;
    writeln!(writer, "  Batches: {}", summary.batches)?;

    Ok(())
}

fn write_usage(usage: &UsageReport, writer: &mut dyn Write) -> Result<()> {
    if !usage.is_used {
        writeln!(writer, "{}: unused", usage.block_name)?;
        return Ok(());
    }

    writeln!(writer, "{}: {}", usage.block_name, used_in(usage.usage_count))?;
    for entry in usage.breakdown.values() {
        writeln!(writer, "  {}: {}", entry.label, entry.count)?;
    }

    Ok(())
}

fn used_in(count: u64) -> String {
    if count == 1 {
        "used in 1 item".to_string()
    } else {
        format!("used in {} items", count)
    }
}

fn write_posts(block_name: &str, posts: &[FoundPost], writer: &mut dyn Write) -> Result<()> {
    if posts.is_empty() {
        writeln!(writer, "No published content uses {}.", block_name)?;
        return Ok(());
    }

    writeln!(writer, "Content using {}:", block_name)?;
    for post in posts {
        writeln!(
            writer,
            "  [{}] {} (#{})  {}",
            post.post_type_label, post.title, post.id, post.edit_url
        )?;
    }

    Ok(())
}

fn write_status(status: &StatusReport, writer: &mut dyn Write) -> Result<()> {
    let when = |ts: i64| {
        if ts <= 0 {
            "never".to_string()
        } else {
            chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| ts.to_string())
        }
    };

    writeln!(writer, "Last scan: {}", when(status.metadata.last_scan))?;
    writeln!(writer, "Content updated: {}", when(status.metadata.content_updated))?;
    writeln!(writer, "Activated: {}", when(status.metadata.activation))?;
    writeln!(writer, "Deactivated: {}", when(status.metadata.deactivation))?;
    writeln!(writer, "Cached blocks: {}", status.cached_blocks)?;
    writeln!(writer, "Keep data on uninstall: {}", status.keep_data)?;
    if status.stale {
        writeln!(writer, "{}", STALE_WARNING)?;
    }

    Ok(())
}
