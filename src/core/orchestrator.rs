//! Full-scan orchestration
//!
//! Blocks are checked in fixed-size batches with a pause between batches
//! to bound load on the database. Each check is independent and
//! idempotent, so an interrupted scan can simply be run again.

use crate::config::UsageFilter;
use crate::core::block::BlockDescriptor;
use crate::core::scanner::UsageProbe;
use crate::error::Result;
use crate::lifecycle::LifecycleHooks;
use crate::store::{OptionsStore, UsageCache};
use chrono::Utc;
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Outcome for one block in a full scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStatus {
    pub block_name: String,
    pub title: String,
    pub usage_count: u64,
    pub is_used: bool,
}

/// Result of a full scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub blocks: Vec<BlockStatus>,
    pub batches: usize,
    pub scanned_at: i64,
}

impl ScanSummary {
    pub fn used_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_used).count()
    }

    pub fn unused_count(&self) -> usize {
        self.blocks.len() - self.used_count()
    }

    /// Blocks matching a usage filter, in scan order
    pub fn filtered(&self, filter: UsageFilter) -> Vec<&BlockStatus> {
        self.blocks
            .iter()
            .filter(|b| match filter {
                UsageFilter::All => true,
                UsageFilter::Used => b.is_used,
                UsageFilter::Unused => !b.is_used,
            })
            .collect()
    }
}

/// Drives a usage probe over every registered block
pub struct BatchOrchestrator {
    batch_size: usize,
    delay: Duration,
}

impl BatchOrchestrator {
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            delay,
        }
    }

    /// Check all blocks, then record the scan timestamp
    pub fn run<P, S>(
        &self,
        blocks: &[BlockDescriptor],
        probe: &P,
        hooks: &LifecycleHooks<'_, S>,
        progress: &impl Fn(&str),
    ) -> Result<ScanSummary>
    where
        P: UsageProbe,
        S: OptionsStore + UsageCache,
    {
        let total = blocks.len();
        let mut summary = ScanSummary::default();
        let mut done = 0usize;

        for (idx, batch) in blocks.chunks(self.batch_size).enumerate() {
            if idx > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }

            for block in batch {
                let report = probe.probe(block);
                summary.blocks.push(BlockStatus {
                    block_name: block.name.clone(),
                    title: block.display_title(),
                    usage_count: report.usage_count,
                    is_used: report.is_used,
                });
            }

            done += batch.len();
            summary.batches += 1;
            progress(&format!("Checked {}/{} blocks", done, total));
        }

        let now = Utc::now().timestamp();
        hooks.scan_recorded(now)?;
        summary.scanned_at = now;

        info!(
            blocks = total,
            used = summary.used_count(),
            batches = summary.batches,
            "scan complete"
        );

        Ok(summary)
    }
}
