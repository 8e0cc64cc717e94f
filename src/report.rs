//! Report models assembled from the registry and the caches

use crate::core::{group_by_namespace, ScanMetadata};
use crate::core::block::ucfirst;
use crate::error::Result;
use crate::lifecycle::KeepData;
use crate::registry::BlockRegistry;
use crate::store::{OptionsStore, UsageCache, UsageRecord};
use serde::Serialize;

/// One block row of the listing
#[derive(Debug, Clone, Serialize)]
pub struct ListedBlock {
    pub name: String,
    pub title: String,
    pub search_pattern: String,
    /// Cached count, `None` when the block was never scanned
    pub usage_count: Option<u64>,
    pub last_updated: Option<String>,
}

/// Blocks of one namespace
#[derive(Debug, Clone, Serialize)]
pub struct BlockGroup {
    pub namespace: String,
    pub heading: String,
    pub blocks: Vec<ListedBlock>,
}

/// Grouped block list with cached usage
#[derive(Debug, Clone, Serialize)]
pub struct BlockListing {
    pub groups: Vec<BlockGroup>,
    pub stale: bool,
}

impl BlockListing {
    pub fn build<S>(registry: &BlockRegistry, store: &S) -> Result<Self>
    where
        S: OptionsStore + UsageCache,
    {
        let stats = store.usage_stats()?;
        let stale = ScanMetadata::load(store)?.is_stale();

        let groups = group_by_namespace(registry.blocks())
            .into_iter()
            .map(|(namespace, blocks)| BlockGroup {
                heading: format!("{} Blocks", ucfirst(&namespace)),
                blocks: blocks
                    .into_iter()
                    .map(|block| {
                        let record: Option<&UsageRecord> = stats.get(&block.name);
                        ListedBlock {
                            name: block.name.clone(),
                            title: block.display_title(),
                            search_pattern: block.search_token().to_string(),
                            usage_count: record.map(|r| r.usage_count),
                            last_updated: record.map(|r| r.last_updated.clone()),
                        }
                    })
                    .collect(),
                namespace,
            })
            .collect();

        Ok(Self { groups, stale })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Scan metadata and settings
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub metadata: ScanMetadata,
    pub stale: bool,
    pub keep_data: &'static str,
    pub cached_blocks: usize,
}

impl StatusReport {
    pub fn build<S>(store: &S) -> Result<Self>
    where
        S: OptionsStore + UsageCache,
    {
        let metadata = ScanMetadata::load(store)?;
        Ok(Self {
            stale: metadata.is_stale(),
            metadata,
            keep_data: KeepData::load(store)?.as_str(),
            cached_blocks: store.usage_stats()?.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SiteStore, CONTENT_UPDATED, LAST_SCAN};

    fn registry() -> BlockRegistry {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(
            &path,
            r#"{"blocks": [
                {"name": "core/paragraph", "title": "Paragraph"},
                {"name": "acme/hero-banner"},
                {"name": "core/image", "title": "Image"}
            ]}"#,
        )
        .unwrap();
        BlockRegistry::load(Some(&path)).unwrap()
    }

    #[test]
    fn test_listing_groups_and_usage() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store.replace_usage("core/image", 4, "2026-01-01 00:00:00").unwrap();

        let listing = BlockListing::build(&registry(), &store).unwrap();

        assert_eq!(listing.groups.len(), 2);
        assert_eq!(listing.groups[0].heading, "Acme Blocks");
        assert_eq!(listing.groups[0].blocks[0].title, "Hero banner");
        assert_eq!(listing.groups[0].blocks[0].search_pattern, "acme/hero-banner");
        assert_eq!(listing.groups[1].heading, "Core Blocks");
        assert_eq!(listing.groups[1].blocks[0].usage_count, None);
        assert_eq!(listing.groups[1].blocks[1].usage_count, Some(4));
        assert_eq!(listing.groups[1].blocks[1].search_pattern, "image");
        assert!(!listing.stale);
    }

    #[test]
    fn test_listing_stale_flag() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store.set_timestamp(LAST_SCAN, 100).unwrap();
        store.set_timestamp(CONTENT_UPDATED, 200).unwrap();

        let listing = BlockListing::build(&registry(), &store).unwrap();
        assert!(listing.stale);
    }

    #[test]
    fn test_status_report() {
        let store = SiteStore::open_in_memory("wp_").unwrap();
        store.replace_usage("core/image", 1, "2026-01-01 00:00:00").unwrap();

        let status = StatusReport::build(&store).unwrap();
        assert_eq!(status.keep_data, "yes");
        assert_eq!(status.cached_blocks, 1);
        assert!(!status.stale);

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["last_scan"], 0);
    }
}
