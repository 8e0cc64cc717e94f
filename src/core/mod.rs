//! Core data structures and algorithms for usage detection

pub mod block;
pub mod finder;
pub mod orchestrator;
pub mod post_type;
pub mod scanner;
pub mod staleness;

pub use block::{group_by_namespace, search_token, BlockDescriptor};
pub use finder::{EditLinks, FoundPost, PostFinder};
pub use orchestrator::{BatchOrchestrator, BlockStatus, ScanSummary};
pub use post_type::PostTypeLabels;
pub use scanner::{UsageReport, UsageScanner};
pub use staleness::ScanMetadata;
