//! Export system for usage reports

mod console;
mod json;

use crate::config::{OutputFormat, UsageFilter};
use crate::core::{FoundPost, ScanSummary, UsageReport};
use crate::error::Result;
use crate::report::{BlockListing, StatusReport};
use std::io::Write;

pub use console::ConsoleExporter;
pub use json::JsonExporter;

/// Anything a command can print
pub enum Report<'a> {
    Blocks(&'a BlockListing),
    Scan(&'a ScanSummary, UsageFilter),
    Usage(&'a UsageReport),
    Posts {
        block_name: &'a str,
        search_pattern: &'a str,
        posts: &'a [FoundPost],
    },
    Status(&'a StatusReport),
}

/// Trait for output formatting
pub trait Exporter {
    /// Write the complete output for the given report
    fn export(&self, report: &Report<'_>, writer: &mut dyn Write) -> Result<()>;
}

/// Create an appropriate exporter based on configuration
pub fn create_exporter(format: OutputFormat) -> Box<dyn Exporter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleExporter),
        OutputFormat::Json => Box::new(JsonExporter),
    }
}
