//! Block registry loading
//!
//! The host's block registry is supplied as a JSON file:
//!
//! ```json
//! { "blocks": [{ "name": "core/paragraph", "title": "Paragraph" }],
//!   "post_types": { "product": "Product" } }
//! ```

use crate::core::{BlockDescriptor, PostTypeLabels};
use crate::error::{Result, UsageError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    blocks: Vec<BlockDescriptor>,
    #[serde(default)]
    post_types: BTreeMap<String, String>,
}

/// Registered blocks plus post type labels
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: Vec<BlockDescriptor>,
    labels: PostTypeLabels,
}

impl BlockRegistry {
    /// Load a registry file; `None` gives an empty registry
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let file = File::open(path).map_err(|e| UsageError::FileNotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let parsed: RegistryFile = serde_json::from_reader(BufReader::new(file))?;
        Self::from_parts(parsed.blocks, parsed.post_types)
    }

    fn from_parts(
        blocks: Vec<BlockDescriptor>,
        post_types: BTreeMap<String, String>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for block in &blocks {
            if block.name.trim().is_empty() {
                return Err(UsageError::RegistryError(
                    "block with an empty name".to_string(),
                ));
            }
            if !seen.insert(block.name.as_str()) {
                return Err(UsageError::RegistryError(format!(
                    "block '{}' registered twice",
                    block.name
                )));
            }
        }

        let mut labels = PostTypeLabels::default();
        for (post_type, label) in post_types {
            labels.insert(post_type, label);
        }

        Ok(Self { blocks, labels })
    }

    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    pub fn labels(&self) -> &PostTypeLabels {
        &self.labels
    }
}
