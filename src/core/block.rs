//! Registered block representation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace whose prefix is omitted from serialized block comments
const CORE_NAMESPACE: &str = "core/";

/// Group used for block names without a namespace
const FALLBACK_NAMESPACE: &str = "other";

/// Opening of a serialized block comment
pub const MARKER_PREFIX: &str = "<!-- wp:";

/// A block type as supplied by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Full `namespace/name` identifier
    pub name: String,
    /// Human title, may be empty
    #[serde(default)]
    pub title: String,
}

impl BlockDescriptor {
    #[allow(dead_code)]
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }

    /// Token searched for in post content
    pub fn search_token(&self) -> &str {
        search_token(&self.name)
    }

    /// Namespace before the first slash, or "other"
    pub fn namespace(&self) -> &str {
        match self.name.find('/') {
            Some(idx) => &self.name[..idx],
            None => FALLBACK_NAMESPACE,
        }
    }

    /// Title to show, derived from the name when the registry gives none
    pub fn display_title(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        let short = match self.name.split_once('/') {
            Some((_, rest)) => rest,
            None => self.name.as_str(),
        };
        ucfirst(&short.replace('-', " "))
    }
}

/// Strip the core namespace: core blocks serialize as `<!-- wp:paragraph`
pub fn search_token(block_name: &str) -> &str {
    block_name.strip_prefix(CORE_NAMESPACE).unwrap_or(block_name)
}

/// The literal searched for in post content
pub fn block_marker(token: &str) -> String {
    format!("{}{}", MARKER_PREFIX, token)
}

/// Upper-case the first character
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Group blocks by namespace, namespaces sorted, blocks kept in registry order
pub fn group_by_namespace(blocks: &[BlockDescriptor]) -> BTreeMap<String, Vec<&BlockDescriptor>> {
    let mut groups: BTreeMap<String, Vec<&BlockDescriptor>> = BTreeMap::new();
    for block in blocks {
        groups
            .entry(block.namespace().to_string())
            .or_default()
            .push(block);
    }
    groups
}
