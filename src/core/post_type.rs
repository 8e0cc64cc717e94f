//! Post type labels

use std::collections::HashMap;

pub const TEMPLATE: &str = "wp_template";
pub const TEMPLATE_PART: &str = "wp_template_part";

/// Whether a post type is edited in the site editor rather than post.php
pub fn is_template_type(post_type: &str) -> bool {
    post_type == TEMPLATE || post_type == TEMPLATE_PART
}

/// Singular labels for known post types
#[derive(Debug, Clone)]
pub struct PostTypeLabels {
    labels: HashMap<String, String>,
}

impl Default for PostTypeLabels {
    fn default() -> Self {
        let builtin = [
            ("post", "Post"),
            ("page", "Page"),
            ("attachment", "Media"),
            ("wp_block", "Pattern"),
            ("wp_navigation", "Navigation Menu"),
            (TEMPLATE, "Template"),
            (TEMPLATE_PART, "Template Part"),
        ];
        Self {
            labels: builtin
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl PostTypeLabels {
    /// Register or override a label
    pub fn insert(&mut self, post_type: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(post_type.into(), label.into());
    }

    /// Singular label, falling back to the raw type name
    pub fn singular(&self, post_type: &str) -> String {
        match post_type {
            TEMPLATE => "Template".to_string(),
            TEMPLATE_PART => "Template Part".to_string(),
            _ => self
                .labels
                .get(post_type)
                .cloned()
                .unwrap_or_else(|| post_type.to_string()),
        }
    }

    /// Label used in usage breakdowns, where templates are counted in bulk
    pub fn breakdown(&self, post_type: &str) -> String {
        match post_type {
            TEMPLATE => "Templates".to_string(),
            TEMPLATE_PART => "Template Parts".to_string(),
            _ => self.singular(post_type),
        }
    }
}
