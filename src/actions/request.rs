//! Action requests and parameter sanitizing

use crate::error::{Result, UsageError};
use std::collections::BTreeMap;

/// A named action with raw string parameters
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    pub action: String,
    params: BTreeMap<String, String>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Build from `key=value` pairs as given on the command line
    pub fn from_pairs(action: &str, pairs: &[String]) -> Result<Self> {
        let mut request = Self::new(action);
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                UsageError::InvalidConfig(format!("parameter '{}' is not key=value", pair))
            })?;
            request = request.with_param(key.trim(), value);
        }
        Ok(request)
    }

    /// Sanitized parameter; absent and blank values are both `None`
    pub fn param(&self, key: &str) -> Option<String> {
        self.params
            .get(key)
            .map(|raw| sanitize_text_field(raw))
            .filter(|v| !v.is_empty())
    }
}

/// Strip tags and control characters, collapse whitespace, trim
pub fn sanitize_text_field(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '<' {
            let opens_tag = chars
                .peek()
                .map_or(false, |n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?'));
            if opens_tag {
                for skipped in chars.by_ref() {
                    if skipped == '>' {
                        break;
                    }
                }
                continue;
            }
        }

        if c.is_whitespace() {
            stripped.push(' ');
        } else if !c.is_control() {
            stripped.push(c);
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
