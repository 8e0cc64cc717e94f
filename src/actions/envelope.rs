//! Success/failure response envelope

use serde::Serialize;
use serde_json::{json, Value};

/// `{"success": bool, "data": ...}` as returned by every action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Value,
}

impl Envelope {
    pub fn success<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                data,
            },
            Err(e) => Self::error(&format!("Could not encode response: {}", e)),
        }
    }

    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            data: json!({ "message": message }),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: json!({ "message": message }),
        }
    }

    /// Message carried by an error envelope, if any
    pub fn error_message(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.data.get("message").and_then(Value::as_str)
    }
}
