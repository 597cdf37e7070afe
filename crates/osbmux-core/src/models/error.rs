//! Broker API error body

use serde::{Deserialize, Serialize};

/// Error body returned by the proxy: `{"error": <optional>, "description": <string>}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub description: String,
}

impl ErrorResponse {
    /// An error body with only a description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            error: None,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_field_is_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponse::new("Not authorized")).unwrap();
        assert_eq!(body, json!({ "description": "Not authorized" }));
    }

    #[test]
    fn error_field_is_emitted_when_set() {
        let body = serde_json::to_value(ErrorResponse {
            error: Some("AsyncRequired".into()),
            description: "boom".into(),
        })
        .unwrap();
        assert_eq!(body, json!({ "error": "AsyncRequired", "description": "boom" }));
    }
}
