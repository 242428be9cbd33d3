//! Shared response metadata types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata captured from an HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Timestamp when the response was received.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Request id echoed by the service or generated client-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Response headers (lowercased keys).
    pub headers: HashMap<String, String>,
}

impl ResponseMetadata {
    /// Capture metadata from a reqwest header map.
    pub fn from_headers(headers: &reqwest::header::HeaderMap, request_id: Option<String>) -> Self {
        let headers = headers
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|val| (k.as_str().to_lowercase(), val.to_string()))
            })
            .collect();
        Self {
            timestamp: chrono::Utc::now(),
            request_id,
            headers,
        }
    }
}
