//! Response envelopes.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_count: u64,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            docs: Vec::new(),
            total_count: 0,
            current_page: 1,
            total_pages: 0,
        }
    }
}

/// Body of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub response: Paginated<T>,
}

/// Body of a single-record or mutation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    pub response: BackendResponse<T>,
}

/// Payload of a single-record or mutation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: String,
    /// Sent as a string by some endpoints and a number by others.
    #[serde(default)]
    pub status: serde_json::Value,
}
