//! Response bodies for the HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned for an accepted webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    /// Always `"success"`.
    pub status: String,
    /// Human-readable confirmation.
    pub message: String,
    /// Archive location of the stored payload.
    pub file: String,
}

/// Body returned for fetch and refresh-and-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Always `"success"`.
    pub status: String,
    /// Response body as returned by the partner.
    pub data: Value,
    /// Archive location of the stored copy.
    pub file: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Sanitized failure description.
    pub detail: String,
}
