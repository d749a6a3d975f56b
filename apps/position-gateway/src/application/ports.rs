//! Port definitions for external collaborators.
//!
//! The HTTP controller and the use cases depend only on these traits;
//! adapters in the infrastructure layer implement them.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::position::AcceptedWebhook;

/// Location of a durably stored payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Path of the archived JSON document.
    pub file: PathBuf,
}

/// Errors from the persistence sink.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the JSON archive document failed.
    #[error("archive write failed: {0}")]
    Archive(String),

    /// Writing the relational row failed.
    #[error("database write failed: {0}")]
    Database(String),

    /// The payload could not be serialized for storage.
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

/// Durable sink for accepted position payloads.
///
/// Implementations assign the receipt timestamp and persist the full
/// payload; callers never observe a partially stored record.
#[async_trait]
pub trait PositionStorePort: Send + Sync {
    /// Store a validated webhook payload.
    async fn store_webhook(&self, webhook: &AcceptedWebhook) -> Result<StoredRecord, StoreError>;

    /// Store a raw payload fetched from the partner API.
    async fn store_fetched(&self, data: &Value) -> Result<StoredRecord, StoreError>;
}

/// Errors from the partner position API.
#[derive(Debug, Error, Clone)]
pub enum PartnerApiError {
    /// The partner answered with a non-success status.
    #[error("partner API returned status {status}")]
    Status {
        /// HTTP status code the partner answered with.
        status: u16,
    },

    /// The partner could not be reached.
    #[error("partner API unreachable: {0}")]
    Network(String),

    /// The partner answered 2xx but the body was not JSON.
    #[error("partner API returned a malformed body: {0}")]
    Malformed(String),
}

impl PartnerApiError {
    /// Short description safe to return to callers.
    ///
    /// Never includes URLs or transport-level detail; those go to the log.
    #[must_use]
    pub fn public_reason(&self) -> String {
        match self {
            Self::Status { status } => format!("partner API returned status {status}"),
            Self::Network(_) => "partner API unreachable".to_string(),
            Self::Malformed(_) => "partner API returned a malformed response".to_string(),
        }
    }
}

/// Outbound client for the partner position API.
///
/// The caller's credential is forwarded on every request; the partner and
/// this service share the same trust domain.
#[async_trait]
pub trait PartnerApiPort: Send + Sync {
    /// Fetch the current partner positions.
    async fn fetch_positions(&self, api_key: &str) -> Result<Value, PartnerApiError>;

    /// Ask the partner to rebuild its position report.
    async fn request_refresh(&self, api_key: &str) -> Result<(), PartnerApiError>;
}
