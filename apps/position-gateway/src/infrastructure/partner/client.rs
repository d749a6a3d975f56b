//! HTTP client for the partner position API.
//!
//! Thin reqwest wrapper: one GET for the position report, one POST for the
//! refresh sub-resource. Every request forwards the caller's credential and
//! runs under the configured client timeout so a hung partner call cannot
//! hang a handler indefinitely. Failures are surfaced, never retried.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::application::ports::{PartnerApiError, PartnerApiPort};
use crate::infrastructure::config::PartnerSettings;
use crate::infrastructure::http::auth::API_KEY_HEADER;

/// Path of the position report resource.
const POSITIONS_PATH: &str = "/positions";

/// Path of the refresh sub-resource.
const REFRESH_PATH: &str = "/positions/refresh";

/// Reqwest-backed implementation of [`PartnerApiPort`].
#[derive(Debug, Clone)]
pub struct PartnerHttpClient {
    client: Client,
    base_url: String,
}

impl PartnerHttpClient {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Returns [`PartnerApiError::Network`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(settings: &PartnerSettings) -> Result<Self, PartnerApiError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| PartnerApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PartnerApiPort for PartnerHttpClient {
    async fn fetch_positions(&self, api_key: &str) -> Result<Value, PartnerApiError> {
        let url = self.url(POSITIONS_PATH);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| PartnerApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %body,
                "partner position fetch rejected"
            );
            return Err(PartnerApiError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PartnerApiError::Malformed(e.to_string()))
    }

    async fn request_refresh(&self, api_key: &str) -> Result<(), PartnerApiError> {
        let url = self.url(REFRESH_PATH);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| PartnerApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %body,
                "partner refresh rejected"
            );
            return Err(PartnerApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
