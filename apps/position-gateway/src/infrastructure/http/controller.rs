//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases. The access
//! guard runs first on every partner operation; the webhook path validates
//! the payload before any side effect.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};

use crate::application::ports::{PartnerApiPort, PositionStorePort};
use crate::application::use_cases::{FetchPositionsUseCase, ReceiveWebhookUseCase};
use crate::domain::position::AcceptedWebhook;
use crate::infrastructure::config::ApiKey;

use super::auth::require_api_key;
use super::error::ApiError;
use super::response::{FetchResponse, HealthResponse, WebhookAck};

/// Application state shared across handlers.
pub struct AppState<P, S>
where
    P: PartnerApiPort,
    S: PositionStorePort,
{
    /// Use case for archiving webhook payloads.
    pub receive_webhook: Arc<ReceiveWebhookUseCase<S>>,
    /// Use case for fetch and refresh-and-fetch.
    pub fetch_positions: Arc<FetchPositionsUseCase<P, S>>,
    /// Shared webhook secret.
    pub api_key: ApiKey,
    /// Application version.
    pub version: String,
}

impl<P, S> Clone for AppState<P, S>
where
    P: PartnerApiPort,
    S: PositionStorePort,
{
    fn clone(&self) -> Self {
        Self {
            receive_webhook: Arc::clone(&self.receive_webhook),
            fetch_positions: Arc::clone(&self.fetch_positions),
            api_key: self.api_key.clone(),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<P, S>(state: AppState<P, S>) -> Router
where
    P: PartnerApiPort + 'static,
    S: PositionStorePort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook/positions", post(receive_positions))
        .route("/positions/partner", get(fetch_partner_positions))
        .route("/positions/partner/refresh", post(refresh_partner_positions))
        .with_state(state)
}

/// Health check endpoint. Unauthenticated, no side effects.
async fn health_check<P, S>(State(state): State<AppState<P, S>>) -> Json<HealthResponse>
where
    P: PartnerApiPort,
    S: PositionStorePort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Webhook ingestion endpoint.
async fn receive_positions<P, S>(
    State(state): State<AppState<P, S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError>
where
    P: PartnerApiPort,
    S: PositionStorePort,
{
    require_api_key(&headers, &state.api_key)?;

    let webhook = AcceptedWebhook::parse(&body).map_err(|err| {
        tracing::warn!(error = %err, "webhook payload rejected");
        ApiError::Validation(err.to_string())
    })?;

    let record = state.receive_webhook.execute(&webhook).await.map_err(|err| {
        tracing::error!(error = %err, "webhook archive failed");
        ApiError::from(err)
    })?;

    Ok(Json(WebhookAck {
        status: "success".to_string(),
        message: "position report received and archived".to_string(),
        file: record.file.display().to_string(),
    }))
}

/// Fetch current partner positions.
async fn fetch_partner_positions<P, S>(
    State(state): State<AppState<P, S>>,
    headers: HeaderMap,
) -> Result<Json<FetchResponse>, ApiError>
where
    P: PartnerApiPort,
    S: PositionStorePort,
{
    let api_key = require_api_key(&headers, &state.api_key)?;

    let outcome = state.fetch_positions.fetch(&api_key).await.map_err(|err| {
        tracing::error!(error = %err, "partner fetch failed");
        ApiError::from(err)
    })?;

    Ok(Json(FetchResponse {
        status: "success".to_string(),
        data: outcome.data,
        file: outcome.record.file.display().to_string(),
    }))
}

/// Ask the partner to rebuild its report, then fetch it.
async fn refresh_partner_positions<P, S>(
    State(state): State<AppState<P, S>>,
    headers: HeaderMap,
) -> Result<Json<FetchResponse>, ApiError>
where
    P: PartnerApiPort,
    S: PositionStorePort,
{
    let api_key = require_api_key(&headers, &state.api_key)?;

    let outcome = state
        .fetch_positions
        .refresh_and_fetch(&api_key)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "partner refresh-and-fetch failed");
            ApiError::from(err)
        })?;

    Ok(Json(FetchResponse {
        status: "success".to_string(),
        data: outcome.data,
        file: outcome.record.file.display().to_string(),
    }))
}
