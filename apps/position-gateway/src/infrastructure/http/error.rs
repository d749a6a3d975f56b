//! Request-scoped error mapping at the router boundary.
//!
//! Every downstream failure kind is converted here to an HTTP status plus a
//! JSON `{detail}` body. Responses carry sanitized messages only; the full
//! error detail is logged where the failure is observed.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::application::ports::StoreError;
use crate::application::use_cases::FetchError;

use super::response::ErrorBody;

/// Failures surfaced to HTTP callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The `X-API-Key` header was absent.
    #[error("X-API-Key header is required")]
    MissingApiKey,

    /// The supplied credential did not match.
    #[error("invalid API key")]
    InvalidApiKey,

    /// The webhook body failed validation; nothing was stored.
    #[error("{0}")]
    Validation(String),

    /// A partner API call failed; the message names the failure without
    /// transport detail.
    #[error("{0}")]
    Upstream(String),

    /// A durable write failed.
    #[error("failed to store payload")]
    Storage,
}

impl ApiError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey => StatusCode::BAD_REQUEST,
            Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) | Self::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Partner(partner) => Self::Upstream(partner.public_reason()),
            FetchError::Store(_) => Self::Storage,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(_: StoreError) -> Self {
        Self::Storage
    }
}
