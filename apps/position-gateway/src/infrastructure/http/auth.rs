//! API key verification for inbound requests.

use axum::http::HeaderMap;

use crate::infrastructure::config::ApiKey;

use super::error::ApiError;

/// Header carrying the shared secret, on inbound and outbound requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Verify the request credential against the configured secret.
///
/// Returns the credential for pass-through use as an upstream header. No
/// side effects; runs before any other request processing.
///
/// # Errors
///
/// [`ApiError::MissingApiKey`] when the header is absent,
/// [`ApiError::InvalidApiKey`] when it does not match exactly.
pub fn require_api_key(headers: &HeaderMap, expected: &ApiKey) -> Result<String, ApiError> {
    let supplied = headers
        .get(API_KEY_HEADER)
        .ok_or(ApiError::MissingApiKey)?
        .to_str()
        .map_err(|_| ApiError::InvalidApiKey)?;

    if !expected.matches(supplied) {
        return Err(ApiError::InvalidApiKey);
    }

    Ok(supplied.to_string())
}
