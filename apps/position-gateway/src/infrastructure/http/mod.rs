//! HTTP surface - axum router, handlers, and error mapping.

pub mod auth;
pub mod controller;
pub mod error;
pub mod response;

pub use auth::{API_KEY_HEADER, require_api_key};
pub use controller::{AppState, create_router};
pub use error::ApiError;
