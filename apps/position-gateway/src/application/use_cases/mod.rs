//! Application use cases.

pub mod fetch_positions;
pub mod receive_webhook;

pub use fetch_positions::{FetchError, FetchOutcome, FetchPositionsUseCase};
pub use receive_webhook::ReceiveWebhookUseCase;
