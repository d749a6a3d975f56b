//! Domain layer - Position payload types.

pub mod position;

pub use position::{AcceptedWebhook, PayloadError, PositionReport, UpstreamIssue, WebhookPayload};
