// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Position Gateway - Library
//!
//! Webhook receiver and thin proxy for the partner brokerage's
//! position-reporting API. Every accepted payload is archived twice: as a
//! standalone JSON document for human inspection, and as a row in the
//! `positions` table.
//!
//! # Architecture (Hexagonal)
//!
//! - **Domain**: wire types for position-report payloads and their
//!   validation contract.
//! - **Application**: ports (`PositionStorePort`, `PartnerApiPort`) and the
//!   use cases that orchestrate them.
//! - **Infrastructure**: adapters - axum HTTP controller, reqwest partner
//!   client, JSON file archive, Turso relational store, environment-driven
//!   configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Position payload types and validation.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// Domain re-exports
pub use domain::position::{AcceptedWebhook, PositionReport, UpstreamIssue, WebhookPayload};

// Application re-exports
pub use application::ports::{
    PartnerApiError, PartnerApiPort, PositionStorePort, StoreError, StoredRecord,
};
pub use application::use_cases::{FetchError, FetchOutcome, FetchPositionsUseCase, ReceiveWebhookUseCase};

// Infrastructure re-exports
pub use infrastructure::config::{ApiKey, ConfigError, GatewayConfig, PartnerSettings};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::partner::PartnerHttpClient;
pub use infrastructure::persistence::{JsonArchive, PositionDatabase, PositionStore};
