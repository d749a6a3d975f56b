//! Partner position API adapter.

pub mod client;

pub use client::PartnerHttpClient;
