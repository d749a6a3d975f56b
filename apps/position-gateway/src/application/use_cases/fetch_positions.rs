//! Use case: fetch partner positions, optionally after a refresh.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::application::ports::{
    PartnerApiError, PartnerApiPort, PositionStorePort, StoreError, StoredRecord,
};

/// Result of a successful fetch: the raw data plus where it was stored.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Response body as returned by the partner.
    pub data: Value,
    /// Archive location of the stored copy.
    pub record: StoredRecord,
}

/// Why a fetch flow failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The partner call failed; nothing was stored.
    #[error(transparent)]
    Partner(#[from] PartnerApiError),

    /// The partner answered but the payload could not be stored.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches partner positions and routes the response into the store.
pub struct FetchPositionsUseCase<P: PartnerApiPort, S: PositionStorePort> {
    partner: Arc<P>,
    store: Arc<S>,
    settle_delay: Duration,
}

impl<P: PartnerApiPort, S: PositionStorePort> FetchPositionsUseCase<P, S> {
    /// Create the use case.
    ///
    /// `settle_delay` is how long the refresh flow waits before fetching;
    /// the partner rebuilds its report asynchronously and exposes no
    /// freshness signal to poll for.
    #[must_use]
    pub fn new(partner: Arc<P>, store: Arc<S>, settle_delay: Duration) -> Self {
        Self {
            partner,
            store,
            settle_delay,
        }
    }

    /// Fetch the current positions and archive the response.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Partner`] on a non-2xx answer or network
    /// failure (storage untouched), [`FetchError::Store`] when the answer
    /// could not be persisted.
    pub async fn fetch(&self, api_key: &str) -> Result<FetchOutcome, FetchError> {
        let data = self.partner.fetch_positions(api_key).await?;
        let record = self.store.store_fetched(&data).await?;

        tracing::info!(file = %record.file.display(), "partner positions fetched and archived");

        Ok(FetchOutcome { data, record })
    }

    /// Ask the partner to rebuild its report, then fetch it.
    ///
    /// A failed refresh aborts the flow without fetching. On success the
    /// task suspends for the settling delay, then runs the identical fetch
    /// flow. There is no retry and no freshness re-check.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch`], plus [`FetchError::Partner`] when the
    /// refresh call itself fails.
    pub async fn refresh_and_fetch(&self, api_key: &str) -> Result<FetchOutcome, FetchError> {
        self.partner.request_refresh(api_key).await?;

        tracing::debug!(
            settle_ms = self.settle_delay.as_millis(),
            "refresh accepted, waiting for partner to settle"
        );
        tokio::time::sleep(self.settle_delay).await;

        self.fetch(api_key).await
    }
}
