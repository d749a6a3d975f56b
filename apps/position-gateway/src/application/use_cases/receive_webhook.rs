//! Use case: accept a validated webhook payload and archive it.

use std::sync::Arc;

use crate::application::ports::{PositionStorePort, StoreError, StoredRecord};
use crate::domain::position::AcceptedWebhook;

/// Archives an accepted webhook payload through the store port.
pub struct ReceiveWebhookUseCase<S: PositionStorePort> {
    store: Arc<S>,
}

impl<S: PositionStorePort> ReceiveWebhookUseCase<S> {
    /// Create the use case.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Store the payload durably; returns the archive location.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when either persistence backend fails. No
    /// record is considered accepted until the store call returns.
    pub async fn execute(&self, webhook: &AcceptedWebhook) -> Result<StoredRecord, StoreError> {
        let record = self.store.store_webhook(webhook).await?;

        tracing::info!(
            file = %record.file.display(),
            file_size = webhook.payload.response.file_size,
            account = webhook.payload.response.account_number.as_deref().unwrap_or("-"),
            partner_issues = webhook.payload.errors.len(),
            "webhook payload archived"
        );

        Ok(record)
    }
}
