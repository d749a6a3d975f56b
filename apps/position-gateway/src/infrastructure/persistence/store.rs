//! Combined persistence sink: JSON archive plus relational rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::application::ports::{PositionStorePort, StoreError, StoredRecord};
use crate::domain::position::{AcceptedWebhook, PositionReport, WebhookPayload};

use super::archive::JsonArchive;
use super::database::PositionDatabase;

/// Field merged into every archived document at acceptance time.
const RECEIVED_AT_FIELD: &str = "received_at";

/// Durable store writing every accepted payload to the archive and, when
/// the payload carries a full position record, to the `positions` table.
pub struct PositionStore {
    archive: JsonArchive,
    database: PositionDatabase,
}

impl PositionStore {
    /// Combine the two backends into one sink.
    #[must_use]
    pub const fn new(archive: JsonArchive, database: PositionDatabase) -> Self {
        Self { archive, database }
    }

    /// Archive the payload and, when a report is present, append the row.
    ///
    /// The archive is the source of truth: a row-insert failure after the
    /// archive write surfaces as an error but does not remove the document.
    async fn persist(
        &self,
        original: &Value,
        report: Option<&PositionReport>,
    ) -> Result<StoredRecord, StoreError> {
        let received_at = Utc::now();
        let document = with_received_at(original, received_at);

        let file = self.archive.write(&document, received_at).await?;

        if let Some(report) = report {
            self.database.insert(report, original).await?;
        }

        Ok(StoredRecord { file })
    }
}

/// Merge the receipt timestamp into the stored document.
///
/// Non-object payloads (the partner could answer with a bare array) are
/// wrapped so the timestamp always has a place to live.
fn with_received_at(original: &Value, received_at: DateTime<Utc>) -> Value {
    let stamp = Value::String(received_at.to_rfc3339());
    match original {
        Value::Object(map) => {
            let mut map = map.clone();
            map.insert(RECEIVED_AT_FIELD.to_string(), stamp);
            Value::Object(map)
        }
        other => json!({ "data": other, RECEIVED_AT_FIELD: stamp }),
    }
}

#[async_trait]
impl PositionStorePort for PositionStore {
    async fn store_webhook(&self, webhook: &AcceptedWebhook) -> Result<StoredRecord, StoreError> {
        self.persist(&webhook.raw, Some(&webhook.payload.response))
            .await
    }

    async fn store_fetched(&self, data: &Value) -> Result<StoredRecord, StoreError> {
        // a fetched body in the webhook shape also gets a relational row;
        // anything else is archived to file only
        let payload: Option<WebhookPayload> = serde_json::from_value(data.clone()).ok();
        self.persist(data, payload.as_ref().map(|p| &p.response))
            .await
    }
}
