//! Flat-file JSON archive for accepted payloads.
//!
//! One pretty-printed JSON document per accepted payload, named by a
//! microsecond-resolution receipt timestamp plus a random suffix so
//! concurrent writes never collide. Writes are not atomic against a crash
//! mid-write; the archive is an at-least-once, human-inspectable audit log.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::application::ports::StoreError;

/// Archive directory handle.
#[derive(Debug, Clone)]
pub struct JsonArchive {
    dir: PathBuf,
}

impl JsonArchive {
    /// Open the archive, creating the directory if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Archive`] when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Archive(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Directory the archive writes into.
    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Write one document; returns the record path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Archive`] on I/O failure,
    /// [`StoreError::Serialization`] when the document cannot be rendered.
    pub async fn write(
        &self,
        document: &Value,
        received_at: DateTime<Utc>,
    ) -> Result<PathBuf, StoreError> {
        let path = self.dir.join(record_name(received_at));

        let rendered = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        tokio::fs::write(&path, rendered)
            .await
            .map_err(|e| StoreError::Archive(e.to_string()))?;

        tracing::debug!(file = %path.display(), "archive record written");
        Ok(path)
    }
}

/// Unique record name for a receipt timestamp.
///
/// Microsecond timestamp plus a random suffix; two payloads accepted in the
/// same second still get distinct names.
fn record_name(received_at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "position_{}_{}.json",
        received_at.format("%Y%m%d_%H%M%S_%6f"),
        &suffix[..8]
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn open_creates_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("archive");

        let archive = JsonArchive::open(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(archive.dir(), &dir);
    }

    #[tokio::test]
    async fn write_produces_a_readable_record() {
        let root = tempfile::tempdir().unwrap();
        let archive = JsonArchive::open(root.path()).unwrap();

        let document = json!({"response": {"fileSize": 12}, "received_at": "2026-08-07T12:00:00Z"});
        let path = archive.write(&document, Utc::now()).await.unwrap();

        let stored: Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored, document);

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("position_"));
        assert!(name.ends_with(".json"));
    }

    #[tokio::test]
    async fn same_timestamp_yields_distinct_names() {
        let root = tempfile::tempdir().unwrap();
        let archive = JsonArchive::open(root.path()).unwrap();
        let at = Utc::now();

        let first = archive.write(&json!({"n": 1}), at).await.unwrap();
        let second = archive.write(&json!({"n": 2}), at).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn write_into_missing_directory_fails() {
        let root = tempfile::tempdir().unwrap();
        let archive = JsonArchive::open(root.path().join("a")).unwrap();
        std::fs::remove_dir(root.path().join("a")).unwrap();

        let err = archive.write(&json!({}), Utc::now()).await.unwrap_err();
        assert!(matches!(err, StoreError::Archive(_)));
    }
}
