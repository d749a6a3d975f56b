//! Wire types for partner position-report payloads.
//!
//! The partner delivers reports as camelCase JSON. Parsing is permissive:
//! unknown fields are ignored so upstream schema additions do not break
//! ingestion, and absent optional fields resolve to `None`, never to
//! empty-string or zero sentinels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One position report as delivered by the partner.
///
/// `file_size` and `url` are the only fields the partner guarantees; a
/// payload missing either is rejected before any side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    /// Brokerage account the report covers.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Size in bytes of the hosted report file.
    pub file_size: i64,
    /// Start of the reporting window.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// End of the reporting window.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Location of the externally hosted report file.
    pub url: String,
}

/// An issue reported by the partner alongside a payload.
///
/// Not necessarily fatal: the partner may deliver a usable report together
/// with warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamIssue {
    /// Partner-assigned issue code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub message: Option<String>,
}

/// Full webhook callback body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Issues reported by the partner, oldest first.
    #[serde(default)]
    pub errors: Vec<UpstreamIssue>,
    /// The position report itself.
    pub response: PositionReport,
}

/// A validated webhook callback: the typed view plus the original body.
///
/// The original body is retained verbatim (including fields this service
/// does not model) so the stored record survives upstream schema changes.
#[derive(Debug, Clone)]
pub struct AcceptedWebhook {
    /// Typed view used for validation and the relational row.
    pub payload: WebhookPayload,
    /// The payload exactly as it arrived.
    pub raw: Value,
}

impl AcceptedWebhook {
    /// Parse and validate a webhook body.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the body is not JSON or the required
    /// fields (`response.fileSize`, `response.url`) are missing or of the
    /// wrong type. Validation happens before any side effect.
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        let raw: Value = serde_json::from_slice(body)?;
        let payload: WebhookPayload = serde_json::from_value(raw.clone())?;
        Ok(Self { payload, raw })
    }
}

/// Why a webhook body was rejected.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Body was not JSON, or the required-field contract was violated.
    #[error("invalid webhook payload: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> &'static str {
        r#"{
            "errors": [{"code": "W01", "message": "stale snapshot"}],
            "response": {
                "accountNumber": "004-2201",
                "fileSize": 2048,
                "startDate": "2026-08-01T00:00:00Z",
                "endDate": "2026-08-07T00:00:00Z",
                "url": "https://reports.example.com/004-2201.xlsx"
            }
        }"#
    }

    #[test]
    fn parses_full_payload() {
        let accepted = AcceptedWebhook::parse(full_payload().as_bytes()).unwrap();
        let report = &accepted.payload.response;

        assert_eq!(report.account_number.as_deref(), Some("004-2201"));
        assert_eq!(report.file_size, 2048);
        assert_eq!(report.url, "https://reports.example.com/004-2201.xlsx");
        assert!(report.start_date.is_some());
        assert_eq!(accepted.payload.errors.len(), 1);
        assert_eq!(accepted.payload.errors[0].code.as_deref(), Some("W01"));
    }

    #[test]
    fn minimal_payload_resolves_optionals_to_none() {
        let body = r#"{"response": {"fileSize": 12, "url": "https://x/y"}}"#;
        let accepted = AcceptedWebhook::parse(body.as_bytes()).unwrap();
        let report = &accepted.payload.response;

        assert_eq!(report.account_number, None);
        assert_eq!(report.start_date, None);
        assert_eq!(report.end_date, None);
        assert!(accepted.payload.errors.is_empty());
    }

    #[test]
    fn missing_file_size_is_rejected() {
        let body = r#"{"errors": [], "response": {"url": "https://x/y"}}"#;
        let err = AcceptedWebhook::parse(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("fileSize"));
    }

    #[test]
    fn non_integer_file_size_is_rejected() {
        let body = r#"{"response": {"fileSize": "large", "url": "https://x/y"}}"#;
        assert!(AcceptedWebhook::parse(body.as_bytes()).is_err());
    }

    #[test]
    fn missing_url_is_rejected() {
        let body = r#"{"response": {"fileSize": 12}}"#;
        let err = AcceptedWebhook::parse(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn unknown_fields_are_ignored_but_retained_raw() {
        let body = r#"{
            "response": {"fileSize": 12, "url": "https://x/y", "checksum": "abc"},
            "traceId": "t-1"
        }"#;
        let accepted = AcceptedWebhook::parse(body.as_bytes()).unwrap();

        assert_eq!(accepted.payload.response.file_size, 12);
        assert_eq!(accepted.raw["response"]["checksum"], "abc");
        assert_eq!(accepted.raw["traceId"], "t-1");
    }

    #[test]
    fn issue_fields_are_independently_optional() {
        let body = r#"{
            "errors": [{"code": "E42"}, {"message": "no code"}, {}],
            "response": {"fileSize": 1, "url": "https://x/y"}
        }"#;
        let accepted = AcceptedWebhook::parse(body.as_bytes()).unwrap();

        assert_eq!(accepted.payload.errors.len(), 3);
        assert_eq!(accepted.payload.errors[0].code.as_deref(), Some("E42"));
        assert_eq!(accepted.payload.errors[0].message, None);
        assert_eq!(accepted.payload.errors[1].code, None);
    }

    #[test]
    fn not_json_is_rejected() {
        assert!(AcceptedWebhook::parse(b"not json at all").is_err());
    }
}
