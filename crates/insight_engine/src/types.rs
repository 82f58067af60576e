use serde::Deserialize;

use crate::ApiError;

pub type SubmissionId = u64;

/// Events emitted by the background client toward the state machine driver.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    CandidatesLoaded {
        candidates: Vec<CandidateEntry>,
    },
    SubmissionCompleted {
        submission: SubmissionId,
        result: Result<AnalysisPayload, ApiError>,
    },
}

/// Successful analysis response body. Rows are kept verbatim.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
    #[serde(default)]
    pub wordcloud: Option<String>,
}

/// Column descriptor as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnEntry {
    pub id: String,
    pub name: String,
}

/// One row of the read-only candidates endpoint. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateEntry {
    pub id: String,
    pub url: String,
}

/// Delivery failure after classification and (where applicable) retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DeliveryError {
    pub kind: DeliveryFailureKind,
    pub message: String,
}

impl DeliveryError {
    pub(crate) fn new(kind: DeliveryFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailureKind {
    /// No response was received at all.
    Transport,
    /// The final observed HTTP status.
    HttpStatus(u16),
    /// The caller abandoned the delivery.
    Cancelled,
}

/// Body shape the backend uses for errors, on any status and sometimes
/// inside a 200 response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extracts the service-reported error message from a response body, if any.
pub(crate) fn embedded_error(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
}
