use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type RequestId = u64;

/// Body of `POST /ingest/text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextIngestRequest {
    pub source_name: String,
    pub text: String,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: u32,
}

/// Success body of both ingestion endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestReceipt {
    pub chunks: u64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub source_name: String,
    pub source_type: String,
    pub score: f64,
    pub content: String,
}

/// Success body of `POST /search`. A missing or null `results` means no hits.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ErrorBody {
    /// Human-readable detail, if the server sent a usable one.
    ///
    /// Validation failures arrive as a list of `{loc, msg, type}` objects; their
    /// `msg` fields are joined. Any other non-string detail is shown as JSON.
    pub(crate) fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    Some(Value::Array(items.clone()).to_string())
                } else {
                    Some(messages.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    IngestCompleted {
        request_id: RequestId,
        result: Result<IngestReceipt, ApiError>,
    },
    SearchCompleted {
        request_id: RequestId,
        result: Result<Vec<SearchHit>, ApiError>,
    },
}

impl EngineEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            EngineEvent::IngestCompleted { request_id, .. }
            | EngineEvent::SearchCompleted { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn http_status(status: reqwest::StatusCode, detail: Option<String>) -> Self {
        let message = detail.clone().unwrap_or_else(|| status.to_string());
        Self::new(
            FailureKind::HttpStatus {
                status: status.as_u16(),
                detail,
            },
            message,
        )
    }

    /// Server-provided detail for non-2xx responses.
    pub fn detail(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus { status: u16, detail: Option<String> },
    Timeout,
    Network,
    Decode,
    FileRead,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::FileRead => write!(f, "file read error"),
        }
    }
}
