//! RAG ingest engine: HTTP client for the backend and effect execution.
mod client;
mod engine;
mod smoke;
mod types;

pub use client::{ApiSettings, RagApi, ReqwestRagClient, DEFAULT_API_BASE};
pub use engine::{EngineError, EngineHandle};
pub use smoke::{run_upload_smoke, SampleFormat, SmokeOutcome, SmokeReport, SmokeSettings};
pub use types::{
    ApiError, EngineEvent, FailureKind, HealthStatus, IngestReceipt, RequestId, SearchHit,
    SearchRequest, TextIngestRequest,
};
