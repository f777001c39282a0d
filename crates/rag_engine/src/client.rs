use std::path::Path;
use std::time::Duration;

use rag_logging::{rag_debug, rag_warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use url::Url;

use crate::types::{ErrorBody, SearchResponse};
use crate::{
    ApiError, FailureKind, HealthStatus, IngestReceipt, SearchHit, SearchRequest,
    TextIngestRequest,
};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Where the backend lives and how long to wait for it.
///
/// Both timeouts are off by default: a request waits as long as the backend takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait RagApi: Send + Sync {
    async fn ingest_text(&self, source_name: &str, text: &str) -> Result<IngestReceipt, ApiError>;

    async fn ingest_file(&self, path: &Path) -> Result<IngestReceipt, ApiError>;

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRagClient {
    base_url: String,
    http: reqwest::Client,
}

impl ReqwestRagClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|err| {
            ApiError::new(FailureKind::InvalidUrl, format!("{base_url}: {err}"))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint paths are appended to the base, so a base with a path prefix keeps it.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        endpoint_url(&self.base_url, path)
    }
}

#[async_trait::async_trait]
impl RagApi for ReqwestRagClient {
    async fn ingest_text(&self, source_name: &str, text: &str) -> Result<IngestReceipt, ApiError> {
        let url = self.endpoint("/ingest/text")?;
        rag_debug!(
            "POST {} source_name={} text_len={}",
            url,
            source_name,
            text.len()
        );
        let body = TextIngestRequest {
            source_name: source_name.to_string(),
            text: text.to_string(),
        };
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn ingest_file(&self, path: &Path) -> Result<IngestReceipt, ApiError> {
        let url = self.endpoint("/ingest/file")?;
        let form = multipart_form("file", path).await?;
        rag_debug!("POST {} file={:?}", url, path);
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, ApiError> {
        let url = self.endpoint("/search")?;
        rag_debug!("POST {} query_len={} limit={}", url, query.len(), limit);
        let body = SearchRequest {
            query: query.to_string(),
            limit,
        };
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let parsed: SearchResponse = read_json(response).await?;
        Ok(parsed.results.unwrap_or_default())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("/health")?;
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ApiError> {
    let raw = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
}

/// Builds a single-part form that streams `path` from disk under `field_name`.
pub(crate) async fn multipart_form(field_name: &str, path: &Path) -> Result<Form, ApiError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| file_error(path, err))?;
    let length = file
        .metadata()
        .await
        .map_err(|err| file_error(path, err))?
        .len();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
        .file_name(file_name)
        .mime_str(mime.as_ref())
        .map_err(map_reqwest_error)?;
    Ok(Form::new().part(field_name.to_string(), part))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        // A non-JSON error body is treated like a JSON one without `detail`.
        let detail = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(error) => error.detail_text(),
            Err(err) => {
                rag_warn!("Error response {} has no JSON body: {}", status, err);
                None
            }
        };
        return Err(ApiError::http_status(status, detail));
    }

    serde_json::from_slice(&body).map_err(|err| {
        ApiError::new(
            FailureKind::Decode,
            format!("malformed response body: {err}"),
        )
    })
}

fn file_error(path: &Path, err: std::io::Error) -> ApiError {
    ApiError::new(
        FailureKind::FileRead,
        format!("cannot read {}: {}", path.display(), err),
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
