//! Multipart upload smoke check.
//!
//! Writes one small sample file per format into a temporary directory and
//! uploads each to the backend, recording the HTTP status or the failure.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use rag_logging::{rag_info, rag_warn};
use url::Url;

use crate::client::{endpoint_url, map_reqwest_error, multipart_form, DEFAULT_API_BASE};
use crate::EngineError;

/// Longest body excerpt kept for a failed upload.
const BODY_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Txt,
    Json,
    Csv,
    Png,
    Pdf,
}

impl SampleFormat {
    pub const ALL: [SampleFormat; 5] = [
        SampleFormat::Txt,
        SampleFormat::Json,
        SampleFormat::Csv,
        SampleFormat::Png,
        SampleFormat::Pdf,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            SampleFormat::Txt => "txt",
            SampleFormat::Json => "json",
            SampleFormat::Csv => "csv",
            SampleFormat::Png => "png",
            SampleFormat::Pdf => "pdf",
        }
    }

    pub fn sample_bytes(self) -> Vec<u8> {
        match self {
            SampleFormat::Txt => b"upload smoke test\n".to_vec(),
            SampleFormat::Json => br#"{"ping": "upload-test"}"#.to_vec(),
            SampleFormat::Csv => b"id,name\n1,test\n".to_vec(),
            // 1x1 PNG: signature, IHDR, IEND. Enough to exercise the transport.
            SampleFormat::Png => vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49,
                0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06,
                0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
                0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
            ],
            SampleFormat::Pdf => concat!(
                "%PDF-1.4\n",
                "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
                "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n",
                "3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 100 100] >>\nendobj\n",
                "xref\n0 4\n0000000000 65535 f \n",
                "trailer\n<< /Root 1 0 R /Size 4 >>\nstartxref\n0\n%%EOF\n",
            )
            .as_bytes()
            .to_vec(),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SampleFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().trim_start_matches('.');
        SampleFormat::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unsupported format: {raw}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeSettings {
    pub base_url: String,
    pub endpoint: String,
    pub field_name: String,
    pub formats: Vec<SampleFormat>,
    pub timeout: Duration,
}

impl Default for SmokeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            endpoint: "/ingest/file".to_string(),
            field_name: "file".to_string(),
            formats: SampleFormat::ALL.to_vec(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeOutcome {
    pub format: SampleFormat,
    /// HTTP status on success, a short reason otherwise.
    pub result: Result<u16, String>,
}

impl SmokeOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmokeReport {
    pub outcomes: Vec<SmokeOutcome>,
}

impl SmokeReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(SmokeOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SmokeOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.passed())
    }
}

pub async fn run_upload_smoke(settings: &SmokeSettings) -> Result<SmokeReport, EngineError> {
    let url = endpoint_url(&settings.base_url, &settings.endpoint)?;
    let http = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .map_err(map_reqwest_error)?;
    let dir = tempfile::Builder::new().prefix("upload-smoke-").tempdir()?;

    let mut report = SmokeReport::default();
    for &format in &settings.formats {
        let path = dir.path().join(format!("sample.{}", format.extension()));
        tokio::fs::write(&path, format.sample_bytes()).await?;

        let result = upload_one(&http, url.clone(), &settings.field_name, &path).await;
        match &result {
            Ok(status) => rag_info!("[PASS] {}: HTTP {}", format, status),
            Err(reason) => rag_warn!("[FAIL] {}: {}", format, reason),
        }
        report.outcomes.push(SmokeOutcome { format, result });
    }
    Ok(report)
}

async fn upload_one(
    http: &reqwest::Client,
    url: Url,
    field_name: &str,
    path: &Path,
) -> Result<u16, String> {
    let form = multipart_form(field_name, path)
        .await
        .map_err(|err| format!("request_error: {err}"))?;
    let response = http
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|err| format!("request_error: {err}"))?;

    let status = response.status();
    if status.is_success() {
        return Ok(status.as_u16());
    }
    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    Err(format!("HTTP {}; body={:?}", status.as_u16(), excerpt))
}
