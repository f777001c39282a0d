use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use rag_logging::{rag_info, rag_warn};
use thiserror::Error;

use crate::client::{ApiSettings, RagApi, ReqwestRagClient};
use crate::smoke::{run_upload_smoke, SmokeReport, SmokeSettings};
use crate::{ApiError, EngineEvent, HealthStatus, RequestId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("engine thread stopped")]
    Disconnected,
}

enum EngineCommand {
    IngestText {
        request_id: RequestId,
        source_name: String,
        text: String,
    },
    IngestFile {
        request_id: RequestId,
        path: PathBuf,
    },
    Search {
        request_id: RequestId,
        query: String,
        limit: u32,
    },
    Health {
        reply: mpsc::Sender<Result<HealthStatus, ApiError>>,
    },
    UploadSmoke {
        settings: SmokeSettings,
        reply: mpsc::Sender<Result<SmokeReport, EngineError>>,
    },
}

/// Runs backend requests on a background tokio runtime.
///
/// Every request is its own task, so completions come back in whatever order
/// the backend answers, not in submission order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let client = ReqwestRagClient::new(settings)?;
        rag_info!("Engine targets {}", client.base_url());
        Self::with_api(Arc::new(client))
    }

    pub fn with_api(api: Arc<dyn RagApi>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn ingest_text(&self, request_id: RequestId, source_name: String, text: String) {
        self.send(EngineCommand::IngestText {
            request_id,
            source_name,
            text,
        });
    }

    pub fn ingest_file(&self, request_id: RequestId, path: impl Into<PathBuf>) {
        self.send(EngineCommand::IngestFile {
            request_id,
            path: path.into(),
        });
    }

    pub fn search(&self, request_id: RequestId, query: String, limit: u32) {
        self.send(EngineCommand::Search {
            request_id,
            query,
            limit,
        });
    }

    /// Blocks until the backend answers `GET /health`.
    pub fn health(&self) -> Result<HealthStatus, EngineError> {
        let (reply, rx) = mpsc::channel();
        self.cmd_tx
            .send(EngineCommand::Health { reply })
            .map_err(|_| EngineError::Disconnected)?;
        let result = rx.recv().map_err(|_| EngineError::Disconnected)?;
        Ok(result?)
    }

    /// Blocks until every sample format has been uploaded.
    pub fn upload_smoke(&self, settings: SmokeSettings) -> Result<SmokeReport, EngineError> {
        let (reply, rx) = mpsc::channel();
        self.cmd_tx
            .send(EngineCommand::UploadSmoke { settings, reply })
            .map_err(|_| EngineError::Disconnected)?;
        rx.recv().map_err(|_| EngineError::Disconnected)?
    }

    /// Waits up to `timeout` for the next completion. `Ok(None)` means nothing
    /// arrived in time; `Err(Disconnected)` means no completion can ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        let event_rx = self
            .event_rx
            .lock()
            .map_err(|_| EngineError::Disconnected)?;
        match event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            rag_warn!("Engine thread stopped; request dropped");
        }
    }
}

async fn handle_command(
    api: &dyn RagApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::IngestText {
            request_id,
            source_name,
            text,
        } => {
            rag_info!(
                "IngestText request_id={} source_name={} text_len={}",
                request_id,
                source_name,
                text.len()
            );
            let result = api.ingest_text(&source_name, &text).await;
            log_outcome(request_id, &result);
            let _ = event_tx.send(EngineEvent::IngestCompleted { request_id, result });
        }
        EngineCommand::IngestFile { request_id, path } => {
            rag_info!("IngestFile request_id={} path={:?}", request_id, path);
            let result = api.ingest_file(&path).await;
            log_outcome(request_id, &result);
            let _ = event_tx.send(EngineEvent::IngestCompleted { request_id, result });
        }
        EngineCommand::Search {
            request_id,
            query,
            limit,
        } => {
            rag_info!(
                "Search request_id={} query_len={} limit={}",
                request_id,
                query.len(),
                limit
            );
            let result = api.search(&query, limit).await;
            log_outcome(request_id, &result);
            let _ = event_tx.send(EngineEvent::SearchCompleted { request_id, result });
        }
        EngineCommand::Health { reply } => {
            let _ = reply.send(api.health().await);
        }
        EngineCommand::UploadSmoke { settings, reply } => {
            let _ = reply.send(run_upload_smoke(&settings).await);
        }
    }
}

fn log_outcome<T>(request_id: RequestId, result: &Result<T, ApiError>) {
    match result {
        Ok(_) => rag_info!("Request {} completed", request_id),
        Err(err) => rag_warn!("Request {} failed ({}): {}", request_id, err.kind, err),
    }
}
