use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rag_core::{Effect, IngestReceipt, Msg, RequestFailure, SearchHit};
use rag_engine::{ApiError, EngineEvent, EngineHandle, FailureKind};
use rag_logging::{rag_debug, rag_warn};

use super::app::ShellEvent;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Executes core effects on the request engine and turns its events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            rag_debug!("Running effect for request {}", effect.request_id());
            match effect {
                Effect::IngestText {
                    request_id,
                    source_name,
                    text,
                } => self.engine.ingest_text(request_id, source_name, text),
                Effect::IngestFile { request_id, file } => {
                    self.engine.ingest_file(request_id, file.path())
                }
                Effect::Search {
                    request_id,
                    query,
                    limit,
                } => self.engine.search(request_id, query, limit),
            }
        }
    }

    /// Forwards engine completions to the shell until the shell goes away.
    pub fn spawn_event_loop(&self, tx: mpsc::Sender<ShellEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(EVENT_POLL_INTERVAL) {
                Ok(Some(event)) => {
                    if tx.send(ShellEvent::Msg(map_event(event))).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    rag_warn!("Stopped forwarding engine events: {}", err);
                    let _ = tx.send(ShellEvent::Notice(format!("Request engine stopped: {err}")));
                    break;
                }
            }
        });
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::IngestCompleted { request_id, result } => Msg::IngestDone {
            request_id,
            result: result
                .map(|receipt| IngestReceipt {
                    chunks: receipt.chunks,
                })
                .map_err(map_failure),
        },
        EngineEvent::SearchCompleted { request_id, result } => Msg::SearchDone {
            request_id,
            result: result
                .map(|hits| {
                    hits.into_iter()
                        .map(|hit| SearchHit {
                            source_name: hit.source_name,
                            source_type: hit.source_type,
                            score: hit.score,
                            content: hit.content,
                        })
                        .collect()
                })
                .map_err(map_failure),
        },
    }
}

fn map_failure(err: ApiError) -> RequestFailure {
    match err.kind {
        FailureKind::HttpStatus { status, detail } => RequestFailure::Server { status, detail },
        _ => RequestFailure::Unexpected {
            message: err.message,
        },
    }
}
