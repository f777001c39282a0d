use crate::{AppState, Effect, Msg, RequestFailure, RequestKind, SEARCH_LIMIT};

pub const TEXT_FALLBACK_MESSAGE: &str = "Text upload failed";
pub const FILE_FALLBACK_MESSAGE: &str = "File upload failed";
pub const SEARCH_FALLBACK_MESSAGE: &str = "Search failed";
pub const NO_FILE_SELECTED_MESSAGE: &str = "Select a .md or .pdf file";

pub fn stored_chunks_message(chunks: u64) -> String {
    format!("Stored chunks: {chunks}")
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SourceNameChanged(value) => {
            state.set_source_name(value);
            Vec::new()
        }
        Msg::TextChanged(value) => {
            state.set_text(value);
            Vec::new()
        }
        Msg::FileSelected(file) => {
            state.select_file(file);
            Vec::new()
        }
        Msg::QueryChanged(value) => {
            state.set_query(value);
            Vec::new()
        }
        Msg::SubmitTextClicked => {
            // No validation: an empty text goes out as-is and the backend decides.
            let request_id = state.issue(RequestKind::IngestText);
            state.clear_status(request_id);
            vec![Effect::IngestText {
                request_id,
                source_name: state.source_name().to_string(),
                text: state.text().to_string(),
            }]
        }
        Msg::SubmitFileClicked => match state.selected_file().cloned() {
            None => {
                state.show_local_failure(NO_FILE_SELECTED_MESSAGE);
                Vec::new()
            }
            Some(file) => {
                let request_id = state.issue(RequestKind::IngestFile);
                state.clear_status(request_id);
                vec![Effect::IngestFile { request_id, file }]
            }
        },
        Msg::SearchClicked => {
            // Searching leaves the current status message alone.
            let request_id = state.issue(RequestKind::Search);
            state.claim_status(request_id);
            vec![Effect::Search {
                request_id,
                query: state.query().to_string(),
                limit: SEARCH_LIMIT,
            }]
        }
        Msg::IngestDone { request_id, result } => {
            let Some(kind) = state.settle(request_id) else {
                return (state, Vec::new());
            };
            match result {
                Ok(receipt) => {
                    state.write_status(request_id, stored_chunks_message(receipt.chunks), false);
                }
                Err(failure) => {
                    state.write_status(request_id, failure_message(&failure, kind), true);
                }
            }
            Vec::new()
        }
        Msg::SearchDone { request_id, result } => {
            let Some(kind) = state.settle(request_id) else {
                return (state, Vec::new());
            };
            match result {
                Ok(hits) => {
                    state.replace_results(request_id, hits);
                }
                Err(failure) => {
                    state.write_status(request_id, failure_message(&failure, kind), true);
                }
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn failure_message(failure: &RequestFailure, kind: RequestKind) -> String {
    match failure {
        RequestFailure::Server {
            detail: Some(detail),
            ..
        } if !detail.is_empty() => detail.clone(),
        RequestFailure::Server { .. } => fallback_message(kind).to_string(),
        RequestFailure::Unexpected { message } => message.clone(),
    }
}

fn fallback_message(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::IngestText => TEXT_FALLBACK_MESSAGE,
        RequestKind::IngestFile => FILE_FALLBACK_MESSAGE,
        RequestKind::Search => SEARCH_FALLBACK_MESSAGE,
    }
}
