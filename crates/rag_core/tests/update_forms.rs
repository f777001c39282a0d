use std::sync::Once;

use pretty_assertions::assert_eq;
use rag_core::{
    update, AppState, Effect, FileDraft, IngestReceipt, Msg, RequestFailure, SearchHit,
    DEFAULT_SOURCE_NAME, FILE_FALLBACK_MESSAGE, NO_FILE_SELECTED_MESSAGE, SEARCH_FALLBACK_MESSAGE,
    SEARCH_LIMIT, TEXT_FALLBACK_MESSAGE,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rag_logging::initialize_for_tests);
}

fn submit_text(state: AppState, source_name: &str, text: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::SourceNameChanged(source_name.to_string()));
    let (state, _) = update(state, Msg::TextChanged(text.to_string()));
    update(state, Msg::SubmitTextClicked)
}

fn run_search(state: AppState, query: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::QueryChanged(query.to_string()));
    update(state, Msg::SearchClicked)
}

fn hit(name: &str, kind: &str, score: f64) -> SearchHit {
    SearchHit {
        source_name: name.to_string(),
        source_type: kind.to_string(),
        score,
        content: format!("content of {name}"),
    }
}

#[test]
fn draft_starts_with_default_source_name() {
    let view = AppState::new().view();
    assert_eq!(view.source_name, DEFAULT_SOURCE_NAME);
    assert_eq!(view.status_message, None);
    assert!(view.results.is_empty());
}

#[test]
fn submit_text_emits_one_effect_with_draft_values() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "notes", "hello world");

    assert_eq!(
        effects,
        vec![Effect::IngestText {
            request_id: 1,
            source_name: "notes".to_string(),
            text: "hello world".to_string(),
        }]
    );
    assert!(state.has_pending());
}

#[test]
fn submit_text_sends_empty_text_unvalidated() {
    init_logging();
    let (_state, effects) = submit_text(AppState::new(), "notes", "");

    assert_eq!(effects.len(), 1);
    assert!(matches!(&effects[0], Effect::IngestText { text, .. } if text.is_empty()));
}

#[test]
fn ingest_success_reports_chunk_count() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "notes", "hello");
    let request_id = effects[0].request_id();

    let (mut state, effects) = update(
        state,
        Msg::IngestDone {
            request_id,
            result: Ok(IngestReceipt { chunks: 7 }),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.status_message.as_deref().unwrap().contains('7'));
    assert!(!view.last_action_failed);
    assert_eq!(view.pending_requests, 0);
    assert!(state.consume_dirty());
}

#[test]
fn submit_text_clears_previous_status() {
    init_logging();
    let (state, effects) = submit_text(AppState::new(), "notes", "a");
    let (state, _) = update(
        state,
        Msg::IngestDone {
            request_id: effects[0].request_id(),
            result: Ok(IngestReceipt { chunks: 1 }),
        },
    );
    assert!(state.view().status_message.is_some());

    let (state, _) = update(state, Msg::SubmitTextClicked);
    assert_eq!(state.view().status_message, None);
}

#[test]
fn submit_file_without_selection_fails_locally() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::SubmitFileClicked);

    assert!(effects.is_empty());
    assert!(!state.has_pending());
    let view = state.view();
    assert_eq!(view.status_message.as_deref(), Some(NO_FILE_SELECTED_MESSAGE));
    assert!(view.last_action_failed);
    assert!(state.consume_dirty());
}

#[test]
fn submit_file_with_selection_emits_upload() {
    init_logging();
    let draft = FileDraft::new("docs/guide.md");
    let (state, _) = update(AppState::new(), Msg::FileSelected(Some(draft.clone())));
    assert_eq!(state.view().selected_file.as_deref(), Some("guide.md"));

    let (state, effects) = update(state, Msg::SubmitFileClicked);
    assert_eq!(
        effects,
        vec![Effect::IngestFile {
            request_id: 1,
            file: draft,
        }]
    );

    // Clearing the selection brings back the local precondition failure.
    let (state, _) = update(state, Msg::FileSelected(None));
    let (state, effects) = update(state, Msg::SubmitFileClicked);
    assert!(effects.is_empty());
    assert_eq!(
        state.view().status_message.as_deref(),
        Some(NO_FILE_SELECTED_MESSAGE)
    );
}

#[test]
fn search_uses_fixed_limit_and_replaces_results() {
    init_logging();
    let (state, effects) = run_search(AppState::new(), "what is rust");
    assert_eq!(
        effects,
        vec![Effect::Search {
            request_id: 1,
            query: "what is rust".to_string(),
            limit: SEARCH_LIMIT,
        }]
    );
    assert_eq!(SEARCH_LIMIT, 5);

    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: 1,
            result: Ok(vec![hit("a.md", "markdown", 0.91234), hit("b.pdf", "pdf", 0.5)]),
        },
    );
    let view = state.view();
    assert_eq!(view.results.len(), 2);
    assert_eq!(view.results[0].source_name, "a.md");
    assert_eq!(view.results[0].source_type, "markdown");
    assert_eq!(view.results[0].score, "0.912");
    assert_eq!(view.results[1].score, "0.500");

    // A second search replaces, never appends.
    let (state, effects) = run_search(state, "again");
    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: effects[0].request_id(),
            result: Ok(vec![hit("c.md", "markdown", 0.1)]),
        },
    );
    let names: Vec<_> = state
        .view()
        .results
        .iter()
        .map(|row| row.source_name.clone())
        .collect();
    assert_eq!(names, vec!["c.md".to_string()]);
}

#[test]
fn search_with_empty_response_renders_no_rows() {
    init_logging();
    let (state, _) = run_search(AppState::new(), "q");
    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: 1,
            result: Ok(Vec::new()),
        },
    );
    let view = state.view();
    assert!(view.results.is_empty());
    assert_eq!(view.status_message, None);
    assert!(!view.last_action_failed);
}

#[test]
fn search_does_not_clear_status() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SubmitFileClicked);
    let (state, _) = run_search(state, "q");
    assert_eq!(
        state.view().status_message.as_deref(),
        Some(NO_FILE_SELECTED_MESSAGE)
    );
}

#[test]
fn server_detail_is_shown_verbatim() {
    init_logging();
    let (state, _) = submit_text(AppState::new(), "notes", "");
    let (state, _) = update(
        state,
        Msg::IngestDone {
            request_id: 1,
            result: Err(RequestFailure::Server {
                status: 400,
                detail: Some("Empty text after cleanup".to_string()),
            }),
        },
    );
    let view = state.view();
    assert_eq!(
        view.status_message.as_deref(),
        Some("Empty text after cleanup")
    );
    assert!(view.last_action_failed);
}

#[test]
fn missing_detail_falls_back_per_endpoint() {
    init_logging();
    let failure = || RequestFailure::Server {
        status: 500,
        detail: None,
    };

    let (state, _) = submit_text(AppState::new(), "notes", "x");
    let (state, _) = update(
        state,
        Msg::IngestDone {
            request_id: 1,
            result: Err(failure()),
        },
    );
    assert_eq!(
        state.view().status_message.as_deref(),
        Some(TEXT_FALLBACK_MESSAGE)
    );

    let (state, _) = update(state, Msg::FileSelected(Some(FileDraft::new("a.pdf"))));
    let (state, _) = update(state, Msg::SubmitFileClicked);
    let (state, _) = update(
        state,
        Msg::IngestDone {
            request_id: 2,
            result: Err(failure()),
        },
    );
    assert_eq!(
        state.view().status_message.as_deref(),
        Some(FILE_FALLBACK_MESSAGE)
    );

    let (state, _) = run_search(state, "q");
    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: 3,
            result: Err(failure()),
        },
    );
    assert_eq!(
        state.view().status_message.as_deref(),
        Some(SEARCH_FALLBACK_MESSAGE)
    );
}

#[test]
fn empty_detail_also_falls_back() {
    init_logging();
    let (state, _) = run_search(AppState::new(), "q");
    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: 1,
            result: Err(RequestFailure::Server {
                status: 502,
                detail: Some(String::new()),
            }),
        },
    );
    assert_eq!(
        state.view().status_message.as_deref(),
        Some(SEARCH_FALLBACK_MESSAGE)
    );
}

#[test]
fn failed_search_keeps_previous_results() {
    init_logging();
    let (state, _) = run_search(AppState::new(), "q");
    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: 1,
            result: Ok(vec![hit("a.md", "markdown", 0.7)]),
        },
    );
    let (state, _) = run_search(state, "q2");
    let (state, _) = update(
        state,
        Msg::SearchDone {
            request_id: 2,
            result: Err(RequestFailure::Unexpected {
                message: "connection refused".to_string(),
            }),
        },
    );
    let view = state.view();
    assert_eq!(view.results.len(), 1);
    assert_eq!(view.status_message.as_deref(), Some("connection refused"));
}

#[test]
fn unknown_completion_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (mut next, effects) = update(
        state.clone(),
        Msg::IngestDone {
            request_id: 42,
            result: Ok(IngestReceipt { chunks: 3 }),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(next.view(), state.view());
    assert!(!next.consume_dirty());
}
