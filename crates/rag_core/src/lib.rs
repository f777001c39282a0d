//! RAG ingest core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    AppState, FileDraft, IngestReceipt, RequestFailure, RequestId, RequestKind,
    ResponseOrdering, SearchHit, DEFAULT_SOURCE_NAME, SEARCH_LIMIT,
};
pub use update::{
    stored_chunks_message, update, FILE_FALLBACK_MESSAGE, NO_FILE_SELECTED_MESSAGE,
    SEARCH_FALLBACK_MESSAGE, TEXT_FALLBACK_MESSAGE,
};
pub use view_model::{format_score, AppViewModel, ResultRowView};
