use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, ResultRowView};

pub type RequestId = u64;

/// Number of hits requested per search.
pub const SEARCH_LIMIT: u32 = 5;

/// Source name the text form starts with.
pub const DEFAULT_SOURCE_NAME: &str = "manual_input";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    IngestText,
    IngestFile,
    Search,
}

/// How completions that arrive out of submission order are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Every completion is applied as it arrives; the last one to arrive wins.
    #[default]
    CompletionOrder,
    /// A completion never overwrites output written for a newer request.
    LatestRequestWins,
}

/// A file picked for upload. Only the path is held; the engine reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDraft {
    path: PathBuf,
}

impl FileDraft {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReceipt {
    pub chunks: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub source_name: String,
    pub source_type: String,
    pub score: f64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Non-2xx response. `detail` is the server-provided message when present.
    Server { status: u16, detail: Option<String> },
    /// Transport errors, malformed bodies, unreadable files.
    Unexpected { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    source_name: String,
    text: String,
    file: Option<FileDraft>,
    query: String,
    status_message: Option<String>,
    results: Vec<SearchHit>,
    ordering: ResponseOrdering,
    next_request_id: RequestId,
    pending: BTreeMap<RequestId, RequestKind>,
    // Request that last wrote the status message / result list. Only consulted
    // under `ResponseOrdering::LatestRequestWins`.
    status_owner: RequestId,
    results_owner: RequestId,
    last_failed: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            text: String::new(),
            file: None,
            query: String::new(),
            status_message: None,
            results: Vec::new(),
            ordering: ResponseOrdering::default(),
            next_request_id: 1,
            pending: BTreeMap::new(),
            status_owner: 0,
            results_owner: 0,
            last_failed: false,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ordering(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            ..Self::default()
        }
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            source_name: self.source_name.clone(),
            text: self.text.clone(),
            selected_file: self.file.as_ref().map(FileDraft::display_name),
            query: self.query.clone(),
            status_message: self.status_message.clone(),
            results: self.results.iter().map(ResultRowView::from_hit).collect(),
            pending_requests: self.pending.len(),
            last_action_failed: self.last_failed,
        }
    }

    /// Returns whether the visible output changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    // Draft edits are echoed by the input itself, so they don't dirty the view.
    pub(crate) fn set_source_name(&mut self, value: String) {
        self.source_name = value;
    }

    pub(crate) fn set_text(&mut self, value: String) {
        self.text = value;
    }

    pub(crate) fn set_query(&mut self, value: String) {
        self.query = value;
    }

    pub(crate) fn select_file(&mut self, file: Option<FileDraft>) {
        self.file = file;
    }

    pub(crate) fn source_name(&self) -> &str {
        &self.source_name
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn selected_file(&self) -> Option<&FileDraft> {
        self.file.as_ref()
    }

    /// Allocates an id for a new request and records it as in flight.
    pub(crate) fn issue(&mut self, kind: RequestKind) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.insert(request_id, kind);
        request_id
    }

    /// Marks a request settled. Returns `None` for ids that were never issued
    /// or already settled.
    pub(crate) fn settle(&mut self, request_id: RequestId) -> Option<RequestKind> {
        self.pending.remove(&request_id)
    }

    /// Clears the status message on behalf of a newly issued request.
    pub(crate) fn clear_status(&mut self, request_id: RequestId) {
        self.claim_status(request_id);
        if self.status_message.take().is_some() {
            self.dirty = true;
        }
    }

    /// Takes ownership of the status message for a newly issued request
    /// without clearing it.
    pub(crate) fn claim_status(&mut self, request_id: RequestId) {
        self.status_owner = self.status_owner.max(request_id);
    }

    /// Shows a locally synthesized failure that no request produced.
    pub(crate) fn show_local_failure(&mut self, message: &str) {
        // Everything already in flight is older than this action.
        self.status_owner = self.next_request_id;
        self.status_message = Some(message.to_string());
        self.last_failed = true;
        self.dirty = true;
    }

    /// Writes the status message for a settled request, unless it is stale.
    pub(crate) fn write_status(&mut self, request_id: RequestId, message: String, failed: bool) {
        if self.is_stale(request_id, self.status_owner) {
            return;
        }
        self.status_owner = self.status_owner.max(request_id);
        self.status_message = Some(message);
        self.last_failed = failed;
        self.dirty = true;
    }

    /// Replaces the whole result list, unless the hits are stale.
    pub(crate) fn replace_results(&mut self, request_id: RequestId, hits: Vec<SearchHit>) {
        if self.is_stale(request_id, self.results_owner) {
            return;
        }
        self.results_owner = self.results_owner.max(request_id);
        self.results = hits;
        self.last_failed = false;
        self.dirty = true;
    }

    fn is_stale(&self, request_id: RequestId, owner: RequestId) -> bool {
        match self.ordering {
            ResponseOrdering::CompletionOrder => false,
            ResponseOrdering::LatestRequestWins => request_id < owner,
        }
    }
}
