use crate::{FileDraft, RequestId};

/// IO the core wants performed. Each variant maps to exactly one network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    IngestText {
        request_id: RequestId,
        source_name: String,
        text: String,
    },
    IngestFile {
        request_id: RequestId,
        file: FileDraft,
    },
    Search {
        request_id: RequestId,
        query: String,
        limit: u32,
    },
}

impl Effect {
    pub fn request_id(&self) -> RequestId {
        match self {
            Effect::IngestText { request_id, .. }
            | Effect::IngestFile { request_id, .. }
            | Effect::Search { request_id, .. } => *request_id,
        }
    }
}
