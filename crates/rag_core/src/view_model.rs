use crate::SearchHit;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub source_name: String,
    pub text: String,
    pub selected_file: Option<String>,
    pub query: String,
    pub status_message: Option<String>,
    pub results: Vec<ResultRowView>,
    pub pending_requests: usize,
    pub last_action_failed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub source_name: String,
    pub source_type: String,
    /// Score with exactly three decimals.
    pub score: String,
    pub content: String,
}

impl ResultRowView {
    pub(crate) fn from_hit(hit: &SearchHit) -> Self {
        Self {
            source_name: hit.source_name.clone(),
            source_type: hit.source_type.clone(),
            score: format_score(hit.score),
            content: hit.content.clone(),
        }
    }
}

pub fn format_score(score: f64) -> String {
    format!("{score:.3}")
}
