#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the source name input.
    SourceNameChanged(String),
    /// User edited the text area.
    TextChanged(String),
    /// User picked a file, or cleared the selection.
    FileSelected(Option<crate::FileDraft>),
    /// User edited the search query.
    QueryChanged(String),
    /// User submitted the text form.
    SubmitTextClicked,
    /// User submitted the file form.
    SubmitFileClicked,
    /// User submitted the search form.
    SearchClicked,
    /// Engine completion for a text or file ingestion.
    IngestDone {
        request_id: crate::RequestId,
        result: Result<crate::IngestReceipt, crate::RequestFailure>,
    },
    /// Engine completion for a search.
    SearchDone {
        request_id: crate::RequestId,
        result: Result<Vec<crate::SearchHit>, crate::RequestFailure>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
