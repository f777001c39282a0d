use rag_core::{DEFAULT_SOURCE_NAME, SEARCH_LIMIT};

use super::constants::*;

pub fn banner(base_url: &str) -> String {
    format!(
        "Local RAG Ingest\nBackend: {base_url}\nType `{CMD_HELP}` for commands, `{CMD_QUIT}` to leave.\n"
    )
}

pub fn help() -> String {
    let mut out = String::new();

    out.push_str("Text\n");
    out.push_str(&format!("  {CMD_SOURCE} <name>      source name for the text (default: {DEFAULT_SOURCE_NAME})\n"));
    out.push_str(&format!("  {CMD_TEXT} <line>        set the text to one line\n"));
    out.push_str(&format!(
        "  {CMD_TEXT}               enter several lines, finish with a line holding only `{MULTILINE_TERMINATOR}`\n"
    ));
    out.push_str(&format!("  {CMD_SAVE_TEXT}          store the text\n"));

    out.push_str("File (.md / .pdf)\n");
    out.push_str(&format!("  {CMD_FILE} <path>        select a file\n"));
    out.push_str(&format!("  {CMD_FILE}               clear the selection\n"));
    out.push_str(&format!("  {CMD_SAVE_FILE}          store the selected file\n"));

    out.push_str("Search check\n");
    out.push_str(&format!("  {CMD_QUERY} <text>       set the question\n"));
    out.push_str(&format!("  {CMD_SEARCH} [text]      search (top {SEARCH_LIMIT})\n"));

    out.push_str("Other\n");
    out.push_str(&format!("  {CMD_SHOW}               show the whole form\n"));
    out.push_str(&format!("  {CMD_HELP}               this list\n"));
    out.push_str(&format!("  {CMD_QUIT} | {CMD_EXIT}        leave\n"));

    out
}
