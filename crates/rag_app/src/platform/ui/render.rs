use rag_core::{AppViewModel, ResultRowView};
use rag_engine::SmokeReport;

use super::constants::TEXT_PREVIEW_CHARS;

/// The whole form: drafts, then whatever `render_output` shows.
pub fn render_page(view: &AppViewModel) -> String {
    let mut out = String::new();

    out.push_str("[Text]\n");
    out.push_str(&format!("  source: {}\n", view.source_name));
    out.push_str(&format!("  text:   {}\n", preview(&view.text)));

    out.push_str("[File (.md / .pdf)]\n");
    out.push_str(&format!(
        "  selected: {}\n",
        view.selected_file.as_deref().unwrap_or("(none)")
    ));

    out.push_str("[Search]\n");
    out.push_str(&format!("  query: {}\n", view.query));

    out.push_str(&render_output(view, true));
    out
}

/// Status message, then the result list when `show_results` is set.
pub fn render_output(view: &AppViewModel, show_results: bool) -> String {
    let mut out = String::new();

    if let Some(message) = &view.status_message {
        out.push_str(&format!("> {message}\n"));
    }

    if show_results {
        if view.results.is_empty() {
            out.push_str("Results: none\n");
        } else {
            out.push_str(&format!("Results ({}):\n", view.results.len()));
            for (idx, row) in view.results.iter().enumerate() {
                out.push_str(&format_result_row(idx + 1, row));
            }
        }
    }

    out
}

fn format_result_row(position: usize, row: &ResultRowView) -> String {
    let mut out = format!(
        "  {position}. {name} ({kind}) - score: {score}\n",
        name = row.source_name,
        kind = row.source_type,
        score = row.score
    );
    for line in row.content.lines() {
        out.push_str("     ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

pub fn render_smoke_report(report: &SmokeReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        if let Ok(status) = outcome.result {
            out.push_str(&format!("[PASS] {}: HTTP {}\n", outcome.format, status));
        }
    }

    if report.all_passed() {
        out.push_str("\n[OK] All upload checks passed.\n");
    } else {
        out.push_str("\n[FAIL] Upload checks failed:\n");
        for outcome in report.failures() {
            if let Err(reason) = &outcome.result {
                out.push_str(&format!("  - {}: {}\n", outcome.format, reason));
            }
        }
    }
    out
}

fn preview(text: &str) -> String {
    if text.is_empty() {
        return "(empty)".to_string();
    }
    let total = text.chars().count();
    let flat: String = text
        .chars()
        .take(TEXT_PREVIEW_CHARS)
        .map(|ch| if ch == '\n' { ' ' } else { ch })
        .collect();
    if total > TEXT_PREVIEW_CHARS {
        format!("{flat}... ({total} chars)")
    } else {
        format!("{flat} ({total} chars)")
    }
}
