use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use rag_core::{FileDraft, Msg};
use rag_logging::rag_warn;

use super::constants::*;
use crate::platform::app::ShellEvent;

/// Turns shell lines into events. Holds the multi-line text draft in progress.
#[derive(Debug, Default)]
pub struct LineParser {
    multiline: Option<Vec<String>>,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Result<Vec<ShellEvent>, String> {
        if let Some(lines) = self.multiline.as_mut() {
            if line.trim_end() == MULTILINE_TERMINATOR {
                let text = lines.join("\n");
                self.multiline = None;
                return Ok(vec![ShellEvent::Msg(Msg::TextChanged(text))]);
            }
            lines.push(line.to_string());
            return Ok(Vec::new());
        }

        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        let events = match command {
            "" => Vec::new(),
            CMD_SOURCE => vec![msg(Msg::SourceNameChanged(rest.to_string()))],
            CMD_TEXT if rest.is_empty() => {
                self.multiline = Some(Vec::new());
                Vec::new()
            }
            CMD_TEXT => vec![msg(Msg::TextChanged(rest.to_string()))],
            CMD_FILE if rest.is_empty() => vec![msg(Msg::FileSelected(None))],
            CMD_FILE => vec![msg(Msg::FileSelected(Some(FileDraft::new(rest))))],
            CMD_QUERY => vec![msg(Msg::QueryChanged(rest.to_string()))],
            CMD_SAVE_TEXT => vec![msg(Msg::SubmitTextClicked)],
            CMD_SAVE_FILE => vec![msg(Msg::SubmitFileClicked)],
            CMD_SEARCH if rest.is_empty() => vec![msg(Msg::SearchClicked)],
            CMD_SEARCH => vec![
                msg(Msg::QueryChanged(rest.to_string())),
                msg(Msg::SearchClicked),
            ],
            CMD_SHOW => vec![ShellEvent::Show],
            CMD_HELP => vec![ShellEvent::Help],
            CMD_QUIT | CMD_EXIT => vec![ShellEvent::Quit],
            other => {
                return Err(format!(
                    "Unknown command `{other}`. Type `{CMD_HELP}` for the list."
                ))
            }
        };
        Ok(events)
    }

    pub fn in_multiline(&self) -> bool {
        self.multiline.is_some()
    }
}

fn msg(msg: Msg) -> ShellEvent {
    ShellEvent::Msg(msg)
}

/// Reads stdin on its own thread so the shell stays responsive while requests run.
pub fn spawn_reader(tx: mpsc::Sender<ShellEvent>) {
    thread::spawn(move || {
        let mut parser = LineParser::new();
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    rag_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            let events = match parser.feed(&line) {
                Ok(events) => events,
                Err(notice) => vec![ShellEvent::Notice(notice)],
            };
            for event in events {
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
        if parser.in_multiline() {
            rag_warn!("Input closed inside a multi-line text; draft discarded");
        }
        let _ = tx.send(ShellEvent::Quit);
    });
}
