//! Terminal platform: wires the pure core to the request engine and the console.
pub mod app;
pub mod effects;
pub mod logging;
pub mod ui;

use std::process::ExitCode;

use crate::cli::Command;
use crate::config::AppConfig;

pub fn run_app(command: Command, config: &AppConfig) -> anyhow::Result<ExitCode> {
    match command {
        Command::Shell => app::run_shell(config),
        Command::Text { text, source_name } => app::run_text(config, source_name, text),
        Command::File { path } => app::run_file(config, path),
        Command::Search { query } => app::run_search(config, query),
        Command::Health => app::run_health(config),
        Command::SmokeUpload {
            endpoint,
            field_name,
            formats,
            timeout_secs,
        } => app::run_smoke_upload(config, endpoint, field_name, formats, timeout_secs),
    }
}
