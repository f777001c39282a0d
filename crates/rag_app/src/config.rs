use std::time::Duration;

use log::LevelFilter;
use rag_core::ResponseOrdering;
use rag_engine::ApiSettings;

use crate::cli::Cli;
use crate::platform::logging::LogDestination;

/// Everything the app needs to know, resolved from flags and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub ordering: ResponseOrdering,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let ordering = if cli.discard_stale {
            ResponseOrdering::LatestRequestWins
        } else {
            ResponseOrdering::CompletionOrder
        };

        Self {
            api: ApiSettings {
                base_url: cli.api_base.clone(),
                connect_timeout: cli.connect_timeout_secs.map(Duration::from_secs),
                request_timeout: cli.request_timeout_secs.map(Duration::from_secs),
            },
            ordering,
            log_destination: cli.log,
            log_level: cli.log_level,
        }
    }
}
