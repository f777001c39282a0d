use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use rag_core::DEFAULT_SOURCE_NAME;
use rag_engine::{SampleFormat, DEFAULT_API_BASE};

use crate::platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "rag-ingest")]
#[command(about = "Store text and files in a local RAG backend and try searches against it", long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "RAG_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,
    /// Give up connecting after this many seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    pub connect_timeout_secs: Option<u64>,
    /// Give up on a request after this many seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    pub request_timeout_secs: Option<u64>,
    /// Ignore responses that arrive after a newer request's response
    #[arg(long, global = true)]
    pub discard_stale: bool,
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File, global = true)]
    pub log: LogDestination,
    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info", value_parser = parse_level, global = true)]
    pub log_level: LevelFilter,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive shell with the text, file and search forms (default)
    Shell,
    /// Store a piece of text
    Text {
        /// Text to store, or - to read standard input
        text: String,
        /// Name recorded as the source of the text
        #[arg(short, long, default_value = DEFAULT_SOURCE_NAME)]
        source_name: String,
    },
    /// Upload a .md or .pdf file
    File {
        /// File to upload
        path: Option<PathBuf>,
    },
    /// Search stored content
    Search {
        /// Search query
        query: String,
    },
    /// Check that the backend answers
    Health,
    /// Upload sample files of several formats and report which ones are accepted
    SmokeUpload {
        /// Upload endpoint path
        #[arg(long, default_value = "/ingest/file")]
        endpoint: String,
        /// Multipart field name
        #[arg(long, default_value = "file")]
        field_name: String,
        /// Comma-separated extensions
        #[arg(long, value_delimiter = ',', default_value = "txt,json,csv,png,pdf")]
        formats: Vec<SampleFormat>,
        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10.0)]
        timeout_secs: f64,
    },
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level: {raw}"))
}
