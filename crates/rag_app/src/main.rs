mod cli;
mod config;
mod platform;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    let config = config::AppConfig::from_cli(&cli);
    platform::logging::initialize(config.log_destination, config.log_level);
    platform::run_app(cli.command.unwrap_or(cli::Command::Shell), &config)
}
