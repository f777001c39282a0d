use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use rag_core::{update, AppState, AppViewModel, FileDraft, Msg};
use rag_engine::{EngineHandle, SampleFormat, SmokeSettings};
use rag_logging::{rag_info, rag_warn};

use super::effects::{self, EffectRunner};
use super::ui;
use crate::config::AppConfig;

const ONE_SHOT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the shell's main loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    Msg(Msg),
    Show,
    Help,
    Notice(String),
    Quit,
}

pub fn run_shell(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let runner = start_runner(config)?;
    let (tx, rx) = mpsc::channel::<ShellEvent>();
    runner.spawn_event_loop(tx.clone());
    ui::input::spawn_reader(tx);

    let mut out = io::stdout();
    write!(out, "{}", ui::layout::banner(&config.api.base_url))?;
    out.flush()?;

    let mut state = AppState::with_ordering(config.ordering);
    for event in rx {
        match event {
            ShellEvent::Msg(msg) => {
                let show_results = matches!(msg, Msg::SearchDone { .. });
                state = dispatch(state, msg, &runner);
                if state.consume_dirty() {
                    write!(
                        out,
                        "{}",
                        ui::render::render_output(&state.view(), show_results)
                    )?;
                }
            }
            ShellEvent::Show => write!(out, "{}", ui::render::render_page(&state.view()))?,
            ShellEvent::Help => write!(out, "{}", ui::layout::help())?,
            ShellEvent::Notice(text) => writeln!(out, "{text}")?,
            ShellEvent::Quit => break,
        }
        out.flush()?;
    }

    rag_info!("Shell closed");
    Ok(ExitCode::SUCCESS)
}

pub fn run_text(config: &AppConfig, source_name: String, text: String) -> anyhow::Result<ExitCode> {
    let text = if text == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading text from standard input")?;
        buffer
    } else {
        text
    };
    run_once(
        config,
        vec![
            Msg::SourceNameChanged(source_name),
            Msg::TextChanged(text),
            Msg::SubmitTextClicked,
        ],
        false,
    )
}

pub fn run_file(config: &AppConfig, path: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    run_once(
        config,
        vec![
            Msg::FileSelected(path.map(FileDraft::new)),
            Msg::SubmitFileClicked,
        ],
        false,
    )
}

pub fn run_search(config: &AppConfig, query: String) -> anyhow::Result<ExitCode> {
    run_once(
        config,
        vec![Msg::QueryChanged(query), Msg::SearchClicked],
        true,
    )
}

pub fn run_health(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let runner = start_runner(config)?;
    match runner.engine().health() {
        Ok(health) => {
            println!("{}: {}", config.api.base_url, health.status);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            rag_warn!("Health check failed: {}", err);
            eprintln!("{}: {}", config.api.base_url, err);
            Ok(ExitCode::FAILURE)
        }
    }
}

pub fn run_smoke_upload(
    config: &AppConfig,
    endpoint: String,
    field_name: String,
    formats: Vec<SampleFormat>,
    timeout_secs: f64,
) -> anyhow::Result<ExitCode> {
    let timeout = Duration::try_from_secs_f64(timeout_secs)
        .with_context(|| format!("invalid timeout: {timeout_secs}"))?;
    let settings = SmokeSettings {
        base_url: config.api.base_url.clone(),
        endpoint,
        field_name,
        formats,
        timeout,
    };

    let runner = start_runner(config)?;
    let report = runner
        .engine()
        .upload_smoke(settings)
        .context("running upload smoke check")?;
    print!("{}", ui::render::render_smoke_report(&report));

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Feeds `msgs` through the core, waits until nothing is in flight, prints the result.
fn run_once(config: &AppConfig, msgs: Vec<Msg>, show_results: bool) -> anyhow::Result<ExitCode> {
    let runner = start_runner(config)?;
    let mut state = AppState::with_ordering(config.ordering);
    for msg in msgs {
        state = dispatch(state, msg, &runner);
    }

    while state.has_pending() {
        let event = runner
            .engine()
            .recv_timeout(ONE_SHOT_POLL_INTERVAL)
            .context("waiting for the backend response")?;
        if let Some(event) = event {
            state = dispatch(state, effects::map_event(event), &runner);
        }
    }

    let view = state.view();
    print!("{}", ui::render::render_output(&view, show_results));
    Ok(exit_code(&view))
}

/// Non-zero when the last settled action failed.
fn exit_code(view: &AppViewModel) -> ExitCode {
    if view.last_action_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn start_runner(config: &AppConfig) -> anyhow::Result<EffectRunner> {
    let engine = EngineHandle::new(config.api.clone())
        .with_context(|| format!("starting request engine for {}", config.api.base_url))?;
    Ok(EffectRunner::new(engine))
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}
