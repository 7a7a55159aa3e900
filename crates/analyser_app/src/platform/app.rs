use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use analyser_core::{update, AppState, AppViewModel, Effect, Msg, PhaseLabel};
use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_debug, engine_info, level_with_verbosity};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{self, Command, HELP_TEXT};
use super::{logging, render};

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Core(Msg),
    ShowStatus,
    Quit,
}

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())
        .context("loading configuration")?
        .with_overrides(&cli)
        .context("applying command-line overrides")?;
    logging::initialize(
        config.log_destination,
        level_with_verbosity(config.log_level(), cli.verbose),
    );
    engine_info!(
        "Starting analyser_app base_url={} timeout={}s",
        config.base_url,
        config.request_timeout_secs
    );

    let (app_tx, app_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(config.upload_settings(), config.save_dir.clone(), app_tx.clone())
        .context("starting upload engine")?;

    let interactive = cli.is_interactive();
    if let Some(path) = &cli.file {
        let _ = app_tx.send(AppEvent::Core(Msg::FileSelected(
            input::selected_file_from_path(path),
        )));
        if !interactive {
            let _ = app_tx.send(AppEvent::Core(Msg::SubmitClicked));
        }
    }
    if interactive {
        println!("{HELP_TEXT}");
        spawn_stdin_reader(app_tx.clone()).context("starting input reader")?;
    }
    drop(app_tx);

    let mut session = Session::new(runner);
    let stdout = io::stdout();
    while let Ok(event) = app_rx.recv() {
        let settled = match event {
            AppEvent::Quit => break,
            AppEvent::ShowStatus => {
                let mut out = stdout.lock();
                write!(out, "{}", render::render_status(&session.state.view()))?;
                out.flush()?;
                false
            }
            AppEvent::Core(msg) => {
                let ends_attempt = ends_attempt(&msg);
                if let Some(text) = session.dispatch(msg) {
                    let mut out = stdout.lock();
                    write!(out, "{text}")?;
                    out.flush()?;
                }
                ends_attempt && session.is_settled()
            }
        };
        if settled && !interactive {
            break;
        }
    }

    Ok(ExitCode::from(session.exit_status(interactive)))
}

/// Submitting (even a no-op submit) or finishing an upload can end a one-shot run.
fn ends_attempt(msg: &Msg) -> bool {
    matches!(msg, Msg::SubmitClicked | Msg::UploadFinished { .. })
}

/// Where the session's effects go. The real runner drives the upload engine.
trait RunEffects {
    fn run(&self, effects: Vec<Effect>);
}

impl RunEffects for EffectRunner {
    fn run(&self, effects: Vec<Effect>) {
        EffectRunner::run(self, effects);
    }
}

/// Owns the state and the last rendered view, so output only shows changes.
struct Session<R: RunEffects> {
    state: AppState,
    runner: R,
    last_view: Option<AppViewModel>,
}

impl<R: RunEffects> Session<R> {
    fn new(runner: R) -> Self {
        Self {
            state: AppState::new(),
            runner,
            last_view: None,
        }
    }

    /// Applies `msg`, runs its effects and returns text to print, if any.
    fn dispatch(&mut self, msg: Msg) -> Option<String> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        self.runner.run(effects);

        if !was_dirty {
            return None;
        }
        let text = render::render(self.last_view.as_ref(), &view);
        self.last_view = Some(view);
        (!text.is_empty()).then_some(text)
    }

    fn is_settled(&self) -> bool {
        !self.state.is_uploading()
    }

    /// 0 on success; a one-shot run that ends any other way is 1.
    fn exit_status(&self, interactive: bool) -> u8 {
        match self.state.view().phase {
            PhaseLabel::Succeeded => 0,
            _ if interactive => 0,
            _ => 1,
        }
    }
}

fn spawn_stdin_reader(app_tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("analyser-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                let event = match input::parse_command(&line) {
                    Ok(Some(command)) => command_event(command),
                    Ok(None) => continue,
                    Err(message) => {
                        eprintln!("{message}. {HELP_TEXT}");
                        continue;
                    }
                };
                let Some(event) = event else {
                    println!("{HELP_TEXT}");
                    continue;
                };
                engine_debug!("Input event {:?}", event);
                let quit = matches!(event, AppEvent::Quit);
                if app_tx.send(event).is_err() || quit {
                    return;
                }
            }
            let _ = app_tx.send(AppEvent::Quit);
        })?;
    Ok(())
}

fn command_event(command: Command) -> Option<AppEvent> {
    let event = match command {
        Command::Select(path) => {
            AppEvent::Core(Msg::FileSelected(input::selected_file_from_path(&path)))
        }
        Command::Clear => AppEvent::Core(Msg::FileSelected(None)),
        Command::Submit => AppEvent::Core(Msg::SubmitClicked),
        Command::Cancel => AppEvent::Core(Msg::CancelClicked),
        Command::Status => AppEvent::ShowStatus,
        Command::Quit => AppEvent::Quit,
        Command::Help => return None,
    };
    Some(event)
}
