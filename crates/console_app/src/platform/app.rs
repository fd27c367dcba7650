use std::io::{self, Stdout};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use console_core::{update, AppState, Msg};
use console_engine::{AgentApi, ReqwestTransport};
use console_logging::{console_info, console_warn};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::config::{AppConfig, CONFIG_FILENAME, SERVER_ENV};
use super::effects::EffectRunner;
use super::input::{self, KeyOutcome, UiCursor};
use super::{logging, persistence, ui};

const INPUT_POLL: Duration = Duration::from_millis(50);
const CLOCK_TICK: Duration = Duration::from_secs(1);

type ConsoleTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load(Path::new(CONFIG_FILENAME))
        .with_context(|| format!("loading {CONFIG_FILENAME}"))?
        .with_server_override(std::env::var(SERVER_ENV).ok());

    logging::initialize(
        config.log_destination,
        console_logging::parse_level(&config.log_level),
    );
    console_info!("agent_console starting against {}", config.server_url);

    let settings = config
        .transport_settings()
        .context("configuring backend transport")?;
    let transport = ReqwestTransport::new(settings).context("building http client")?;
    let api = AgentApi::new(Arc::new(transport));

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(api, msg_tx.clone()).context("starting request engine")?;

    let state = match persistence::load_session(&config.state_dir) {
        Some(session) => AppState::restore(session),
        None => AppState::new(),
    };

    spawn_ticker(msg_tx.clone(), config.poll_interval(), || Msg::PollTick);
    spawn_ticker(msg_tx.clone(), CLOCK_TICK, || Msg::Tick);
    let _ = msg_tx.send(Msg::Started);

    let mut cleanup = TerminalCleanup::enter()?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).context("creating terminal")?;
    let outcome = event_loop(&mut terminal, state, &msg_rx, &runner);
    cleanup.disable();
    runner.shutdown();

    let state = outcome?;
    persistence::save_session(&config.state_dir, &state.session_snapshot());
    console_info!("agent_console stopped");
    Ok(())
}

fn spawn_ticker(msg_tx: mpsc::Sender<Msg>, interval: Duration, make: fn() -> Msg) {
    thread::spawn(move || {
        while msg_tx.send(make()).is_ok() {
            thread::sleep(interval);
        }
    });
}

fn event_loop(
    terminal: &mut ConsoleTerminal,
    mut state: AppState,
    msg_rx: &mpsc::Receiver<Msg>,
    runner: &EffectRunner,
) -> anyhow::Result<AppState> {
    let mut cursor = UiCursor::default();
    let mut redraw = true;

    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            // The clock in the status bar advances on ticks.
            if matches!(msg, Msg::Tick) {
                redraw = true;
            }
            state = dispatch(state, msg, runner);
        }
        if state.consume_dirty() {
            redraw = true;
        }

        if redraw {
            let view = state.view();
            cursor.clamp(&view);
            terminal
                .draw(|frame| ui::render::draw(frame, &view, &cursor))
                .context("drawing frame")?;
            redraw = false;
        }

        if !event::poll(INPUT_POLL).context("polling terminal input")? {
            continue;
        }
        let outcome = match event::read().context("reading terminal input")? {
            Event::Key(key) => input::map_key(key, &state.view(), &mut cursor),
            Event::Paste(text) => input::map_paste(&text, &state.view(), &cursor),
            Event::Resize(..) => Some(KeyOutcome::Redraw),
            _ => None,
        };
        match outcome {
            Some(KeyOutcome::Quit) => return Ok(state),
            Some(KeyOutcome::Dispatch(msg)) => {
                state = dispatch(state, msg, runner);
                redraw = true;
            }
            Some(KeyOutcome::Redraw) => redraw = true,
            None => {}
        }
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

/// Puts the terminal into raw/alternate-screen mode and restores it on drop,
/// including when the loop exits with an error.
struct TerminalCleanup {
    enabled: bool,
}

impl TerminalCleanup {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let cleanup = Self { enabled: true };
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)
            .context("entering alternate screen")?;
        Ok(cleanup)
    }

    fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        if let Err(err) = disable_raw_mode() {
            console_warn!("failed to leave raw mode: {err}");
        }
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
    }
}

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        self.disable();
    }
}
