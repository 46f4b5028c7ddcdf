//! TripMate terminal client entry point.

use clap::Parser;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tripmate_core::Route;
use tripmate_planner::RestClient;
use tripmate_tui::config::TuiConfig;
use tripmate_tui::error::TuiError;
use tripmate_tui::events::TuiEvent;
use tripmate_tui::persistence::{self, ClientState};
use tripmate_tui::state::{self, App};
use tripmate_tui::tasks::{Command, TaskRunner};
use tripmate_tui::telemetry;
use tripmate_tui::views::render_view;

#[derive(Debug, Parser)]
#[command(name = "tripmate", about = "Plan, customize and save trips from the terminal")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Route to open first, e.g. `/trip/new-york` or `/my-trips`.
    #[arg(long)]
    route: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let cli = Cli::parse();
    let config = TuiConfig::load(cli.config)?;
    telemetry::init_logging(&config.log_path)?;

    let stored = match persistence::load(&config.state_path) {
        Ok(state) => state.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(error = %err, path = %config.state_path.display(), "ignoring unreadable client state");
            ClientState::default()
        }
    };
    let initial = cli
        .route
        .as_deref()
        .map(Route::parse)
        .or_else(|| stored.route())
        .unwrap_or_default();

    let client = Arc::new(RestClient::new(&config.rest_settings())?);
    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let mut runner = TaskRunner::new(
        client.clone(),
        client.clone(),
        client,
        event_tx.clone(),
        config.progress_interval(),
    );

    let tick_rate = config.tick_rate();
    let mut app = App::new(config, stored, state::utc_today);
    tracing::info!(route = %initial.path(), "starting");

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    spawn_input_reader(event_tx.clone());
    let startup = app.startup(initial);
    dispatch(&mut app, &mut runner, startup);

    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.handle_event(TuiEvent::Tick);
            }
            Some(event) = event_rx.recv() => {
                let commands = app.handle_event(event);
                dispatch(&mut app, &mut runner, commands);
            }
        }

        if app.should_quit {
            break;
        }
    }

    persist(&app);
    tracing::info!("exiting");
    Ok(())
}

fn dispatch(app: &mut App, runner: &mut TaskRunner, commands: Vec<Command>) {
    for command in commands {
        match command {
            Command::PersistState => persist(app),
            other => runner.run(other),
        }
    }
}

fn persist(app: &App) {
    if let Err(err) = persistence::save(&app.config.state_path, &app.client_state()) {
        tracing::warn!(error = %err, "failed to save client state");
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}
