//! chatsheet - Terminal Spreadsheet with an AI Assistant
//!
//! Edits spreadsheets in the terminal and lets an assistant propose new ones,
//! which are previewed and only created once the user accepts them.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chatsheet::application::{App, AppMode};
use chatsheet::infrastructure::{
    Config, FileLogger, FileMessenger, HostBridge, HostMessenger, HttpAssistant, default_log_path,
};
use chatsheet::presentation::{InputHandler, render_ui, viewport_for};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

/// How long the event loop waits for a key before checking on the assistant.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn init_logging(config: &Config) {
    let Some(path) = config.log_file.clone().or_else(default_log_path) else {
        return;
    };
    match FileLogger::open(&path, config.log_level) {
        Ok(logger) => {
            if logger.install().is_ok() {
                log::info!("Logging to {}", path.display());
            }
        }
        Err(e) => eprintln!("Could not open log file {}: {}", path.display(), e),
    }
}

fn host_bridge(config: &Config) -> HostBridge {
    let messenger = config.host_channel.as_ref().and_then(|path| {
        match FileMessenger::open(path) {
            Ok(messenger) => Some(Box::new(messenger) as Box<dyn HostMessenger>),
            Err(e) => {
                log::warn!("Host channel {} unavailable: {}", path.display(), e);
                None
            }
        }
    });
    if messenger.is_none() {
        log::info!("Running without a host shell");
    }
    HostBridge::new(messenger)
}

/// Entry point for the chatsheet terminal spreadsheet.
///
/// Reads configuration, sets up logging, the host bridge and the assistant
/// client, then runs the event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_logging(&config);

    let assistant = HttpAssistant::new(config.runtime_url.clone());
    log::info!("Assistant runtime at {}", assistant.url());
    let mut app = App::new(host_bridge(&config), Some(Arc::new(assistant)), config.sidebar_open);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("Event loop failed: {}", err);
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Renders the UI, forwards key presses to the input handler and picks up
/// finished assistant exchanges between key presses. Returns when the user
/// presses 'q' in normal mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        let (rows, cols) = viewport_for(size.width, size.height, app.chat.visible);
        app.update_viewport_size(rows, cols);

        terminal.draw(|f| render_ui(f, app))?;

        app.poll_assistant();

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if app.mode == AppMode::Normal => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
