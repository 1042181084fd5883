//! TCALC - Terminal Calculation Sheet
//!
//! A terminal calculation sheet with free-text row labels, numeric columns
//! and live column totals. Sheets are saved as JSON snapshots and can be
//! exchanged as CSV.

use std::io;
use std::path::Path;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use tcalc::application::{App, AppMode};
use tcalc::infrastructure::{init_logging, Config, FileRepository};
use tcalc::presentation::{render_ui, InputHandler};

/// Entry point for the tcalc terminal calculation sheet.
///
/// Parses the command line, sets up logging and the terminal, optionally
/// loads the sheet named on the command line, and runs the event loop until
/// the user quits.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened, the column count is
/// invalid, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_logging(config.log_file.as_deref())?;

    let mut app = App::new(config.columns)?;
    if let Some(filename) = config.filename() {
        if Path::new(&filename).exists() {
            let result = FileRepository::load_snapshot(&filename);
            app.set_startup_load_result(filename, result);
        } else {
            app.start_new_file(filename);
        }
    }
    tracing::info!(columns = config.columns, "starting tcalc");

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
        tracing::warn!(error = %err, "terminal error");
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Handles terminal rendering and keyboard input processing.
/// Continues running until the user presses 'q' in normal mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

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
