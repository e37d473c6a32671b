// src/main.rs

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use color_eyre::eyre::{Result, WrapErr};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

mod app;
mod config;
mod core;
mod logging;
mod ui;

use crate::app::{App, AppState, MenuItem};
use crate::config::Config;
use crate::core::models::{Report, Session};
use crate::core::scanner::{Collectors, run_full_scan};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = Config::load().wrap_err("failed to load configuration")?;
    let log_path = logging::initialize_logging(&config.log_level)?;
    info!(log = %log_path.display(), "DigitalSleuth starting.");

    let collectors = Arc::new(Collectors::live(&config).wrap_err("failed to build HTTP clients")?);
    let session = Session::new(String::new(), config.shodan_api_key.clone().unwrap_or_default());
    let mut app = App::new(session, config.report_dir.clone());

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut app, collectors).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    info!("DigitalSleuth exiting.");
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    collectors: Arc<Collectors>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(1);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if handle_key(app, key.code) {
                        spawn_analysis(app.session.clone(), Arc::clone(&collectors), tx.clone());
                    }
                }
            }
        }

        if let Ok(report) = rx.try_recv() {
            app.finish_analysis(report);
        }
        app.on_tick();
    }
    Ok(())
}

/// Runs one analysis in the background and sends the report back to the UI loop.
fn spawn_analysis(session: Session, collectors: Arc<Collectors>, tx: mpsc::Sender<Report>) {
    tokio::spawn(async move {
        match run_full_scan(&collectors, &session).await {
            Ok(report) => {
                let _ = tx.send(report).await;
            }
            // The menu validates the session before getting here.
            Err(e) => error!(error = %e, "Analysis refused."),
        }
    });
}

/// Dispatches a key press for the current state. Returns `true` when an
/// analysis should be started.
fn handle_key(app: &mut App, key_code: KeyCode) -> bool {
    match app.state {
        AppState::Menu => handle_menu_input(app, key_code),
        AppState::EditingTarget | AppState::EditingCredential => {
            handle_editing_input(app, key_code);
            false
        }
        AppState::Analyzing => {
            if key_code == KeyCode::Char('q') {
                app.quit();
            }
            false
        }
        AppState::Finished => {
            handle_finished_input(app, key_code);
            false
        }
    }
}

fn handle_menu_input(app: &mut App, key_code: KeyCode) -> bool {
    match key_code {
        KeyCode::Char('q') => {
            app.quit();
            false
        }
        KeyCode::Char(c) => match MenuItem::from_shortcut(c) {
            Some(item) => app.activate(item),
            None => false,
        },
        KeyCode::Up => {
            app.select_previous();
            false
        }
        KeyCode::Down => {
            app.select_next();
            false
        }
        KeyCode::Enter => {
            let item = app.selected_item();
            app.activate(item)
        }
        _ => false,
    }
}

fn handle_editing_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => app.commit_input(),
        KeyCode::Esc => app.cancel_input(),
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('y') | KeyCode::Char('Y') => app.export(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.back_to_menu(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}
