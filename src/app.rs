// src/app.rs

use std::path::PathBuf;

use ratatui::widgets::{ListState, ScrollbarState};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{info, warn};

use crate::core::models::{Report, Session};
use crate::core::report;

pub const SPINNER_CHARS: [char; 4] = ['|', '/', '-', '\\'];

/// The four commands of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MenuItem {
    #[strum(to_string = "Set target domain")]
    SetTarget,
    #[strum(to_string = "Set Shodan API key")]
    SetCredential,
    #[strum(to_string = "Run analysis")]
    RunAnalysis,
    #[strum(to_string = "Exit")]
    Exit,
}

impl MenuItem {
    pub fn all() -> Vec<MenuItem> {
        MenuItem::iter().collect()
    }

    /// Maps the `1`-`4` shortcut keys to menu entries.
    pub fn from_shortcut(c: char) -> Option<MenuItem> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        MenuItem::iter().nth(index as usize)
    }
}

pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    EditingTarget,
    EditingCredential,
    Analyzing,
    Finished,
}

/// A one-line message shown under the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub session: Session,
    pub menu_state: ListState,
    pub status: Option<StatusMessage>,
    pub report: Option<Report>,
    pub report_json: String,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub export_status: ExportStatus,
    pub spinner_frame: usize,
    pub report_dir: PathBuf,
}

impl App {
    pub fn new(session: Session, report_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            state: AppState::Menu,
            input: String::new(),
            session,
            menu_state: ListState::default().with_selected(Some(0)),
            status: None,
            report: None,
            report_json: String::new(),
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            export_status: ExportStatus::Idle,
            spinner_frame: 0,
            report_dir,
        }
    }

    pub fn selected_item(&self) -> MenuItem {
        let items = MenuItem::all();
        let index = self.menu_state.selected().unwrap_or(0).min(items.len() - 1);
        items[index]
    }

    pub fn select_next(&mut self) {
        let len = MenuItem::all().len();
        let next = (self.menu_state.selected().unwrap_or(0) + 1) % len;
        self.menu_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        let len = MenuItem::all().len();
        let current = self.menu_state.selected().unwrap_or(0);
        self.menu_state.select(Some((current + len - 1) % len));
    }

    /// Applies a menu command. Returns `true` when the caller should start
    /// an analysis of `self.session`.
    pub fn activate(&mut self, item: MenuItem) -> bool {
        self.status = None;
        match item {
            MenuItem::SetTarget => {
                self.input = self.session.target.clone();
                self.state = AppState::EditingTarget;
            }
            MenuItem::SetCredential => {
                self.input.clear();
                self.state = AppState::EditingCredential;
            }
            MenuItem::RunAnalysis => return self.start_analysis(),
            MenuItem::Exit => self.quit(),
        }
        false
    }

    /// Stores the edited value in the session and returns to the menu.
    pub fn commit_input(&mut self) {
        let value = std::mem::take(&mut self.input);
        match self.state {
            AppState::EditingTarget => {
                self.session.target = normalize_target(&value);
                info!(target = %self.session.target, "Target set.");
                self.status = Some(StatusMessage::Info(format!("Target set to: {}", self.session.target)));
            }
            AppState::EditingCredential => {
                self.session.credential = value.trim().to_string();
                info!("Shodan API key set.");
                self.status = Some(StatusMessage::Info("Shodan API key set successfully".to_string()));
            }
            _ => {}
        }
        self.state = AppState::Menu;
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.state = AppState::Menu;
    }

    fn start_analysis(&mut self) -> bool {
        if let Err(e) = self.session.validate() {
            warn!(error = %e, "Analysis precondition not met.");
            self.status = Some(StatusMessage::Error(e.to_string()));
            return false;
        }
        self.state = AppState::Analyzing;
        self.spinner_frame = 0;
        true
    }

    pub fn finish_analysis(&mut self, report: Report) {
        self.report_json = match report::to_pretty_json(&report) {
            Ok(json) => json,
            Err(e) => e.to_string(),
        };
        self.report = Some(report);
        self.state = AppState::Finished;
        self.scroll_offset = 0;
        self.report_scroll_state =
            ScrollbarState::new(self.report_json.lines().count()).position(0);
        self.export_status = ExportStatus::Idle;
    }

    /// Saves the current report into `report_dir`.
    pub fn export(&mut self) {
        let Some(report) = &self.report else { return };
        self.export_status = match report::save(report, &self.session.target, &self.report_dir) {
            Ok(path) => ExportStatus::Success(format!("Results saved to {}", path.display())),
            Err(e) => ExportStatus::Error(e.to_string()),
        };
    }

    /// Drops the finished report and goes back to the menu.
    pub fn back_to_menu(&mut self) {
        self.report = None;
        self.report_json.clear();
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
        self.export_status = ExportStatus::Idle;
        self.state = AppState::Menu;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        let max = self.report_json.lines().count().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(1).min(max);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Analyzing {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Trims the operator's input and, when a URL was pasted, drops the scheme,
/// credentials and path. The host is otherwise kept exactly as typed.
pub fn normalize_target(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
        .to_string()
}
