// src/ui/mod.rs

use crate::app::{App, AppState};
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let layout = layout::create_layout(area);

    widgets::header::render_header(frame, layout.header);
    widgets::menu::render_menu(frame, app, layout.menu);
    widgets::analysis_view::render_analysis_view(frame, app, layout.report);
    widgets::summary::render_summary(frame, app, layout.summary);
    widgets::footer::render_footer(frame, app, layout.footer);

    // The input popup sits on top of everything else while editing.
    if matches!(app.state, AppState::EditingTarget | AppState::EditingCredential) {
        widgets::input::render_input(frame, app, area);
    }
}
