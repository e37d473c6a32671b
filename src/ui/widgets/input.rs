// src/ui/widgets/input.rs

use crate::app::{App, AppState};
use crate::ui::layout::centered_rect;
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Renders the popup input box used to edit the target or the API key.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.state {
        AppState::EditingCredential => "Enter your Shodan API key (Enter to save, Esc to cancel)",
        _ => "Enter the target domain (Enter to save, Esc to cancel)",
    };

    let horizontal = centered_rect(60, 100, area);
    let popup = Rect {
        y: area.y + area.height.saturating_sub(3) / 2,
        height: area.height.min(3),
        ..horizontal
    };

    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Yellow));

    // Clear first so the report underneath does not bleed through.
    frame.render_widget(Clear, popup);
    frame.render_widget(input_paragraph, popup);
    frame.set_cursor_position(Position::new(
        popup.x + app.input.chars().count() as u16 + 1,
        popup.y + 1,
    ));
}
