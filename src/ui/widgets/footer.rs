// src/ui/widgets/footer.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::new().bold().fg(Color::Yellow));
    let spans = match app.state {
        AppState::Menu => Line::from(vec![
            key("1-4"),
            Span::raw(" or "),
            key("↑ ↓ Enter"),
            Span::raw(" to choose, "),
            key("Q"),
            Span::raw(" to quit."),
        ]),
        AppState::EditingTarget | AppState::EditingCredential => Line::from(vec![
            key("Enter"),
            Span::raw(" to save, "),
            key("Esc"),
            Span::raw(" to cancel."),
        ]),
        AppState::Analyzing => Line::from("Analyzing... Press Q to quit."),
        AppState::Finished => Line::from(vec![
            Span::raw("Save these results to a file? "),
            key("[Y]"),
            Span::raw("es, "),
            key("[N]"),
            Span::raw("o / back to menu, "),
            key("↑ ↓"),
            Span::raw(" scroll, "),
            key("[Q]"),
            Span::raw("uit"),
        ]),
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
