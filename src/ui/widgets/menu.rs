// src/ui/widgets/menu.rs

use crate::app::{App, AppState, MenuItem, StatusMessage};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Renders the numbered main menu and, on its last line, the latest status message.
pub fn render_menu(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Main Menu");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);

    let enabled = app.state == AppState::Menu;
    let items: Vec<ListItem> = MenuItem::all()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if enabled { Style::default() } else { Style::default().fg(Color::DarkGray) };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(item.to_string(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[0], &mut app.menu_state);

    if let Some(status) = &app.status {
        let line = match status {
            StatusMessage::Info(text) => Line::from(text.as_str()).style(Style::default().fg(Color::Green)),
            StatusMessage::Error(text) => Line::from(text.as_str()).style(Style::default().fg(Color::Red)),
        };
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), chunks[1]);
    }
}
