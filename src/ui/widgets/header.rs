// src/ui/widgets/header.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled("DigitalSleuth", Style::new().bold().fg(Color::Cyan)),
        Span::raw(" - Your OSINT Aggregator Tool"),
    ]);
    let header = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(header, area);
}
