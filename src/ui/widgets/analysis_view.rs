// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, ExportStatus, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

/// Renders the report pane: a placeholder, the spinner while an analysis
/// runs, or the pretty-printed report once it is finished.
pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Analysis Results (Navigate with ↑ ↓)");

    if app.state != AppState::Finished {
        let content = match app.state {
            AppState::Analyzing => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw("Analyzing "),
                    Span::styled(app.session.target.as_str(), Style::default().fg(Color::Yellow)),
                    Span::raw("..."),
                ]))
                .alignment(Alignment::Center)
            }
            _ => Paragraph::new("Set a target and an API key, then run the analysis.")
                .alignment(Alignment::Center),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner_area);

    let lines: Vec<Line> = app.report_json.lines().map(highlight_json_line).collect();
    let report = Paragraph::new(lines).scroll((app.scroll_offset as u16, 0));
    frame.render_widget(report, chunks[0]);

    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        chunks[0],
        &mut app.report_scroll_state,
    );

    let export_line = match &app.export_status {
        ExportStatus::Idle => Line::from(""),
        ExportStatus::Success(message) => Line::from(message.as_str()).style(Style::default().fg(Color::Green)),
        ExportStatus::Error(message) => Line::from(message.as_str()).style(Style::default().fg(Color::Red)),
    };
    frame.render_widget(Paragraph::new(export_line), chunks[1]);
}

// Keys in cyan, everything else as-is.
fn highlight_json_line(line: &str) -> Line<'_> {
    let indent = line.len() - line.trim_start().len();
    let rest = &line[indent..];
    if rest.starts_with('"') {
        if let Some(end) = rest.find("\": ") {
            let (key, value) = rest.split_at(end + 1);
            return Line::from(vec![
                Span::raw(&line[..indent]),
                Span::styled(key, Style::default().fg(Color::Cyan)),
                Span::raw(value),
            ]);
        }
    }
    Line::from(line)
}
