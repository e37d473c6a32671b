// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// The areas of the screen, computed once per frame.
pub struct AppLayout {
    pub header: Rect,
    pub menu: Rect,
    pub summary: Rect,
    pub report: Rect,
    pub footer: Rect,
}

/// Splits the frame into a header, a left column (menu over summary), the
/// report on the right and a one-line footer.
pub fn create_layout(frame_size: Rect) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(content_chunks[0]);

    AppLayout {
        header: main_chunks[0],
        menu: left_chunks[0],
        summary: left_chunks[1],
        report: content_chunks[1],
        footer: main_chunks[2],
    }
}

/// A rectangle centered in `r`, sized as a percentage of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
