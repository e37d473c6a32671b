// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use crate::core::knowledge_base::{self, Severity};
use crate::core::models::Flag;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Renders the session state and, once an analysis is finished, the flags
/// it raised with a short explanation of each.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Summary");

    let set_or_not = |value: &str, shown: String| {
        if value.is_empty() {
            Span::styled("not set", Style::default().fg(Color::Red))
        } else {
            Span::styled(shown, Style::default().fg(Color::Green))
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Target:  "),
            set_or_not(&app.session.target, app.session.target.clone()),
        ]),
        Line::from(vec![
            Span::raw("API key: "),
            set_or_not(&app.session.credential, mask(&app.session.credential)),
        ]),
        Line::from(""),
    ];

    if app.state == AppState::Finished {
        if let Some(report) = &app.report {
            lines.push(Line::from("FLAGS".bold()));
            if report.vulnerabilities.is_empty() {
                lines.push(Line::from("No flags raised.").style(Style::default().fg(Color::Green)));
            }
            for flag in &report.vulnerabilities {
                let detail = knowledge_base::detail_for(flag);
                let style = match detail.map(|d| d.severity) {
                    Some(Severity::Critical) => Style::default().fg(Color::Red),
                    Some(Severity::Warning) => Style::default().fg(Color::Yellow),
                    _ => Style::default().fg(Color::Cyan),
                };
                let category = detail.map(|d| format!("[{}] ", d.category)).unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled(category, Style::default().fg(Color::DarkGray)),
                    Span::styled(flag_heading(flag), style.bold()),
                ]));
                if let Some(detail) = detail {
                    lines.push(Line::from(Span::styled(format!("  {}", flag), style)));
                    lines.push(Line::from(format!("  {}", detail.description)));
                    lines.push(Line::from(vec![
                        Span::styled("  Fix: ", Style::default().fg(Color::Yellow)),
                        Span::raw(detail.remediation),
                    ]));
                }
            }
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// Knowledge base title, or the flag text when no entry exists.
fn flag_heading(flag: &Flag) -> String {
    knowledge_base::detail_for(flag)
        .map(|d| d.title.to_string())
        .unwrap_or_else(|| flag.to_string())
}

// Shows only the last four characters of the key.
fn mask(key: &str) -> String {
    let count = key.chars().count();
    let visible: String = key.chars().skip(count.saturating_sub(4)).collect();
    format!("{}{}", "*".repeat(count.saturating_sub(4)), visible)
}

#[cfg(test)]
mod tests {
    use super::{flag_heading, mask};
    use crate::core::models::Flag;

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask("abcdefgh"), "****efgh");
        assert_eq!(mask("abc"), "abc");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn flags_are_headed_by_their_title() {
        assert_eq!(flag_heading(&Flag::ExpirationApproaching), "Domain Registration Expiring");
        assert_eq!(flag_heading(&Flag::ExposedServices(2)), "Services Exposed to the Internet");
    }
}
