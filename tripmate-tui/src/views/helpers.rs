//! Common view rendering helpers.

use crate::form::TextField;
use crate::state::App;
use crate::theme::activity_kind_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tripmate_core::Itinerary;

/// A rectangle of the given percentage size, centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Clear `area` and draw a bordered text box over it.
pub fn render_modal(f: &mut Frame<'_>, app: &App, title: &str, lines: Vec<Line<'static>>, area: Rect) {
    f.render_widget(Clear, area);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(title.to_string(), Style::default().fg(app.theme.primary)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .style(Style::default().fg(app.theme.text).bg(app.theme.bg))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

/// One labelled input line; the focused field gets a cursor block.
pub fn field_line(app: &App, label: &str, field: &TextField, focused: bool) -> Line<'static> {
    let marker = if focused { "▌" } else { "" };
    let label_style = if focused {
        Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text_dim)
    };
    Line::from(vec![
        Span::styled(format!("{:<12}", label), label_style),
        Span::styled(field.display(), Style::default().fg(app.theme.text)),
        Span::styled(marker.to_string(), Style::default().fg(app.theme.accent)),
    ])
}

pub fn error_line(app: &App, message: &str) -> Line<'static> {
    Line::from(Span::styled(message.to_string(), Style::default().fg(app.theme.error)))
}

/// Day-by-day rendering of a plan. `cursor` highlights one activity.
pub fn itinerary_lines(app: &App, plan: &Itinerary, cursor: Option<(usize, usize)>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (d, day) in plan.days().iter().enumerate() {
        let mut heading = format!("Day {}", day.day);
        if let Some(date) = &day.date {
            heading.push_str(&format!(" · {}", date));
        }
        let day_style = if cursor.map(|(cd, _)| cd) == Some(d) {
            Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(heading, day_style)));

        if day.activities.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Nothing planned yet".to_string(),
                Style::default().fg(app.theme.text_dim),
            )));
        }
        for (a, activity) in day.activities.iter().enumerate() {
            let kind = activity.kind();
            let selected = cursor == Some((d, a));
            let mut row = Style::default().fg(app.theme.text);
            if selected {
                row = row.bg(app.theme.bg_highlight).add_modifier(Modifier::BOLD);
            }
            let time = activity.time.clone().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(if selected { "› " } else { "  " }.to_string(), row),
                Span::styled(format!("{:<6}", time), row.fg(app.theme.text_dim)),
                Span::styled(
                    format!("{} ", kind.glyph()),
                    row.fg(activity_kind_color(kind, &app.theme)),
                ),
                Span::styled(activity.name.clone(), row),
            ]));
            if !activity.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("          {}", activity.description),
                    Style::default().fg(app.theme.text_dim),
                )));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}
