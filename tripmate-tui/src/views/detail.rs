//! Read-only view of one saved itinerary.

use crate::state::App;
use crate::views::helpers::{centered_rect, error_line, itinerary_lines, render_modal};
use crate::widgets::FactSheet;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.detail_view;
    let Some(record) = &view.record else {
        let body = if let Some(error) = &view.error {
            Paragraph::new(vec![error_line(app, error)])
        } else {
            Paragraph::new("Loading…")
        };
        f.render_widget(body.block(Block::default().borders(Borders::ALL)), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let plan = Paragraph::new(itinerary_lines(app, &record.plan, None)).block(
        Block::default()
            .title(record.display_title().to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(plan, chunks[0]);

    let session = record.to_session();
    FactSheet::new("Trip")
        .fact("Destination", record.destination.clone())
        .fact("Dates", session.date_range_label())
        .fact("Interests", record.interests.join(", "))
        .fact("Notes", record.notes.clone())
        .render(f, chunks[1], &app.theme);

    if let Some(text) = &view.share {
        let lines: Vec<Line<'static>> = text.lines().map(|l| Line::from(l.to_string())).collect();
        render_modal(f, app, "Share (Esc to close)", lines, centered_rect(70, 60, area));
    }
}
