//! Trip page: loading stages, failure, or the generated itinerary.

use crate::state::{AddField, App, TripModal};
use crate::views::helpers::{centered_rect, error_line, field_line, itinerary_lines, render_modal};
use crate::widgets::{FactSheet, StageGauge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tripmate_core::TripSession;
use tripmate_planner::SessionState;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    match app.planning.state() {
        SessionState::Idle | SessionState::AwaitingContext { .. } => {
            let text = Paragraph::new("Opening trip…")
                .style(Style::default().fg(app.theme.text_dim))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(text, area);
        }
        SessionState::Requesting { query, stage } => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            let heading = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("Planning {}", query.destination),
                    Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} → {}", query.start_date, query.end_date),
                    Style::default().fg(app.theme.text_dim),
                )),
            ])
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(heading, chunks[0]);
            StageGauge {
                title: "Working on it".to_string(),
                stage: *stage,
                style: Style::default().fg(app.theme.accent).bg(app.theme.bg_highlight),
            }
            .render(f, chunks[1]);
        }
        SessionState::Failed(failure) => {
            let hint = if failure.offer_new_search {
                "Press Enter to start a new search."
            } else {
                "Press Esc to go back to search."
            };
            let body = Paragraph::new(vec![
                error_line(app, &failure.reason()),
                Line::from(""),
                Line::from(Span::styled(hint, Style::default().fg(app.theme.text_dim))),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Could not build this trip")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.error)),
            );
            f.render_widget(body, area);
        }
        SessionState::Ready(trip) => render_ready(f, app, trip, area),
    }

    match &app.trip_view.modal {
        Some(TripModal::Share(text)) => {
            let lines = text.lines().map(|l| Line::from(l.to_string())).collect();
            render_modal(f, app, "Share (Esc to close)", lines, centered_rect(70, 60, area));
        }
        Some(TripModal::Add(form)) => {
            let kind_style = if form.focus == AddField::Kind {
                Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text_dim)
            };
            let mut lines = vec![
                Line::from(format!("Day {}", form.day_index + 1)),
                field_line(app, "Time", &form.time, form.focus == AddField::Time),
                Line::from(vec![
                    Span::styled(format!("{:<12}", "Type"), kind_style),
                    Span::raw(format!("◂ {} {} ▸", form.kind.glyph(), form.kind.label())),
                ]),
            ];
            if let Some(error) = &form.error {
                lines.push(error_line(app, error));
            }
            lines.push(Line::from(Span::styled(
                "Tab switch field • ←/→ change type • Enter add • Esc cancel",
                Style::default().fg(app.theme.text_dim),
            )));
            render_modal(f, app, "Add activity", lines, centered_rect(50, 40, area));
        }
        None => {}
    }
}

fn render_ready(f: &mut Frame<'_>, app: &App, trip: &TripSession, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let cursor = (app.trip_view.day, app.trip_view.activity);
    let lines = itinerary_lines(app, &trip.plan, Some(cursor));
    let cursor_line = lines
        .iter()
        .position(|l| l.spans.first().map(|s| s.content.starts_with('›')).unwrap_or(false))
        .unwrap_or(0);
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = cursor_line.saturating_sub(visible / 2) as u16;

    let title = if app.engine.is_customizing() {
        format!("{} (updating…)", trip.destination)
    } else {
        trip.destination.clone()
    };
    let plan = Paragraph::new(lines)
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(app.theme.primary)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        );
    f.render_widget(plan, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let saved = match (app.trip_view.saving, app.trip_view.saved) {
        (true, _) => "Saving…".to_string(),
        (false, Some(id)) => format!("Saved (#{})", id),
        (false, None) => String::new(),
    };
    let hotels = if trip.hotels.is_empty() { String::new() } else { trip.hotels.len().to_string() };
    FactSheet::new("Trip")
        .fact("Destination", trip.destination.clone())
        .fact("Dates", trip.date_range_label())
        .fact("Interests", trip.interests.join(", "))
        .fact("Days", trip.plan.len().to_string())
        .fact("Activities", trip.plan.activity_count().to_string())
        .fact("Flights", trip.flight_summary().unwrap_or_default())
        .fact("Hotels", hotels)
        .fact("Status", saved)
        .render(f, side[0], &app.theme);

    let mut selected = FactSheet::new("Selected").placeholder("No activity selected.");
    if let Some(activity) = trip.plan.activity(cursor.0, cursor.1) {
        selected = selected
            .fact("Name", activity.name.clone())
            .fact("Type", activity.kind().label())
            .fact("Time", activity.time.clone().unwrap_or_default())
            .fact("About", activity.description.clone());
    }
    selected.render(f, side[1], &app.theme);
}
