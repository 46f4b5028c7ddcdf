//! My Trips: saved itineraries with rename and delete.

use crate::state::{App, TripsModal};
use crate::views::helpers::{centered_rect, error_line, field_line, render_modal};
use crate::widgets::FactSheet;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.trips_view;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let block = Block::default()
        .title(format!("My Trips ({})", view.items.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focus));

    if view.loading && view.items.is_empty() {
        f.render_widget(Paragraph::new("Loading…").block(block), chunks[0]);
    } else if let Some(error) = &view.error {
        f.render_widget(Paragraph::new(vec![error_line(app, error)]).block(block), chunks[0]);
    } else if view.items.is_empty() {
        let empty = Paragraph::new("No saved trips yet. Plan one with / and press s to save it.")
            .style(Style::default().fg(app.theme.text_dim))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = view
            .items
            .iter()
            .map(|item| {
                ListItem::new(Line::from(vec![
                    Span::raw(item.display_title().to_string()),
                    Span::styled(
                        format!("  {}", item.destination),
                        Style::default().fg(app.theme.text_dim),
                    ),
                ]))
            })
            .collect();
        let mut state = ListState::default();
        state.select(Some(view.selected));
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(app.theme.primary)
                    .bg(app.theme.bg_highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("› ");
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    let stamp = |t: Option<tripmate_core::Timestamp>| t.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default();
    let mut details = FactSheet::new("Details").placeholder("No saved trip selected.");
    if let Some(item) = view.selected_item() {
        let session = item.to_session();
        details = details
            .fact("Title", item.display_title())
            .fact("Destination", item.destination.clone())
            .fact("Dates", session.date_range_label())
            .fact("Days", item.plan.len().to_string())
            .fact("Activities", item.plan.activity_count().to_string())
            .fact("Interests", item.interests.join(", "))
            .fact("Notes", item.notes.clone())
            .fact("Created", stamp(item.created_at))
            .fact("Updated", stamp(item.updated_at));
    }
    details.render(f, chunks[1], &app.theme);

    match &view.modal {
        Some(TripsModal::Rename { field, .. }) => {
            let lines = vec![
                field_line(app, "Title", field, true),
                Line::from(Span::styled(
                    "Enter save • Esc cancel",
                    Style::default().fg(app.theme.text_dim),
                )),
            ];
            render_modal(f, app, "Rename trip", lines, centered_rect(50, 25, area));
        }
        Some(TripsModal::ConfirmDelete { title, .. }) => {
            let lines = vec![
                Line::from(format!("Delete \"{}\"?", title)),
                Line::from(Span::styled(
                    "Enter delete • Esc keep",
                    Style::default().fg(app.theme.text_dim),
                )),
            ];
            render_modal(f, app, "Delete trip", lines, centered_rect(50, 25, area));
        }
        None => {}
    }
}
