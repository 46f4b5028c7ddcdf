//! View rendering dispatch.

pub mod account;
pub mod detail;
pub mod helpers;
pub mod search;
pub mod trip;
pub mod trips;

pub use helpers::{centered_rect, itinerary_lines};

use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg).fg(app.theme.text)),
        f.size(),
    );
    render_header(f, app, layout[0]);

    match app.view() {
        View::Search => search::render(f, app, layout[1]),
        View::Trip => trip::render(f, app, layout[1]),
        View::MyTrips => trips::render(f, app, layout[1]),
        View::TripDetail => detail::render(f, app, layout[1]),
        View::Login | View::Register => account::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if app.help_visible {
        render_help(f, app);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let account = match &app.auth {
        Some(auth) => match &auth.user {
            Some(user) => format!("Signed in as {}", user.username),
            None => "Signed in".to_string(),
        },
        None => "Not signed in".to_string(),
    };
    let title = format!(
        "TripMate | {} | {} | theme: {}",
        app.view().title(),
        account,
        app.theme_mode.label()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(title, Style::default().fg(app.theme.primary)));
    f.render_widget(block, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.notifications.last() {
        let color = match note.level {
            NotificationLevel::Info => app.theme.info,
            NotificationLevel::Warning => app.theme.warning,
            NotificationLevel::Error => app.theme.error,
            NotificationLevel::Success => app.theme.success,
        };
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(color),
        )
    } else {
        (
            format!("{} • ? help", app.view().help()),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(style);
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame<'_>, app: &App) {
    let area = centered_rect(70, 60, f.size());
    let rows = [
        ("/", "New search"),
        ("m", "My Trips"),
        ("i / u", "Log in / create account"),
        ("o", "Log out"),
        ("t, Ctrl-t", "Toggle light/dark theme"),
        ("Ctrl-r", "Refresh"),
        ("q, Ctrl-c", "Quit"),
        ("", ""),
        ("Trip page", View::Trip.help()),
        ("My Trips", View::MyTrips.help()),
    ];
    let lines: Vec<Line<'static>> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", key), Style::default().fg(app.theme.accent)),
                Span::raw(what.to_string()),
            ])
        })
        .collect();
    helpers::render_modal(f, app, "Keybindings (Esc to close)", lines, area);
}
