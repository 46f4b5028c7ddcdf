//! Search form: destination, optional dates, interests.

use crate::form::{SearchField, INTEREST_OPTIONS};
use crate::state::App;
use crate::views::helpers::{error_line, field_line};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let form = &app.search;
    let mut lines = vec![
        field_line(app, "Destination", &form.destination, form.focus == SearchField::Destination),
        field_line(app, "Start date", &form.start_date, form.focus == SearchField::StartDate),
        field_line(app, "End date", &form.end_date, form.focus == SearchField::EndDate),
        Line::from(Span::styled(
            format!("Dates are optional (YYYY-MM-DD). Today is {}.", app.today()),
            Style::default().fg(app.theme.text_dim),
        )),
    ];
    if let Some(error) = &form.error {
        lines.push(error_line(app, error));
    }
    let fields = Paragraph::new(lines).block(
        Block::default()
            .title("Where to?")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if form.focus.is_text() {
                app.theme.border_focus
            } else {
                app.theme.border
            })),
    );
    f.render_widget(fields, chunks[0]);

    let focused = form.focus == SearchField::Interests;
    let spans: Vec<Span> = INTEREST_OPTIONS
        .iter()
        .enumerate()
        .flat_map(|(i, (id, label))| {
            let checked = if form.is_selected(id) { "[x]" } else { "[ ]" };
            let mut style = Style::default().fg(if form.is_selected(id) {
                app.theme.accent
            } else {
                app.theme.text
            });
            if focused && i == form.interest_cursor {
                style = style.bg(app.theme.bg_highlight).add_modifier(Modifier::BOLD);
            }
            [
                Span::styled(format!("{} {}", checked, label), style),
                Span::raw("   "),
            ]
        })
        .collect();
    let interests = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Interests (←/→ move, Space toggle)")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused {
                    app.theme.border_focus
                } else {
                    app.theme.border
                })),
        );
    f.render_widget(interests, chunks[1]);
}
