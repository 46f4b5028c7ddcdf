//! Login and registration forms.

use crate::form::AccountField;
use crate::nav::View;
use crate::state::App;
use crate::views::helpers::{centered_rect, error_line, field_line};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let registering = app.view() == View::Register;
    let form = if registering { &app.register } else { &app.login };

    let mut lines = vec![field_line(app, "Username", &form.username, form.focus == AccountField::Username)];
    if form.with_email {
        lines.push(field_line(app, "Email", &form.email, form.focus == AccountField::Email));
    }
    lines.push(field_line(app, "Password", &form.password, form.focus == AccountField::Password));
    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("Please wait…", Style::default().fg(app.theme.info))));
    }
    if let Some(error) = &form.error {
        lines.push(error_line(app, error));
    }
    let hint = if registering {
        "Already have an account? Esc, then i to log in."
    } else {
        "No account yet? Esc, then u to register."
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.text_dim))));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(app.view().title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(panel, centered_rect(60, 60, area));
}
