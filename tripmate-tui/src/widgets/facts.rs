//! Fact sheet shown beside an itinerary: labels in one aligned column,
//! blank values left out, and a placeholder when nothing remains.

use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct FactSheet<'a> {
    title: &'a str,
    facts: Vec<(&'a str, String)>,
    placeholder: &'a str,
}

impl<'a> FactSheet<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            facts: Vec::new(),
            placeholder: "Nothing to show.",
        }
    }

    pub fn fact(mut self, label: &'a str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.facts.push((label, value));
        }
        self
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.facts.is_empty() {
            return vec![Line::from(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(theme.text_dim),
            ))];
        }
        let width = self.facts.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
        self.facts
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}  ", label, width = width), Style::default().fg(theme.accent)),
                    Span::styled(value.clone(), Style::default().fg(theme.text)),
                ])
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect, theme: &Theme) {
        let widget = Paragraph::new(self.lines(theme))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }
}
