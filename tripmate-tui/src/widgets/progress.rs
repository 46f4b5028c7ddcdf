//! Gauge for the staged loading indicator.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};
use tripmate_planner::{stage_label, LOADING_STAGES};

pub struct StageGauge {
    pub title: String,
    pub stage: usize,
    pub style: Style,
}

impl StageGauge {
    /// Fill fraction for `stage`; the last stage is shown as nearly, not
    /// completely, done since the request is still outstanding.
    pub fn ratio(stage: usize) -> f64 {
        let total = LOADING_STAGES.len() as f64;
        let stage = stage.min(LOADING_STAGES.len() - 1) as f64;
        ((stage + 1.0) / (total + 1.0)).clamp(0.0, 1.0)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().title(self.title.as_str()).borders(Borders::ALL))
            .gauge_style(self.style)
            .label(stage_label(self.stage))
            .ratio(Self::ratio(self.stage));
        f.render_widget(gauge, area);
    }
}
