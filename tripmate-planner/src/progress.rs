//! Cosmetic progress stages shown while a trip is generated.

use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const LOADING_STAGES: [&str; 4] = [
    "Searching for the best places...",
    "Building your day-by-day plan...",
    "Optimizing routes and timing...",
    "Adding recommendations...",
];

/// Stage index that only moves forward and stops at the last label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressTicker {
    index: usize,
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &'static str {
        LOADING_STAGES[self.index]
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1).min(LOADING_STAGES.len() - 1);
        self.index
    }

    pub fn is_final(&self) -> bool {
        self.index == LOADING_STAGES.len() - 1
    }
}

/// Label for a stage index, clamped to the last stage.
pub fn stage_label(index: usize) -> &'static str {
    LOADING_STAGES[index.min(LOADING_STAGES.len() - 1)]
}

/// Drive `call` to completion, reporting a new stage index every `period`.
///
/// The ticker lives only as long as the call: once the future resolves no
/// further stages are reported.
pub async fn with_progress<F, S>(call: F, period: Duration, mut on_stage: S) -> F::Output
where
    F: Future,
    S: FnMut(usize),
{
    let mut ticker = ProgressTicker::new();
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(call);
    loop {
        tokio::select! {
            biased;
            output = &mut call => return output,
            _ = interval.tick() => {
                if !ticker.is_final() {
                    on_stage(ticker.advance());
                }
            }
        }
    }
}
