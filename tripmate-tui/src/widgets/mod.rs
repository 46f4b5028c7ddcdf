//! Reusable widget components.

pub mod facts;
pub mod progress;

pub use facts::FactSheet;
pub use progress::StageGauge;
