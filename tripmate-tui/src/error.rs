//! Error types for the terminal client.

use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use tripmate_planner::ServiceError;

/// Startup and terminal failures. Runtime failures from the backend are
/// shown as notifications instead.
#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    State(#[from] PersistenceError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
