//! Error types for the planner layer.

use thiserror::Error;
use tripmate_core::ValidationError;

pub const CREATE_TRIP_FAILED: &str = "Failed to create trip";
pub const CUSTOMIZE_FAILED: &str = "Failed to customize";
pub const SAVE_FAILED: &str = "Failed to save";
pub const UPDATE_FAILED: &str = "Failed to update";
pub const DELETE_FAILED: &str = "Failed to delete";
pub const LIST_FAILED: &str = "Failed to load itineraries";
pub const LOAD_FAILED: &str = "Failed to load itinerary";
pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTER_FAILED: &str = "Registration failed";
pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Transport-level failure talking to a backend service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request rejected"))]
    Rejected { status: u16, message: Option<String> },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

impl ServiceError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// Reason to show the user: the server's own message when it sent one,
    /// otherwise the operation's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ServiceError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ServiceError::Http(err) if err.is_timeout() => format!("{} (request timed out)", fallback),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Rejected { status, .. } => Some(*status),
            ServiceError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Why a trip page could not be rebuilt from its route and context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryFailure {
    #[error("Please search again to create your itinerary.")]
    NoDestination,
    #[error("Destination mismatch")]
    DestinationMismatch { slug: String, expected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Recovery(#[from] RecoveryFailure),
    #[error("{0}")]
    Generation(String),
    #[error("{0}")]
    Customization(String),
    #[error("{0}")]
    Persistence(String),
    #[error("{0}")]
    Identity(String),
    #[error("A customization is already in progress")]
    CustomizeInFlight,
    #[error("Invalid edit target: {0}")]
    InvalidTarget(#[from] ValidationError),
    #[error("No itinerary is loaded")]
    NoPlan,
}

pub type PlannerResult<T> = Result<T, PlannerError>;
