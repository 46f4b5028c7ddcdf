//! Error types for TripMate data validation

use thiserror::Error;

/// Validation errors raised by the itinerary model and request builders.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Day {day} appears more than once")]
    DuplicateDay { day: u32 },

    #[error("Day {day} follows day {previous}; days must not decrease")]
    DayOutOfOrder { previous: u32, day: u32 },

    #[error("Day index {day_index} is out of range for a {day_count}-day plan")]
    DayIndexOutOfRange { day_index: usize, day_count: usize },

    #[error("Activity index {activity_index} is out of range for day {day_index} ({activity_count} activities)")]
    ActivityIndexOutOfRange {
        day_index: usize,
        activity_index: usize,
        activity_count: usize,
    },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for validation checks.
pub type ValidationResult<T> = Result<T, ValidationError>;
