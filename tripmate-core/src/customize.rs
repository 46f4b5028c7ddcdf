//! Customization edits and their wire shapes.

use crate::error::{ValidationError, ValidationResult};
use crate::itinerary::{ActivityKind, Itinerary};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action verb sent to the customization service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomizeAction {
    Replace,
    Remove,
    Add,
}

impl fmt::Display for CustomizeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            CustomizeAction::Replace => "replace",
            CustomizeAction::Remove => "remove",
            CustomizeAction::Add => "add",
        };
        write!(f, "{}", value)
    }
}

/// A single user edit, addressed by position in the current plan.
///
/// Each variant carries exactly the coordinates its action needs: `Add`
/// has no activity index because the service decides where the new
/// activity lands within the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEdit {
    Replace {
        day_index: usize,
        activity_index: usize,
        activity_type: Option<ActivityKind>,
    },
    Remove {
        day_index: usize,
        activity_index: usize,
    },
    Add {
        day_index: usize,
        activity_type: ActivityKind,
        activity_time: NaiveTime,
    },
}

impl PlanEdit {
    pub fn action(&self) -> CustomizeAction {
        match self {
            PlanEdit::Replace { .. } => CustomizeAction::Replace,
            PlanEdit::Remove { .. } => CustomizeAction::Remove,
            PlanEdit::Add { .. } => CustomizeAction::Add,
        }
    }

    pub fn day_index(&self) -> usize {
        match self {
            PlanEdit::Replace { day_index, .. }
            | PlanEdit::Remove { day_index, .. }
            | PlanEdit::Add { day_index, .. } => *day_index,
        }
    }

    pub fn activity_index(&self) -> Option<usize> {
        match self {
            PlanEdit::Replace { activity_index, .. } | PlanEdit::Remove { activity_index, .. } => {
                Some(*activity_index)
            }
            PlanEdit::Add { .. } => None,
        }
    }

    /// Check the edit's coordinates against the plan it will be applied to.
    pub fn check_target(&self, plan: &Itinerary) -> ValidationResult<()> {
        match self.activity_index() {
            Some(activity_index) => plan
                .check_activity(self.day_index(), activity_index)
                .map(|_| ()),
            None => plan.check_day(self.day_index()).map(|_| ()),
        }
    }
}

/// Parse a `HH:MM` time as entered in the add-activity form.
pub fn parse_activity_time(input: &str) -> ValidationResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| ValidationError::invalid("activity_time", "expected HH:MM"))
}

/// Request body for the customization service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizeRequest {
    pub plan: Itinerary,
    pub action: CustomizeAction,
    pub day_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_time: Option<String>,
}

impl CustomizeRequest {
    pub fn new(plan: Itinerary, edit: &PlanEdit) -> Self {
        let (activity_type, activity_time) = match edit {
            PlanEdit::Replace { activity_type, .. } => (*activity_type, None),
            PlanEdit::Remove { .. } => (None, None),
            PlanEdit::Add {
                activity_type,
                activity_time,
                ..
            } => (
                Some(*activity_type),
                Some(activity_time.format("%H:%M").to_string()),
            ),
        };
        Self {
            plan,
            action: edit.action(),
            day_index: edit.day_index(),
            activity_index: edit.activity_index(),
            activity_type,
            activity_time,
        }
    }
}

/// Response body of the customization service: the complete next plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizeResponse {
    pub plan: Itinerary,
}
