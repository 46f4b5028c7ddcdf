//! Day-by-day itinerary model.
//!
//! An [`Itinerary`] is an ordered list of [`Day`]s, each holding an ordered
//! list of [`Activity`] entries. Order carries meaning at both levels and is
//! never rearranged by the client. Fields the client does not interpret are
//! kept in `extra` so a plan survives a round trip through the planning
//! service unchanged.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// ACTIVITY KIND
// ============================================================================

/// Visual category of an activity.
///
/// The set is closed; any unknown wire value renders as [`ActivityKind::Attraction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityKind {
    Flight,
    Hotel,
    #[default]
    Attraction,
    Food,
}

impl ActivityKind {
    /// Map a wire value onto the closed set, falling back to `Attraction`.
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "flight" => ActivityKind::Flight,
            "hotel" => ActivityKind::Hotel,
            "food" => ActivityKind::Food,
            _ => ActivityKind::Attraction,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Flight => "flight",
            ActivityKind::Hotel => "hotel",
            ActivityKind::Attraction => "attraction",
            ActivityKind::Food => "food",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Flight => "Flight",
            ActivityKind::Hotel => "Hotel",
            ActivityKind::Attraction => "Attraction",
            ActivityKind::Food => "Food",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ActivityKind::Flight => "✈️",
            ActivityKind::Hotel => "🏨",
            ActivityKind::Attraction => "📍",
            ActivityKind::Food => "🍽️",
        }
    }

    /// Kinds in the order they are offered when adding an activity.
    pub fn all() -> &'static [ActivityKind] {
        &[
            ActivityKind::Attraction,
            ActivityKind::Food,
            ActivityKind::Hotel,
            ActivityKind::Flight,
        ]
    }

    pub fn next(&self) -> ActivityKind {
        let all = Self::all();
        let idx = all.iter().position(|k| k == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ActivityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ActivityKind::from_wire(&raw))
    }
}

// ============================================================================
// ACTIVITY
// ============================================================================

/// Stable activity identifier, when the planning service provides one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityId::Number(n) => write!(f, "{}", n),
            ActivityId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Rendering identity of an activity within its day.
///
/// Falls back to the position when the activity has no `id`, so identity
/// is positional for most generated plans.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActivityKey {
    Id(ActivityId),
    Positional(usize),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ActivityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// "Best time" display string, usually `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Raw category value as sent by the service. See [`Activity::kind`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ActivityKind) -> Self {
        self.icon = Some(kind.as_str().to_string());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_id(mut self, id: ActivityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Category of this activity. Reads `icon`, then a `type` field, and
    /// falls back to `Attraction`.
    pub fn kind(&self) -> ActivityKind {
        self.icon
            .as_deref()
            .or_else(|| self.extra.get("type").and_then(Value::as_str))
            .map(ActivityKind::from_wire)
            .unwrap_or_default()
    }

    pub fn key(&self, position: usize) -> ActivityKey {
        match &self.id {
            Some(id) => ActivityKey::Id(id.clone()),
            None => ActivityKey::Positional(position),
        }
    }
}

// ============================================================================
// DAY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Day {
    #[serde(default)]
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Day {
    pub fn new(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }
}

// ============================================================================
// ITINERARY
// ============================================================================

/// Ordered day-by-day plan. Serialized as a bare JSON array of days.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    days: Vec<Day>,
}

impl Itinerary {
    pub fn new(days: Vec<Day>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn activity(&self, day_index: usize, activity_index: usize) -> Option<&Activity> {
        self.days
            .get(day_index)
            .and_then(|day| day.activities.get(activity_index))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|d| d.activities.len()).sum()
    }

    /// Check that `day_index` addresses a day of this plan.
    pub fn check_day(&self, day_index: usize) -> ValidationResult<&Day> {
        self.days
            .get(day_index)
            .ok_or(ValidationError::DayIndexOutOfRange {
                day_index,
                day_count: self.days.len(),
            })
    }

    /// Check that `(day_index, activity_index)` addresses an activity of this plan.
    pub fn check_activity(
        &self,
        day_index: usize,
        activity_index: usize,
    ) -> ValidationResult<&Activity> {
        let day = self.check_day(day_index)?;
        day.activities
            .get(activity_index)
            .ok_or(ValidationError::ActivityIndexOutOfRange {
                day_index,
                activity_index,
                activity_count: day.activities.len(),
            })
    }

    /// Validity rules for a plan as produced by the planning service:
    /// day numbers are positive, unique and non-decreasing, and every
    /// activity carries a name and a description.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut seen = HashSet::new();
        let mut previous: Option<u32> = None;
        for (day_index, day) in self.days.iter().enumerate() {
            if day.day == 0 {
                return Err(ValidationError::invalid(
                    format!("plan[{}].day", day_index),
                    "must be a positive integer",
                ));
            }
            if !seen.insert(day.day) {
                return Err(ValidationError::DuplicateDay { day: day.day });
            }
            if let Some(prev) = previous {
                if day.day < prev {
                    return Err(ValidationError::DayOutOfOrder {
                        previous: prev,
                        day: day.day,
                    });
                }
            }
            previous = Some(day.day);

            for (activity_index, activity) in day.activities.iter().enumerate() {
                if activity.name.trim().is_empty() {
                    return Err(ValidationError::missing(format!(
                        "plan[{}].activities[{}].name",
                        day_index, activity_index
                    )));
                }
                if activity.description.trim().is_empty() {
                    return Err(ValidationError::missing(format!(
                        "plan[{}].activities[{}].description",
                        day_index, activity_index
                    )));
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Day>> for Itinerary {
    fn from(days: Vec<Day>) -> Self {
        Self::new(days)
    }
}

impl<'a> IntoIterator for &'a Itinerary {
    type Item = &'a Day;
    type IntoIter = std::slice::Iter<'a, Day>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.iter()
    }
}
