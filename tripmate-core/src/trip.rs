//! Trip requests and transient session state.

use crate::itinerary::Itinerary;
use crate::slug::slugify;
use crate::TripDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Context handed from the search form to the planning view.
///
/// Lives only in memory; it does not survive a restart, which is what makes
/// route-only recovery necessary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationContext {
    pub destination: String,
    pub start_date: Option<TripDate>,
    pub end_date: Option<TripDate>,
    pub interests: Vec<String>,
}

impl NavigationContext {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start: Option<TripDate>, end: Option<TripDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    /// Slug the planning view will be addressed by.
    pub fn slug(&self) -> String {
        slugify(&self.destination)
    }
}

/// Body of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    pub destination: String,
    pub start_date: TripDate,
    pub end_date: TripDate,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// A generated trip as held by the planning view.
///
/// `flights` and `hotels` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSession {
    pub destination: String,
    pub start_date: Option<TripDate>,
    pub end_date: Option<TripDate>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub plan: Itinerary,
    #[serde(default)]
    pub flights: Vec<Value>,
    #[serde(default)]
    pub hotels: Vec<Value>,
}

impl TripSession {
    pub fn slug(&self) -> String {
        slugify(&self.destination)
    }

    /// `"<start> – <end>"` with a dash for missing ends.
    pub fn date_range_label(&self) -> String {
        let fmt = |d: Option<TripDate>| {
            d.map(|d| d.to_string())
                .unwrap_or_else(|| "—".to_string())
        };
        format!("{} – {}", fmt(self.start_date), fmt(self.end_date))
    }

    /// Short flight summary line (`"outbound AF123 • return AF124"`), if any
    /// flight entries carry a type or number.
    pub fn flight_summary(&self) -> Option<String> {
        let parts: Vec<String> = self
            .flights
            .iter()
            .map(|f| {
                let kind = f.get("type").and_then(Value::as_str).unwrap_or_default();
                let number = f.get("flight_no").and_then(Value::as_str).unwrap_or_default();
                format!("{} {}", kind, number).trim().to_string()
            })
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" • "))
        }
    }
}
