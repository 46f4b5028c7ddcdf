//! Saved itinerary records and account identity.

use crate::itinerary::Itinerary;
use crate::trip::TripSession;
use crate::{Timestamp, TripDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a saved itinerary.
pub type ItineraryId = i64;

/// Opaque credential issued by the identity service.
///
/// No expiry logic: the token is valid until the server says otherwise.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: AuthToken,
}

/// An itinerary persisted under an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItinerary {
    pub id: ItineraryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    pub start_date: Option<TripDate>,
    pub end_date: Option<TripDate>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub plan: Itinerary,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl SavedItinerary {
    /// Title for display; the destination stands in for a blank title.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.destination
        } else {
            &self.title
        }
    }

    /// Read-only session view of this record, for detail rendering and export.
    pub fn to_session(&self) -> TripSession {
        TripSession {
            destination: self.destination.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            interests: self.interests.clone(),
            plan: self.plan.clone(),
            flights: Vec::new(),
            hotels: Vec::new(),
        }
    }
}

/// Create body for a saved itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItinerary {
    pub title: String,
    pub destination: String,
    pub start_date: Option<TripDate>,
    pub end_date: Option<TripDate>,
    pub interests: Vec<String>,
    pub plan: Itinerary,
}

impl NewItinerary {
    /// Snapshot a session. Without an explicit title the record is named
    /// `"<destination> Trip"`.
    pub fn from_session(session: &TripSession, title: Option<String>) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("{} Trip", session.destination));
        Self {
            title,
            destination: session.destination.clone(),
            start_date: session.start_date,
            end_date: session.end_date,
            interests: session.interests.clone(),
            plan: session.plan.clone(),
        }
    }
}

/// Partial update body; only present fields are sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItineraryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<TripDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<TripDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Itinerary>,
}

impl ItineraryPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> TripSession {
        serde_json::from_value(json!({
            "destination": "Lisbon",
            "start_date": "2026-05-01",
            "end_date": "2026-05-03",
            "interests": ["food"],
            "plan": [{"day": 1, "activities": []}]
        }))
        .unwrap()
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("secret-value");
        assert!(!format!("{:?}", token).contains("secret"));
        assert_eq!(token.expose(), "secret-value");
    }

    #[test]
    fn new_record_defaults_title_from_destination() {
        let record = NewItinerary::from_session(&session(), None);
        assert_eq!(record.title, "Lisbon Trip");

        let named = NewItinerary::from_session(&session(), Some("Anniversary".into()));
        assert_eq!(named.title, "Anniversary");

        let blank = NewItinerary::from_session(&session(), Some("  ".into()));
        assert_eq!(blank.title, "Lisbon Trip");
    }

    #[test]
    fn display_title_falls_back_to_destination() {
        let saved: SavedItinerary = serde_json::from_value(json!({
            "id": 4, "title": "", "destination": "Lisbon",
            "start_date": null, "end_date": null, "plan": [],
            "created_at": "2026-01-01T00:00:00Z", "updated_at": null
        }))
        .unwrap();
        assert_eq!(saved.display_title(), "Lisbon");
        assert!(saved.to_session().plan.is_empty());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ItineraryPatch::title("Renamed");
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "Renamed"}));
        assert!(ItineraryPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}
