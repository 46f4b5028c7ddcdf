//! TripMate Test Utilities
//!
//! Shared test infrastructure for the TripMate workspace:
//! - Scripted service doubles for planning, storage and identity
//! - Proptest generators for the data model
//! - Fixtures for common trips
//! - Assertions over session state

pub use tripmate_core::{
    slugify, Activity, ActivityKind, AuthToken, CustomizeAction, CustomizeRequest, Day,
    Itinerary, ItineraryId, ItineraryPatch, NavigationContext, NewItinerary, SavedItinerary,
    TripDate, TripQuery, TripSession, UserProfile,
};
pub use tripmate_planner::{
    IdentityService, ItineraryStore, PlanningService, ServiceError, SessionFailure, SessionState,
};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// MOCK SERVICES
// ============================================================================

/// A scripted service rejection. `ServiceError` itself is not `Clone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFailure {
    pub status: u16,
    pub message: Option<String>,
}

impl MockFailure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    /// A rejection with no usable body.
    pub fn bare(status: u16) -> Self {
        Self {
            status,
            message: None,
        }
    }

    fn to_error(&self) -> ServiceError {
        ServiceError::Rejected {
            status: self.status,
            message: self.message.clone(),
        }
    }
}

/// Planning service double.
///
/// Scripted results are consumed in order; when the script is empty the
/// mock behaves like a small in-memory backend (see
/// [`fixtures::session_for`] and [`fixtures::apply_edit`]).
#[derive(Debug, Default)]
pub struct MockPlanningService {
    trips: Mutex<VecDeque<Result<TripSession, MockFailure>>>,
    plans: Mutex<VecDeque<Result<Itinerary, MockFailure>>>,
    queries: Mutex<Vec<TripQuery>>,
    requests: Mutex<Vec<CustomizeRequest>>,
    create_calls: AtomicUsize,
    customize_calls: AtomicUsize,
    delay: Duration,
}

impl MockPlanningService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before answering (use with paused time).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_trip(&self, result: Result<TripSession, MockFailure>) {
        self.trips.lock().unwrap().push_back(result);
    }

    pub fn push_plan(&self, result: Result<Itinerary, MockFailure>) {
        self.plans.lock().unwrap().push_back(result);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn customize_calls(&self) -> usize {
        self.customize_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<TripQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<CustomizeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlanningService for MockPlanningService {
    async fn create_trip(&self, query: &TripQuery) -> Result<TripSession, ServiceError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        let scripted = self.trips.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match scripted {
            Some(Ok(session)) => Ok(session),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(fixtures::session_for(query)),
        }
    }

    async fn customize_trip(&self, request: &CustomizeRequest) -> Result<Itinerary, ServiceError> {
        self.customize_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.plans.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match scripted {
            Some(Ok(plan)) => Ok(plan),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(fixtures::apply_edit(request)),
        }
    }
}

/// In-memory itinerary store that accepts a single token.
#[derive(Debug)]
pub struct MemoryItineraryStore {
    token: AuthToken,
    records: Mutex<Vec<SavedItinerary>>,
    next_id: AtomicI64,
    fail_next: Mutex<Option<MockFailure>>,
    calls: AtomicUsize,
}

impl MemoryItineraryStore {
    pub fn new(token: AuthToken) -> Self {
        Self {
            token,
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_next: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_next(&self, failure: MockFailure) {
        *self.fail_next.lock().unwrap() = Some(failure);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<SavedItinerary> {
        self.records.lock().unwrap().clone()
    }

    fn enter(&self, token: &AuthToken) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.fail_next.lock().unwrap().take() {
            return Err(failure.to_error());
        }
        if token != &self.token {
            return Err(ServiceError::rejected(401, "Invalid token."));
        }
        Ok(())
    }
}

fn not_found() -> ServiceError {
    ServiceError::rejected(404, "Not found.")
}

#[async_trait]
impl ItineraryStore for MemoryItineraryStore {
    async fn list_itineraries(&self, token: &AuthToken) -> Result<Vec<SavedItinerary>, ServiceError> {
        self.enter(token)?;
        let mut records = self.records();
        records.reverse();
        Ok(records)
    }

    async fn get_itinerary(
        &self,
        token: &AuthToken,
        id: ItineraryId,
    ) -> Result<SavedItinerary, ServiceError> {
        self.enter(token)?;
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_itinerary(
        &self,
        token: &AuthToken,
        record: &NewItinerary,
    ) -> Result<SavedItinerary, ServiceError> {
        self.enter(token)?;
        if record.title.trim().is_empty() {
            return Err(ServiceError::rejected(400, "This field may not be blank."));
        }
        let now = chrono::Utc::now();
        let saved = SavedItinerary {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: record.title.clone(),
            destination: record.destination.clone(),
            start_date: record.start_date,
            end_date: record.end_date,
            interests: record.interests.clone(),
            notes: String::new(),
            plan: record.plan.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.records.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update_itinerary(
        &self,
        token: &AuthToken,
        id: ItineraryId,
        patch: &ItineraryPatch,
    ) -> Result<SavedItinerary, ServiceError> {
        self.enter(token)?;
        let mut records = self.records.lock().unwrap();
        let record = records.iter_mut().find(|r| r.id == id).ok_or_else(not_found)?;
        if let Some(title) = &patch.title {
            record.title = title.clone();
        }
        if let Some(notes) = &patch.notes {
            record.notes = notes.clone();
        }
        if patch.start_date.is_some() {
            record.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            record.end_date = patch.end_date;
        }
        if let Some(interests) = &patch.interests {
            record.interests = interests.clone();
        }
        if let Some(plan) = &patch.plan {
            record.plan = plan.clone();
        }
        record.updated_at = Some(chrono::Utc::now());
        Ok(record.clone())
    }

    async fn delete_itinerary(&self, token: &AuthToken, id: ItineraryId) -> Result<(), ServiceError> {
        self.enter(token)?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

/// Identity double with username/password accounts and `token-<username>`
/// tokens.
#[derive(Debug, Default)]
pub struct MockIdentity {
    users: Mutex<HashMap<String, (String, UserProfile)>>,
    revoked: Mutex<Vec<String>>,
    next_id: AtomicI64,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    pub fn with_user(self, username: &str, password: &str) -> Self {
        self.insert(username, password, "");
        self
    }

    pub fn token_for(username: &str) -> AuthToken {
        AuthToken::new(format!("token-{}", username))
    }

    /// Make a previously issued token unusable.
    pub fn revoke(&self, token: &AuthToken) {
        self.revoked.lock().unwrap().push(token.expose().to_string());
    }

    fn insert(&self, username: &str, password: &str, email: &str) -> UserProfile {
        let profile = UserProfile {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: username.to_string(),
            email: email.to_string(),
        };
        self.users
            .lock()
            .unwrap()
            .insert(username.to_string(), (password.to_string(), profile.clone()));
        profile
    }
}

#[async_trait]
impl IdentityService for MockIdentity {
    async fn login(&self, username: &str, password: &str) -> Result<AuthToken, ServiceError> {
        let users = self.users.lock().unwrap();
        match users.get(username) {
            Some((stored, _)) if stored == password => Ok(Self::token_for(username)),
            _ => Err(ServiceError::rejected(
                400,
                "Unable to log in with provided credentials.",
            )),
        }
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserProfile, ServiceError> {
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::rejected(400, "Username and password required"));
        }
        if self.users.lock().unwrap().contains_key(username) {
            return Err(ServiceError::rejected(400, "Username already exists"));
        }
        Ok(self.insert(username, password, email))
    }

    async fn current_user(&self, token: &AuthToken) -> Result<UserProfile, ServiceError> {
        if self.revoked.lock().unwrap().iter().any(|t| t == token.expose()) {
            return Err(ServiceError::rejected(401, "Invalid token."));
        }
        let username = token
            .expose()
            .strip_prefix("token-")
            .ok_or_else(|| ServiceError::rejected(401, "Invalid token."))?;
        self.users
            .lock()
            .unwrap()
            .get(username)
            .map(|(_, profile)| profile.clone())
            .ok_or_else(|| ServiceError::rejected(401, "Invalid token."))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for the TripMate data model.

    use super::*;
    use proptest::prelude::*;

    /// Destination names as a user would type them: words, spaces, the odd
    /// apostrophe or accent.
    pub fn arb_destination() -> impl Strategy<Value = String> {
        "[A-Z][a-zé']{1,9}( [A-Z][a-z]{1,9}){0,2}"
    }

    pub fn arb_trip_date() -> impl Strategy<Value = TripDate> {
        (0i64..730).prop_map(|offset| fixtures::today() + chrono::Duration::days(offset))
    }

    pub fn arb_activity_kind() -> impl Strategy<Value = ActivityKind> {
        prop_oneof![
            Just(ActivityKind::Flight),
            Just(ActivityKind::Hotel),
            Just(ActivityKind::Attraction),
            Just(ActivityKind::Food),
        ]
    }

    pub fn arb_activity() -> impl Strategy<Value = Activity> {
        (
            "[A-Z][a-z]{2,12}( [A-Z][a-z]{2,12}){0,2}",
            "[A-Z][a-z ]{4,40}",
            proptest::option::of("(0[7-9]|1[0-9]|2[0-2]):[0-5][0-9]"),
            arb_activity_kind(),
        )
            .prop_map(|(name, description, time, kind)| {
                let activity = Activity::new(name, description).with_kind(kind);
                match time {
                    Some(time) => activity.with_time(time),
                    None => activity,
                }
            })
    }

    /// Plans with `1..=max_days` days numbered from 1 and up to five
    /// activities per day.
    pub fn arb_itinerary(max_days: usize) -> impl Strategy<Value = Itinerary> {
        proptest::collection::vec(proptest::collection::vec(arb_activity(), 0..5), 1..=max_days).prop_map(
            |days| {
                Itinerary::new(
                    days.into_iter()
                        .enumerate()
                        .map(|(i, activities)| {
                            let mut day = Day::new(i as u32 + 1);
                            day.activities = activities;
                            day
                        })
                        .collect(),
                )
            },
        )
    }

    pub fn arb_navigation_context() -> impl Strategy<Value = NavigationContext> {
        (
            arb_destination(),
            proptest::option::of(arb_trip_date()),
            0i64..10,
            proptest::collection::vec(
                proptest::sample::select(fixtures::INTERESTS.to_vec()),
                0..4,
            ),
        )
            .prop_map(|(destination, start, length, interests)| {
                let end = start.map(|s| s + chrono::Duration::days(length));
                NavigationContext::new(destination)
                    .with_dates(start, end)
                    .with_interests(interests.into_iter().map(str::to_string).collect())
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built trips and the in-memory backend behavior of the mocks.

    use super::*;
    use chrono::NaiveDate;

    pub const INTERESTS: [&str; 12] = [
        "history",
        "food",
        "nightlife",
        "nature",
        "museums",
        "shopping",
        "adventure",
        "art",
        "architecture",
        "beaches",
        "culture",
        "wellness",
    ];

    /// Fixed "today" so tests do not depend on the clock.
    pub fn today() -> TripDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    /// Two days, three activities, one of each common kind.
    pub fn sample_plan() -> Itinerary {
        Itinerary::new(vec![
            Day::new(1)
                .with_date("2026-10-18")
                .with_activity(
                    Activity::new("Arrive at Haneda", "Land and transfer to the hotel")
                        .with_kind(ActivityKind::Flight)
                        .with_time("09:00"),
                )
                .with_activity(
                    Activity::new("Senso-ji", "Tokyo's oldest temple")
                        .with_kind(ActivityKind::Attraction)
                        .with_time("14:00"),
                ),
            Day::new(2).with_date("2026-10-19").with_activity(
                Activity::new("Tsukiji Outer Market", "Street food breakfast")
                    .with_kind(ActivityKind::Food)
                    .with_time("08:00"),
            ),
        ])
    }

    pub fn sample_session(destination: &str) -> TripSession {
        TripSession {
            destination: destination.to_string(),
            start_date: Some(today()),
            end_date: Some(today() + chrono::Duration::days(1)),
            interests: vec!["food".to_string()],
            plan: sample_plan(),
            flights: Vec::new(),
            hotels: Vec::new(),
        }
    }

    /// What the fake backend generates for a query: the sample plan under
    /// the query's destination and dates.
    pub fn session_for(query: &TripQuery) -> TripSession {
        TripSession {
            destination: query.destination.clone(),
            start_date: Some(query.start_date),
            end_date: Some(query.end_date),
            interests: query.interests.clone(),
            plan: sample_plan(),
            flights: Vec::new(),
            hotels: Vec::new(),
        }
    }

    /// What the fake backend returns for an edit.
    pub fn apply_edit(request: &CustomizeRequest) -> Itinerary {
        let mut days = request.plan.clone().into_days();
        let Some(day) = days.get_mut(request.day_index) else {
            return Itinerary::new(days);
        };
        let kind = request.activity_type.unwrap_or_default();
        match (request.action, request.activity_index) {
            (CustomizeAction::Remove, Some(index)) if index < day.activities.len() => {
                day.activities.remove(index);
            }
            (CustomizeAction::Replace, Some(index)) if index < day.activities.len() => {
                let time = day.activities[index].time.clone();
                let mut replacement = Activity::new(
                    format!("Alternative {}", kind.label()),
                    "Suggested replacement",
                )
                .with_kind(kind);
                replacement.time = time;
                day.activities[index] = replacement;
            }
            (CustomizeAction::Add, _) => {
                let mut added =
                    Activity::new(format!("New {}", kind.label()), "Added to your day").with_kind(kind);
                added.time = request.activity_time.clone();
                day.activities.push(added);
            }
            _ => {}
        }
        Itinerary::new(days)
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over planning session state.

    use super::*;

    /// Assert the session finished generation and return the trip.
    pub fn assert_ready(state: &SessionState) -> &TripSession {
        match state {
            SessionState::Ready(trip) => trip,
            other => panic!("expected Ready, got {:?}", other),
        }
    }

    /// Assert the session failed and return the failure.
    pub fn assert_failed(state: &SessionState) -> &SessionFailure {
        match state {
            SessionState::Failed(failure) => failure,
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    /// Activity names of each day, for compact plan comparisons.
    pub fn activity_names(plan: &Itinerary) -> Vec<Vec<String>> {
        plan.days()
            .iter()
            .map(|day| day.activities.iter().map(|a| a.name.clone()).collect())
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use tripmate_core::PlanEdit;

    #[test]
    fn fake_backend_applies_remove_and_add() {
        let plan = fixtures::sample_plan();
        let remove = CustomizeRequest::new(
            plan.clone(),
            &PlanEdit::Remove {
                day_index: 0,
                activity_index: 0,
            },
        );
        let after = fixtures::apply_edit(&remove);
        assert_eq!(assertions::activity_names(&after)[0], vec!["Senso-ji"]);

        let add = CustomizeRequest::new(
            plan,
            &PlanEdit::Add {
                day_index: 1,
                activity_type: ActivityKind::Food,
                activity_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            },
        );
        let after = fixtures::apply_edit(&add);
        let added = after.activity(1, 1).unwrap();
        assert_eq!(added.kind(), ActivityKind::Food);
        assert_eq!(added.time.as_deref(), Some("19:30"));
    }

    #[tokio::test]
    async fn memory_store_rejects_foreign_tokens() {
        let store = MemoryItineraryStore::new(AuthToken::new("good"));
        let err = store
            .list_itineraries(&AuthToken::new("bad"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn identity_issues_and_verifies_tokens() {
        let identity = MockIdentity::new().with_user("ana", "pw");
        let token = identity.login("ana", "pw").await.unwrap();
        assert_eq!(identity.current_user(&token).await.unwrap().username, "ana");
        identity.revoke(&token);
        assert!(identity.current_user(&token).await.is_err());
        assert!(identity.login("ana", "nope").await.is_err());
    }
}
