//! Planning session lifecycle: recovery from a route, generation, and the
//! epoch that keys every asynchronous write-back.

use crate::error::{PlannerError, RecoveryFailure, ServiceError, CREATE_TRIP_FAILED};
use crate::progress::{with_progress, LOADING_STAGES};
use crate::service::PlanningService;
use std::time::Duration;
use tripmate_core::{
    humanize_slug, slugify, Itinerary, NavigationContext, TripDate, TripQuery, TripSession,
};

/// Monotonic session identity. Every entry into the trip page gets a new one.
pub type SessionEpoch = u64;

/// Work order for one trip generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub epoch: SessionEpoch,
    pub query: TripQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    pub error: PlannerError,
    /// Whether the page should offer a way back to a fresh search.
    pub offer_new_search: bool,
}

impl SessionFailure {
    pub fn reason(&self) -> String {
        self.error.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingContext {
        slug: Option<String>,
    },
    Requesting {
        query: TripQuery,
        stage: usize,
    },
    Ready(TripSession),
    Failed(SessionFailure),
}

/// Destination the trip page can work with: the search context's when it
/// has one, otherwise the humanized route slug.
pub fn recover_destination(slug: Option<&str>, context: Option<&NavigationContext>) -> Option<String> {
    if let Some(ctx) = context.filter(|c| !c.destination.trim().is_empty()) {
        return Some(ctx.destination.trim().to_string());
    }
    slug.filter(|s| !s.is_empty()).map(humanize_slug)
}

/// Work out the generation query for a trip route, or why there is none.
pub fn resolve_entry(
    slug: Option<&str>,
    context: Option<&NavigationContext>,
    today: TripDate,
) -> Result<TripQuery, RecoveryFailure> {
    let slug = slug.filter(|s| !s.is_empty());
    let (destination, start, end, interests) = match context.filter(|c| !c.destination.trim().is_empty()) {
        Some(ctx) => (
            ctx.destination.trim().to_string(),
            ctx.start_date,
            ctx.end_date,
            ctx.interests.clone(),
        ),
        // A blank destination still lends its dates and interests.
        None => match slug {
            Some(slug) => (
                humanize_slug(slug),
                context.and_then(|c| c.start_date),
                context.and_then(|c| c.end_date),
                context.map(|c| c.interests.clone()).unwrap_or_default(),
            ),
            None => return Err(RecoveryFailure::NoDestination),
        },
    };
    let Some(slug) = slug else {
        return Err(RecoveryFailure::NoDestination);
    };
    let expected = slugify(&destination);
    if expected != slug {
        return Err(RecoveryFailure::DestinationMismatch {
            slug: slug.to_string(),
            expected,
        });
    }
    let start_date = start.unwrap_or(today);
    Ok(TripQuery {
        destination,
        start_date,
        end_date: end.unwrap_or(start_date),
        interests,
    })
}

/// State machine for the trip page.
#[derive(Debug, Default)]
pub struct PlanningSession {
    epoch: SessionEpoch,
    state: SessionState,
}

impl PlanningSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The loaded session, once generation has succeeded.
    pub fn trip(&self) -> Option<&TripSession> {
        match &self.state {
            SessionState::Ready(trip) => Some(trip),
            _ => None,
        }
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.state, SessionState::Requesting { .. })
    }

    /// Current progress stage while a request is outstanding.
    pub fn stage(&self) -> Option<usize> {
        match &self.state {
            SessionState::Requesting { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Begin a new entry for `slug`, superseding anything in flight.
    pub fn open(&mut self, slug: Option<&str>) -> SessionEpoch {
        self.epoch += 1;
        self.state = SessionState::AwaitingContext {
            slug: slug.map(str::to_string),
        };
        tracing::debug!(epoch = self.epoch, slug, "trip page opened");
        self.epoch
    }

    /// Resolve the pending entry against the search context.
    ///
    /// Returns the ticket for the generation call, or `None` when the entry
    /// failed and no request must be made.
    pub fn resolve(&mut self, context: Option<&NavigationContext>, today: TripDate) -> Option<GenerationTicket> {
        let slug = match &self.state {
            SessionState::AwaitingContext { slug } => slug.clone(),
            _ => return None,
        };
        match resolve_entry(slug.as_deref(), context, today) {
            Ok(query) => {
                tracing::info!(
                    epoch = self.epoch,
                    destination = %query.destination,
                    start = %query.start_date,
                    end = %query.end_date,
                    "requesting trip generation"
                );
                self.state = SessionState::Requesting {
                    query: query.clone(),
                    stage: 0,
                };
                Some(GenerationTicket {
                    epoch: self.epoch,
                    query,
                })
            }
            Err(failure) => {
                let offer_new_search = recover_destination(slug.as_deref(), context).is_none();
                tracing::warn!(epoch = self.epoch, error = %failure, "trip page cannot recover");
                self.state = SessionState::Failed(SessionFailure {
                    error: failure.into(),
                    offer_new_search,
                });
                None
            }
        }
    }

    /// `open` followed by `resolve`.
    pub fn enter(
        &mut self,
        slug: Option<&str>,
        context: Option<&NavigationContext>,
        today: TripDate,
    ) -> Option<GenerationTicket> {
        self.open(slug);
        self.resolve(context, today)
    }

    /// Record a progress stage reported for `epoch`. Stale reports are ignored.
    pub fn record_progress(&mut self, epoch: SessionEpoch, stage: usize) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match &mut self.state {
            SessionState::Requesting { stage: current, .. } => {
                *current = stage.min(LOADING_STAGES.len() - 1).max(*current);
                true
            }
            _ => false,
        }
    }

    /// Apply the outcome of a generation call. Results for a superseded
    /// epoch are dropped and `false` is returned.
    pub fn settle(&mut self, ticket: &GenerationTicket, result: Result<TripSession, ServiceError>) -> bool {
        if ticket.epoch != self.epoch || !self.is_requesting() {
            tracing::debug!(
                ticket = ticket.epoch,
                current = self.epoch,
                "dropping stale generation result"
            );
            return false;
        }
        match result {
            Ok(trip) => {
                if let Err(err) = trip.plan.validate() {
                    tracing::warn!(epoch = self.epoch, error = %err, "service returned an irregular plan");
                }
                tracing::info!(
                    epoch = self.epoch,
                    days = trip.plan.len(),
                    activities = trip.plan.activity_count(),
                    "trip generated"
                );
                self.state = SessionState::Ready(trip);
            }
            Err(err) => {
                tracing::warn!(epoch = self.epoch, error = %err, "trip generation failed");
                self.state = SessionState::Failed(SessionFailure {
                    error: PlannerError::Generation(err.user_message(CREATE_TRIP_FAILED)),
                    offer_new_search: false,
                });
            }
        }
        true
    }

    /// Swap in a new plan for `epoch`. Returns `false` if the epoch is stale
    /// or nothing is loaded.
    pub fn replace_plan(&mut self, epoch: SessionEpoch, plan: Itinerary) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match &mut self.state {
            SessionState::Ready(trip) => {
                trip.plan = plan;
                true
            }
            _ => false,
        }
    }

    /// Leave the trip page. Anything still in flight becomes stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = SessionState::Idle;
    }

    /// Run a whole entry: resolve, call the service with the progress
    /// ticker running, settle.
    pub async fn bootstrap<S>(
        &mut self,
        service: &S,
        slug: Option<&str>,
        context: Option<&NavigationContext>,
        today: TripDate,
        period: Duration,
    ) -> &SessionState
    where
        S: PlanningService + ?Sized,
    {
        let Some(ticket) = self.enter(slug, context, today) else {
            return &self.state;
        };
        let epoch = ticket.epoch;
        let result = with_progress(service.create_trip(&ticket.query), period, |stage| {
            self.record_progress(epoch, stage);
        })
        .await;
        self.settle(&ticket, result);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> TripDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn ctx(destination: &str) -> NavigationContext {
        NavigationContext::new(destination)
    }

    #[test]
    fn context_destination_is_used_with_its_dates() {
        let start = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 11, 3).unwrap();
        let context = ctx("New York")
            .with_dates(Some(start), Some(end))
            .with_interests(vec!["food".into(), "art".into()]);
        let query = resolve_entry(Some("new-york"), Some(&context), today()).unwrap();
        assert_eq!(query.destination, "New York");
        assert_eq!(query.start_date, start);
        assert_eq!(query.end_date, end);
        assert_eq!(query.interests, vec!["food", "art"]);
    }

    #[test]
    fn blank_context_destination_keeps_dates_and_interests() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 24).unwrap();
        let context = ctx("  ")
            .with_dates(Some(start), None)
            .with_interests(vec!["history".into()]);
        let query = resolve_entry(Some("rome"), Some(&context), today()).unwrap();
        assert_eq!(query.destination, "Rome");
        assert_eq!(query.start_date, start);
        assert_eq!(query.end_date, start);
        assert_eq!(query.interests, vec!["history"]);
    }

    #[test]
    fn slug_alone_recovers_with_today() {
        let query = resolve_entry(Some("new-york"), None, today()).unwrap();
        assert_eq!(query.destination, "New York");
        assert_eq!(query.start_date, today());
        assert_eq!(query.end_date, today());
        assert!(query.interests.is_empty());
    }

    #[test]
    fn missing_end_date_defaults_to_start() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 24).unwrap();
        let context = ctx("Oslo").with_dates(Some(start), None);
        let query = resolve_entry(Some("oslo"), Some(&context), today()).unwrap();
        assert_eq!(query.end_date, start);
    }

    #[test]
    fn mismatch_and_missing_destination_fail() {
        assert_eq!(
            resolve_entry(Some("paris"), Some(&ctx("Rome")), today()),
            Err(RecoveryFailure::DestinationMismatch {
                slug: "paris".into(),
                expected: "rome".into()
            })
        );
        assert_eq!(
            resolve_entry(None, None, today()),
            Err(RecoveryFailure::NoDestination)
        );
        assert_eq!(
            resolve_entry(Some(""), Some(&ctx("  ")), today()),
            Err(RecoveryFailure::NoDestination)
        );
    }

    #[test]
    fn failed_entry_offers_new_search_only_without_destination() {
        let mut session = PlanningSession::new();
        assert!(session.enter(None, None, today()).is_none());
        match session.state() {
            SessionState::Failed(failure) => {
                assert!(failure.offer_new_search);
                assert_eq!(failure.reason(), "Please search again to create your itinerary.");
            }
            other => panic!("unexpected state {:?}", other),
        }

        assert!(session.enter(Some("paris"), Some(&ctx("Rome")), today()).is_none());
        match session.state() {
            SessionState::Failed(failure) => {
                assert!(!failure.offer_new_search);
                assert_eq!(failure.reason(), "Destination mismatch");
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn reentry_supersedes_earlier_ticket() {
        let mut session = PlanningSession::new();
        let first = session.enter(Some("paris"), None, today()).unwrap();
        let second = session.enter(Some("rome"), None, today()).unwrap();
        assert!(second.epoch > first.epoch);

        let stale = TripSession {
            destination: "Paris".into(),
            start_date: Some(today()),
            end_date: Some(today()),
            interests: vec![],
            plan: Itinerary::default(),
            flights: vec![],
            hotels: vec![],
        };
        assert!(!session.settle(&first, Ok(stale)));
        assert!(session.is_requesting());
        assert!(!session.record_progress(first.epoch, 2));
        assert!(session.record_progress(second.epoch, 2));
        assert_eq!(session.stage(), Some(2));
    }

    #[test]
    fn progress_never_moves_backwards_or_past_the_end() {
        let mut session = PlanningSession::new();
        let ticket = session.enter(Some("lima"), None, today()).unwrap();
        session.record_progress(ticket.epoch, 9);
        assert_eq!(session.stage(), Some(3));
        session.record_progress(ticket.epoch, 1);
        assert_eq!(session.stage(), Some(3));
    }

    #[test]
    fn generation_failure_uses_service_reason() {
        let mut session = PlanningSession::new();
        let ticket = session.enter(Some("lima"), None, today()).unwrap();
        assert!(session.settle(&ticket, Err(ServiceError::rejected(400, "Invalid destination"))));
        match session.state() {
            SessionState::Failed(failure) => {
                assert_eq!(failure.error, PlannerError::Generation("Invalid destination".into()));
                assert!(!failure.offer_new_search);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn reset_makes_plan_writes_stale() {
        let mut session = PlanningSession::new();
        let ticket = session.enter(Some("lima"), None, today()).unwrap();
        let trip = TripSession {
            destination: "Lima".into(),
            start_date: Some(today()),
            end_date: Some(today()),
            interests: vec![],
            plan: Itinerary::default(),
            flights: vec![],
            hotels: vec![],
        };
        assert!(session.settle(&ticket, Ok(trip)));
        let epoch = session.epoch();
        session.reset();
        assert!(!session.replace_plan(epoch, Itinerary::default()));
        assert_eq!(session.state(), &SessionState::Idle);
    }
}
