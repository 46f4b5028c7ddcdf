//! Customization engine.
//!
//! One edit may be outstanding at a time. The service returns the complete
//! next plan, which replaces the session's plan wholesale if the session is
//! still the one the edit was made against.

use crate::error::{PlannerError, PlannerResult, ServiceError, CUSTOMIZE_FAILED};
use crate::service::PlanningService;
use crate::session::{PlanningSession, SessionEpoch};
use tripmate_core::{CustomizeRequest, Itinerary, PlanEdit};

/// An edit that has been sent (or is about to be sent) to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCustomization {
    pub epoch: SessionEpoch,
    pub edit: PlanEdit,
    pub request: CustomizeRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomizeOutcome {
    /// The session now holds the service's plan.
    Applied,
    /// The session moved on while the edit was in flight; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
pub struct CustomizationEngine {
    in_flight: Option<SessionEpoch>,
}

impl CustomizationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_customizing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validate `edit` against the loaded plan and mark it in flight.
    pub fn begin(&mut self, session: &PlanningSession, edit: PlanEdit) -> PlannerResult<PendingCustomization> {
        if let Some(epoch) = self.in_flight {
            tracing::warn!(epoch, action = %edit.action(), "customization requested while another is in flight");
            return Err(PlannerError::CustomizeInFlight);
        }
        let trip = session.trip().ok_or(PlannerError::NoPlan)?;
        if trip.plan.is_empty() {
            return Err(PlannerError::NoPlan);
        }
        edit.check_target(&trip.plan)?;

        let request = CustomizeRequest::new(trip.plan.clone(), &edit);
        let epoch = session.epoch();
        self.in_flight = Some(epoch);
        tracing::info!(
            epoch,
            action = %request.action,
            day_index = request.day_index,
            activity_index = request.activity_index,
            "customization started"
        );
        Ok(PendingCustomization {
            epoch,
            edit,
            request,
        })
    }

    /// Settle an edit. The in-flight flag clears whatever the result.
    pub fn finish(
        &mut self,
        session: &mut PlanningSession,
        pending: PendingCustomization,
        result: Result<Itinerary, ServiceError>,
    ) -> PlannerResult<CustomizeOutcome> {
        self.in_flight = None;
        if pending.epoch != session.epoch() {
            tracing::debug!(
                pending = pending.epoch,
                current = session.epoch(),
                "dropping stale customization result"
            );
            return Ok(CustomizeOutcome::Stale);
        }
        match result {
            Ok(plan) => {
                if let Err(err) = plan.validate() {
                    tracing::warn!(error = %err, "service returned an irregular plan");
                }
                let days = plan.len();
                if session.replace_plan(pending.epoch, plan) {
                    tracing::info!(epoch = pending.epoch, days, "customization applied");
                    Ok(CustomizeOutcome::Applied)
                } else {
                    Ok(CustomizeOutcome::Stale)
                }
            }
            Err(err) => {
                tracing::warn!(epoch = pending.epoch, error = %err, "customization failed");
                Err(PlannerError::Customization(err.user_message(CUSTOMIZE_FAILED)))
            }
        }
    }

    /// `begin`, call the service, `finish`.
    pub async fn customize<S>(
        &mut self,
        service: &S,
        session: &mut PlanningSession,
        edit: PlanEdit,
    ) -> PlannerResult<CustomizeOutcome>
    where
        S: PlanningService + ?Sized,
    {
        let pending = self.begin(session, edit)?;
        let result = service.customize_trip(&pending.request).await;
        self.finish(session, pending, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tripmate_core::{Activity, Day, TripSession};

    fn ready_session() -> PlanningSession {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut session = PlanningSession::new();
        let ticket = session.enter(Some("kyoto"), None, today).unwrap();
        let trip = TripSession {
            destination: "Kyoto".into(),
            start_date: Some(today),
            end_date: Some(today),
            interests: vec![],
            plan: Itinerary::new(vec![Day::new(1)
                .with_activity(Activity::new("Fushimi Inari", "Gates"))
                .with_activity(Activity::new("Nishiki", "Market"))]),
            flights: vec![],
            hotels: vec![],
        };
        session.settle(&ticket, Ok(trip));
        session
    }

    fn remove(activity_index: usize) -> PlanEdit {
        PlanEdit::Remove {
            day_index: 0,
            activity_index,
        }
    }

    #[test]
    fn begin_sets_flag_and_finish_clears_it() {
        let mut session = ready_session();
        let mut engine = CustomizationEngine::new();
        let pending = engine.begin(&session, remove(0)).unwrap();
        assert!(engine.is_customizing());
        assert_eq!(engine.begin(&session, remove(1)), Err(PlannerError::CustomizeInFlight));

        let outcome = engine.finish(&mut session, pending, Err(ServiceError::Rejected { status: 502, message: None }));
        assert_eq!(outcome, Err(PlannerError::Customization("Failed to customize".into())));
        assert!(!engine.is_customizing());
        assert_eq!(session.trip().unwrap().plan.activity_count(), 2);
    }

    #[test]
    fn out_of_range_targets_are_rejected_before_sending() {
        let session = ready_session();
        let mut engine = CustomizationEngine::new();
        assert!(matches!(
            engine.begin(&session, remove(5)),
            Err(PlannerError::InvalidTarget(_))
        ));
        assert!(!engine.is_customizing());
    }

    #[test]
    fn no_plan_means_no_customization() {
        let session = PlanningSession::new();
        let mut engine = CustomizationEngine::new();
        assert_eq!(engine.begin(&session, remove(0)), Err(PlannerError::NoPlan));
    }

    #[test]
    fn superseded_session_drops_the_result() {
        let mut session = ready_session();
        let mut engine = CustomizationEngine::new();
        let pending = engine.begin(&session, remove(0)).unwrap();
        session.reset();
        let outcome = engine.finish(&mut session, pending, Ok(Itinerary::default()));
        assert_eq!(outcome, Ok(CustomizeOutcome::Stale));
        assert!(!engine.is_customizing());
    }
}
