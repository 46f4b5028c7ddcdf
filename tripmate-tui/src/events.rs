//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use std::path::PathBuf;
use tripmate_core::{Itinerary, ItineraryId, SavedItinerary, TripSession, UserProfile};
use tripmate_planner::{
    AccountSession, GenerationTicket, PendingCustomization, PlannerResult, ServiceError,
    SessionEpoch,
};

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    Progress {
        epoch: SessionEpoch,
        stage: usize,
    },
    Generated {
        ticket: GenerationTicket,
        result: Result<TripSession, ServiceError>,
    },
    Customized {
        pending: PendingCustomization,
        result: Result<Itinerary, ServiceError>,
    },
    Saved(PlannerResult<SavedItinerary>),
    TripsLoaded(PlannerResult<Vec<SavedItinerary>>),
    TripLoaded {
        id: ItineraryId,
        result: PlannerResult<SavedItinerary>,
    },
    Renamed(PlannerResult<SavedItinerary>),
    Deleted {
        id: ItineraryId,
        result: PlannerResult<()>,
    },
    LoggedIn(PlannerResult<AccountSession>),
    Verified(PlannerResult<UserProfile>),
    Exported(Result<PathBuf, String>),
}
