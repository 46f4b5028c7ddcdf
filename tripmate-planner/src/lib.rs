//! TripMate planner
//!
//! Behavior on top of `tripmate-core`: recovering a trip page from its
//! route, running generation with cosmetic progress, applying edits one at
//! a time, and talking to the account-scoped itinerary store.
//!
//! Backends are reached through the traits in [`service`]; [`http`] holds
//! the reqwest implementation.

pub mod account;
pub mod engine;
pub mod error;
pub mod http;
pub mod persistence;
pub mod progress;
pub mod service;
pub mod session;

pub use account::{AccountAdapter, AccountSession};
pub use engine::{CustomizationEngine, CustomizeOutcome, PendingCustomization};
pub use error::{PlannerError, PlannerResult, RecoveryFailure, ServiceError};
pub use http::{RestClient, RestSettings};
pub use persistence::PersistenceAdapter;
pub use progress::{stage_label, with_progress, ProgressTicker, LOADING_STAGES};
pub use service::{IdentityService, ItineraryStore, PlanningService};
pub use session::{
    recover_destination, resolve_entry, GenerationTicket, PlanningSession, SessionEpoch,
    SessionFailure, SessionState,
};
