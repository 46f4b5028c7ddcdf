//! TripMate Core - Data Types
//!
//! Pure data structures shared by the planner and the terminal client.
//! Behavior that talks to the network lives in `tripmate-planner`; this
//! crate only holds the itinerary model, its wire shapes, and the pure
//! projections over it (slugs, routes, exports).

pub mod customize;
pub mod error;
pub mod export;
pub mod itinerary;
pub mod record;
pub mod route;
pub mod slug;
pub mod trip;

pub use customize::{
    parse_activity_time, CustomizeAction, CustomizeRequest, CustomizeResponse, PlanEdit,
};
pub use error::{ValidationError, ValidationResult};
pub use export::{export_file_name, session_json, share_text};
pub use itinerary::{Activity, ActivityId, ActivityKey, ActivityKind, Day, Itinerary};
pub use record::{
    AuthToken, ItineraryId, ItineraryPatch, LoginResponse, NewItinerary, SavedItinerary,
    UserProfile,
};
pub use route::Route;
pub use slug::{humanize_slug, slugify};
pub use trip::{NavigationContext, TripQuery, TripSession};

/// Calendar date used for trip windows (ISO `YYYY-MM-DD` on the wire).
pub type TripDate = chrono::NaiveDate;

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
