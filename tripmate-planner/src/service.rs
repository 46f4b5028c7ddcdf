//! Service seams the planner talks through.
//!
//! Each trait is one backend concern. The HTTP client in [`crate::http`]
//! implements all three; tests substitute scripted doubles.

use crate::error::ServiceError;
use async_trait::async_trait;
use tripmate_core::{
    AuthToken, CustomizeRequest, Itinerary, ItineraryId, ItineraryPatch, NewItinerary,
    SavedItinerary, TripQuery, TripSession, UserProfile,
};

/// Trip generation and customization.
#[async_trait]
pub trait PlanningService: Send + Sync {
    /// Generate a fresh session for a query.
    async fn create_trip(&self, query: &TripQuery) -> Result<TripSession, ServiceError>;

    /// Apply one edit server-side and return the complete next plan.
    async fn customize_trip(&self, request: &CustomizeRequest) -> Result<Itinerary, ServiceError>;
}

/// Account-scoped storage of saved itineraries.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    async fn list_itineraries(&self, token: &AuthToken) -> Result<Vec<SavedItinerary>, ServiceError>;

    async fn get_itinerary(
        &self,
        token: &AuthToken,
        id: ItineraryId,
    ) -> Result<SavedItinerary, ServiceError>;

    async fn create_itinerary(
        &self,
        token: &AuthToken,
        record: &NewItinerary,
    ) -> Result<SavedItinerary, ServiceError>;

    async fn update_itinerary(
        &self,
        token: &AuthToken,
        id: ItineraryId,
        patch: &ItineraryPatch,
    ) -> Result<SavedItinerary, ServiceError>;

    async fn delete_itinerary(&self, token: &AuthToken, id: ItineraryId) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<AuthToken, ServiceError>;

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserProfile, ServiceError>;

    async fn current_user(&self, token: &AuthToken) -> Result<UserProfile, ServiceError>;
}
