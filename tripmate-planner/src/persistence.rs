//! Saved itinerary operations bound to a logged-in account.

use crate::error::{
    PlannerError, PlannerResult, ServiceError, DELETE_FAILED, LIST_FAILED, LOAD_FAILED,
    SAVE_FAILED, UPDATE_FAILED,
};
use crate::service::ItineraryStore;
use tripmate_core::{
    AuthToken, ItineraryId, ItineraryPatch, NewItinerary, SavedItinerary, TripSession,
};

/// Store handle plus the credential every call needs.
///
/// Holding an `&AuthToken` is the only way to build one, so an
/// unauthenticated save cannot be expressed.
pub struct PersistenceAdapter<'a, S: ?Sized> {
    store: &'a S,
    token: &'a AuthToken,
}

fn failure(operation: &str, fallback: &str, err: ServiceError) -> PlannerError {
    tracing::warn!(operation, error = %err, "itinerary store call failed");
    PlannerError::Persistence(err.user_message(fallback))
}

impl<'a, S> PersistenceAdapter<'a, S>
where
    S: ItineraryStore + ?Sized,
{
    pub fn new(store: &'a S, token: &'a AuthToken) -> Self {
        Self { store, token }
    }

    /// Snapshot `session` as a new record.
    pub async fn save_session(&self, session: &TripSession, title: Option<String>) -> PlannerResult<SavedItinerary> {
        self.create(&NewItinerary::from_session(session, title)).await
    }

    pub async fn create(&self, record: &NewItinerary) -> PlannerResult<SavedItinerary> {
        let saved = self
            .store
            .create_itinerary(self.token, record)
            .await
            .map_err(|e| failure("create", SAVE_FAILED, e))?;
        tracing::info!(id = saved.id, title = %saved.title, "itinerary saved");
        Ok(saved)
    }

    pub async fn update(&self, id: ItineraryId, patch: &ItineraryPatch) -> PlannerResult<SavedItinerary> {
        let saved = self
            .store
            .update_itinerary(self.token, id, patch)
            .await
            .map_err(|e| failure("update", UPDATE_FAILED, e))?;
        tracing::info!(id, "itinerary updated");
        Ok(saved)
    }

    /// Rename a record. A blank title is refused without a network call.
    pub async fn rename(&self, id: ItineraryId, title: &str) -> PlannerResult<SavedItinerary> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PlannerError::Persistence("Title cannot be empty".to_string()));
        }
        self.update(id, &ItineraryPatch::title(title)).await
    }

    pub async fn delete(&self, id: ItineraryId) -> PlannerResult<()> {
        self.store
            .delete_itinerary(self.token, id)
            .await
            .map_err(|e| failure("delete", DELETE_FAILED, e))?;
        tracing::info!(id, "itinerary deleted");
        Ok(())
    }

    pub async fn list(&self) -> PlannerResult<Vec<SavedItinerary>> {
        self.store
            .list_itineraries(self.token)
            .await
            .map_err(|e| failure("list", LIST_FAILED, e))
    }

    pub async fn get(&self, id: ItineraryId) -> PlannerResult<SavedItinerary> {
        self.store
            .get_itinerary(self.token, id)
            .await
            .map_err(|e| failure("get", LOAD_FAILED, e))
    }
}
