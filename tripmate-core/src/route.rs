//! In-app routes.
//!
//! Routes are the client's equivalent of browser URLs. Only the route is
//! persisted across restarts; the search context that led to it is not.

use crate::record::ItineraryId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Search,
    Trip {
        slug: String,
    },
    MyTrips,
    TripDetail {
        id: ItineraryId,
    },
    Login,
    Register,
}

impl Route {
    /// Parse a route path. Unknown or malformed paths land on the search page.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            ["trip", slug] => Route::Trip {
                slug: (*slug).to_string(),
            },
            ["my-trips"] => Route::MyTrips,
            ["trips", id] => match id.parse::<ItineraryId>() {
                Ok(id) => Route::TripDetail { id },
                Err(_) => Route::Search,
            },
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            _ => Route::Search,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Search => "/".to_string(),
            Route::Trip { slug } => format!("/trip/{}", slug),
            Route::MyTrips => "/my-trips".to_string(),
            Route::TripDetail { id } => format!("/trips/{}", id),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
        }
    }

    /// Routes that only make sense with a logged-in account.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::MyTrips | Route::TripDetail { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
