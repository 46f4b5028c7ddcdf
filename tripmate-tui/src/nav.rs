//! Views and how routes map onto them.

use tripmate_core::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Search,
    Trip,
    MyTrips,
    TripDetail,
    Login,
    Register,
}

impl View {
    pub fn for_route(route: &Route) -> View {
        match route {
            Route::Search => View::Search,
            Route::Trip { .. } => View::Trip,
            Route::MyTrips => View::MyTrips,
            Route::TripDetail { .. } => View::TripDetail,
            Route::Login => View::Login,
            Route::Register => View::Register,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Search => "Plan a trip",
            View::Trip => "Itinerary",
            View::MyTrips => "My Trips",
            View::TripDetail => "Saved trip",
            View::Login => "Log in",
            View::Register => "Create account",
        }
    }

    /// Key hints shown in the footer when no notification is pending.
    pub fn help(&self) -> &'static str {
        match self {
            View::Search => "Tab next field • Space toggle interest • Enter plan trip • Esc leave fields • m my trips • i log in • q quit",
            View::Trip => "↑/↓ activity • ←/→ day • r replace • d remove • a add • s save • e export • y share • Esc back",
            View::MyTrips => "↑/↓ select • Enter open • n rename • d delete • Ctrl-r refresh • / search • q quit",
            View::TripDetail => "e export • y share • Esc back to My Trips",
            View::Login => "Tab next field • Enter log in • Esc back",
            View::Register => "Tab next field • Enter create account • Esc back",
        }
    }
}
