use wayline_route::{Route, TripState};

use crate::error::NavigationError;
use crate::navigation::RecalculationRequest;

/// Callbacks for everything a navigation UI renders.
///
/// Every method has an empty default, so implementors only override what
/// they display. Calls happen on the navigation thread in commit order and
/// should return quickly.
pub trait NavigationObserver: Send + Sync {
    /// A new trip state was committed.
    fn on_state_changed(&self, _state: &TripState) {}

    /// A new off-route episode started.
    fn on_off_route(&self, _request: &RecalculationRequest) {}

    /// A replacement route is being requested.
    fn on_recalculation_started(&self, _request: &RecalculationRequest) {}

    /// The session now follows `route`; `state` is its first trip state.
    fn on_route_replaced(&self, _route: &Route, _state: &TripState) {}

    /// Recalculation failed. Navigation continues on the previous route.
    fn on_recalculation_failed(&self, _error: &NavigationError) {}
}
