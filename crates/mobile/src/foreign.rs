//! Contracts implemented in Kotlin/Swift, and their bridges onto the core
//! traits.
//!
//! UniFFI callback methods take owned values, so each bridge clones what the
//! core lends it before crossing the boundary.

use std::sync::Arc;

use tracing::warn;
use wayline_core::{
    LocationError, LocationProvider, LocationSink, NavigationError, NavigationObserver,
    RecalculationRequest,
};
use wayline_route::{
    NavigationConfig, Route, RouteAdapter, RouteEngine, RouteEngineError, RouteRequest,
    RouteSession, TripState, UserLocation, Waypoint,
};

// ============================================================================
// Route engine
// ============================================================================

#[uniffi::export(with_foreign)]
pub trait ForeignRouteAdapter: Send + Sync {
    fn generate_request(
        &self,
        user_location: UserLocation,
        waypoints: Vec<Waypoint>,
    ) -> Result<RouteRequest, RouteEngineError>;

    fn parse_response(&self, response: Vec<u8>) -> Result<Vec<Route>, RouteEngineError>;
}

#[uniffi::export(with_foreign)]
pub trait ForeignRouteEngine: Send + Sync {
    fn create_session(&self, route: Route, config: NavigationConfig) -> Arc<dyn ForeignRouteSession>;
}

#[uniffi::export(with_foreign)]
pub trait ForeignRouteSession: Send + Sync {
    fn initial_state(&self, location: UserLocation) -> TripState;

    fn advance(&self, location: UserLocation, state: TripState) -> Option<TripState>;

    fn advance_to_next_step(&self, state: TripState) -> TripState;
}

pub(crate) struct AdapterBridge(pub Arc<dyn ForeignRouteAdapter>);

impl RouteAdapter for AdapterBridge {
    fn generate_request(
        &self,
        user_location: &UserLocation,
        waypoints: &[Waypoint],
    ) -> Result<RouteRequest, RouteEngineError> {
        self.0.generate_request(*user_location, waypoints.to_vec())
    }

    fn parse_response(&self, response: &[u8]) -> Result<Vec<Route>, RouteEngineError> {
        self.0.parse_response(response.to_vec())
    }
}

pub(crate) struct EngineBridge(pub Arc<dyn ForeignRouteEngine>);

impl RouteEngine for EngineBridge {
    fn create_session(&self, route: Arc<Route>, config: &NavigationConfig) -> Box<dyn RouteSession> {
        Box::new(SessionBridge(
            self.0.create_session(Route::clone(&route), *config),
        ))
    }
}

struct SessionBridge(Arc<dyn ForeignRouteSession>);

impl RouteSession for SessionBridge {
    fn initial_state(&self, location: &UserLocation) -> TripState {
        self.0.initial_state(*location)
    }

    fn advance(&self, location: &UserLocation, state: &TripState) -> Option<TripState> {
        self.0.advance(*location, state.clone())
    }

    fn advance_to_next_step(&self, state: &TripState) -> TripState {
        self.0.advance_to_next_step(state.clone())
    }
}

// ============================================================================
// Location
// ============================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LocationProviderError {
    #[error("location services are disabled")]
    ServicesDisabled,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location provider failed: {reason}")]
    Unexpected { reason: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for LocationProviderError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Unexpected {
            reason: error.reason,
        }
    }
}

/// Handed to a foreign provider when a session starts; fixes pushed here
/// reach that session only.
#[derive(uniffi::Object)]
pub struct LocationUpdates {
    sink: LocationSink,
}

#[uniffi::export]
impl LocationUpdates {
    pub fn push(&self, location: UserLocation) {
        self.sink.push(location);
    }
}

#[uniffi::export(with_foreign)]
pub trait ForeignLocationProvider: Send + Sync {
    fn last_location(&self) -> Option<UserLocation>;

    /// Begin delivering fixes to `updates`, replacing any previous receiver.
    fn start_updates(&self, updates: Arc<LocationUpdates>) -> Result<(), LocationProviderError>;

    fn stop_updates(&self);
}

pub(crate) struct LocationBridge(pub Arc<dyn ForeignLocationProvider>);

impl LocationProvider for LocationBridge {
    fn last_location(&self) -> Option<UserLocation> {
        self.0.last_location()
    }

    fn start_updates(&self, sink: LocationSink) -> Result<(), LocationError> {
        let updates = Arc::new(LocationUpdates { sink });
        self.0.start_updates(updates).map_err(|error| match error {
            LocationProviderError::ServicesDisabled => LocationError::ServicesDisabled,
            LocationProviderError::PermissionDenied => LocationError::PermissionDenied,
            LocationProviderError::Unexpected { reason } => {
                warn!(%reason, "foreign location provider failed to start");
                LocationError::ServicesDisabled
            }
        })
    }

    fn stop_updates(&self) {
        self.0.stop_updates();
    }
}

// ============================================================================
// Observer
// ============================================================================

/// Every callback runs on the navigation thread; implementations should hand
/// off to their UI thread.
#[uniffi::export(with_foreign)]
pub trait ForeignNavigationObserver: Send + Sync {
    fn on_state_changed(&self, state: TripState);

    fn on_off_route(&self, location: UserLocation, deviation_from_route_line: f64);

    fn on_recalculation_started(&self);

    fn on_route_replaced(&self, route: Route, state: TripState);

    fn on_recalculation_failed(&self, message: String);
}

pub(crate) struct ObserverBridge(pub Arc<dyn ForeignNavigationObserver>);

impl NavigationObserver for ObserverBridge {
    fn on_state_changed(&self, state: &TripState) {
        self.0.on_state_changed(state.clone());
    }

    fn on_off_route(&self, request: &RecalculationRequest) {
        self.0
            .on_off_route(request.location, request.deviation_from_route_line);
    }

    fn on_recalculation_started(&self, _request: &RecalculationRequest) {
        self.0.on_recalculation_started();
    }

    fn on_route_replaced(&self, route: &Route, state: &TripState) {
        self.0.on_route_replaced(route.clone(), state.clone());
    }

    fn on_recalculation_failed(&self, error: &NavigationError) {
        self.0.on_recalculation_failed(error.to_string());
    }
}
