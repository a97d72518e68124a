//! Scripted collaborators for the navigation tests.

use std::sync::{Arc, Mutex};

use wayline_route::{
    DeviationStatus, GeographicCoordinate, NavigationConfig, Route, RouteEngine, RouteIdentifier,
    RouteSession, Step, TripState, UserLocation, Waypoint, WaypointKind,
};

use crate::error::{LocationError, NavigationError};
use crate::location::{LocationProvider, LocationSink};
use crate::navigation::{NavigationObserver, RecalculationRequest};

pub fn fix(lat: f64, lng: f64) -> UserLocation {
    UserLocation::at(GeographicCoordinate::new(lat, lng))
}

/// A two-step route; the geometry does not matter to [`ScriptedEngine`].
pub fn route(id: &str) -> Route {
    let step = |instruction: &str| Step {
        geometry: vec![
            GeographicCoordinate::new(0.0, 0.0),
            GeographicCoordinate::new(0.001, 0.0),
        ],
        distance: 111.0,
        duration: 10.0,
        road_name: None,
        instruction: instruction.into(),
        visual_instructions: vec![],
        spoken_instructions: vec![],
    };

    Route {
        id: RouteIdentifier::new(id),
        geometry: vec![
            GeographicCoordinate::new(0.0, 0.0),
            GeographicCoordinate::new(0.002, 0.0),
        ],
        distance: 222.0,
        waypoints: vec![Waypoint::new(
            GeographicCoordinate::new(0.002, 0.0),
            WaypointKind::Break,
        )],
        steps: vec![step("Head north"), step("Continue north")],
    }
}

/// Engine whose answers are encoded in the fix:
///
/// - accuracy ≥ 1000 m: no new state
/// - accuracy ≥ 500 m: `Idle`, which the controller must reject
/// - latitude ≥ 90: `Complete`
/// - longitude ≠ 0: off route by `longitude * 1000` meters
///
/// Otherwise the distance to the next maneuver is the latitude.
#[derive(Default)]
pub struct ScriptedEngine {
    sessions: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    /// Ids of the routes sessions were created for, in order.
    pub fn sessions(&self) -> Vec<String> {
        self.sessions.lock().unwrap().clone()
    }
}

impl RouteEngine for ScriptedEngine {
    fn create_session(&self, route: Arc<Route>, _config: &NavigationConfig) -> Box<dyn RouteSession> {
        self.sessions.lock().unwrap().push(route.id.to_string());
        Box::new(ScriptedSession { route })
    }
}

struct ScriptedSession {
    route: Arc<Route>,
}

fn navigating(location: &UserLocation, remaining_steps: Vec<Step>) -> TripState {
    let deviation = if location.coordinates.lng == 0.0 {
        DeviationStatus::NoDeviation
    } else {
        DeviationStatus::OffRoute {
            deviation_from_route_line: location.coordinates.lng * 1000.0,
        }
    };

    TripState::Navigating {
        snapped_user_location: *location,
        course_over_ground: None,
        remaining_steps,
        active_visual_instruction: None,
        active_spoken_instruction: None,
        distance_to_next_maneuver: location.coordinates.lat,
        deviation,
    }
}

impl RouteSession for ScriptedSession {
    fn initial_state(&self, location: &UserLocation) -> TripState {
        let mut state = navigating(location, self.route.steps.clone());
        if let TripState::Navigating { deviation, .. } = &mut state {
            *deviation = DeviationStatus::NoDeviation;
        }
        state
    }

    fn advance(&self, location: &UserLocation, state: &TripState) -> Option<TripState> {
        if location.horizontal_accuracy >= 1000.0 {
            return None;
        }
        if location.horizontal_accuracy >= 500.0 {
            return Some(TripState::Idle);
        }
        if location.coordinates.lat >= 90.0 {
            return Some(TripState::Complete {
                final_location: *location,
            });
        }
        Some(navigating(location, state.remaining_steps().to_vec()))
    }

    fn advance_to_next_step(&self, state: &TripState) -> TripState {
        match state {
            TripState::Navigating {
                snapped_user_location,
                remaining_steps,
                ..
            } if remaining_steps.len() > 1 => {
                navigating(snapped_user_location, remaining_steps[1..].to_vec())
            }
            TripState::Navigating {
                snapped_user_location,
                ..
            } => TripState::Complete {
                final_location: *snapped_user_location,
            },
            other => other.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    StateChanged(&'static str),
    OffRoute,
    RecalculationStarted,
    RouteReplaced(String),
    RecalculationFailed(NavigationError),
}

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn state_kinds(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::StateChanged(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn off_route_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == Event::OffRoute)
            .count()
    }

    pub fn replaced_routes(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::RouteReplaced(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<NavigationError> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::RecalculationFailed(error) => Some(error),
                _ => None,
            })
            .collect()
    }
}

impl NavigationObserver for Recorder {
    fn on_state_changed(&self, state: &TripState) {
        self.push(Event::StateChanged(state.kind()));
    }

    fn on_off_route(&self, _request: &RecalculationRequest) {
        self.push(Event::OffRoute);
    }

    fn on_recalculation_started(&self, _request: &RecalculationRequest) {
        self.push(Event::RecalculationStarted);
    }

    fn on_route_replaced(&self, route: &Route, _state: &TripState) {
        self.push(Event::RouteReplaced(route.id.to_string()));
    }

    fn on_recalculation_failed(&self, error: &NavigationError) {
        self.push(Event::RecalculationFailed(error.clone()));
    }
}

/// Provider that remembers every sink it was ever given.
pub struct SinkKeeper {
    location: UserLocation,
    sinks: Mutex<Vec<LocationSink>>,
}

impl SinkKeeper {
    pub fn new(location: UserLocation) -> Self {
        Self {
            location,
            sinks: Mutex::new(Vec::new()),
        }
    }

    pub fn sink(&self, index: usize) -> LocationSink {
        self.sinks.lock().unwrap()[index].clone()
    }
}

impl LocationProvider for SinkKeeper {
    fn last_location(&self) -> Option<UserLocation> {
        Some(self.location)
    }

    fn start_updates(&self, sink: LocationSink) -> Result<(), LocationError> {
        self.sinks.lock().unwrap().push(sink);
        Ok(())
    }

    fn stop_updates(&self) {}
}

/// Provider that starts once and refuses every later start.
pub struct StartsOnce {
    location: UserLocation,
    starts: Mutex<usize>,
    running: Mutex<bool>,
}

impl StartsOnce {
    pub fn new(location: UserLocation) -> Self {
        Self {
            location,
            starts: Mutex::new(0),
            running: Mutex::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock().unwrap()
    }
}

impl LocationProvider for StartsOnce {
    fn last_location(&self) -> Option<UserLocation> {
        Some(self.location)
    }

    fn start_updates(&self, _sink: LocationSink) -> Result<(), LocationError> {
        let mut starts = self.starts.lock().unwrap();
        *starts += 1;
        if *starts > 1 {
            return Err(LocationError::PermissionDenied);
        }
        *self.running.lock().unwrap() = true;
        Ok(())
    }

    fn stop_updates(&self) {
        *self.running.lock().unwrap() = false;
    }
}
