use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::{error, info};
use wayline_core::{
    LocationProvider, NavigationController, NavigationControllerConfig, ReqwestTransport,
    RouteRequester, SimulatedLocationProvider,
};
use wayline_route::{NavigationConfig, Route, TripState, UserLocation, Waypoint};

use crate::error::NavigatorError;
use crate::foreign::{
    AdapterBridge, EngineBridge, ForeignLocationProvider, ForeignNavigationObserver,
    ForeignRouteAdapter, ForeignRouteEngine, LocationBridge, ObserverBridge,
};
use crate::logging::setup_logging;

/// One navigation controller and the runtime its I/O runs on.
///
/// Without a foreign location provider the navigator plays routes back
/// through its own simulator.
#[derive(uniffi::Object)]
pub struct Navigator {
    runtime: Runtime,
    controller: NavigationController,
    simulator: Option<Arc<SimulatedLocationProvider>>,
}

impl Navigator {
    /// Run `future` on the navigator's runtime and wait for it from whatever
    /// executor the foreign caller polls us on.
    async fn run<F, T>(&self, future: F) -> Result<T, NavigatorError>
    where
        F: Future<Output = Result<T, NavigatorError>> + Send + 'static,
        T: Send + 'static,
    {
        self.runtime.spawn(future).await.map_err(|error| {
            error!(%error, "navigator task failed");
            NavigatorError::ControllerUnavailable
        })?
    }

    fn simulator(&self) -> Result<&SimulatedLocationProvider, NavigatorError> {
        self.simulator.as_deref().ok_or_else(|| {
            NavigatorError::Simulation("a foreign location provider is in use".into())
        })
    }
}

#[uniffi::export]
impl Navigator {
    /// `config_json` is a serialized `NavigationControllerConfig`; missing
    /// fields take their defaults.
    #[uniffi::constructor]
    pub fn new(
        adapter: Arc<dyn ForeignRouteAdapter>,
        engine: Arc<dyn ForeignRouteEngine>,
        location_provider: Option<Arc<dyn ForeignLocationProvider>>,
        observer: Option<Arc<dyn ForeignNavigationObserver>>,
        config_json: Option<String>,
    ) -> Result<Self, NavigatorError> {
        setup_logging();

        let config = match config_json {
            Some(json) => NavigationControllerConfig::from_json(&json)?,
            None => NavigationControllerConfig::default(),
        };
        let runtime = Runtime::new().map_err(|e| NavigatorError::Configuration(e.to_string()))?;

        let transport = ReqwestTransport::new(&config.transport)?;
        let requester = RouteRequester::new(Arc::new(AdapterBridge(adapter)), Arc::new(transport));

        let (provider, simulator): (Arc<dyn LocationProvider>, _) = match location_provider {
            Some(provider) => (Arc::new(LocationBridge(provider)), None),
            None => {
                let simulator = Arc::new(SimulatedLocationProvider::new(
                    runtime.handle().clone(),
                    config.simulation,
                ));
                (simulator.clone(), Some(simulator))
            }
        };

        let mut builder = NavigationController::builder(requester, Arc::new(EngineBridge(engine)), provider)
            .config(config);
        if let Some(observer) = observer {
            builder = builder.observer(Arc::new(ObserverBridge(observer)));
        }
        let controller = builder.spawn()?;

        info!(simulated = simulator.is_some(), "navigator ready");
        Ok(Self {
            runtime,
            controller,
            simulator,
        })
    }

    pub async fn get_routes(
        &self,
        origin: UserLocation,
        waypoints: Vec<Waypoint>,
    ) -> Result<Vec<Route>, NavigatorError> {
        let controller = self.controller.clone();
        self.run(async move {
            controller
                .get_routes(&origin, &waypoints)
                .await
                .map_err(NavigatorError::from)
        })
        .await
    }

    pub async fn start_navigation(
        &self,
        route: Route,
        config: Option<NavigationConfig>,
    ) -> Result<TripState, NavigatorError> {
        let controller = self.controller.clone();
        self.run(async move {
            controller
                .start_navigation(route, config)
                .await
                .map_err(NavigatorError::from)
        })
        .await
    }

    pub async fn stop_navigation(&self) -> Result<TripState, NavigatorError> {
        let controller = self.controller.clone();
        self.run(async move {
            controller
                .stop_navigation()
                .await
                .map_err(NavigatorError::from)
        })
        .await
    }

    pub async fn replace_route(
        &self,
        route: Route,
        config: Option<NavigationConfig>,
    ) -> Result<TripState, NavigatorError> {
        let controller = self.controller.clone();
        self.run(async move {
            controller
                .replace_route(route, config)
                .await
                .map_err(NavigatorError::from)
        })
        .await
    }

    pub async fn advance_to_next_step(&self) -> Result<TripState, NavigatorError> {
        let controller = self.controller.clone();
        self.run(async move {
            controller
                .advance_to_next_step()
                .await
                .map_err(NavigatorError::from)
        })
        .await
    }

    /// Feed a fix that did not come through the location provider.
    pub fn update_location(&self, location: UserLocation) {
        self.controller.update_location(location);
    }

    pub fn current_state(&self) -> TripState {
        self.controller.current_state()
    }

    /// Play `route` back as if driven; its first point becomes the current
    /// location right away.
    pub fn simulate_route(
        &self,
        route: Route,
        sampling_distance: Option<f64>,
    ) -> Result<(), NavigatorError> {
        self.simulator()?.simulate_route(&route, sampling_distance)?;
        Ok(())
    }

    pub fn stop_simulation(&self) -> Result<(), NavigatorError> {
        self.simulator()?.stop_simulation();
        Ok(())
    }

    pub fn set_warp_factor(&self, warp_factor: f64) -> Result<(), NavigatorError> {
        self.simulator()?.set_warp_factor(warp_factor)?;
        Ok(())
    }

    pub fn is_simulating(&self) -> bool {
        self.simulator
            .as_ref()
            .is_some_and(|simulator| simulator.is_simulating())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use wayline_route::spatial::{haversine_distance, line_length, point_along};
    use wayline_route::{
        DeviationStatus, GeographicCoordinate, RouteEngineError, RouteIdentifier, RouteRequest,
        Step, WaypointKind,
    };

    use super::*;
    use crate::foreign::{ForeignRouteSession, LocationProviderError, LocationUpdates};

    struct BrokenAdapter;

    impl ForeignRouteAdapter for BrokenAdapter {
        fn generate_request(
            &self,
            _user_location: UserLocation,
            _waypoints: Vec<Waypoint>,
        ) -> Result<RouteRequest, RouteEngineError> {
            Ok(RouteRequest::HttpGet {
                url: "not a url".into(),
                headers: HashMap::new(),
            })
        }

        fn parse_response(&self, _response: Vec<u8>) -> Result<Vec<Route>, RouteEngineError> {
            Ok(vec![])
        }
    }

    /// Distance to the maneuver is the straight-line distance to the end of
    /// the route; arrival within 1 m completes the trip.
    struct DistanceToEnd;

    struct DistanceToEndSession {
        route: Route,
    }

    impl ForeignRouteEngine for DistanceToEnd {
        fn create_session(&self, route: Route, _config: NavigationConfig) -> Arc<dyn ForeignRouteSession> {
            Arc::new(DistanceToEndSession { route })
        }
    }

    impl ForeignRouteSession for DistanceToEndSession {
        fn initial_state(&self, location: UserLocation) -> TripState {
            self.advance(location, TripState::Idle)
                .unwrap_or(TripState::Idle)
        }

        fn advance(&self, location: UserLocation, _state: TripState) -> Option<TripState> {
            let end = *self.route.geometry.last()?;
            let remaining = haversine_distance(location.coordinates, end);
            if remaining <= 1.0 {
                return Some(TripState::Complete {
                    final_location: location,
                });
            }
            Some(TripState::Navigating {
                snapped_user_location: location,
                course_over_ground: None,
                remaining_steps: self.route.steps.clone(),
                active_visual_instruction: None,
                active_spoken_instruction: None,
                distance_to_next_maneuver: remaining,
                deviation: DeviationStatus::NoDeviation,
            })
        }

        fn advance_to_next_step(&self, state: TripState) -> TripState {
            match state.location() {
                Some(location) => TripState::Complete {
                    final_location: *location,
                },
                None => state,
            }
        }
    }

    /// Keeps the receiver handed over by the navigator.
    #[derive(Default)]
    struct ManualProvider {
        location: Option<UserLocation>,
        updates: Mutex<Option<Arc<LocationUpdates>>>,
    }

    impl ManualProvider {
        fn push(&self, location: UserLocation) {
            let updates = self.updates.lock().unwrap().clone().unwrap();
            updates.push(location);
        }
    }

    impl ForeignLocationProvider for ManualProvider {
        fn last_location(&self) -> Option<UserLocation> {
            self.location
        }

        fn start_updates(&self, updates: Arc<LocationUpdates>) -> Result<(), LocationProviderError> {
            *self.updates.lock().unwrap() = Some(updates);
            Ok(())
        }

        fn stop_updates(&self) {
            self.updates.lock().unwrap().take();
        }
    }

    struct DeniedProvider;

    impl ForeignLocationProvider for DeniedProvider {
        fn last_location(&self) -> Option<UserLocation> {
            Some(UserLocation::at(START))
        }

        fn start_updates(&self, _updates: Arc<LocationUpdates>) -> Result<(), LocationProviderError> {
            Err(LocationProviderError::PermissionDenied)
        }

        fn stop_updates(&self) {}
    }

    #[derive(Default)]
    struct StateCounter(Mutex<Vec<&'static str>>);

    impl ForeignNavigationObserver for StateCounter {
        fn on_state_changed(&self, state: TripState) {
            self.0.lock().unwrap().push(state.kind());
        }

        fn on_off_route(&self, _location: UserLocation, _deviation_from_route_line: f64) {}

        fn on_recalculation_started(&self) {}

        fn on_route_replaced(&self, _route: Route, _state: TripState) {}

        fn on_recalculation_failed(&self, _message: String) {}
    }

    const START: GeographicCoordinate = GeographicCoordinate::new(52.0, 13.0);

    fn route() -> Route {
        let end = point_along(START, GeographicCoordinate::new(53.0, 13.0), 200.0);
        let geometry = vec![START, end];
        Route {
            id: RouteIdentifier::new("north"),
            distance: line_length(&geometry),
            waypoints: vec![Waypoint::new(end, WaypointKind::Break)],
            steps: vec![Step {
                geometry: geometry.clone(),
                distance: line_length(&geometry),
                duration: 20.0,
                road_name: None,
                instruction: "Head north".into(),
                visual_instructions: vec![],
                spoken_instructions: vec![],
            }],
            geometry,
        }
    }

    fn build(
        provider: Option<Arc<dyn ForeignLocationProvider>>,
        observer: Option<Arc<dyn ForeignNavigationObserver>>,
    ) -> Navigator {
        Navigator::new(
            Arc::new(BrokenAdapter),
            Arc::new(DistanceToEnd),
            provider,
            observer,
            Some(r#"{"simulation": {"base_tick_ms": 5}}"#.into()),
        )
        .unwrap()
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "condition not reached in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_simulated_drive_completes() {
        let observer = Arc::new(StateCounter::default());
        let navigator = build(None, Some(observer.clone()));
        let route = route();

        navigator.update_location(UserLocation::at(START));
        let state = pollster::block_on(navigator.start_navigation(route.clone(), None)).unwrap();
        assert!(state.is_navigating());
        navigator.simulate_route(route, Some(20.0)).unwrap();

        wait_until(|| navigator.current_state().is_complete());
        wait_until(|| !navigator.is_simulating());

        let kinds = observer.0.lock().unwrap().clone();
        assert_eq!(kinds.first(), Some(&"navigating"));
        assert_eq!(kinds.last(), Some(&"complete"));

        let state = pollster::block_on(navigator.stop_navigation()).unwrap();
        assert!(state.is_idle());
    }

    #[test]
    fn test_foreign_provider_feeds_the_session() {
        let provider = Arc::new(ManualProvider {
            location: Some(UserLocation::at(START)),
            ..Default::default()
        });
        let navigator = build(Some(provider.clone()), None);
        let route = route();
        let end = *route.geometry.last().unwrap();

        pollster::block_on(navigator.start_navigation(route, None)).unwrap();
        provider.push(UserLocation::at(end));
        wait_until(|| navigator.current_state().is_complete());

        pollster::block_on(navigator.stop_navigation()).unwrap();
        assert!(provider.updates.lock().unwrap().is_none());
    }

    #[test]
    fn test_simulation_unavailable_with_foreign_provider() {
        let navigator = build(Some(Arc::new(ManualProvider::default())), None);

        let result = navigator.simulate_route(route(), None);
        assert!(matches!(result, Err(NavigatorError::Simulation(_))));
        assert!(!navigator.is_simulating());
    }

    #[test]
    fn test_start_errors_are_flattened() {
        let navigator = build(Some(Arc::new(ManualProvider::default())), None);
        let result = pollster::block_on(navigator.start_navigation(route(), None));
        assert!(matches!(result, Err(NavigatorError::UserLocationUnknown)));

        let navigator = build(Some(Arc::new(DeniedProvider)), None);
        let result = pollster::block_on(navigator.start_navigation(route(), None));
        assert!(matches!(result, Err(NavigatorError::LocationPermissionDenied)));
        assert!(navigator.current_state().is_idle());
    }

    #[test]
    fn test_route_request_runs_on_the_navigator_runtime() {
        let navigator = build(None, None);
        let origin = UserLocation::at(START);
        let waypoints = route().waypoints;

        let result = pollster::block_on(navigator.get_routes(origin, waypoints));
        assert!(matches!(result, Err(NavigatorError::InvalidRequestUrl(_))));

        let result = pollster::block_on(navigator.get_routes(origin, vec![]));
        assert!(matches!(result, Err(NavigatorError::NoWaypoints)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Navigator::new(
            Arc::new(BrokenAdapter),
            Arc::new(DistanceToEnd),
            None,
            None,
            Some(r#"{"simulation": {"warp_factor": 0.0}}"#.into()),
        );
        assert!(matches!(result, Err(NavigatorError::Configuration(_))));
    }

    #[test]
    fn test_warp_factor_is_validated() {
        let navigator = build(None, None);
        assert!(navigator.set_warp_factor(8.0).is_ok());
        assert!(matches!(
            navigator.set_warp_factor(-1.0),
            Err(NavigatorError::Simulation(_))
        ));
    }
}
