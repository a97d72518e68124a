use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;
use wayline_route::{GeographicCoordinate, Route, UserLocation};

use crate::config::SimulationConfig;
use crate::error::{LocationError, SimulationResult};
use crate::location::{LocationProvider, LocationSink};
use crate::simulation::{SimulationEngine, SimulationListener, SimulationState};

/// Forwards simulated fixes to whichever sink is active.
#[derive(Default)]
struct SinkSlot {
    sink: Mutex<Option<LocationSink>>,
}

impl SinkSlot {
    fn sink(&self) -> MutexGuard<'_, Option<LocationSink>> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SimulationListener for SinkSlot {
    fn on_simulation_state(&self, state: &SimulationState) {
        if let Some(sink) = self.sink().as_ref() {
            sink.push(state.current_location);
        }
    }
}

/// Location provider driven by a [`SimulationEngine`].
pub struct SimulatedLocationProvider {
    engine: SimulationEngine,
    slot: Arc<SinkSlot>,
}

impl SimulatedLocationProvider {
    pub fn new(runtime: Handle, config: SimulationConfig) -> Self {
        let engine = SimulationEngine::new(runtime, config);
        let slot = Arc::new(SinkSlot::default());
        engine.set_listener(Some(slot.clone()));

        Self { engine, slot }
    }

    /// Start playing `route` back. The starting point becomes the last
    /// known location immediately.
    pub fn simulate_route(
        &self,
        route: &Route,
        sampling_distance: Option<f64>,
    ) -> SimulationResult<SimulationState> {
        self.engine.start_simulation(route, sampling_distance)
    }

    pub fn simulate_coordinates(
        &self,
        coordinates: &[GeographicCoordinate],
        sampling_distance: Option<f64>,
    ) -> SimulationResult<SimulationState> {
        self.engine.start_with_coordinates(coordinates, sampling_distance)
    }

    pub fn stop_simulation(&self) {
        self.engine.stop_simulation();
    }

    pub fn set_warp_factor(&self, warp_factor: f64) -> SimulationResult<()> {
        self.engine.set_warp_factor(warp_factor)
    }

    pub fn is_simulating(&self) -> bool {
        self.engine.is_running()
    }

    pub fn simulation_state(&self) -> Option<SimulationState> {
        self.engine.current_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SimulationState>> {
        self.engine.subscribe()
    }
}

impl LocationProvider for SimulatedLocationProvider {
    fn last_location(&self) -> Option<UserLocation> {
        self.engine
            .current_state()
            .map(|state| state.current_location)
    }

    fn start_updates(&self, sink: LocationSink) -> Result<(), LocationError> {
        *self.slot.sink() = Some(sink);
        Ok(())
    }

    fn stop_updates(&self) {
        self.slot.sink().take();
        self.engine.stop_simulation();
    }
}
