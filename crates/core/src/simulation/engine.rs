use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use wayline_route::{GeographicCoordinate, Route};

use crate::config::SimulationConfig;
use crate::error::{SimulationError, SimulationResult};
use crate::simulation::SimulationState;

/// Receives every state the timed loop publishes, in tick order.
///
/// The completion tick carries the final location again, so a drive along
/// `n` points delivers the last point twice: once on arrival and once with
/// `complete` set.
pub trait SimulationListener: Send + Sync {
    fn on_simulation_state(&self, state: &SimulationState);
}

struct Publisher {
    /// Bumped by every start and stop; loops from older generations exit.
    generation: u64,
    task: Option<JoinHandle<()>>,
    listener: Option<Arc<dyn SimulationListener>>,
}

struct Shared {
    warp_factor_bits: AtomicU64,
    publisher: Mutex<Publisher>,
    state_tx: watch::Sender<Option<SimulationState>>,
}

impl Shared {
    fn publisher(&self) -> MutexGuard<'_, Publisher> {
        self.publisher.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn warp_factor(&self) -> f64 {
        f64::from_bits(self.warp_factor_bits.load(Ordering::Acquire))
    }

    /// Returns `false` once `generation` has been superseded.
    fn publish(&self, generation: u64, state: &SimulationState) -> bool {
        let publisher = self.publisher();
        if publisher.generation != generation {
            return false;
        }

        self.state_tx.send_replace(Some(state.clone()));
        if let Some(listener) = &publisher.listener {
            listener.on_simulation_state(state);
        }
        true
    }
}

/// Plays a route back as a timed sequence of fixes.
///
/// At most one loop runs per engine. Starting again replaces the running
/// loop, and no state is published after [`SimulationEngine::stop_simulation`]
/// returns.
pub struct SimulationEngine {
    runtime: Handle,
    config: SimulationConfig,
    shared: Arc<Shared>,
}

impl SimulationEngine {
    pub fn new(runtime: Handle, config: SimulationConfig) -> Self {
        let (state_tx, _) = watch::channel(None);

        Self {
            runtime,
            config,
            shared: Arc::new(Shared {
                warp_factor_bits: AtomicU64::new(config.warp_factor.to_bits()),
                publisher: Mutex::new(Publisher {
                    generation: 0,
                    task: None,
                    listener: None,
                }),
                state_tx,
            }),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn SimulationListener>>) {
        self.shared.publisher().listener = listener;
    }

    /// Resample `route` and start ticking along it.
    ///
    /// `sampling_distance` falls back to the configured default.
    pub fn start_simulation(
        &self,
        route: &Route,
        sampling_distance: Option<f64>,
    ) -> SimulationResult<SimulationState> {
        let state = SimulationState::from_route(
            route,
            sampling_distance.unwrap_or(self.config.sampling_distance),
        )?;
        self.start_with_state(state)
    }

    pub fn start_with_coordinates(
        &self,
        coordinates: &[GeographicCoordinate],
        sampling_distance: Option<f64>,
    ) -> SimulationResult<SimulationState> {
        let state = SimulationState::from_coordinates(
            coordinates,
            sampling_distance.unwrap_or(self.config.sampling_distance),
        )?;
        self.start_with_state(state)
    }

    fn start_with_state(&self, state: SimulationState) -> SimulationResult<SimulationState> {
        let warp_factor = self.shared.warp_factor();
        if !(warp_factor > 0.0 && warp_factor.is_finite()) {
            return Err(SimulationError::InvalidWarpFactor(warp_factor));
        }
        if self.config.base_tick_ms == 0 {
            return Err(SimulationError::Construction(
                "base tick must be non-zero".into(),
            ));
        }

        let base_tick = self.config.base_tick();
        let state = state.with_tick(base_tick);

        let mut publisher = self.shared.publisher();
        publisher.generation += 1;
        if let Some(task) = publisher.task.take() {
            task.abort();
        }

        let generation = publisher.generation;
        self.shared.state_tx.send_replace(Some(state.clone()));
        info!(
            generation,
            advances = state.remaining_advances(),
            distance_m = state.remaining_distance,
            "starting location simulation"
        );

        publisher.task = Some(self.runtime.spawn(run_loop(
            Arc::clone(&self.shared),
            generation,
            state.clone(),
            base_tick,
        )));

        Ok(state)
    }

    /// Cancel the running loop, if any.
    pub fn stop_simulation(&self) {
        let mut publisher = self.shared.publisher();
        publisher.generation += 1;
        if let Some(task) = publisher.task.take() {
            task.abort();
            debug!(generation = publisher.generation, "location simulation stopped");
        }
    }

    /// Takes effect from the next scheduled tick.
    pub fn set_warp_factor(&self, warp_factor: f64) -> SimulationResult<()> {
        if !(warp_factor > 0.0 && warp_factor.is_finite()) {
            return Err(SimulationError::InvalidWarpFactor(warp_factor));
        }
        self.shared
            .warp_factor_bits
            .store(warp_factor.to_bits(), Ordering::Release);
        Ok(())
    }

    pub fn warp_factor(&self) -> f64 {
        self.shared.warp_factor()
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .publisher()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn current_state(&self) -> Option<SimulationState> {
        self.shared.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SimulationState>> {
        self.shared.state_tx.subscribe()
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.stop_simulation();
    }
}

async fn run_loop(
    shared: Arc<Shared>,
    generation: u64,
    mut state: SimulationState,
    base_tick: Duration,
) {
    let mut ticks: u64 = 0;

    loop {
        let period = base_tick.div_f64(shared.warp_factor());
        tokio::time::sleep(period).await;

        state = state.advance();
        if !shared.publish(generation, &state) {
            debug!(generation, ticks, "simulation loop superseded");
            return;
        }
        ticks += 1;

        if state.complete {
            info!(generation, ticks, "location simulation complete");
            return;
        }

        debug!(
            generation,
            ticks,
            remaining_m = state.remaining_distance,
            "simulated fix published"
        );
    }
}
