use std::sync::Arc;
use std::sync::mpsc;

use actix::{Actor, Addr, Handler, Message, System};
use tokio::sync::watch;
use tracing::{debug, error};
use wayline_route::{NavigationConfig, Route, RouteEngine, TripState, UserLocation, Waypoint};

use crate::config::NavigationControllerConfig;
use crate::error::{NavigationError, NavigationResult, RouteRequestResult};
use crate::location::{LocationFix, LocationProvider};
use crate::navigation::actor::{
    AdvanceToNextStep, NavigationActor, ReplaceRoute, StartNavigation, StopNavigation,
};
use crate::navigation::{NavigationObserver, RecalculationStrategy, strategy_for};
use crate::routing::RouteRequester;

struct Inner {
    addr: Addr<NavigationActor>,
    system: System,
    state_rx: watch::Receiver<TripState>,
    requester: RouteRequester,
    config: NavigationControllerConfig,
}

impl Drop for Inner {
    fn drop(&mut self) {
        debug!("shutting down navigation thread");
        self.system.stop();
    }
}

/// Cloneable handle to a navigation session actor.
///
/// The actor runs on its own thread and is shut down when the last handle
/// is dropped. All methods may be called from any thread or executor.
#[derive(Clone)]
pub struct NavigationController {
    inner: Arc<Inner>,
}

impl NavigationController {
    pub fn builder(
        requester: RouteRequester,
        engine: Arc<dyn RouteEngine>,
        provider: Arc<dyn LocationProvider>,
    ) -> NavigationControllerBuilder {
        NavigationControllerBuilder {
            requester,
            engine,
            provider,
            observers: Vec::new(),
            recalculation: None,
            config: NavigationControllerConfig::default(),
        }
    }

    async fn send<M>(&self, msg: M) -> NavigationResult<M::Result>
    where
        M: Message + Send + 'static,
        M::Result: Send,
        NavigationActor: Handler<M>,
    {
        self.inner
            .addr
            .send(msg)
            .await
            .map_err(|_| NavigationError::ControllerUnavailable)
    }

    /// Fetch candidate routes. Does not touch the session.
    pub async fn get_routes(
        &self,
        origin: &UserLocation,
        waypoints: &[Waypoint],
    ) -> RouteRequestResult<Vec<Route>> {
        self.inner.requester.get_routes(origin, waypoints).await
    }

    /// Start following `route`, replacing any live session.
    ///
    /// `config` falls back to the controller's default navigation config.
    pub async fn start_navigation(
        &self,
        route: Route,
        config: Option<NavigationConfig>,
    ) -> NavigationResult<TripState> {
        let config = config.unwrap_or_else(|| self.inner.config.navigation.clone());
        self.send(StartNavigation { route, config }).await?
    }

    /// End the session. Calling it again is a no-op that still yields `Idle`.
    pub async fn stop_navigation(&self) -> NavigationResult<TripState> {
        self.send(StopNavigation).await
    }

    /// Swap the live session's route without passing through `Idle`.
    ///
    /// `config` defaults to the config the session is using.
    pub async fn replace_route(
        &self,
        route: Route,
        config: Option<NavigationConfig>,
    ) -> NavigationResult<TripState> {
        self.send(ReplaceRoute { route, config }).await?
    }

    pub async fn advance_to_next_step(&self) -> NavigationResult<TripState> {
        self.send(AdvanceToNextStep).await?
    }

    /// Push a fix from outside the location provider.
    pub fn update_location(&self, location: UserLocation) {
        self.inner.addr.do_send(LocationFix {
            generation: None,
            location,
        });
    }

    pub fn current_state(&self) -> TripState {
        self.inner.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TripState> {
        self.inner.state_rx.clone()
    }

    pub fn config(&self) -> &NavigationControllerConfig {
        &self.inner.config
    }

    #[cfg(test)]
    pub(crate) async fn flush(&self) {
        self.send(crate::navigation::actor::Flush).await.unwrap();
    }
}

pub struct NavigationControllerBuilder {
    requester: RouteRequester,
    engine: Arc<dyn RouteEngine>,
    provider: Arc<dyn LocationProvider>,
    observers: Vec<Arc<dyn NavigationObserver>>,
    recalculation: Option<Arc<dyn RecalculationStrategy>>,
    config: NavigationControllerConfig,
}

impl NavigationControllerBuilder {
    pub fn observer(mut self, observer: Arc<dyn NavigationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Override the strategy picked from `config.recalculation`.
    pub fn recalculation(mut self, strategy: Arc<dyn RecalculationStrategy>) -> Self {
        self.recalculation = Some(strategy);
        self
    }

    pub fn config(mut self, config: NavigationControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the session actor on a dedicated thread.
    pub fn spawn(self) -> NavigationResult<NavigationController> {
        let strategy = self
            .recalculation
            .unwrap_or_else(|| strategy_for(self.config.recalculation, &self.requester));
        let (state_tx, state_rx) = watch::channel(TripState::Idle);
        let actor = NavigationActor::new(
            self.engine,
            self.provider,
            strategy,
            self.observers,
            state_tx,
        );

        let (sender, receiver) = mpsc::channel();
        std::thread::Builder::new()
            .name("wayline-navigation".into())
            .spawn(move || {
                let runner = System::new();
                let addr = runner.block_on(async move { actor.start() });
                if sender.send((addr, System::current())).is_err() {
                    return;
                }
                if let Err(error) = runner.run() {
                    error!(%error, "navigation thread exited with an error");
                }
            })
            .map_err(|error| {
                error!(%error, "failed to spawn navigation thread");
                NavigationError::ControllerUnavailable
            })?;

        let (addr, system) = receiver
            .recv()
            .map_err(|_| NavigationError::ControllerUnavailable)?;

        Ok(NavigationController {
            inner: Arc::new(Inner {
                addr,
                system,
                state_rx,
                requester: self.requester,
                config: self.config,
            }),
        })
    }
}
