//! The single writer of the trip state.
//!
//! Every mutation (fixes, start/stop, route replacement, recalculation
//! results) is a message handled here in mailbox order, so observers and the
//! watch channel see states in commit order.

use std::sync::Arc;

use actix::{
    Actor, ActorFutureExt, AsyncContext, Context, Handler, Message, MessageResult, SpawnHandle,
    WrapFuture,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use wayline_route::{
    NavigationConfig, Route, RouteEngine, RouteSession, TripState, UserLocation, Waypoint,
};

use crate::error::{NavigationError, NavigationResult};
use crate::location::{LocationFix, LocationProvider, LocationSink};
use crate::navigation::deviation::{DeviationAction, DeviationMonitor};
use crate::navigation::{NavigationObserver, RecalculationRequest, RecalculationStrategy};

struct Session {
    generation: u64,
    route: Arc<Route>,
    waypoints: Vec<Waypoint>,
    config: NavigationConfig,
    controller: Box<dyn RouteSession>,
}

pub(crate) struct NavigationActor {
    engine: Arc<dyn RouteEngine>,
    provider: Arc<dyn LocationProvider>,
    strategy: Arc<dyn RecalculationStrategy>,
    observers: Vec<Arc<dyn NavigationObserver>>,
    state_tx: watch::Sender<TripState>,

    /// Bumped whenever a session starts or ends.
    generation: u64,
    session: Option<Session>,
    last_location: Option<UserLocation>,
    deviation: DeviationMonitor,
    recalculation: Option<SpawnHandle>,
}

impl NavigationActor {
    pub(crate) fn new(
        engine: Arc<dyn RouteEngine>,
        provider: Arc<dyn LocationProvider>,
        strategy: Arc<dyn RecalculationStrategy>,
        observers: Vec<Arc<dyn NavigationObserver>>,
        state_tx: watch::Sender<TripState>,
    ) -> Self {
        Self {
            engine,
            provider,
            strategy,
            observers,
            state_tx,
            generation: 0,
            session: None,
            last_location: None,
            deviation: DeviationMonitor::default(),
            recalculation: None,
        }
    }

    fn current_state(&self) -> TripState {
        self.state_tx.borrow().clone()
    }

    /// The newer of the provider's last fix and the last fix pushed to us.
    fn last_known_location(&self) -> Option<UserLocation> {
        match (self.provider.last_location(), self.last_location) {
            (Some(provided), Some(received)) if received.timestamp > provided.timestamp => {
                Some(received)
            }
            (provided, received) => provided.or(received),
        }
    }

    fn commit(&mut self, state: TripState, ctx: &mut Context<Self>) {
        self.state_tx.send_replace(state.clone());
        for observer in &self.observers {
            observer.on_state_changed(&state);
        }
        self.check_deviation(&state, ctx);
    }

    /// Drop the live session and publish `Idle`.
    ///
    /// The provider keeps running when another session is about to take
    /// over, since `start_updates` replaces its sink.
    fn end_session(&mut self, stop_provider: bool, ctx: &mut Context<Self>) {
        self.cancel_recalculation(ctx);
        self.deviation.reset();
        self.generation += 1;

        if let Some(session) = self.session.take() {
            if stop_provider {
                self.provider.stop_updates();
            }
            info!(generation = session.generation, route = %session.route.id, "navigation stopped");
        }

        if !self.state_tx.borrow().is_idle() {
            self.commit(TripState::Idle, ctx);
        }
    }

    fn start(
        &mut self,
        route: Route,
        config: NavigationConfig,
        ctx: &mut Context<Self>,
    ) -> NavigationResult<TripState> {
        let restarting = self.session.is_some();
        if restarting {
            self.end_session(false, ctx);
        }

        let location = self
            .last_known_location()
            .ok_or(NavigationError::UserLocationUnknown)?;

        self.generation += 1;
        let generation = self.generation;
        let sink = LocationSink::new(generation, ctx.address().recipient());
        if let Err(error) = self.provider.start_updates(sink) {
            warn!(generation, %error, "location provider refused to start");
            if restarting {
                // Still running for the session that just ended.
                self.provider.stop_updates();
            }
            return Err(error.into());
        }

        let route = Arc::new(route);
        let controller = self.engine.create_session(route.clone(), &config);
        let state = controller.initial_state(&location);
        info!(
            generation,
            route = %route.id,
            steps = route.steps.len(),
            distance_m = route.distance,
            "navigation started"
        );

        self.session = Some(Session {
            generation,
            waypoints: route.waypoints.clone(),
            route,
            config,
            controller,
        });
        self.last_location = Some(location);
        self.commit(state.clone(), ctx);
        Ok(state)
    }

    fn replace_route(
        &mut self,
        route: Route,
        config: Option<NavigationConfig>,
        ctx: &mut Context<Self>,
    ) -> NavigationResult<TripState> {
        if !self.state_tx.borrow().is_navigating() {
            return Err(NavigationError::NotNavigating);
        }
        let location = self.last_location.or_else(|| self.last_known_location());
        let Some(session) = self.session.as_mut() else {
            return Err(NavigationError::NotNavigating);
        };
        let location = location.ok_or(NavigationError::UserLocationUnknown)?;

        if let Some(config) = config {
            session.config = config;
        }
        let route = Arc::new(route);
        session.controller = self.engine.create_session(route.clone(), &session.config);
        session.route = route.clone();
        let state = session.controller.initial_state(&location);
        info!(
            generation = session.generation,
            route = %route.id,
            steps = route.steps.len(),
            "route replaced"
        );

        self.commit(state.clone(), ctx);
        for observer in &self.observers {
            observer.on_route_replaced(&route, &state);
        }
        Ok(state)
    }

    fn check_deviation(&mut self, state: &TripState, ctx: &mut Context<Self>) {
        match self.deviation.observe(state) {
            DeviationAction::None => {}
            DeviationAction::EpisodeEnded { episode } => {
                debug!(episode, "back on route");
                self.cancel_recalculation(ctx);
            }
            DeviationAction::Recalculate {
                episode,
                deviation_from_route_line,
            } => self.start_recalculation(episode, deviation_from_route_line, ctx),
        }
    }

    fn start_recalculation(
        &mut self,
        episode: u64,
        deviation_from_route_line: f64,
        ctx: &mut Context<Self>,
    ) {
        let (Some(session), Some(location)) = (&self.session, self.last_location) else {
            return;
        };
        let generation = session.generation;
        let request = RecalculationRequest {
            location,
            route: session.route.clone(),
            waypoints: session.waypoints.clone(),
            deviation_from_route_line,
        };

        self.cancel_recalculation(ctx);
        info!(generation, episode, deviation_m = deviation_from_route_line, "user is off route");
        for observer in &self.observers {
            observer.on_off_route(&request);
        }

        let Some(future) = self.strategy.recalculate(&request) else {
            debug!(generation, episode, "recalculation left to the UI");
            return;
        };
        for observer in &self.observers {
            observer.on_recalculation_started(&request);
        }

        let handle = ctx.spawn(future.into_actor(self).map(move |result, actor, ctx| {
            actor.finish_recalculation(generation, episode, result, ctx);
        }));
        self.recalculation = Some(handle);
    }

    fn finish_recalculation(
        &mut self,
        generation: u64,
        episode: u64,
        result: NavigationResult<Route>,
        ctx: &mut Context<Self>,
    ) {
        self.recalculation = None;

        let live = self
            .session
            .as_ref()
            .is_some_and(|session| session.generation == generation);
        if !live || !self.deviation.is_current(episode) {
            debug!(generation, episode, "discarding stale recalculation result");
            return;
        }

        let outcome = result.and_then(|route| self.replace_route(route, None, ctx));
        if let Err(error) = outcome {
            error!(generation, episode, %error, "route recalculation failed");
            for observer in &self.observers {
                observer.on_recalculation_failed(&error);
            }
        }
    }

    fn cancel_recalculation(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.recalculation.take() {
            ctx.cancel_future(handle);
            debug!("in-flight recalculation cancelled");
        }
    }
}

impl Actor for NavigationActor {
    type Context = Context<Self>;

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if self.session.take().is_some() {
            self.provider.stop_updates();
        }
        debug!("navigation actor stopped");
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "NavigationResult<TripState>")]
pub(crate) struct StartNavigation {
    pub route: Route,
    pub config: NavigationConfig,
}

impl Handler<StartNavigation> for NavigationActor {
    type Result = NavigationResult<TripState>;

    fn handle(&mut self, msg: StartNavigation, ctx: &mut Self::Context) -> Self::Result {
        self.start(msg.route, msg.config, ctx)
    }
}

#[derive(Message)]
#[rtype(result = "TripState")]
pub(crate) struct StopNavigation;

impl Handler<StopNavigation> for NavigationActor {
    type Result = MessageResult<StopNavigation>;

    fn handle(&mut self, _msg: StopNavigation, ctx: &mut Self::Context) -> Self::Result {
        self.end_session(true, ctx);
        MessageResult(self.current_state())
    }
}

#[derive(Message)]
#[rtype(result = "NavigationResult<TripState>")]
pub(crate) struct ReplaceRoute {
    pub route: Route,
    pub config: Option<NavigationConfig>,
}

impl Handler<ReplaceRoute> for NavigationActor {
    type Result = NavigationResult<TripState>;

    fn handle(&mut self, msg: ReplaceRoute, ctx: &mut Self::Context) -> Self::Result {
        // The caller's route wins over anything still being computed.
        self.cancel_recalculation(ctx);
        self.replace_route(msg.route, msg.config, ctx)
    }
}

#[derive(Message)]
#[rtype(result = "NavigationResult<TripState>")]
pub(crate) struct AdvanceToNextStep;

impl Handler<AdvanceToNextStep> for NavigationActor {
    type Result = NavigationResult<TripState>;

    fn handle(&mut self, _msg: AdvanceToNextStep, ctx: &mut Self::Context) -> Self::Result {
        let current = self.current_state();
        let Some(session) = self.session.as_ref().filter(|_| current.is_navigating()) else {
            return Err(NavigationError::NotNavigating);
        };

        let next = session.controller.advance_to_next_step(&current);
        if !current.allows_session_transition_to(&next) {
            warn!(from = current.kind(), to = next.kind(), "dropping invalid trip state transition");
            return Ok(current);
        }
        debug!(remaining_steps = next.remaining_steps().len(), "advanced to next step");
        self.commit(next.clone(), ctx);
        Ok(next)
    }
}

impl Handler<LocationFix> for NavigationActor {
    type Result = ();

    fn handle(&mut self, msg: LocationFix, ctx: &mut Self::Context) {
        if let Some(generation) = msg.generation
            && generation != self.generation
        {
            debug!(generation, current = self.generation, "dropping fix from a stale session");
            return;
        }
        self.last_location = Some(msg.location);

        let current = self.current_state();
        let Some(session) = self.session.as_ref().filter(|_| current.is_navigating()) else {
            return;
        };

        let Some(next) = session.controller.advance(&msg.location, &current) else {
            return;
        };
        if !current.allows_session_transition_to(&next) {
            warn!(from = current.kind(), to = next.kind(), "dropping invalid trip state transition");
            return;
        }

        if next.is_complete() {
            info!(generation = session.generation, "destination reached");
        } else {
            debug!(
                distance_to_maneuver_m = next.distance_to_next_maneuver(),
                remaining_steps = next.remaining_steps().len(),
                "trip state advanced"
            );
        }
        self.commit(next, ctx);
    }
}

/// Resolves once every message queued before it has been handled.
#[cfg(test)]
#[derive(Message)]
#[rtype(result = "()")]
pub(crate) struct Flush;

#[cfg(test)]
impl Handler<Flush> for NavigationActor {
    type Result = ();

    fn handle(&mut self, _msg: Flush, _ctx: &mut Self::Context) {}
}
