use std::sync::Arc;

use futures_util::future::BoxFuture;
use wayline_route::{Route, UserLocation, Waypoint};

use crate::config::RecalculationMode;
use crate::error::{NavigationError, NavigationResult, RouteRequestError};
use crate::routing::RouteRequester;

/// Everything a strategy needs to find a way back.
#[derive(Clone, Debug)]
pub struct RecalculationRequest {
    /// The fix that was found to be off route.
    pub location: UserLocation,
    /// The route being followed when the episode started.
    pub route: Arc<Route>,
    /// The waypoints the session was started with.
    pub waypoints: Vec<Waypoint>,
    pub deviation_from_route_line: f64,
}

pub type RecalculationFuture = BoxFuture<'static, NavigationResult<Route>>;

/// Decides what happens when the user leaves the route.
pub trait RecalculationStrategy: Send + Sync {
    /// Return a future resolving to the replacement route, or `None` to
    /// leave the decision to the UI.
    fn recalculate(&self, request: &RecalculationRequest) -> Option<RecalculationFuture>;
}

/// Requests a new route from the current fix and takes the first result.
#[derive(Clone)]
pub struct AutoRecalculate {
    requester: RouteRequester,
}

impl AutoRecalculate {
    pub fn new(requester: RouteRequester) -> Self {
        Self { requester }
    }
}

impl RecalculationStrategy for AutoRecalculate {
    fn recalculate(&self, request: &RecalculationRequest) -> Option<RecalculationFuture> {
        let requester = self.requester.clone();
        let location = request.location;
        let waypoints = request.waypoints.clone();

        Some(Box::pin(async move {
            let routes = requester.get_routes(&location, &waypoints).await?;
            routes
                .into_iter()
                .next()
                .ok_or(NavigationError::RouteRequest(RouteRequestError::NoRoutes))
        }))
    }
}

/// Only reports deviations; the UI calls `replace_route` itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualRecalculation;

impl RecalculationStrategy for ManualRecalculation {
    fn recalculate(&self, _request: &RecalculationRequest) -> Option<RecalculationFuture> {
        None
    }
}

pub fn strategy_for(
    mode: RecalculationMode,
    requester: &RouteRequester,
) -> Arc<dyn RecalculationStrategy> {
    match mode {
        RecalculationMode::Automatic => Arc::new(AutoRecalculate::new(requester.clone())),
        RecalculationMode::Manual => Arc::new(ManualRecalculation),
    }
}
