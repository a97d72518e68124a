//! Route requests: ask the adapter for a request, run it through the
//! transport once, and decode the answer.

mod transport;

pub use transport::ReqwestTransport;

use std::sync::Arc;

use tracing::{debug, warn};
use wayline_route::{Route, RouteAdapter, RouteTransport, UserLocation, Waypoint};

use crate::error::{RouteRequestError, RouteRequestResult};

#[derive(Clone)]
pub struct RouteRequester {
    adapter: Arc<dyn RouteAdapter>,
    transport: Arc<dyn RouteTransport>,
}

impl RouteRequester {
    pub fn new(adapter: Arc<dyn RouteAdapter>, transport: Arc<dyn RouteTransport>) -> Self {
        Self { adapter, transport }
    }

    pub fn adapter(&self) -> &Arc<dyn RouteAdapter> {
        &self.adapter
    }

    /// Fetch candidate routes from `origin` through `waypoints`.
    ///
    /// The request is executed exactly once. Non-2xx responses are reported
    /// as [`RouteRequestError::HttpStatus`] and their body is never parsed.
    pub async fn get_routes(
        &self,
        origin: &UserLocation,
        waypoints: &[Waypoint],
    ) -> RouteRequestResult<Vec<Route>> {
        if waypoints.is_empty() {
            return Err(RouteRequestError::NoWaypoints);
        }

        let request = self.adapter.generate_request(origin, waypoints)?;
        validate_url(request.url())?;

        debug!(url = request.url(), waypoints = waypoints.len(), "requesting routes");
        let response = self.transport.execute(&request).await.map_err(|error| {
            warn!(url = request.url(), %error, "route request failed");
            RouteRequestError::Transport(error)
        })?;

        if !response.is_success() {
            warn!(url = request.url(), status = response.status, "routing server rejected request");
            return Err(RouteRequestError::HttpStatus(response.status));
        }

        let routes = self.adapter.parse_response(&response.body)?;
        debug!(routes = routes.len(), bytes = response.body.len(), "route response decoded");
        Ok(routes)
    }
}

fn validate_url(url: &str) -> RouteRequestResult<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|error| RouteRequestError::InvalidRequestUrl(format!("{url}: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(RouteRequestError::InvalidRequestUrl(format!(
            "{url}: unsupported scheme {scheme}"
        ))),
    }
}
