use thiserror::Error;
use wayline_route::{RouteEngineError, TransportError};

/// Failures of the location source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location services are disabled")]
    ServicesDisabled,

    #[error("location permission denied")]
    PermissionDenied,
}

/// Failures of a single route request.
///
/// Each variant is a condition a front-end can render differently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteRequestError {
    #[error("at least one waypoint is required")]
    NoWaypoints,

    #[error("route engine produced an invalid request URL: {0}")]
    InvalidRequestUrl(String),

    #[error("routing server responded with HTTP {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Engine(#[from] RouteEngineError),

    #[error("no route is available for the requested waypoints")]
    NoRoutes,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("cannot start navigation: {0}")]
    LocationServicesDisabled(#[from] LocationError),

    #[error("the user's location is not known yet")]
    UserLocationUnknown,

    #[error("no navigation session is active")]
    NotNavigating,

    #[error("route request failed: {0}")]
    RouteRequest(#[from] RouteRequestError),

    #[error("navigation controller is no longer running")]
    ControllerUnavailable,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("cannot build simulation: {0}")]
    Construction(String),

    #[error("warp factor must be positive and finite, got {0}")]
    InvalidWarpFactor(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type NavigationResult<T> = Result<T, NavigationError>;
pub type RouteRequestResult<T> = Result<T, RouteRequestError>;
pub type SimulationResult<T> = Result<T, SimulationError>;
