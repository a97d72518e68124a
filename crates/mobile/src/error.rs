use wayline_core::{
    ConfigError, LocationError, NavigationError, RouteRequestError, SimulationError,
};
use wayline_route::{RouteEngineError, TransportError};

/// Every failure a front-end can observe, flattened to a message.
#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum NavigatorError {
    #[error("location services are disabled")]
    LocationServicesDisabled,

    #[error("location permission denied")]
    LocationPermissionDenied,

    #[error("the user's location is not known yet")]
    UserLocationUnknown,

    #[error("no navigation session is active")]
    NotNavigating,

    #[error("at least one waypoint is required")]
    NoWaypoints,

    #[error("no route is available for the requested waypoints")]
    NoRoutes,

    #[error("{0}")]
    InvalidRequestUrl(String),

    #[error("routing server responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    RouteEngine(String),

    #[error("{0}")]
    Simulation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("navigation controller is no longer running")]
    ControllerUnavailable,
}

impl From<LocationError> for NavigatorError {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::ServicesDisabled => Self::LocationServicesDisabled,
            LocationError::PermissionDenied => Self::LocationPermissionDenied,
        }
    }
}

impl From<RouteRequestError> for NavigatorError {
    fn from(error: RouteRequestError) -> Self {
        match error {
            RouteRequestError::NoWaypoints => Self::NoWaypoints,
            RouteRequestError::NoRoutes => Self::NoRoutes,
            RouteRequestError::InvalidRequestUrl(url) => {
                Self::InvalidRequestUrl(format!("invalid request URL: {url}"))
            }
            RouteRequestError::HttpStatus(status) => Self::HttpStatus(status),
            RouteRequestError::Transport(error) => error.into(),
            RouteRequestError::Engine(error) => error.into(),
        }
    }
}

impl From<TransportError> for NavigatorError {
    fn from(error: TransportError) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<RouteEngineError> for NavigatorError {
    fn from(error: RouteEngineError) -> Self {
        Self::RouteEngine(error.to_string())
    }
}

impl From<NavigationError> for NavigatorError {
    fn from(error: NavigationError) -> Self {
        match error {
            NavigationError::LocationServicesDisabled(error) => error.into(),
            NavigationError::UserLocationUnknown => Self::UserLocationUnknown,
            NavigationError::NotNavigating => Self::NotNavigating,
            NavigationError::RouteRequest(error) => error.into(),
            NavigationError::ControllerUnavailable => Self::ControllerUnavailable,
        }
    }
}

impl From<SimulationError> for NavigatorError {
    fn from(error: SimulationError) -> Self {
        Self::Simulation(error.to_string())
    }
}

impl From<ConfigError> for NavigatorError {
    fn from(error: ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_request_errors_are_flattened() {
        let error: NavigatorError =
            NavigationError::RouteRequest(RouteRequestError::HttpStatus(404)).into();
        assert!(matches!(error, NavigatorError::HttpStatus(404)));

        let error: NavigatorError =
            NavigationError::LocationServicesDisabled(LocationError::PermissionDenied).into();
        assert!(matches!(error, NavigatorError::LocationPermissionDenied));

        let error: NavigatorError =
            RouteRequestError::Transport(TransportError::Timeout).into();
        assert!(matches!(error, NavigatorError::Network(_)));
        assert_eq!(error.to_string(), "Request timed out");
    }

    #[test]
    fn test_engine_errors_keep_their_message() {
        let error: NavigatorError =
            RouteRequestError::Engine(RouteEngineError::parse("unexpected token")).into();
        assert_eq!(
            error.to_string(),
            "Failed to parse route response: unexpected token"
        );
    }

    #[test]
    fn test_config_errors_are_reported_as_configuration() {
        let error: NavigatorError = ConfigError::Invalid("warp_factor must be positive".into()).into();
        assert!(matches!(error, NavigatorError::Configuration(_)));
    }
}
