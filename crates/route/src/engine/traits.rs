//! Contracts implemented by a routing backend.
//!
//! The navigation core never computes geometry itself. It asks a
//! [`RouteAdapter`] to describe and decode route requests, and a
//! [`RouteEngine`] to create one [`RouteSession`] per navigation session.
//! None of the session methods perform I/O.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{NavigationConfig, Route, TripState, UserLocation, Waypoint};

// ============================================================================
// Requests
// ============================================================================

/// A transport-agnostic description of a route request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum RouteRequest {
    HttpPost {
        url: String,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    },
    HttpGet {
        url: String,
        headers: HashMap<String, String>,
    },
}

impl RouteRequest {
    pub fn url(&self) -> &str {
        match self {
            RouteRequest::HttpPost { url, .. } | RouteRequest::HttpGet { url, .. } => url,
        }
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        match self {
            RouteRequest::HttpPost { headers, .. } | RouteRequest::HttpGet { headers, .. } => {
                headers
            }
        }
    }

    pub fn body(&self) -> Option<&[u8]> {
        match self {
            RouteRequest::HttpPost { body, .. } => Some(body),
            RouteRequest::HttpGet { .. } => None,
        }
    }
}

// ============================================================================
// Engine traits
// ============================================================================

/// Builds requests for, and decodes responses from, a routing backend.
pub trait RouteAdapter: Send + Sync {
    fn generate_request(
        &self,
        user_location: &UserLocation,
        waypoints: &[Waypoint],
    ) -> Result<RouteRequest>;

    /// Decode a successful response body. Routes are returned in the backend's
    /// order; the first one is the conventional default.
    fn parse_response(&self, response: &[u8]) -> Result<Vec<Route>>;
}

/// Factory for per-session controllers.
pub trait RouteEngine: Send + Sync {
    fn create_session(&self, route: Arc<Route>, config: &NavigationConfig) -> Box<dyn RouteSession>;
}

/// Route-bound controller that turns fixes into trip states.
pub trait RouteSession: Send {
    /// The state to show before any further fix arrives.
    fn initial_state(&self, location: &UserLocation) -> TripState;

    /// Advance `state` with a new fix.
    ///
    /// `None` means the fix did not change anything worth publishing (for
    /// example an implausible jump). It is not an error.
    fn advance(&self, location: &UserLocation, state: &TripState) -> Option<TripState>;

    /// Skip to the next step regardless of location.
    fn advance_to_next_step(&self, state: &TripState) -> TripState;
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum RouteEngineError {
    #[error("Invalid route engine configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Failed to parse route response: {message}")]
    Parse { message: String },
}

impl RouteEngineError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

// Foreign implementations of the engine traits can fail in ways Rust does not model.
#[cfg(feature = "uniffi")]
impl From<uniffi::UnexpectedUniFFICallbackError> for RouteEngineError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::invalid_configuration(error.reason)
    }
}

pub type Result<T> = std::result::Result<T, RouteEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RouteEngineError::parse("unexpected end of input").to_string(),
            "Failed to parse route response: unexpected end of input"
        );
    }

    #[test]
    fn test_request_accessors() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let post = RouteRequest::HttpPost {
            url: "https://routing.example.com/route".into(),
            headers: headers.clone(),
            body: b"{}".to_vec(),
        };
        let get = RouteRequest::HttpGet {
            url: "https://routing.example.com/route?from=a".into(),
            headers,
        };

        assert_eq!(post.url(), "https://routing.example.com/route");
        assert_eq!(post.body(), Some(&b"{}"[..]));
        assert_eq!(get.body(), None);
        assert_eq!(get.headers().get("Content-Type").unwrap(), "application/json");
    }
}
