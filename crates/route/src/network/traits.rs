//! Pluggable transport for route requests.
//!
//! Front-ends implement [`RouteTransport`] to use their own HTTP stack, or
//! pass a closure returning a future.

use std::future::Future;
use std::pin::Pin;

use crate::engine::RouteRequest;

/// Raw outcome of a request that reached the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Other(String),
}

pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + 'a>>;

/// Execute a route request and return the response
pub trait RouteTransport: Send + Sync {
    fn execute<'a>(&'a self, request: &'a RouteRequest) -> TransportFuture<'a>;
}

impl<F, Fut> RouteTransport for F
where
    F: Fn(RouteRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse, TransportError>> + Send + 'static,
{
    fn execute<'a>(&'a self, request: &'a RouteRequest) -> TransportFuture<'a> {
        Box::pin(self(request.clone()))
    }
}
