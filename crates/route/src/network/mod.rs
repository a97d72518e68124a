pub mod traits;

pub use traits::{RouteTransport, TransportError, TransportFuture, TransportResponse};
