pub mod traits;

pub use traits::{RouteAdapter, RouteEngine, RouteEngineError, RouteRequest, RouteSession};
