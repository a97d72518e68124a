//! # wayline-core
//!
//! The navigation session orchestrator: owns the authoritative trip state,
//! drives it from location fixes, requests and recalculates routes, and can
//! simulate a drive along a route without positioning hardware.
//!
//! Route geometry, snapping and deviation classification are delegated to a
//! [`wayline_route::RouteEngine`]; this crate only coordinates.

pub mod config;
pub mod error;
pub mod location;
pub mod navigation;
pub mod routing;
pub mod simulation;

pub use config::{NavigationControllerConfig, RecalculationMode, SimulationConfig, TransportConfig};
pub use error::{
    ConfigError, LocationError, NavigationError, NavigationResult, RouteRequestError,
    SimulationError,
};
pub use location::{
    LocationFix, LocationProvider, LocationSink, SimulatedLocationProvider,
    StaticLocationProvider,
};
pub use navigation::{
    AutoRecalculate, ManualRecalculation, NavigationController, NavigationControllerBuilder,
    NavigationObserver, RecalculationRequest, RecalculationStrategy,
};
pub use routing::{ReqwestTransport, RouteRequester};
pub use simulation::{SimulationEngine, SimulationListener, SimulationState};

// The shared model, so front-ends need a single dependency.
pub use wayline_route as route;
