//! # wayline-route
//!
//! Shared trip model and Route Engine contracts for turn-by-turn navigation.
//!
//! ## Features
//!
//! - **Trip state model**: routes, steps, instructions and the [`TripState`] snapshot
//! - **Engine contracts**: the request/response adapter and per-session controller
//!   traits a routing backend implements
//! - **Pluggable transport**: implement [`RouteTransport`] (or pass a closure) to
//!   execute route requests
//! - **Geodesy helpers**: haversine distances, bearings and line resampling
//!
//! ## Example
//!
//! ```
//! use wayline_route::prelude::*;
//!
//! let step = Step {
//!     geometry: vec![
//!         GeographicCoordinate::new(40.7505, -73.9935),
//!         GeographicCoordinate::new(40.7527, -73.9772),
//!     ],
//!     distance: 1400.0,
//!     duration: 300.0,
//!     road_name: Some("West 34th Street".into()),
//!     instruction: "Head east on West 34th Street".into(),
//!     visual_instructions: vec![
//!         VisualInstruction::new("Turn left onto Park Avenue", 500.0),
//!         VisualInstruction::new("Turn left now", 50.0),
//!     ],
//!     spoken_instructions: vec![],
//! };
//!
//! let active = step.active_visual_instruction(320.0).unwrap();
//! assert_eq!(active.primary_content.text, "Turn left onto Park Avenue");
//! assert!(step.active_visual_instruction(900.0).is_none());
//! ```

pub mod engine;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod spatial;

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

// Re-exports for convenience
pub mod prelude {
    pub use crate::engine::{RouteAdapter, RouteEngine, RouteEngineError, RouteRequest, RouteSession};
    pub use crate::identifiers::*;
    pub use crate::models::{config::*, route::*, trip::*, types::*};
    pub use crate::network::{RouteTransport, TransportError, TransportResponse};
}

pub use prelude::*;
