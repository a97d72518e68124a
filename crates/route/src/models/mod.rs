pub mod config;
pub mod route;
pub mod trip;
pub mod types;

pub use config::{NavigationConfig, RouteDeviationTracking, StepAdvanceMode};
pub use route::{Route, SpokenInstruction, Step, VisualInstruction, VisualInstructionContent};
pub use trip::{DeviationStatus, TripState};
pub use types::{CourseOverGround, GeographicCoordinate, Speed, UserLocation, Waypoint, WaypointKind};
