//! Location primitives shared by every component.

use std::time::SystemTime;

// ============================================================================
// Coordinates
// ============================================================================

/// A WGS84 coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct GeographicCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl GeographicCoordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<GeographicCoordinate> for geo::Point {
    fn from(value: GeographicCoordinate) -> Self {
        geo::Point::new(value.lng, value.lat)
    }
}

impl From<GeographicCoordinate> for geo::Coord {
    fn from(value: GeographicCoordinate) -> Self {
        geo::Coord {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl From<geo::Point> for GeographicCoordinate {
    fn from(value: geo::Point) -> Self {
        Self::new(value.y(), value.x())
    }
}

impl From<geo::Coord> for GeographicCoordinate {
    fn from(value: geo::Coord) -> Self {
        Self::new(value.y, value.x)
    }
}

// ============================================================================
// Motion
// ============================================================================

/// Direction of travel in degrees clockwise from true north.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct CourseOverGround {
    /// Always in `[0, 360)`.
    pub degrees: f64,
    /// Estimated accuracy in degrees, if the source reports one.
    pub accuracy: Option<f64>,
}

impl CourseOverGround {
    pub fn new(degrees: f64, accuracy: Option<f64>) -> Self {
        Self {
            degrees: degrees.rem_euclid(360.0),
            accuracy,
        }
    }
}

/// Ground speed in meters per second.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Speed {
    pub value: f64,
    pub accuracy: Option<f64>,
}

/// A single timestamped location fix.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct UserLocation {
    pub coordinates: GeographicCoordinate,
    /// Horizontal accuracy radius in meters (never negative).
    pub horizontal_accuracy: f64,
    pub course_over_ground: Option<CourseOverGround>,
    pub speed: Option<Speed>,
    pub timestamp: SystemTime,
}

impl UserLocation {
    /// A fix at `coordinates` with perfect accuracy, taken now.
    pub fn at(coordinates: GeographicCoordinate) -> Self {
        Self {
            coordinates,
            horizontal_accuracy: 0.0,
            course_over_ground: None,
            speed: None,
            timestamp: SystemTime::now(),
        }
    }

    pub fn with_accuracy(mut self, horizontal_accuracy: f64) -> Self {
        self.horizontal_accuracy = horizontal_accuracy.max(0.0);
        self
    }

    pub fn with_course(mut self, course_over_ground: CourseOverGround) -> Self {
        self.course_over_ground = Some(course_over_ground);
        self
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = Some(speed);
        self
    }
}

// ============================================================================
// Waypoints
// ============================================================================

/// How the router should treat a waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum WaypointKind {
    /// The traveler stops here; the route is split into legs at this point.
    #[default]
    Break,
    /// The route passes through this point without starting a new leg.
    Via,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Waypoint {
    pub coordinate: GeographicCoordinate,
    pub kind: WaypointKind,
}

impl Waypoint {
    pub fn new(coordinate: GeographicCoordinate, kind: WaypointKind) -> Self {
        Self { coordinate, kind }
    }
}
