//! Synthetic location fixes along a route.
//!
//! [`SimulationState`] is a pure value that steps through a resampled copy of
//! a route's geometry; [`SimulationEngine`] drives it on a timer.

mod engine;

pub use engine::{SimulationEngine, SimulationListener};

use std::time::{Duration, SystemTime};

use wayline_route::spatial::{bearing, haversine_distance, line_length, resample_line};
use wayline_route::{CourseOverGround, GeographicCoordinate, Route, Speed, UserLocation};

use crate::error::{SimulationError, SimulationResult};

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    pub current_location: UserLocation,
    /// Resampled points still ahead, nearest first.
    pub remaining_locations: Vec<GeographicCoordinate>,
    /// Meters left along the resampled path.
    pub remaining_distance: f64,
    pub complete: bool,
    /// Simulated time between two points, used to derive speed.
    tick: Duration,
}

impl SimulationState {
    pub fn from_route(route: &Route, sampling_distance: f64) -> SimulationResult<Self> {
        Self::from_coordinates(&route.geometry, sampling_distance)
    }

    pub fn from_coordinates(
        coordinates: &[GeographicCoordinate],
        sampling_distance: f64,
    ) -> SimulationResult<Self> {
        if !(sampling_distance > 0.0 && sampling_distance.is_finite()) {
            return Err(SimulationError::Construction(format!(
                "sampling distance must be positive, got {sampling_distance}"
            )));
        }
        if coordinates.len() < 2 {
            return Err(SimulationError::Construction(format!(
                "route geometry needs at least two points, got {}",
                coordinates.len()
            )));
        }
        if let Some(invalid) = coordinates.iter().find(|c| !c.is_valid()) {
            return Err(SimulationError::Construction(format!(
                "invalid coordinate in route geometry: {invalid:?}"
            )));
        }

        let mut points = resample_line(coordinates, sampling_distance).into_iter();
        let Some(start) = points.next() else {
            return Err(SimulationError::Construction("route geometry is empty".into()));
        };
        let remaining_locations: Vec<_> = points.collect();
        if remaining_locations.is_empty() {
            return Err(SimulationError::Construction(
                "route geometry has zero length".into(),
            ));
        }

        let course = CourseOverGround::new(bearing(start, remaining_locations[0]), None);
        let remaining_distance = path_length(start, &remaining_locations);

        Ok(Self {
            current_location: UserLocation::at(start).with_course(course),
            remaining_locations,
            remaining_distance,
            complete: false,
            tick: Duration::from_secs(1),
        })
    }

    pub(crate) fn with_tick(mut self, tick: Duration) -> Self {
        if !tick.is_zero() {
            self.tick = tick;
        }
        self
    }

    /// Number of fixes the simulation publishes before completing, counting
    /// the completion itself.
    pub fn remaining_advances(&self) -> usize {
        if self.complete {
            0
        } else {
            self.remaining_locations.len() + 1
        }
    }

    /// Move to the next resampled point.
    ///
    /// Past the final point the state is marked complete; advancing a
    /// complete state returns it unchanged.
    pub fn advance(&self) -> Self {
        if self.complete {
            return self.clone();
        }

        let Some((&next, rest)) = self.remaining_locations.split_first() else {
            return Self {
                current_location: UserLocation {
                    speed: Some(Speed {
                        value: 0.0,
                        accuracy: None,
                    }),
                    ..self.current_location
                },
                complete: true,
                remaining_distance: 0.0,
                ..self.clone()
            };
        };

        let current = self.current_location.coordinates;
        let travelled = haversine_distance(current, next);
        let course = rest
            .first()
            .map(|after| CourseOverGround::new(bearing(next, *after), None))
            .or(self.current_location.course_over_ground);

        let current_location = UserLocation {
            coordinates: next,
            horizontal_accuracy: 0.0,
            course_over_ground: course,
            speed: Some(Speed {
                value: travelled / self.tick.as_secs_f64(),
                accuracy: None,
            }),
            timestamp: SystemTime::now(),
        };

        Self {
            current_location,
            remaining_locations: rest.to_vec(),
            remaining_distance: path_length(next, rest),
            complete: false,
            tick: self.tick,
        }
    }
}

fn path_length(start: GeographicCoordinate, rest: &[GeographicCoordinate]) -> f64 {
    match rest.first() {
        Some(&first) => haversine_distance(start, first) + line_length(rest),
        None => 0.0,
    }
}
