//! The trip state snapshot published to observers.

use crate::models::route::{SpokenInstruction, Step, VisualInstruction};
use crate::models::types::{CourseOverGround, UserLocation};

/// Whether the traveler has left the route, as classified by the Route Engine.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum DeviationStatus {
    #[default]
    NoDeviation,
    OffRoute {
        /// Distance from the route line in meters.
        deviation_from_route_line: f64,
    },
}

impl DeviationStatus {
    pub fn is_off_route(&self) -> bool {
        matches!(self, DeviationStatus::OffRoute { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum TripState {
    /// No active session.
    #[default]
    Idle,
    Navigating {
        snapped_user_location: UserLocation,
        course_over_ground: Option<CourseOverGround>,
        /// The current step first.
        remaining_steps: Vec<Step>,
        active_visual_instruction: Option<VisualInstruction>,
        active_spoken_instruction: Option<SpokenInstruction>,
        /// Meters to the end of the current step (never negative).
        distance_to_next_maneuver: f64,
        deviation: DeviationStatus,
    },
    Complete {
        final_location: UserLocation,
    },
}

impl TripState {
    pub fn kind(&self) -> &'static str {
        match self {
            TripState::Idle => "idle",
            TripState::Navigating { .. } => "navigating",
            TripState::Complete { .. } => "complete",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TripState::Idle)
    }

    pub fn is_navigating(&self) -> bool {
        matches!(self, TripState::Navigating { .. })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, TripState::Complete { .. })
    }

    pub fn deviation(&self) -> Option<DeviationStatus> {
        match self {
            TripState::Navigating { deviation, .. } => Some(*deviation),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        match self {
            TripState::Navigating {
                remaining_steps, ..
            } => remaining_steps.first(),
            _ => None,
        }
    }

    pub fn remaining_steps(&self) -> &[Step] {
        match self {
            TripState::Navigating {
                remaining_steps, ..
            } => remaining_steps,
            _ => &[],
        }
    }

    pub fn distance_to_next_maneuver(&self) -> Option<f64> {
        match self {
            TripState::Navigating {
                distance_to_next_maneuver,
                ..
            } => Some(*distance_to_next_maneuver),
            _ => None,
        }
    }

    /// The best known position of the traveler in this state.
    pub fn location(&self) -> Option<&UserLocation> {
        match self {
            TripState::Idle => None,
            TripState::Navigating {
                snapped_user_location,
                ..
            } => Some(snapped_user_location),
            TripState::Complete { final_location } => Some(final_location),
        }
    }

    /// Whether `next` may follow `self` while a single session is live.
    ///
    /// Starting a session (`Idle -> Navigating`) is not a session-internal
    /// transition and is reported as invalid here.
    pub fn allows_session_transition_to(&self, next: &TripState) -> bool {
        match (self, next) {
            (TripState::Navigating { .. }, TripState::Navigating { .. }) => true,
            (TripState::Navigating { .. }, TripState::Complete { .. }) => true,
            (TripState::Complete { .. }, TripState::Complete { .. }) => true,
            _ => false,
        }
    }
}
