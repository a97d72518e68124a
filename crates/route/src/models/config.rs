//! Per-session options interpreted by the Route Engine.
//!
//! The orchestrator passes these through untouched; their effects are
//! documented here so front-ends can offer them as plain settings.

/// When the engine moves on to the next step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum StepAdvanceMode {
    /// Steps only advance through an explicit `advance_to_next_step` call.
    Manual,
    /// Advance once the traveler is within `distance` meters of the end of the
    /// step, ignoring fixes less accurate than `minimum_horizontal_accuracy`.
    DistanceToEndOfStep {
        distance: u16,
        minimum_horizontal_accuracy: u16,
    },
    /// Advance when the traveler is closer to the next step's line than to the
    /// current one, or within `automatic_advance_distance` of the maneuver.
    RelativeLineStringDistance {
        minimum_horizontal_accuracy: u16,
        automatic_advance_distance: Option<u16>,
    },
}

impl Default for StepAdvanceMode {
    fn default() -> Self {
        StepAdvanceMode::RelativeLineStringDistance {
            minimum_horizontal_accuracy: 25,
            automatic_advance_distance: Some(10),
        }
    }
}

/// How the engine classifies a fix as off-route.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum RouteDeviationTracking {
    /// Never report a deviation.
    None,
    /// Off-route when the fix is further than `max_acceptable_deviation` meters
    /// from the route line; fixes less accurate than
    /// `minimum_horizontal_accuracy` are never classified.
    StaticThreshold {
        minimum_horizontal_accuracy: u16,
        max_acceptable_deviation: f64,
    },
}

impl Default for RouteDeviationTracking {
    fn default() -> Self {
        RouteDeviationTracking::StaticThreshold {
            minimum_horizontal_accuracy: 25,
            max_acceptable_deviation: 50.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct NavigationConfig {
    pub step_advance: StepAdvanceMode,
    pub route_deviation_tracking: RouteDeviationTracking,
}
