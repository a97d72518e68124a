//! Routes, steps and the instructions attached to them.
//!
//! A [`Route`] is immutable once a Route Engine hands it out. Sessions share it
//! behind an `Arc` and replace the whole reference on recalculation.

use crate::identifiers::RouteIdentifier;
use crate::models::types::{GeographicCoordinate, Waypoint};

// ============================================================================
// Maneuvers
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum ManeuverType {
    Depart,
    Turn,
    Continue,
    Merge,
    OnRamp,
    OffRamp,
    Fork,
    Roundabout,
    Arrive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum ManeuverModifier {
    UTurn,
    SharpRight,
    Right,
    SlightRight,
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
}

// ============================================================================
// Instructions
// ============================================================================

/// Text and maneuver shown on a banner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct VisualInstructionContent {
    pub text: String,
    pub maneuver_type: Option<ManeuverType>,
    pub maneuver_modifier: Option<ManeuverModifier>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct VisualInstruction {
    pub primary_content: VisualInstructionContent,
    pub secondary_content: Option<VisualInstructionContent>,
    /// Meters before the maneuver at which this instruction becomes active.
    pub trigger_distance_before_maneuver: f64,
}

impl VisualInstruction {
    pub fn new(text: impl Into<String>, trigger_distance_before_maneuver: f64) -> Self {
        Self {
            primary_content: VisualInstructionContent {
                text: text.into(),
                maneuver_type: None,
                maneuver_modifier: None,
            },
            secondary_content: None,
            trigger_distance_before_maneuver,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct SpokenInstruction {
    pub text: String,
    pub ssml: Option<String>,
    pub trigger_distance_before_maneuver: f64,
}

// ============================================================================
// Steps and routes
// ============================================================================

/// One maneuver-to-maneuver stretch of a route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Step {
    pub geometry: Vec<GeographicCoordinate>,
    /// Length of the step in meters.
    pub distance: f64,
    /// Expected travel time in seconds.
    pub duration: f64,
    pub road_name: Option<String>,
    pub instruction: String,
    /// Ordered by descending trigger distance.
    pub visual_instructions: Vec<VisualInstruction>,
    pub spoken_instructions: Vec<SpokenInstruction>,
}

impl Step {
    /// The last visual instruction whose trigger distance is at least
    /// `distance_to_maneuver`, if any.
    pub fn active_visual_instruction(&self, distance_to_maneuver: f64) -> Option<&VisualInstruction> {
        self.visual_instructions
            .iter()
            .rev()
            .find(|instruction| instruction.trigger_distance_before_maneuver >= distance_to_maneuver)
    }

    /// Same selection rule as [`Step::active_visual_instruction`], for speech.
    pub fn active_spoken_instruction(&self, distance_to_maneuver: f64) -> Option<&SpokenInstruction> {
        self.spoken_instructions
            .iter()
            .rev()
            .find(|instruction| instruction.trigger_distance_before_maneuver >= distance_to_maneuver)
    }

    pub fn start(&self) -> Option<GeographicCoordinate> {
        self.geometry.first().copied()
    }

    pub fn end(&self) -> Option<GeographicCoordinate> {
        self.geometry.last().copied()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Route {
    pub id: RouteIdentifier,
    pub geometry: Vec<GeographicCoordinate>,
    /// Total length in meters.
    pub distance: f64,
    /// The waypoints this route was requested for, excluding the starting location.
    pub waypoints: Vec<Waypoint>,
    pub steps: Vec<Step>,
}

impl Route {
    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn destination(&self) -> Option<GeographicCoordinate> {
        self.waypoints
            .last()
            .map(|waypoint| waypoint.coordinate)
            .or_else(|| self.geometry.last().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_with_instructions() -> Step {
        Step {
            geometry: vec![
                GeographicCoordinate::new(0.0, 0.0),
                GeographicCoordinate::new(0.0, 0.01),
            ],
            distance: 1113.0,
            duration: 90.0,
            road_name: None,
            instruction: "Head east".into(),
            visual_instructions: vec![
                VisualInstruction::new("In 500 m, turn right", 500.0),
                VisualInstruction::new("In 100 m, turn right", 100.0),
                VisualInstruction::new("Turn right", 10.0),
            ],
            spoken_instructions: vec![SpokenInstruction {
                text: "Turn right".into(),
                ssml: None,
                trigger_distance_before_maneuver: 25.0,
            }],
        }
    }

    #[test]
    fn test_active_visual_instruction_boundaries() {
        let step = step_with_instructions();

        assert!(step.active_visual_instruction(800.0).is_none());
        assert_eq!(
            step.active_visual_instruction(500.0).unwrap().trigger_distance_before_maneuver,
            500.0
        );
        assert_eq!(
            step.active_visual_instruction(499.9).unwrap().trigger_distance_before_maneuver,
            500.0
        );
        assert_eq!(
            step.active_visual_instruction(100.0).unwrap().trigger_distance_before_maneuver,
            100.0
        );
        assert_eq!(
            step.active_visual_instruction(0.0).unwrap().trigger_distance_before_maneuver,
            10.0
        );
    }

    #[test]
    fn test_active_spoken_instruction() {
        let step = step_with_instructions();

        assert!(step.active_spoken_instruction(30.0).is_none());
        assert_eq!(step.active_spoken_instruction(20.0).unwrap().text, "Turn right");
    }

    #[test]
    fn test_destination_prefers_waypoints() {
        let destination = GeographicCoordinate::new(1.0, 1.0);
        let route = Route {
            id: RouteIdentifier::new("r"),
            geometry: vec![GeographicCoordinate::new(0.0, 0.0), GeographicCoordinate::new(0.9, 0.9)],
            distance: 0.0,
            waypoints: vec![Waypoint::new(destination, Default::default())],
            steps: vec![],
        };

        assert_eq!(route.destination(), Some(destination));
    }
}
