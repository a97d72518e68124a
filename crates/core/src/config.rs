//! Controller configuration.
//!
//! Every option is a plain value with a documented effect. Front-ends build
//! these in code or load them from JSON with
//! [`NavigationControllerConfig::from_json`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wayline_route::NavigationConfig;

use crate::error::ConfigError;

/// Resampling interval used when the caller does not pick one.
pub const DEFAULT_SAMPLING_DISTANCE_M: f64 = 10.0;

/// How the controller reacts to the start of an off-route episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalculationMode {
    /// Request a new route from the current fix and switch to the first result.
    #[default]
    Automatic,
    /// Only tell observers; the UI decides whether to call `replace_route`.
    Manual,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Meters between consecutive simulated fixes.
    pub sampling_distance: f64,
    /// Playback speed multiplier; ticks are `base_tick_ms / warp_factor` apart.
    pub warp_factor: f64,
    /// Tick period at a warp factor of 1.
    pub base_tick_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sampling_distance: DEFAULT_SAMPLING_DISTANCE_M,
            warp_factor: 1.0,
            base_tick_ms: 1000,
        }
    }
}

impl SimulationConfig {
    pub fn base_tick(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sampling_distance > 0.0 && self.sampling_distance.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "sampling_distance must be positive, got {}",
                self.sampling_distance
            )));
        }
        if !(self.warp_factor > 0.0 && self.warp_factor.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "warp_factor must be positive, got {}",
                self.warp_factor
            )));
        }
        if self.base_tick_ms == 0 {
            return Err(ConfigError::Invalid("base_tick_ms must be non-zero".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("wayline/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationControllerConfig {
    /// Passed through to the Route Engine for every session.
    pub navigation: NavigationConfig,
    pub recalculation: RecalculationMode,
    pub simulation: SimulationConfig,
    pub transport: TransportConfig,
}

impl NavigationControllerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()
    }
}

#[cfg(test)]
mod tests {
    use wayline_route::{RouteDeviationTracking, StepAdvanceMode};

    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = NavigationControllerConfig::from_json("{}").unwrap();
        assert_eq!(config, NavigationControllerConfig::default());
        assert_eq!(config.simulation.base_tick(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json() {
        let config = NavigationControllerConfig::from_json(
            r#"{
                "navigation": {
                    "step_advance": { "mode": "manual" },
                    "route_deviation_tracking": { "mode": "none" }
                },
                "recalculation": "manual",
                "simulation": { "warp_factor": 4.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.navigation.step_advance, StepAdvanceMode::Manual);
        assert_eq!(config.navigation.route_deviation_tracking, RouteDeviationTracking::None);
        assert_eq!(config.recalculation, RecalculationMode::Manual);
        assert_eq!(config.simulation.warp_factor, 4.0);
        assert_eq!(config.simulation.sampling_distance, DEFAULT_SAMPLING_DISTANCE_M);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = NavigationControllerConfig::from_json(r#"{ "simulation": { "sampling_distance": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = NavigationControllerConfig::from_json(r#"{ "simulation": { "warp_factor": -2 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        assert!(matches!(
            NavigationControllerConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
