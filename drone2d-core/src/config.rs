use std::path::{Path, PathBuf};

use glam::{Vec2, vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::distance_to_segment;
use crate::coordinates::{ScreenTransform, Viewport};
use crate::drone::{DroneBody, DroneState};
use crate::input::ControlLimits;
use crate::obstacles::MIN_POLYLINE_POINTS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width_px: f32,
    pub height_px: f32,
    /// Share of the window width used by the playground; the rest is the menu.
    pub playground_fraction: f32,
    pub meters_to_pixels: f32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width_px: 1200.0,
            height_px: 800.0,
            playground_fraction: 2.0 / 3.0,
            meters_to_pixels: 100.0,
        }
    }
}

impl ScreenConfig {
    pub fn playground_width_px(&self) -> f32 {
        self.width_px * self.playground_fraction
    }

    /// Playground extent in meters.
    pub fn playground_size(&self) -> Vec2 {
        vec2(self.playground_width_px(), self.height_px) / self.meters_to_pixels
    }

    pub fn transform(&self) -> ScreenTransform {
        ScreenTransform::new(self.meters_to_pixels, self.height_px)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::from_size(self.playground_width_px(), self.height_px)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    pub mass: f32,
    pub radius: f32,
    pub damping: f32,
    pub rotational_damping: f32,
    pub max_force: f32,
    pub max_moment: f32,
    /// Defaults to the middle of the playground, one meter above the floor.
    pub initial_position: Option<Vec2>,
    pub initial_heading: f32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 0.3,
            damping: 1.0,
            rotational_damping: 0.05,
            max_force: 2.0,
            max_moment: 0.2,
            initial_position: None,
            initial_heading: 0.0,
        }
    }
}

impl DroneConfig {
    pub fn body(&self) -> DroneBody {
        DroneBody::new(self.mass, self.radius, self.damping, self.rotational_damping)
    }

    pub fn limits(&self) -> ControlLimits {
        ControlLimits {
            max_force: self.max_force,
            max_moment: self.max_moment,
        }
    }

    pub fn initial_position(&self, playground: Vec2) -> Vec2 {
        self.initial_position
            .unwrap_or_else(|| vec2(playground.x / 2.0, 1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Extra obstacles in meters, added after the boundary.
    pub polylines: Vec<Vec<Vec2>>,
    pub random_count: usize,
    pub seed: u64,
    /// Radius around the start position kept free of random fixtures.
    pub start_clearance: f32,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            polylines: Vec::new(),
            random_count: 0,
            seed: 42,
            start_clearance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fixed_step_seconds: f32,
    pub max_steps_per_frame: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_step_seconds: 1.0 / 60.0,
            max_steps_per_frame: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub screen: ScreenConfig,
    pub drone: DroneConfig,
    pub fixtures: FixtureConfig,
    pub timing: TimingConfig,
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn initial_drone(&self) -> DroneState {
        DroneState::at_rest(
            self.drone.body(),
            self.drone.initial_position(self.screen.playground_size()),
            self.drone.initial_heading,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let screen = &self.screen;
        require_positive("screen.width_px", screen.width_px)?;
        require_positive("screen.height_px", screen.height_px)?;
        require_positive("screen.meters_to_pixels", screen.meters_to_pixels)?;
        if !(screen.playground_fraction > 0.0 && screen.playground_fraction <= 1.0) {
            return Err(ConfigError::invalid(
                "screen.playground_fraction",
                format!("must be in (0, 1], got {}", screen.playground_fraction),
            ));
        }

        let drone = &self.drone;
        require_positive("drone.mass", drone.mass)?;
        require_positive("drone.radius", drone.radius)?;
        require_non_negative("drone.damping", drone.damping)?;
        require_non_negative("drone.rotational_damping", drone.rotational_damping)?;
        require_non_negative("drone.max_force", drone.max_force)?;
        require_non_negative("drone.max_moment", drone.max_moment)?;
        require_finite("drone.initial_heading", drone.initial_heading)?;

        let playground = screen.playground_size();
        let start = drone.initial_position(playground);
        let inside = start.x - drone.radius > 0.0
            && start.y - drone.radius > 0.0
            && start.x + drone.radius < playground.x
            && start.y + drone.radius < playground.y;
        if !inside {
            return Err(ConfigError::invalid(
                "drone.initial_position",
                format!(
                    "drone at ({}, {}) does not fit inside the {} x {} m playground",
                    start.x, start.y, playground.x, playground.y
                ),
            ));
        }

        if let Some(short) = self
            .fixtures
            .polylines
            .iter()
            .position(|points| points.len() < MIN_POLYLINE_POINTS)
        {
            return Err(ConfigError::invalid(
                "fixtures.polylines",
                format!("polyline {short} has fewer than {MIN_POLYLINE_POINTS} points"),
            ));
        }
        // A fixture touching the start disk would crash the drone on every resume.
        if let Some(blocking) = self.fixtures.polylines.iter().position(|points| {
            points
                .windows(2)
                .any(|pair| distance_to_segment(start, pair[0], pair[1]) <= drone.radius)
        }) {
            return Err(ConfigError::invalid(
                "fixtures.polylines",
                format!(
                    "polyline {blocking} passes within {} m of the start position ({}, {})",
                    drone.radius, start.x, start.y
                ),
            ));
        }
        require_non_negative("fixtures.start_clearance", self.fixtures.start_clearance)?;

        require_positive("timing.fixed_step_seconds", self.timing.fixed_step_seconds)?;
        if self.timing.max_steps_per_frame == 0 {
            return Err(ConfigError::invalid(
                "timing.max_steps_per_frame",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn require_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, format!("must be finite, got {value}")))
    }
}

fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(name, format!("must be positive, got {value}")))
    }
}

fn require_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            name,
            format!("must not be negative, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        config.validate().expect("defaults validate");
        assert_relative_eq!(config.screen.playground_width_px(), 800.0);
        assert_eq!(config.screen.playground_size(), vec2(8.0, 8.0));
        assert_eq!(config.initial_drone().position, vec2(4.0, 1.0));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SimConfig::from_json_str(
            r#"{
                "drone": { "mass": 2.5, "initial_position": [2.0, 3.0] },
                "fixtures": { "polylines": [[[1.0, 1.0], [2.0, 1.5], [3.0, 1.0]]] }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.drone.mass, 2.5);
        assert_eq!(config.drone.radius, 0.3);
        assert_eq!(config.drone.initial_position, Some(vec2(2.0, 3.0)));
        assert_eq!(config.fixtures.polylines[0].len(), 3);
        assert_eq!(config.screen, ScreenConfig::default());
    }

    #[test]
    fn rejects_non_positive_mass() {
        let err = SimConfig::from_json_str(r#"{ "drone": { "mass": 0.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "drone.mass",
                ..
            }
        ));
    }

    #[test]
    fn rejects_start_outside_playground() {
        let err = SimConfig::from_json_str(r#"{ "drone": { "initial_position": [0.1, 4.0] } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("drone.initial_position"));
    }

    #[test]
    fn rejects_fixture_through_start() {
        let err = SimConfig::from_json_str(
            r#"{ "fixtures": { "polylines": [[[3.0, 1.0], [5.0, 1.0]]] } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "fixtures.polylines",
                ..
            }
        ));

        let grazing = SimConfig::from_json_str(
            r#"{ "fixtures": { "polylines": [[[3.0, 1.25], [5.0, 1.25]]] } }"#,
        );
        assert!(grazing.is_err());

        let clear = SimConfig::from_json_str(
            r#"{ "fixtures": { "polylines": [[[3.0, 1.5], [5.0, 1.5]]] } }"#,
        );
        assert!(clear.is_ok());
    }

    #[test]
    fn rejects_short_fixture_polyline() {
        let err = SimConfig::from_json_str(r#"{ "fixtures": { "polylines": [[[1.0, 1.0]]] } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "fixtures.polylines",
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/drone2d.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
