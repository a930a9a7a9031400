//! Game settings and designer tuning
//!
//! Loaded from a JSON file; any field left out falls back to its default.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Dimension, Layer, LayerMask};

/// Post-process profile for one dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostProcessProfile {
    /// Layers the camera renders while this profile is active
    pub culling_mask: LayerMask,
    /// Lens distortion intensity (-100 to 100)
    #[serde(default)]
    pub lens_distortion: f32,
}

impl PostProcessProfile {
    /// Default profile for a dimension: shared layers plus that dimension's own
    pub fn for_dimension(dimension: Dimension) -> Self {
        let shared = LayerMask::from_layers(&[Layer::Default, Layer::Player, Layer::Collected]);
        let own = match dimension {
            Dimension::Normal => LayerMask::from_layers(&[Layer::Pickup, Layer::Environment]),
            Dimension::Inverted => {
                LayerMask::from_layers(&[Layer::InvertedPickup, Layer::InvertedEnvironment])
            }
        };
        Self {
            culling_mask: shared.union(own),
            lens_distortion: 0.0,
        }
    }
}

/// Designer settings for one play session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Composite body ===
    /// Starting collision radius of the player sphere
    pub initial_radius: f32,
    /// Starting mass of the player sphere
    pub initial_mass: f32,
    /// Movement speed before any absorption bonus
    pub base_speed: f32,
    /// Local scale of the player transform (used by the scale check)
    pub body_scale: Vec3,

    // === Growth ===
    /// Safety margin multiplied into every radius update (>= 1)
    pub padding: f32,
    /// Speed bonus per unit of absorbed mass
    pub speed_scale: f32,

    // === Dimension visuals ===
    pub lens_duration: f32,
    pub lens_start: f32,
    pub lens_end: f32,
    pub normal_profile: Option<PostProcessProfile>,
    pub inverted_profile: Option<PostProcessProfile>,

    // === Camera ===
    /// Score needed between camera framing adjustments
    pub milestone_size: f32,
    pub radius_increase_per_milestone: f32,
    pub camera_tween_duration: f32,
    pub orbit_radii: [f32; 3],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_radius: BALL_RADIUS,
            initial_mass: BALL_MASS,
            base_speed: BALL_SPEED,
            body_scale: Vec3::ONE,

            padding: DEFAULT_PADDING,
            speed_scale: DEFAULT_SPEED_SCALE,

            lens_duration: LENS_DURATION,
            lens_start: LENS_START,
            lens_end: LENS_END,
            normal_profile: Some(PostProcessProfile::for_dimension(Dimension::Normal)),
            inverted_profile: Some(PostProcessProfile::for_dimension(Dimension::Inverted)),

            milestone_size: MILESTONE_SIZE,
            radius_increase_per_milestone: RADIUS_INCREASE_PER_MILESTONE,
            camera_tween_duration: CAMERA_TWEEN_DURATION,
            orbit_radii: ORBIT_RADII,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would break growth or timing
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            (self.initial_radius, "initial_radius"),
            (self.initial_mass, "initial_mass"),
            (self.milestone_size, "milestone_size"),
        ];
        for (value, field) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        let non_negative = [
            (self.base_speed, "base_speed"),
            (self.speed_scale, "speed_scale"),
            (self.lens_duration, "lens_duration"),
            (self.camera_tween_duration, "camera_tween_duration"),
            (self.radius_increase_per_milestone, "radius_increase_per_milestone"),
        ];
        for (value, field) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        // Padding below one lets the radius shrink
        if !(self.padding >= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "padding",
                reason: "must be at least 1.0",
            });
        }

        if !self.body_scale.cmpgt(Vec3::ZERO).all() {
            return Err(ConfigError::InvalidValue {
                field: "body_scale",
                reason: "every axis must be greater than zero",
            });
        }

        Ok(())
    }

    /// Profiles the dimension visuals need but were not assigned
    pub fn profile_diagnostics(&self) -> Vec<ConfigError> {
        let mut missing = Vec::new();
        if self.normal_profile.is_none() {
            missing.push(ConfigError::MissingProfile(Dimension::Normal));
        }
        if self.inverted_profile.is_none() {
            missing.push(ConfigError::MissingProfile(Dimension::Inverted));
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.profile_diagnostics().is_empty());
        assert_eq!(settings.padding, 1.05);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "initial_radius": 1.0, "padding": 1.1 }"#)
            .expect("partial settings should parse");
        assert_eq!(settings.initial_radius, 1.0);
        assert_eq!(settings.padding, 1.1);
        assert_eq!(settings.base_speed, BALL_SPEED);
    }

    #[test]
    fn test_padding_below_one_rejected() {
        let err = Settings::from_json(r#"{ "padding": 0.9 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "padding",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let settings = Settings {
            initial_radius: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_profile_is_diagnostic_not_failure() {
        let settings = Settings::from_json(r#"{ "inverted_profile": null }"#)
            .expect("missing profile must not fail validation");
        let diagnostics = settings.profile_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            ConfigError::MissingProfile(Dimension::Inverted)
        ));
    }

    #[test]
    fn test_garbage_json_is_parse_error() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
