//! Shared configuration for deformkit
//!
//! This crate is the single source of truth for deformer parameter defaults
//! and per-node configuration, whether a node is driven from a host plugin,
//! a Bevy app, or a test.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default follow gain for the secondary-motion follower
pub const DEFAULT_FOLLOW: f64 = 0.3;

/// Default restore gain for the secondary-motion follower
pub const DEFAULT_RESTORE: f64 = 0.5;

/// Time value that resets the follower state (first frame of playback)
pub const RESET_TIME: f64 = 1.0;

/// Default scale divisor for ramp squash/stretch
pub const DEFAULT_SCALE: f64 = 1.0;

/// Default distance within which collision swelling applies
pub const DEFAULT_SWELL_LENGTH: f64 = 0.5;

/// Default swelling strength
pub const DEFAULT_SWELL_VALUE: f64 = 1.0;

/// Swell displacement is `ramp * swell_value * SWELL_FACTOR`
pub const SWELL_FACTOR: f64 = 0.1;

/// Default search radius for closest-point collision queries
pub const DEFAULT_MAX_DISTANCE: f64 = 1000.0;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Secondary-motion follower configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Fraction of the gap to the driver closed per step
    pub follow: f64,
    /// Smoothing gain of the velocity toward the catch-up delta
    pub restore: f64,
    /// Time value at which state is zeroed before stepping
    pub reset_time: f64,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            follow: DEFAULT_FOLLOW,
            restore: DEFAULT_RESTORE,
            reset_time: RESET_TIME,
        }
    }
}

/// Ramp squash/stretch configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashConfig {
    /// Scale divisor used to derive the ramp sample position from vertex height
    pub scale: f64,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

/// Collision deformer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollideConfig {
    /// Distance from the collider within which vertices swell
    pub swell_length: f64,
    /// Swelling strength
    pub swell_value: f64,
    /// Search radius for the closest collider point
    pub max_distance: f64,
}

impl Default for CollideConfig {
    fn default() -> Self {
        Self {
            swell_length: DEFAULT_SWELL_LENGTH,
            swell_value: DEFAULT_SWELL_VALUE,
            max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

/// Configuration for every deformer kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct DeformerConfig {
    pub follower: FollowerConfig,
    pub squash: SquashConfig,
    pub collide: CollideConfig,
}

impl DeformerConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no deformer can work with.
    ///
    /// Gains outside 0..1 are allowed; they only change damping character.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("follower.follow", self.follower.follow),
            ("follower.restore", self.follower.restore),
            ("follower.reset_time", self.follower.reset_time),
            ("squash.scale", self.squash.scale),
            ("collide.swell_length", self.collide.swell_length),
            ("collide.swell_value", self.collide.swell_value),
            ("collide.max_distance", self.collide.max_distance),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
            }
        }

        if self.squash.scale == 0.0 {
            return Err(ConfigError::Invalid("squash.scale must be non-zero".to_string()));
        }
        if self.collide.max_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "collide.max_distance must be non-negative, got {}",
                self.collide.max_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeformerConfig::default();
        assert_eq!(config.follower.follow, DEFAULT_FOLLOW);
        assert_eq!(config.follower.restore, DEFAULT_RESTORE);
        assert_eq!(config.follower.reset_time, RESET_TIME);
        assert_eq!(config.squash.scale, DEFAULT_SCALE);
        assert_eq!(config.collide.max_distance, DEFAULT_MAX_DISTANCE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            DeformerConfig::from_json_str(r#"{ "follower": { "follow": 0.8 } }"#).unwrap();
        assert_eq!(config.follower.follow, 0.8);
        assert_eq!(config.follower.restore, DEFAULT_RESTORE);
        assert_eq!(config.collide, CollideConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        let result = DeformerConfig::from_json_str("{ follower: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let result = DeformerConfig::from_json_str(r#"{ "squash": { "scale": 0.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_gains_outside_unit_range_allowed() {
        let mut config = DeformerConfig::default();
        config.follower.follow = 1.5;
        config.follower.restore = -0.2;
        assert!(config.validate().is_ok());
    }
}
