// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tolerance settings for grid lookups.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tolerance for float comparisons in containment tests.
pub const DEFAULT_EPSILON: f32 = voxel_math::EPSILON;

/// Default distance, in voxel widths, that a point may lie beyond an outer
/// face and still resolve to the edge voxel.
pub const DEFAULT_BOUNDARY_TOLERANCE: f32 = 1e-4;

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A value was out of its permitted range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tolerances used by containment and voxel resolution.
///
/// Missing JSON fields fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Tolerance for float comparisons (angles, projected lengths).
    pub epsilon: f32,
    /// How far past an outer face (in voxel widths) a point may lie and still
    /// snap to the edge voxel.
    pub boundary_tolerance: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            boundary_tolerance: DEFAULT_BOUNDARY_TOLERANCE,
        }
    }
}

impl GridConfig {
    /// Parses and validates a JSON config blob. An empty blob yields the
    /// defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config as pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Rejects negative or non-finite tolerances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("boundary_tolerance", self.boundary_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    use super::*;

    #[test]
    fn empty_blob_is_default() {
        let cfg = GridConfig::from_json(b"").expect("empty blob parses");
        assert_eq!(cfg, GridConfig::default());
    }

    #[test]
    fn partial_blob_keeps_other_defaults() {
        let cfg = GridConfig::from_json(br#"{"boundary_tolerance": 0.25}"#);
        assert!(matches!(
            cfg,
            Ok(GridConfig { epsilon, boundary_tolerance })
                if epsilon == DEFAULT_EPSILON && boundary_tolerance == 0.25
        ));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let cfg = GridConfig::from_json(br#"{"epsilon": -0.5}"#);
        assert!(matches!(cfg, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_serde_error() {
        let cfg = GridConfig::from_json(b"{not json");
        assert!(matches!(cfg, Err(ConfigError::Serde(_))));
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let cfg = GridConfig {
            epsilon: 1e-3,
            boundary_tolerance: 0.5,
        };
        let back = cfg.to_json().and_then(|bytes| GridConfig::from_json(&bytes));
        assert_eq!(back.ok(), Some(cfg));
    }
}
