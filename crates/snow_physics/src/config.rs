//! Stepper settings

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// How the world is simulated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// The village uses a snappier -20 in Y
    pub gravity: [f32; 3],
    /// Length of one simulation step in seconds
    pub timestep: f32,
    /// Steps allowed per `step()` call before the backlog is dropped
    pub max_substeps: u32,
    pub solver_iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -20.0, 0.0],
            timestep: 1.0 / 60.0,
            max_substeps: 4,
            solver_iterations: 4,
        }
    }
}

impl PhysicsConfig {
    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(PhysicsError::InvalidConfig(reason));

        if !(self.timestep > 0.0) || !self.timestep.is_finite() {
            return invalid(format!("timestep must be a positive number, got {}", self.timestep));
        }
        if self.max_substeps == 0 {
            return invalid("max_substeps must be at least 1".to_string());
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return invalid(format!("gravity must be finite, got {:?}", self.gravity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gravity(), Vec3::new(0.0, -20.0, 0.0));
    }

    #[test]
    fn test_bad_values_rejected() {
        let config = PhysicsConfig {
            timestep: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));

        let config = PhysicsConfig {
            max_substeps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PhysicsConfig {
            gravity: [0.0, f32::NAN, 0.0],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
