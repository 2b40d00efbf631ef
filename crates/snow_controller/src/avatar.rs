//! Avatar state produced by the controller each tick

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    FirstPerson,
    ThirdPerson,
}

impl ViewMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::FirstPerson => ViewMode::ThirdPerson,
            ViewMode::ThirdPerson => ViewMode::FirstPerson,
        }
    }
}

/// Snapshot of the avatar after a controller tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarState {
    /// Body position reported by physics
    pub position: Vec3,
    /// Last commanded velocity. `y` is whatever physics reported, or the
    /// jump impulse on the tick a jump fired.
    pub velocity: Vec3,
    /// Ground probe result of the latest tick
    pub grounded: bool,
    /// Visual heading in radians, `atan2(x, z)` of the last movement
    pub facing: f32,
    pub view_mode: ViewMode,
}

impl AvatarState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
            facing: 0.0,
            view_mode: ViewMode::default(),
        }
    }

    /// Unit vector on the XZ plane the avatar visually faces
    pub fn facing_direction(&self) -> Vec3 {
        Vec3::new(self.facing.sin(), 0.0, self.facing.cos())
    }

    /// Horizontal speed of the last command
    pub fn planar_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

impl Default for AvatarState {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::FirstPerson.toggled(), ViewMode::ThirdPerson);
        assert_eq!(ViewMode::ThirdPerson.toggled().toggled(), ViewMode::ThirdPerson);
    }

    #[test]
    fn test_facing_direction() {
        let mut state = AvatarState::default();
        let dir = state.facing_direction();
        assert_relative_eq!(dir.z, 1.0);

        state.facing = std::f32::consts::FRAC_PI_2;
        let dir = state.facing_direction();
        assert_relative_eq!(dir.x, 1.0);
        assert_relative_eq!(dir.z, 0.0, epsilon = 1e-6);
    }
}
