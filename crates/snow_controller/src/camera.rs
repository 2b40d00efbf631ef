//! Camera rig
//!
//! The rig only places the camera. Orientation belongs to the look control
//! (pointer yaw/pitch); in third person the rig additionally points the
//! camera at the avatar for the current frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::avatar::{AvatarState, ViewMode};

/// Camera contract consumed by the rig
pub trait Camera {
    /// Move the camera
    fn set_position(&mut self, position: Vec3);

    /// World-space position
    fn position(&self) -> Vec3;

    /// Unit direction the camera is looking
    fn forward(&self) -> Vec3;

    /// Point the camera at a world-space target
    fn look_at(&mut self, target: Vec3);
}

/// Pointer-driven yaw/pitch. Yaw 0 looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookControl {
    pub yaw: f32,
    pub pitch: f32,
    /// Radians per pointer unit
    pub sensitivity: f32,
}

impl LookControl {
    const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            ..Self::default()
        }
    }

    /// Apply a pointer delta. Positive `dx` turns right, positive `dy` looks down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw = (self.yaw - dx * self.sensitivity).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }
}

impl Default for LookControl {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.002,
        }
    }
}

/// Camera driven by a [`LookControl`].
///
/// `look_at` overrides the view direction until the next `set_position`
/// or pointer rotation; the look control's yaw/pitch are never modified by it.
#[derive(Debug, Clone)]
pub struct RigCamera {
    position: Vec3,
    look: LookControl,
    target: Option<Vec3>,
}

impl RigCamera {
    pub fn new(position: Vec3, look: LookControl) -> Self {
        Self {
            position,
            look,
            target: None,
        }
    }

    pub fn look_control(&self) -> &LookControl {
        &self.look
    }

    /// Forward a pointer delta to the look control
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.look.rotate(dx, dy);
        self.target = None;
    }

    /// Current `look_at` target, if any
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }
}

impl Default for RigCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, LookControl::default())
    }
}

impl Camera for RigCamera {
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.target = None;
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.target
            .map(|target| (target - self.position).normalize_or_zero())
            .filter(|dir| *dir != Vec3::ZERO)
            .unwrap_or_else(|| self.look.forward())
    }

    fn look_at(&mut self, target: Vec3) {
        self.target = Some(target);
    }
}

/// Rig offsets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// First-person eye height above the body position
    pub head_height: f32,
    /// Third-person distance behind the avatar
    pub chase_distance: f32,
    /// Third-person height above the body position
    pub chase_height: f32,
    /// Third-person look target height above the body position
    pub look_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            head_height: 1.6,
            chase_distance: 5.0,
            chase_height: 2.0,
            look_height: 1.0,
        }
    }
}

/// Camera pose after a rig update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub forward: Vec3,
    pub mode: ViewMode,
}

/// Places the camera relative to the avatar
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    config: CameraConfig,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Place `camera` for the avatar's current view mode
    pub fn update(&self, camera: &mut dyn Camera, avatar: &AvatarState) -> CameraPose {
        match avatar.view_mode {
            ViewMode::FirstPerson => {
                camera.set_position(avatar.position + Vec3::Y * self.config.head_height);
            }
            ViewMode::ThirdPerson => {
                let forward = camera.forward();
                let mut horizontal = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
                if horizontal == Vec3::ZERO {
                    horizontal = avatar.facing_direction();
                }
                let position = avatar.position - horizontal * self.config.chase_distance
                    + Vec3::Y * self.config.chase_height;
                camera.set_position(position);
                camera.look_at(avatar.position + Vec3::Y * self.config.look_height);
            }
        }

        CameraPose {
            position: camera.position(),
            forward: camera.forward(),
            mode: avatar.view_mode,
        }
    }
}
