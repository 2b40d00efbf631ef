//! Snow Controller - avatar locomotion and camera
//!
//! The controller turns an [`InputSnapshot`](snow_input::InputSnapshot) and
//! the camera's forward direction into a velocity command on the avatar's
//! rigid body once per tick. The camera rig then derives the camera pose
//! from the resulting avatar state.
//!
//! ```text
//! InputSnapshot + camera forward
//!            │
//!            ▼
//! ┌─────────────────────┐    PhysicsHandle    ┌──────────────┐
//! │ CharacterController │ ──────────────────▶ │ avatar body  │
//! └─────────────────────┘                     └──────────────┘
//!            │ AvatarState
//!            ▼
//! ┌─────────────────────┐       Camera        ┌──────────────┐
//! │      CameraRig      │ ──────────────────▶ │  RigCamera   │
//! └─────────────────────┘                     └──────────────┘
//! ```

pub mod avatar;
pub mod camera;
pub mod controller;

pub mod prelude {
    pub use crate::avatar::{AvatarState, ViewMode};
    pub use crate::camera::{Camera, CameraConfig, CameraPose, CameraRig, LookControl, RigCamera};
    pub use crate::controller::{
        movement_vector, CharacterController, ControllerConfig, ControllerEvent, ControllerOutput,
    };
}

pub use prelude::*;
