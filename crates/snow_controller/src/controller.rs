//! Character controller
//!
//! Velocity-driven locomotion on a dynamic, rotation-locked body. The
//! controller only writes the horizontal velocity; the vertical component
//! stays with the simulation except on the tick a jump fires.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use snow_input::{Action, InputSnapshot};
use snow_physics::PhysicsHandle;

use crate::avatar::{AvatarState, ViewMode};

/// Controller tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Horizontal speed without the run modifier
    pub walk_speed: f32,
    /// Horizontal speed with the run modifier held
    pub run_speed: f32,
    /// Upward velocity written on jump
    pub jump_impulse: f32,
    /// Ground ray starts this far below the body position
    pub ground_probe_offset: f32,
    /// Maximum ground ray length
    pub ground_probe_distance: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            run_speed: 6.0,
            jump_impulse: 8.0,
            ground_probe_offset: 1.25,
            ground_probe_distance: 0.5,
        }
    }
}

/// Something that happened during a controller tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    Jumped,
    ViewModeChanged(ViewMode),
    GroundedChanged(bool),
}

/// Result of a controller tick
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOutput {
    pub state: AvatarState,
    pub events: Vec<ControllerEvent>,
}

/// Camera-relative movement direction for the held movement keys.
///
/// The camera forward is flattened onto the XZ plane; `right` is
/// `forward × Y`. The result is either zero or unit length. When the camera
/// looks straight up or down, `fallback_forward` supplies the forward axis.
pub fn movement_vector(input: &InputSnapshot, camera_forward: Vec3, fallback_forward: Vec3) -> Vec3 {
    let (forward_axis, right_axis) = input.movement_axes();
    if forward_axis == 0.0 && right_axis == 0.0 {
        return Vec3::ZERO;
    }

    let mut forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z).normalize_or_zero();
    if forward == Vec3::ZERO {
        forward = Vec3::new(fallback_forward.x, 0.0, fallback_forward.z).normalize_or_zero();
    }
    let right = forward.cross(Vec3::Y);

    (forward * forward_axis + right * right_axis).normalize_or_zero()
}

/// Drives the avatar body from input
pub struct CharacterController {
    config: ControllerConfig,
    state: AvatarState,
}

impl CharacterController {
    pub fn new(config: ControllerConfig, spawn: Vec3) -> Self {
        Self {
            config,
            state: AvatarState::new(spawn),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Avatar state as of the last completed tick
    pub fn state(&self) -> &AvatarState {
        &self.state
    }

    /// Return to a fresh state at `spawn`, first-person view
    pub fn reset(&mut self, spawn: Vec3) {
        self.state = AvatarState::new(spawn);
    }

    /// Run one tick.
    ///
    /// Returns `None` without touching anything while the avatar body is not
    /// attached yet.
    pub fn tick(
        &mut self,
        physics: Option<&mut dyn PhysicsHandle>,
        input: &InputSnapshot,
        camera_forward: Vec3,
    ) -> Option<ControllerOutput> {
        let Some(physics) = physics else {
            log::trace!("Controller tick skipped: avatar body not attached");
            return None;
        };

        let mut events = Vec::new();

        // Ground probe
        let position = physics.position();
        let probe_origin = position - Vec3::new(0.0, self.config.ground_probe_offset, 0.0);
        let grounded = physics
            .cast_ray(probe_origin, Vec3::NEG_Y, self.config.ground_probe_distance, true)
            .is_some();
        if grounded != self.state.grounded {
            events.push(ControllerEvent::GroundedChanged(grounded));
        }

        // Horizontal velocity, vertical left to the simulation
        let direction = movement_vector(input, camera_forward, self.state.facing_direction());
        let speed = if input.held(Action::Run) {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };
        let current = physics.linear_velocity();
        let mut velocity = Vec3::new(direction.x * speed, current.y, direction.z * speed);

        // The edge is spent whether or not the jump fires
        if input.pressed(Action::Jump) {
            if grounded {
                velocity.y = self.config.jump_impulse;
                events.push(ControllerEvent::Jumped);
                log::debug!("Jump at {:?}", position);
            } else {
                log::trace!("Jump ignored while airborne");
            }
        }

        physics.set_linear_velocity(velocity, true);

        let mut facing = self.state.facing;
        if direction != Vec3::ZERO {
            facing = direction.x.atan2(direction.z);
        }

        let mut view_mode = self.state.view_mode;
        if input.pressed(Action::ToggleView) {
            view_mode = view_mode.toggled();
            events.push(ControllerEvent::ViewModeChanged(view_mode));
            log::debug!("View mode: {:?}", view_mode);
        }

        self.state = AvatarState {
            position,
            velocity,
            grounded,
            facing,
            view_mode,
        };

        Some(ControllerOutput {
            state: self.state,
            events,
        })
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(ControllerConfig::default(), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use snow_physics::RayHit;

    /// Physics stand-in with a flat floor at `floor_y`
    struct StubPhysics {
        position: Vec3,
        velocity: Vec3,
        floor_y: Option<f32>,
        writes: usize,
    }

    impl StubPhysics {
        fn grounded_at(position: Vec3) -> Self {
            Self {
                position,
                velocity: Vec3::ZERO,
                floor_y: Some(position.y - 1.25),
                writes: 0,
            }
        }

        fn airborne(position: Vec3, velocity: Vec3) -> Self {
            Self {
                position,
                velocity,
                floor_y: None,
                writes: 0,
            }
        }
    }

    impl PhysicsHandle for StubPhysics {
        fn linear_velocity(&self) -> Vec3 {
            self.velocity
        }

        fn set_linear_velocity(&mut self, velocity: Vec3, _wake: bool) {
            self.velocity = velocity;
            self.writes += 1;
        }

        fn position(&self) -> Vec3 {
            self.position
        }

        fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, _exclude_self: bool) -> Option<RayHit> {
            let floor = self.floor_y?;
            if direction.y >= 0.0 {
                return None;
            }
            let distance = origin.y - floor;
            (0.0..=max_distance).contains(&distance).then(|| RayHit {
                point: Vec3::new(origin.x, floor, origin.z),
                distance,
            })
        }
    }

    fn held(actions: &[Action]) -> InputSnapshot {
        actions.iter().fold(InputSnapshot::idle(), |s, a| s.with_held(*a))
    }

    #[test]
    fn test_missing_body_skips_tick() {
        let mut controller = CharacterController::default();
        let before = *controller.state();
        let out = controller.tick(None, &held(&[Action::MoveForward]), Vec3::Z);
        assert!(out.is_none());
        assert_eq!(*controller.state(), before);
    }

    #[test]
    fn test_movement_magnitude_is_zero_or_one() {
        let movement = [
            Action::MoveForward,
            Action::MoveBack,
            Action::StrafeLeft,
            Action::StrafeRight,
        ];
        let cameras = [Vec3::Z, Vec3::new(1.0, -0.5, 1.0), Vec3::new(-0.3, 0.9, 0.2)];

        for mask in 0u8..16 {
            let actions: Vec<_> = movement
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, a)| *a)
                .collect();
            let input = held(&actions);
            for camera in cameras {
                let length = movement_vector(&input, camera, Vec3::Z).length();
                assert!(
                    length == 0.0 || (length - 1.0).abs() < 1e-5,
                    "mask {mask:04b} camera {camera:?} gave length {length}"
                );
            }
        }
    }

    #[test]
    fn test_movement_is_camera_relative() {
        let forward = movement_vector(&held(&[Action::MoveForward]), Vec3::X, Vec3::Z);
        assert_relative_eq!(forward.x, 1.0);

        // Right of +Z is -X
        let right = movement_vector(&held(&[Action::StrafeRight]), Vec3::Z, Vec3::Z);
        assert_relative_eq!(right.x, -1.0);
        assert_relative_eq!(right.z, 0.0);

        let diagonal = movement_vector(&held(&[Action::MoveForward, Action::StrafeLeft]), Vec3::Z, Vec3::Z);
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(diagonal.x, h, epsilon = 1e-6);
        assert_relative_eq!(diagonal.z, h, epsilon = 1e-6);
    }

    #[test]
    fn test_vertical_camera_uses_facing() {
        let dir = movement_vector(&held(&[Action::MoveForward]), Vec3::Y, Vec3::X);
        assert_relative_eq!(dir.x, 1.0);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn test_run_forward_then_jump() {
        let mut controller = CharacterController::default();
        let mut physics = StubPhysics::grounded_at(Vec3::new(0.0, 0.75, 0.0));
        physics.velocity = Vec3::new(0.0, -0.1, 0.0);

        let out = controller
            .tick(Some(&mut physics), &held(&[Action::MoveForward, Action::Run]), Vec3::Z)
            .unwrap();
        assert!(out.state.grounded);
        assert_relative_eq!(physics.velocity.x, 0.0);
        assert_relative_eq!(physics.velocity.y, -0.1);
        assert_relative_eq!(physics.velocity.z, 6.0);
        assert_relative_eq!(out.state.facing, 0.0);

        let jump = InputSnapshot::idle().with_pressed(Action::Jump);
        let out = controller.tick(Some(&mut physics), &jump, Vec3::Z).unwrap();
        assert_relative_eq!(physics.velocity.y, 8.0);
        assert!(out.events.contains(&ControllerEvent::Jumped));
        assert_eq!(physics.writes, 2);
    }

    #[test]
    fn test_walk_speed_without_run() {
        let mut controller = CharacterController::default();
        let mut physics = StubPhysics::grounded_at(Vec3::ZERO);
        controller.tick(Some(&mut physics), &held(&[Action::MoveBack]), Vec3::Z);
        assert_relative_eq!(physics.velocity.z, -3.0);
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let mut controller = CharacterController::default();
        let mut physics = StubPhysics::airborne(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -4.0, 0.0));

        let jump = InputSnapshot::idle().with_pressed(Action::Jump);
        let out = controller.tick(Some(&mut physics), &jump, Vec3::Z).unwrap();
        assert!(!out.state.grounded);
        assert_relative_eq!(physics.velocity.y, -4.0);
        assert!(!out.events.contains(&ControllerEvent::Jumped));
    }

    #[test]
    fn test_held_jump_does_not_fire_on_landing() {
        let mut input = snow_input::InputState::default();
        let mut controller = CharacterController::default();
        let mut physics = StubPhysics::airborne(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.0, -2.0, 0.0));

        input.key_down("Space");
        controller.tick(Some(&mut physics), &input.take_snapshot(), Vec3::Z);
        assert_relative_eq!(physics.velocity.y, -2.0);

        // Land with the key still held
        physics.floor_y = Some(physics.position.y - 1.25);
        physics.velocity.y = 0.0;
        let out = controller.tick(Some(&mut physics), &input.take_snapshot(), Vec3::Z).unwrap();
        assert!(out.state.grounded);
        assert_relative_eq!(physics.velocity.y, 0.0);

        // A fresh press after release jumps
        input.key_up("Space");
        input.key_down("Space");
        controller.tick(Some(&mut physics), &input.take_snapshot(), Vec3::Z);
        assert_relative_eq!(physics.velocity.y, 8.0);
    }

    #[test]
    fn test_facing_follows_movement() {
        let mut controller = CharacterController::default();
        let mut physics = StubPhysics::grounded_at(Vec3::ZERO);

        // Strafe left with camera +Z moves toward +X
        let out = controller
            .tick(Some(&mut physics), &held(&[Action::StrafeLeft]), Vec3::Z)
            .unwrap();
        assert_relative_eq!(out.state.facing, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);

        // Standing still keeps the heading
        let out = controller.tick(Some(&mut physics), &InputSnapshot::idle(), Vec3::Z).unwrap();
        assert_relative_eq!(out.state.facing, std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(physics.velocity.x, 0.0);
    }

    #[test]
    fn test_view_toggle_and_grounded_events() {
        let mut controller = CharacterController::default();
        let mut physics = StubPhysics::grounded_at(Vec3::ZERO);

        let toggle = InputSnapshot::idle().with_pressed(Action::ToggleView);
        let out = controller.tick(Some(&mut physics), &toggle, Vec3::Z).unwrap();
        assert_eq!(out.state.view_mode, ViewMode::ThirdPerson);
        assert!(out.events.contains(&ControllerEvent::ViewModeChanged(ViewMode::ThirdPerson)));
        assert!(out.events.contains(&ControllerEvent::GroundedChanged(true)));

        // Held toggle without a fresh edge changes nothing
        let held_toggle = held(&[Action::ToggleView]);
        let out = controller.tick(Some(&mut physics), &held_toggle, Vec3::Z).unwrap();
        assert_eq!(out.state.view_mode, ViewMode::ThirdPerson);
        assert!(out.events.is_empty());
    }
}
