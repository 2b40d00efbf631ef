//! The physics contract the character controller drives, and its
//! implementation for the avatar body of a [`PhysicsWorld`].

use glam::Vec3;

use crate::query::RayQuery;
use crate::shape::{ColliderHandle, RigidBodyHandle};
use crate::world::PhysicsWorld;

/// A ray hit as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// The slice of a rigid-body simulation the character controller needs.
///
/// Velocity and position always refer to the avatar's own body.
pub trait PhysicsHandle {
    fn linear_velocity(&self) -> Vec3;

    fn set_linear_velocity(&mut self, velocity: Vec3, wake: bool);

    fn position(&self) -> Vec3;

    /// First hit within `max_distance`. With `exclude_self` the avatar's
    /// own collider is transparent.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, exclude_self: bool) -> Option<RayHit>;
}

/// Avatar body borrowed out of a live world
pub struct AvatarBody<'w> {
    world: &'w mut PhysicsWorld,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl<'w> AvatarBody<'w> {
    pub(crate) fn new(world: &'w mut PhysicsWorld, body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self { world, body, collider }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }
}

// Both handles were checked when the binding was made and the world stays
// borrowed, so the lookups below always hit.
impl PhysicsHandle for AvatarBody<'_> {
    fn linear_velocity(&self) -> Vec3 {
        self.world.body_velocity(self.body).unwrap_or_default()
    }

    fn set_linear_velocity(&mut self, velocity: Vec3, wake: bool) {
        if let Err(e) = self.world.set_body_velocity(self.body, velocity, wake) {
            log::warn!("Avatar velocity write dropped: {}", e);
        }
    }

    fn position(&self) -> Vec3 {
        self.world.body_position(self.body).unwrap_or_default()
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, exclude_self: bool) -> Option<RayHit> {
        let mut query = RayQuery::new(origin, direction).max_distance(max_distance);
        if exclude_self {
            query = query.excluding(self.collider);
        }
        self.world.cast_ray(&query).map(|hit| RayHit {
            point: hit.point,
            distance: hit.distance,
        })
    }
}
