//! Ray queries against the world's colliders

use glam::Vec3;

use crate::shape::ColliderHandle;

/// A ray cast request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Need not be normalized; hit distances are in units of its length
    pub direction: Vec3,
    pub max_distance: f32,
    /// Collider the ray passes through, typically the caster's own
    pub exclude: Option<ColliderHandle>,
}

impl RayQuery {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            max_distance: f32::MAX,
            exclude: None,
        }
    }

    /// Straight down from `origin`
    pub fn down(origin: Vec3) -> Self {
        Self::new(origin, Vec3::NEG_Y)
    }

    pub fn max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    pub fn excluding(mut self, collider: ColliderHandle) -> Self {
        self.exclude = Some(collider);
        self
    }
}

/// First collider a [`RayQuery`] ran into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    pub point: Vec3,
    pub distance: f32,
}
