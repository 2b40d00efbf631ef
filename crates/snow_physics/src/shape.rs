//! Collision shapes and the handles the world hands out

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// A body owned by a [`PhysicsWorld`](crate::PhysicsWorld)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub(crate) rapier::RigidBodyHandle);

/// A collider owned by a [`PhysicsWorld`](crate::PhysicsWorld)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

/// Collision shape, centered on its body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Axis-aligned box given by half extents
    Cuboid { half_extents: [f32; 3] },
    /// Upright capsule: a cylinder of `2 * half_height` capped by hemispheres
    Capsule { half_height: f32, radius: f32 },
}

impl ColliderShape {
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Cuboid {
            half_extents: [hx, hy, hz],
        }
    }

    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::Capsule { half_height, radius }
    }

    /// Distance from the center down to the lowest point of the shape
    pub fn bottom_offset(&self) -> f32 {
        match *self {
            Self::Cuboid { half_extents } => half_extents[1],
            Self::Capsule { half_height, radius } => half_height + radius,
        }
    }

    pub(crate) fn to_shared(self) -> rapier::SharedShape {
        match self {
            Self::Cuboid { half_extents: [x, y, z] } => rapier::SharedShape::cuboid(x, y, z),
            Self::Capsule { half_height, radius } => rapier::SharedShape::capsule_y(half_height, radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_offset() {
        assert_eq!(ColliderShape::capsule(0.75, 0.5).bottom_offset(), 1.25);
        assert_eq!(ColliderShape::cuboid(50.0, 0.5, 50.0).bottom_offset(), 0.5);
    }

    #[test]
    fn test_shape_from_toml() {
        let shape: ColliderShape = toml::from_str(
            r#"
            kind = "capsule"
            half_height = 0.75
            radius = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(shape, ColliderShape::capsule(0.75, 0.5));
    }
}
