//! Snow Physics - Rapier 3D Integration
//!
//! The physics world the SnowQuest village runs in, and the narrow
//! [`PhysicsHandle`] contract the character controller consumes.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │                PhysicsWorld                │
//! │  RigidBodySet   ColliderSet   QueryPipeline│
//! └────────────────────────────────────────────┘
//!                      │ avatar(body, collider)
//!                      ▼
//!              ┌───────────────┐
//!              │  AvatarBody   │  impl PhysicsHandle
//!              └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use glam::Vec3;
//! use snow_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//! physics.add_fixed(Vec3::new(0.0, -2.5, 0.0), ColliderShape::cuboid(50.0, 0.5, 50.0));
//! let (body, collider) = physics.create_avatar(Vec3::new(0.0, 5.0, 10.0), ColliderShape::capsule(0.75, 0.5));
//! physics.step(1.0 / 60.0);
//!
//! if let Some(avatar) = physics.avatar(body, collider) {
//!     println!("avatar at {:?}", avatar.position());
//! }
//! ```

pub mod avatar;
pub mod config;
pub mod error;
pub mod query;
pub mod shape;
pub mod world;

pub mod prelude {
    pub use crate::avatar::{AvatarBody, PhysicsHandle, RayHit};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::query::{RayQuery, RaycastHit};
    pub use crate::shape::{ColliderHandle, ColliderShape, RigidBodyHandle};
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
