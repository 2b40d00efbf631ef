//! Physics errors

use thiserror::Error;

use crate::shape::RigidBodyHandle;

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// The handle does not refer to a body in this world (any more)
    #[error("Rigid body not found: {0:?}")]
    BodyNotFound(RigidBodyHandle),

    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
