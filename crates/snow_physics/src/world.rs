//! The simulated world: one rapier pipeline, fixed bodies and the avatar

use std::num::NonZeroUsize;

use glam::Vec3;
use rapier3d::prelude as rapier;

use crate::avatar::AvatarBody;
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::query::{RayQuery, RaycastHit};
use crate::shape::{ColliderHandle, ColliderShape, RigidBodyHandle};

fn vector(v: Vec3) -> rapier::Vector<f32> {
    rapier::Vector::new(v.x, v.y, v.z)
}

fn vec3(v: &rapier::Vector<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Rapier world advanced on a fixed timestep
pub struct PhysicsWorld {
    config: PhysicsConfig,
    params: rapier::IntegrationParameters,
    pipeline: rapier::PhysicsPipeline,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd: rapier::CCDSolver,
    query_pipeline: rapier::QueryPipeline,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,
    /// Time not yet simulated
    backlog: f32,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let mut params = rapier::IntegrationParameters::default();
        params.dt = config.timestep;
        params.num_solver_iterations = NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            params,
            pipeline: rapier::PhysicsPipeline::new(),
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            backlog: 0.0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Bodies ====================

    /// Add an immovable body (ground, walls) with one collider
    pub fn add_fixed(&mut self, position: Vec3, shape: ColliderShape) -> (RigidBodyHandle, ColliderHandle) {
        let body = rapier::RigidBodyBuilder::fixed().translation(vector(position));
        let collider = rapier::ColliderBuilder::new(shape.to_shared()).friction(0.5);
        self.insert(body, collider)
    }

    /// Add the avatar: dynamic, upright, never asleep, with a frictionless
    /// collider so velocity commands are not fought by ground contact
    pub fn create_avatar(&mut self, position: Vec3, shape: ColliderShape) -> (RigidBodyHandle, ColliderHandle) {
        let body = rapier::RigidBodyBuilder::dynamic()
            .translation(vector(position))
            .lock_rotations()
            .can_sleep(false);
        let collider = rapier::ColliderBuilder::new(shape.to_shared()).friction(0.0);
        let handles = self.insert(body, collider);
        log::debug!("Avatar body created at {:?}", position);
        handles
    }

    fn insert(
        &mut self,
        body: rapier::RigidBodyBuilder,
        collider: rapier::ColliderBuilder,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);
        (RigidBodyHandle(body), ColliderHandle(collider))
    }

    /// Remove a body together with its colliders
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Bind the avatar handles into a [`PhysicsHandle`](crate::PhysicsHandle).
    /// `None` once either handle has left the world.
    pub fn avatar(&mut self, body: RigidBodyHandle, collider: ColliderHandle) -> Option<AvatarBody<'_>> {
        if self.bodies.contains(body.0) && self.colliders.contains(collider.0) {
            Some(AvatarBody::new(self, body, collider))
        } else {
            None
        }
    }

    fn body(&self, handle: RigidBodyHandle) -> Result<&rapier::RigidBody> {
        self.bodies.get(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn body_mut(&mut self, handle: RigidBodyHandle) -> Result<&mut rapier::RigidBody> {
        self.bodies.get_mut(handle.0).ok_or(PhysicsError::BodyNotFound(handle))
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.body(handle).map(|b| vec3(b.translation()))
    }

    /// Teleport a body. Ray queries see the new position after the next
    /// step or [`sync_query_pipeline`](Self::sync_query_pipeline).
    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec3) -> Result<()> {
        self.body_mut(handle)?.set_translation(vector(position), true);
        Ok(())
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Result<Vec3> {
        self.body(handle).map(|b| vec3(b.linvel()))
    }

    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3, wake: bool) -> Result<()> {
        self.body_mut(handle)?.set_linvel(vector(velocity), wake);
        Ok(())
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    // ==================== Simulation ====================

    /// Advance by `dt` seconds of wall time in whole fixed steps. Returns
    /// how many steps ran.
    pub fn step(&mut self, dt: f32) -> u32 {
        self.backlog += dt;

        let mut steps = 0;
        while self.backlog >= self.config.timestep {
            if steps == self.config.max_substeps {
                log::debug!("Physics fell behind, dropping {:.3}s", self.backlog);
                self.backlog = 0.0;
                break;
            }
            self.pipeline.step(
                &vector(self.config.gravity()),
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
            self.backlog -= self.config.timestep;
            steps += 1;
        }
        steps
    }

    /// Refresh the ray query structure without stepping, e.g. right after
    /// building the scene or teleporting a body
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// First solid collider along the ray, skipping sensors
    pub fn cast_ray(&self, query: &RayQuery) -> Option<RaycastHit> {
        let ray = rapier::Ray::new(
            rapier::Point::new(query.origin.x, query.origin.y, query.origin.z),
            vector(query.direction),
        );

        let mut filter = rapier::QueryFilter::new().exclude_sensors();
        if let Some(excluded) = query.exclude {
            filter = filter.exclude_collider(excluded.0);
        }

        let (collider, distance) =
            self.query_pipeline
                .cast_ray(&self.bodies, &self.colliders, &ray, query.max_distance, true, filter)?;
        let point = ray.point_at(distance);

        Some(RaycastHit {
            collider: ColliderHandle(collider),
            point: Vec3::new(point.x, point.y, point.z),
            distance,
        })
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
