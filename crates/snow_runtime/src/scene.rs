//! Scene setup: ground, avatar body, points of interest

use glam::Vec3;
use snow_physics::{AvatarBody, ColliderHandle, ColliderShape, PhysicsWorld, RigidBodyHandle};
use snow_triggers::PointOfInterest;

use crate::config::{PoiConfig, SceneConfig};

/// Half thickness of the ground slab
const GROUND_HALF_THICKNESS: f32 = 0.5;

/// What a point of interest means to the quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiRole {
    Npc,
    Item,
}

/// Physics handles and layout of the village
#[derive(Debug, Clone)]
pub struct Scene {
    ground: RigidBodyHandle,
    avatar_body: RigidBodyHandle,
    avatar_collider: ColliderHandle,
    spawn: Vec3,
    roles: Vec<(String, PoiRole)>,
}

impl Scene {
    /// Create the ground and the avatar in `world`
    pub fn build(world: &mut PhysicsWorld, config: &SceneConfig) -> Self {
        let (ground, _) = world.add_fixed(
            Vec3::new(0.0, config.ground_height - GROUND_HALF_THICKNESS, 0.0),
            ColliderShape::cuboid(config.ground_half_extent, GROUND_HALF_THICKNESS, config.ground_half_extent),
        );

        let (avatar_body, avatar_collider) = world.create_avatar(
            Vec3::from_array(config.spawn),
            ColliderShape::capsule(config.avatar_half_height, config.avatar_radius),
        );
        world.sync_query_pipeline();

        log::info!(
            "Scene built: ground at y={}, avatar spawn {:?}",
            config.ground_height,
            config.spawn
        );

        Self {
            ground,
            avatar_body,
            avatar_collider,
            spawn: Vec3::from_array(config.spawn),
            roles: vec![
                (config.npc.id.clone(), PoiRole::Npc),
                (config.item.id.clone(), PoiRole::Item),
            ],
        }
    }

    /// Points of interest to register with the proximity tracker
    pub fn points_of_interest(config: &SceneConfig) -> Vec<PointOfInterest> {
        [&config.npc, &config.item].into_iter().map(poi_from_config).collect()
    }

    pub fn ground(&self) -> RigidBodyHandle {
        self.ground
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    pub fn role_of(&self, id: &str) -> Option<PoiRole> {
        self.roles.iter().find(|(poi, _)| poi == id).map(|(_, role)| *role)
    }

    /// Bind the avatar body, if it is still in the world
    pub fn avatar<'w>(&self, world: &'w mut PhysicsWorld) -> Option<AvatarBody<'w>> {
        world.avatar(self.avatar_body, self.avatar_collider)
    }

    /// Move the avatar body to `position` and stop it
    pub fn place_avatar(&self, world: &mut PhysicsWorld, position: Vec3) -> snow_physics::Result<()> {
        world.set_body_position(self.avatar_body, position)?;
        world.set_body_velocity(self.avatar_body, Vec3::ZERO, true)?;
        world.sync_query_pipeline();
        Ok(())
    }

    /// Put the avatar back at its spawn point
    pub fn respawn_avatar(&self, world: &mut PhysicsWorld) -> snow_physics::Result<()> {
        self.place_avatar(world, self.spawn)
    }
}

fn poi_from_config(config: &PoiConfig) -> PointOfInterest {
    PointOfInterest::new(config.id.clone(), Vec3::from_array(config.position), config.radius)
}
