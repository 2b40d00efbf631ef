//! Points of interest

use glam::Vec3;

/// A fixed world location with a trigger radius
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfInterest {
    pub id: String,
    pub position: Vec3,
    pub radius: f32,
    near: bool,
    time_near: f32,
    last_distance: Option<f32>,
}

impl PointOfInterest {
    pub fn new(id: impl Into<String>, position: Vec3, radius: f32) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            near: false,
            time_near: 0.0,
            last_distance: None,
        }
    }

    /// Whether the avatar was within the radius on the last update
    pub fn is_near(&self) -> bool {
        self.near
    }

    /// Time spent near since the last enter
    pub fn time_near(&self) -> f32 {
        self.time_near
    }

    /// Distance measured on the last update
    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    /// Near test for a distance. `NaN` is never near.
    pub fn contains_distance(&self, distance: f32) -> bool {
        distance < self.radius
    }

    pub(crate) fn set_near(&mut self, near: bool) {
        self.near = near;
        self.time_near = 0.0;
    }

    pub(crate) fn accumulate(&mut self, dt: f32) {
        self.time_near += dt;
    }

    pub(crate) fn record_distance(&mut self, distance: f32) {
        self.last_distance = Some(distance);
    }

    pub(crate) fn clear(&mut self) {
        self.near = false;
        self.time_near = 0.0;
        self.last_distance = None;
    }
}
