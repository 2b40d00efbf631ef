//! Proximity tracker

use glam::Vec3;

use crate::events::ProximityEvent;
use crate::poi::PointOfInterest;

/// Edge-triggered distance tracker over a fixed set of points of interest
#[derive(Debug, Clone, Default)]
pub struct ProximityTracker {
    points: Vec<PointOfInterest>,
}

impl ProximityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a point of interest, replacing one with the same id
    pub fn register(&mut self, poi: PointOfInterest) {
        log::debug!("Registered point of interest '{}' (radius {})", poi.id, poi.radius);
        match self.points.iter_mut().find(|p| p.id == poi.id) {
            Some(existing) => *existing = poi,
            None => self.points.push(poi),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PointOfInterest> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn points(&self) -> impl Iterator<Item = &PointOfInterest> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_near(&self, id: &str) -> bool {
        self.get(id).is_some_and(PointOfInterest::is_near)
    }

    /// Distance from the last update's avatar position to a point
    pub fn distance_to(&self, id: &str) -> Option<f32> {
        self.get(id).and_then(PointOfInterest::last_distance)
    }

    /// Measure every point against `avatar` and return the edges, in
    /// registration order
    pub fn update(&mut self, avatar: Vec3, dt: f32) -> Vec<ProximityEvent> {
        let mut events = Vec::new();

        for poi in &mut self.points {
            let distance = avatar.distance(poi.position);
            poi.record_distance(distance);
            let near = poi.contains_distance(distance);

            match (poi.is_near(), near) {
                (false, true) => {
                    poi.set_near(true);
                    log::debug!("Entered '{}' at distance {:.2}", poi.id, distance);
                    events.push(ProximityEvent::enter(&poi.id, distance));
                }
                (true, false) => {
                    let time_near = poi.time_near();
                    poi.set_near(false);
                    log::debug!("Left '{}' after {:.2}s", poi.id, time_near);
                    events.push(ProximityEvent::exit(&poi.id, distance, time_near));
                }
                (true, true) => poi.accumulate(dt),
                (false, false) => {}
            }
        }

        events
    }

    /// Clear every near flag without emitting events
    pub fn reset(&mut self) {
        for poi in &mut self.points {
            poi.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProximityEventKind;
    use approx::assert_relative_eq;

    fn tracker_with(id: &str, position: Vec3, radius: f32) -> ProximityTracker {
        let mut tracker = ProximityTracker::new();
        tracker.register(PointOfInterest::new(id, position, radius));
        tracker
    }

    #[test]
    fn test_crossing_yields_one_enter_and_one_exit() {
        let mut tracker = tracker_with("santa", Vec3::ZERO, 15.0);
        let mut events = Vec::new();

        // 20 -> 10 -> 20 in unit steps
        let path = (10..=20).rev().chain(11..=20);
        for d in path {
            events.extend(tracker.update(Vec3::new(d as f32, 0.0, 0.0), 0.1));
        }

        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ProximityEventKind::Enter, ProximityEventKind::Exit]);
        assert!(!tracker.is_near("santa"));
    }

    #[test]
    fn test_steady_state_emits_nothing() {
        let mut tracker = tracker_with("santa", Vec3::ZERO, 5.0);
        assert_eq!(tracker.update(Vec3::ONE, 0.1).len(), 1);
        for _ in 0..10 {
            assert!(tracker.update(Vec3::ONE, 0.1).is_empty());
        }
        assert!(tracker.is_near("santa"));
    }

    #[test]
    fn test_boundary_flicker_is_not_filtered() {
        let mut tracker = tracker_with("glasses", Vec3::ZERO, 2.0);
        assert!(tracker.update(Vec3::new(1.999, 0.0, 0.0), 0.1)[0].is_enter());
        assert!(tracker.update(Vec3::new(2.0, 0.0, 0.0), 0.1)[0].is_exit());
        assert!(tracker.update(Vec3::new(1.999, 0.0, 0.0), 0.1)[0].is_enter());
    }

    #[test]
    fn test_exit_reports_time_near() {
        let mut tracker = tracker_with("santa", Vec3::ZERO, 5.0);
        tracker.update(Vec3::ZERO, 0.5);
        tracker.update(Vec3::ZERO, 0.5);
        tracker.update(Vec3::ZERO, 0.5);

        let events = tracker.update(Vec3::new(10.0, 0.0, 0.0), 0.5);
        assert_eq!(events.len(), 1);
        assert_relative_eq!(events[0].time_near, 1.0);
        assert_relative_eq!(events[0].distance, 10.0);
    }

    #[test]
    fn test_multiple_points_in_registration_order() {
        let mut tracker = ProximityTracker::new();
        tracker.register(PointOfInterest::new("santa", Vec3::ZERO, 5.0));
        tracker.register(PointOfInterest::new("glasses", Vec3::new(1.0, 0.0, 0.0), 5.0));

        let events = tracker.update(Vec3::new(0.5, 0.0, 0.0), 0.1);
        let ids: Vec<_> = events.iter().map(|e| e.poi.as_str()).collect();
        assert_eq!(ids, vec!["santa", "glasses"]);
        assert_relative_eq!(tracker.distance_to("glasses").unwrap(), 0.5);
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut tracker = tracker_with("santa", Vec3::ZERO, 5.0);
        tracker.register(PointOfInterest::new("santa", Vec3::ONE, 3.0));
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get("santa").unwrap().radius, 3.0);
    }

    #[test]
    fn test_reset_is_silent_and_rearms_enter() {
        let mut tracker = tracker_with("santa", Vec3::ZERO, 5.0);
        tracker.update(Vec3::ZERO, 0.1);
        tracker.reset();

        assert!(!tracker.is_near("santa"));
        assert_eq!(tracker.distance_to("santa"), None);
        let events = tracker.update(Vec3::ZERO, 0.1);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_enter());
    }
}
