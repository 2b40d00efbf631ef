//! Snow Triggers - proximity to points of interest
//!
//! Each tick the tracker measures the distance from the avatar to every
//! registered point of interest and reports edges only: one `Enter` when a
//! point becomes near (`distance < radius`) and one `Exit` when it stops
//! being near (`distance >= radius`). There is a single threshold, so an
//! avatar hovering exactly on the boundary can flicker between the two.
//!
//! The tracker knows nothing about quests. Whether an event matters (for
//! example a collected item) is decided by the consumer.
//!
//! # Example
//!
//! ```ignore
//! use snow_triggers::prelude::*;
//!
//! let mut tracker = ProximityTracker::new();
//! tracker.register(PointOfInterest::new("santa", Vec3::new(0.0, 0.0, -5.0), 4.0));
//!
//! for event in tracker.update(avatar_position, dt) {
//!     if event.is_enter() { /* ... */ }
//! }
//! ```

pub mod events;
pub mod poi;
pub mod tracker;

pub mod prelude {
    pub use crate::events::{ProximityEvent, ProximityEventKind};
    pub use crate::poi::PointOfInterest;
    pub use crate::tracker::ProximityTracker;
}

pub use prelude::*;
