//! Proximity events

use serde::{Deserialize, Serialize};

/// Edge reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProximityEventKind {
    /// The avatar came within the trigger radius
    Enter,
    /// The avatar left the trigger radius
    Exit,
}

/// A proximity edge for one point of interest
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityEvent {
    pub kind: ProximityEventKind,
    /// Point of interest id
    pub poi: String,
    /// Distance on the tick the edge was detected
    pub distance: f32,
    /// Time spent near before leaving (zero on enter)
    pub time_near: f32,
}

impl ProximityEvent {
    pub fn enter(poi: impl Into<String>, distance: f32) -> Self {
        Self {
            kind: ProximityEventKind::Enter,
            poi: poi.into(),
            distance,
            time_near: 0.0,
        }
    }

    pub fn exit(poi: impl Into<String>, distance: f32, time_near: f32) -> Self {
        Self {
            kind: ProximityEventKind::Exit,
            poi: poi.into(),
            distance,
            time_near,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.kind == ProximityEventKind::Enter
    }

    pub fn is_exit(&self) -> bool {
        self.kind == ProximityEventKind::Exit
    }
}
