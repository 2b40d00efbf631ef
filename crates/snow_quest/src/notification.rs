//! Timed HUD notifications

use serde::{Deserialize, Serialize};

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// The hidden item was picked up
    ItemFound,
}

impl NotificationKind {
    /// Default display duration in seconds
    pub fn default_duration(self) -> f32 {
        match self {
            NotificationKind::ItemFound => 3.0,
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            NotificationKind::ItemFound => "You found Santa's glasses!",
        }
    }
}

/// A message shown for a fixed time, then dropped without further input
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Display duration in seconds
    pub duration: f32,
    /// Time remaining in seconds
    pub time_remaining: f32,
}

impl Notification {
    pub fn new(kind: NotificationKind) -> Self {
        let duration = kind.default_duration();
        Self {
            kind,
            message: kind.default_message().to_string(),
            duration,
            time_remaining: duration,
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self.time_remaining = seconds;
        self
    }

    /// Advance by `dt` seconds. Returns false once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.time_remaining = (self.time_remaining - dt).max(0.0);
        self.time_remaining > 0.0
    }

    /// Fraction of the display time elapsed, 0..=1
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.time_remaining / self.duration
        }
    }
}
