//! Session status

use serde::{Deserialize, Serialize};

/// Conversation status shown by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    /// Request sent, nothing received yet
    AwaitingResponse,
    /// Reply arriving incrementally
    Streaming,
    /// Reply complete, NPC is talking
    Speaking,
    /// Exchange failed, fallback shown
    Errored,
}

impl SessionStatus {
    /// Whether a reply is still pending
    pub fn is_pending(self) -> bool {
        matches!(self, SessionStatus::AwaitingResponse | SessionStatus::Streaming)
    }
}
