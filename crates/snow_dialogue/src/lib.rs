//! Snow Dialogue - talking to the NPC
//!
//! A [`ConversationSession`] runs one exchange at a time with a
//! [`TextService`]:
//!
//! 1. Empty input and sends while an exchange is in flight are ignored.
//! 2. The user message is appended and the status becomes
//!    `AwaitingResponse`.
//! 3. A canned rule table is checked first; a match never reaches the
//!    service.
//! 4. Otherwise the service is called, streaming into a single assistant
//!    entry when it supports incremental delivery.
//! 5. Success shows `Speaking` for a length-proportional time; failure is
//!    classified, answered with a fixed in-character fallback, and shows
//!    `Errored` for a fixed time. Both then return to `Idle`.
//!
//! Every user entry gets exactly one terminal assistant entry. A reset
//! bumps a generation token so output from an exchange started before the
//! reset is discarded, and a status version keeps stale idle timers from
//! overwriting a newer status.

pub mod error;
pub mod gemini;
pub mod rules;
pub mod service;
pub mod session;
pub mod status;
pub mod transcript;

pub mod prelude {
    pub use crate::error::{FailureClass, Result, ServiceError};
    pub use crate::gemini::GeminiClient;
    pub use crate::rules::{CannedRule, CannedRules};
    pub use crate::service::{OfflineService, TextService, TextStream};
    pub use crate::session::{ConversationSession, SessionConfig};
    pub use crate::status::SessionStatus;
    pub use crate::transcript::{ChatTranscript, Message, Role};
}

pub use prelude::*;
