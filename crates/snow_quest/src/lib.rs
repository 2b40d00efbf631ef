//! Snow Quest - quest flags and the transitions between them
//!
//! [`QuestStateMachine`] is the single owner of [`QuestFlags`]. Everything
//! else feeds it [`QuestInput`]s (proximity edges, interact presses, UI
//! actions) and reads the resulting flags.
//!
//! ```text
//!                 NearNpcEnter / NearNpcExit
//!                 NearItemEnter / NearItemExit
//!                            │
//!   InteractPressed ──▶ ┌─────────┐ ──▶ QuestEffect
//!   CloseDialogue   ──▶ │  apply  │       DialogueOpened
//!   ExitToMenu      ──▶ └─────────┘       DialogueClosed
//!                            │            ItemCollected
//!                            ▼            Reset
//!                        QuestFlags
//! ```

pub mod flags;
pub mod machine;
pub mod notification;

pub mod prelude {
    pub use crate::flags::{InteractTarget, QuestFlags};
    pub use crate::machine::{QuestEffect, QuestInput, QuestStateMachine, QuestTransition};
    pub use crate::notification::{Notification, NotificationKind};
}

pub use prelude::*;
