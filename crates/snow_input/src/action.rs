//! Logical actions and their per-press state machine

use serde::{Deserialize, Serialize};

/// Gameplay action a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
    Run,
    Jump,
    ToggleView,
    Interact,
}

impl Action {
    /// Every action, in index order
    pub const ALL: [Action; 8] = [
        Action::MoveForward,
        Action::MoveBack,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::Run,
        Action::Jump,
        Action::ToggleView,
        Action::Interact,
    ];

    /// Number of actions
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for table storage
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the action reports a "pressed this tick" edge
    pub fn is_one_shot(self) -> bool {
        matches!(self, Action::Jump | Action::ToggleView | Action::Interact)
    }
}

/// Physical key state carried by a raw keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Per-action press state.
///
/// `Idle --key down--> Pressed --consumed--> Held --key up--> Idle`.
/// Key repeats while `Pressed` or `Held` change nothing, and a release
/// from `Pressed` drops the unconsumed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pressed,
    Held,
}

impl ActionState {
    /// Whether any bound key is physically down
    pub fn is_down(self) -> bool {
        !matches!(self, ActionState::Idle)
    }

    /// Apply a key-down
    pub fn press(self) -> Self {
        match self {
            ActionState::Idle => ActionState::Pressed,
            other => other,
        }
    }

    /// Consume the pending edge, returning whether there was one
    pub fn consume(&mut self) -> bool {
        if *self == ActionState::Pressed {
            *self = ActionState::Held;
            true
        } else {
            false
        }
    }
}
