//! Snow Input - keyboard to gameplay actions
//!
//! Raw key-down/key-up events carrying a key code (`"KeyW"`, `"Space"`,
//! `"ShiftLeft"`, ...) are mapped to logical [`Action`]s. Each action runs a
//! small `Idle -> Pressed -> Held` state machine so one-shot actions (jump,
//! view toggle, interact) fire at most once per physical press.
//!
//! # Example
//!
//! ```ignore
//! use snow_input::prelude::*;
//!
//! let mut input = InputState::new(KeyBindings::default());
//! input.handle_key("Space", ButtonState::Pressed);
//!
//! let snapshot = input.take_snapshot();
//! assert!(snapshot.pressed(Action::Jump));
//! assert!(!input.take_snapshot().pressed(Action::Jump)); // consumed
//! ```

pub mod action;
pub mod bindings;
pub mod snapshot;
pub mod state;

pub mod prelude {
    pub use crate::action::{Action, ActionState, ButtonState};
    pub use crate::bindings::KeyBindings;
    pub use crate::snapshot::InputSnapshot;
    pub use crate::state::InputState;
}

pub use prelude::*;
