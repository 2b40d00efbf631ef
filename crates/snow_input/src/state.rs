//! Live keyboard state fed by raw key events

use std::collections::HashSet;

use crate::action::{Action, ActionState, ButtonState};
use crate::bindings::KeyBindings;
use crate::snapshot::InputSnapshot;

/// Keyboard state driven by raw key events and drained once per tick
#[derive(Debug, Clone)]
pub struct InputState {
    bindings: KeyBindings,
    keys_down: HashSet<String>,
    actions: [ActionState; Action::COUNT],
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            keys_down: HashSet::new(),
            actions: [ActionState::Idle; Action::COUNT],
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Feed a raw key event. Returns the bound action, if any.
    pub fn handle_key(&mut self, code: &str, state: ButtonState) -> Option<Action> {
        match state {
            ButtonState::Pressed => self.key_down(code),
            ButtonState::Released => self.key_up(code),
        }
    }

    /// Key-down (including OS key repeats)
    pub fn key_down(&mut self, code: &str) -> Option<Action> {
        let action = self.bindings.action_for(code)?;
        if self.keys_down.insert(code.to_string()) {
            log::trace!("Key down: {} -> {:?}", code, action);
        }
        let slot = &mut self.actions[action.index()];
        *slot = slot.press();
        Some(action)
    }

    /// Key-up. The action only goes idle once every key bound to it is up,
    /// which also drops any unconsumed one-shot edge.
    pub fn key_up(&mut self, code: &str) -> Option<Action> {
        let action = self.bindings.action_for(code)?;
        self.keys_down.remove(code);

        let still_down = self
            .keys_down
            .iter()
            .any(|key| self.bindings.action_for(key) == Some(action));
        if !still_down {
            self.actions[action.index()] = ActionState::Idle;
            log::trace!("Key up: {} -> {:?} idle", code, action);
        }
        Some(action)
    }

    /// Current state of an action without consuming anything
    pub fn action_state(&self, action: Action) -> ActionState {
        self.actions[action.index()]
    }

    /// Take this tick's snapshot, consuming every pending one-shot edge
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::idle();
        for action in Action::ALL {
            let slot = &mut self.actions[action.index()];
            if !slot.is_down() {
                continue;
            }
            snapshot = if slot.consume() {
                snapshot.with_pressed(action)
            } else {
                snapshot.with_held(action)
            };
        }
        snapshot
    }

    /// Release every key, e.g. on focus loss or scene exit
    pub fn reset(&mut self) {
        self.keys_down.clear();
        self.actions = [ActionState::Idle; Action::COUNT];
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}
