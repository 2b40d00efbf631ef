//! Key-code to action bindings

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Map from key-code identifiers (`"KeyW"`, `"ShiftLeft"`, `"Space"`) to
/// actions. Several keys may drive the same action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: HashMap<String, Action>,
}

impl KeyBindings {
    /// Bindings with no keys mapped
    pub fn empty() -> Self {
        Self { keys: HashMap::new() }
    }

    /// Bind a key code, replacing any previous binding for that code
    pub fn bind(&mut self, code: impl Into<String>, action: Action) -> &mut Self {
        self.keys.insert(code.into(), action);
        self
    }

    /// Builder form of [`bind`](Self::bind)
    pub fn with(mut self, code: impl Into<String>, action: Action) -> Self {
        self.bind(code, action);
        self
    }

    /// Remove a key binding
    pub fn unbind(&mut self, code: &str) -> Option<Action> {
        self.keys.remove(code)
    }

    /// Action bound to a key code
    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.keys.get(code).copied()
    }

    /// All key codes bound to an action
    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(move |(_, bound)| **bound == action)
            .map(|(code, _)| code.as_str())
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Merge overrides on top of these bindings
    pub fn merge(&mut self, overrides: &KeyBindings) {
        for (code, action) in &overrides.keys {
            self.keys.insert(code.clone(), *action);
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty()
            .with("KeyW", Action::MoveForward)
            .with("ArrowUp", Action::MoveForward)
            .with("KeyS", Action::MoveBack)
            .with("ArrowDown", Action::MoveBack)
            .with("KeyA", Action::StrafeLeft)
            .with("ArrowLeft", Action::StrafeLeft)
            .with("KeyD", Action::StrafeRight)
            .with("ArrowRight", Action::StrafeRight)
            .with("ShiftLeft", Action::Run)
            .with("ShiftRight", Action::Run)
            .with("Space", Action::Jump)
            .with("KeyV", Action::ToggleView)
            .with("KeyE", Action::Interact)
    }
}
