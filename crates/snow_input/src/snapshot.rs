//! Per-tick view of the input state

use crate::action::Action;

/// Held state for every action plus the one-shot edges consumed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    held: [bool; Action::COUNT],
    pressed: [bool; Action::COUNT],
}

impl InputSnapshot {
    /// A snapshot with nothing held and nothing pressed
    pub fn idle() -> Self {
        Self::default()
    }

    /// Mark an action as held
    pub fn with_held(mut self, action: Action) -> Self {
        self.held[action.index()] = true;
        self
    }

    /// Mark a one-shot action as pressed this tick (implies held).
    /// Continuous actions never carry an edge.
    pub fn with_pressed(mut self, action: Action) -> Self {
        self.held[action.index()] = true;
        if action.is_one_shot() {
            self.pressed[action.index()] = true;
        }
        self
    }

    /// Whether a bound key for the action is down
    pub fn held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Whether the action's one-shot edge fired this tick
    pub fn pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    pub fn is_idle(&self) -> bool {
        !self.held.iter().chain(self.pressed.iter()).any(|&b| b)
    }

    /// Movement intent as `(forward, right)`, each in `{-1, 0, 1}`.
    /// Opposing keys cancel.
    pub fn movement_axes(&self) -> (f32, f32) {
        let axis = |pos: Action, neg: Action| -> f32 {
            (self.held(pos) as i8 - self.held(neg) as i8) as f32
        };
        (
            axis(Action::MoveForward, Action::MoveBack),
            axis(Action::StrafeRight, Action::StrafeLeft),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_snapshot() {
        let snapshot = InputSnapshot::idle();
        assert!(snapshot.is_idle());
        assert_eq!(snapshot.movement_axes(), (0.0, 0.0));
    }

    #[test]
    fn test_pressed_implies_held() {
        let snapshot = InputSnapshot::idle().with_pressed(Action::Jump);
        assert!(snapshot.held(Action::Jump));
        assert!(snapshot.pressed(Action::Jump));
        assert!(!snapshot.is_idle());
    }

    #[test]
    fn test_continuous_actions_have_no_edge() {
        let snapshot = InputSnapshot::idle().with_pressed(Action::Run);
        assert!(snapshot.held(Action::Run));
        assert!(!snapshot.pressed(Action::Run));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let snapshot = InputSnapshot::idle()
            .with_held(Action::MoveForward)
            .with_held(Action::MoveBack)
            .with_held(Action::StrafeLeft);
        assert_eq!(snapshot.movement_axes(), (0.0, -1.0));
    }
}
