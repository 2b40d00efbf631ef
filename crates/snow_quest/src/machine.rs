//! Quest state machine

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::flags::{InteractTarget, QuestFlags};
use crate::notification::{Notification, NotificationKind};

const HISTORY_LIMIT: usize = 32;

/// Inputs accepted by [`QuestStateMachine::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestInput {
    NearNpcEnter,
    NearNpcExit,
    NearItemEnter,
    NearItemExit,
    InteractPressed,
    CloseDialogue,
    ExitToMenu,
}

/// Side effects other systems must react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestEffect {
    DialogueOpened,
    DialogueClosed,
    ItemCollected,
    /// Everything returned to its initial state; the conversation must be
    /// reset too
    Reset,
}

/// A recorded flag change
#[derive(Debug, Clone, PartialEq)]
pub struct QuestTransition {
    pub from: QuestFlags,
    pub to: QuestFlags,
    pub input: QuestInput,
}

/// Sole owner of the quest flags
#[derive(Debug, Clone, Default)]
pub struct QuestStateMachine {
    flags: QuestFlags,
    notification: Option<Notification>,
    history: VecDeque<QuestTransition>,
}

impl QuestStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> &QuestFlags {
        &self.flags
    }

    /// Active timed notification, if any
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Recent flag changes, oldest first
    pub fn history(&self) -> impl Iterator<Item = &QuestTransition> {
        self.history.iter()
    }

    /// HUD prompt for the interaction an interact press would perform
    pub fn interaction_prompt(&self) -> Option<&'static str> {
        self.flags.interact_target().map(InteractTarget::prompt)
    }

    /// Apply one input. Inputs that are not legal in the current state are
    /// ignored and return `None`.
    pub fn apply(&mut self, input: QuestInput) -> Option<QuestEffect> {
        let from = self.flags;
        let mut effect = None;

        match input {
            QuestInput::NearNpcEnter => self.flags.near_npc = true,
            // Walking away does not close an open dialogue
            QuestInput::NearNpcExit => self.flags.near_npc = false,
            QuestInput::NearItemEnter => {
                if !self.flags.item_collected {
                    self.flags.near_item = true;
                }
            }
            QuestInput::NearItemExit => self.flags.near_item = false,
            QuestInput::InteractPressed => match self.flags.interact_target() {
                Some(InteractTarget::Npc) => {
                    self.flags.dialogue_open = true;
                    effect = Some(QuestEffect::DialogueOpened);
                }
                Some(InteractTarget::Item) => {
                    self.flags.item_visible = false;
                    self.flags.item_collected = true;
                    self.flags.near_item = false;
                    self.notification = Some(Notification::new(NotificationKind::ItemFound));
                    effect = Some(QuestEffect::ItemCollected);
                }
                None => {}
            },
            QuestInput::CloseDialogue => {
                if self.flags.dialogue_open {
                    self.flags.dialogue_open = false;
                    effect = Some(QuestEffect::DialogueClosed);
                }
            }
            QuestInput::ExitToMenu => {
                self.flags = QuestFlags::default();
                self.notification = None;
                effect = Some(QuestEffect::Reset);
            }
        }

        debug_assert!(self.flags.is_consistent(), "inconsistent quest flags: {:?}", self.flags);

        if self.flags != from {
            self.record(QuestTransition {
                from,
                to: self.flags,
                input,
            });
        }
        if let Some(effect) = effect {
            log::info!("Quest {:?} -> {:?}", input, effect);
        }
        effect
    }

    /// Decay the active notification by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if let Some(notification) = &mut self.notification {
            if !notification.update(dt) {
                log::debug!("Notification {:?} expired", notification.kind);
                self.notification = None;
            }
        }
    }

    fn record(&mut self, transition: QuestTransition) {
        log::debug!("Quest flags after {:?}: {:?}", transition.input, transition.to);
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(transition);
    }
}
