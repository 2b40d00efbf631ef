//! Quest flags

use serde::{Deserialize, Serialize};

/// What an interact press would act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractTarget {
    Npc,
    Item,
}

impl InteractTarget {
    /// HUD prompt text
    pub fn prompt(self) -> &'static str {
        match self {
            InteractTarget::Npc => "Talk to Santa",
            InteractTarget::Item => "Pick up glasses",
        }
    }
}

/// World and dialogue flags.
///
/// Once `item_collected` is set, `item_visible` and `near_item` stay false
/// until the next reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFlags {
    pub item_visible: bool,
    pub item_collected: bool,
    pub near_npc: bool,
    pub near_item: bool,
    pub dialogue_open: bool,
}

impl QuestFlags {
    /// The single target an interact press would act on. The NPC wins when
    /// both are near; nothing is armed while dialogue is open.
    pub fn interact_target(&self) -> Option<InteractTarget> {
        if self.dialogue_open {
            None
        } else if self.near_npc {
            Some(InteractTarget::Npc)
        } else if self.near_item && !self.item_collected {
            Some(InteractTarget::Item)
        } else {
            None
        }
    }

    pub(crate) fn is_consistent(&self) -> bool {
        !self.item_collected || (!self.item_visible && !self.near_item)
    }
}

impl Default for QuestFlags {
    fn default() -> Self {
        Self {
            item_visible: true,
            item_collected: false,
            near_npc: false,
            near_item: false,
            dialogue_open: false,
        }
    }
}
