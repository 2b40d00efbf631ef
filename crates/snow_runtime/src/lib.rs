//! SnowQuest runtime
//!
//! Wires the core crates into a single [`Game`] with one fixed-order tick:
//!
//! ```text
//! physics step → input snapshot → controller → proximity → quest
//!              → notification decay → camera
//! ```
//!
//! Keyboard gating is central: while the dialogue is open the tick still
//! drains the input snapshot (so one-shot presses are spent) but hands an
//! idle snapshot to the controller and the quest machine.

pub mod config;
pub mod game;
pub mod scene;

pub use config::{ConfigError, DialogueConfig, GameConfig, PoiConfig, SceneConfig};
pub use game::{Game, GamePhase, HudState, TickReport};
pub use scene::{PoiRole, Scene};
