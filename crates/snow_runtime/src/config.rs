//! Game configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `GEMINI_API_KEY`, `GEMINI_MODEL`,
//!    `SNOWQUEST_STREAMING`
//! 2. Config file named by `SNOWQUEST_CONFIG`, else `snowquest.toml` in the
//!    working directory when present
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [physics]
//! gravity = [0.0, -20.0, 0.0]
//!
//! [controller]
//! walk_speed = 3.0
//! run_speed = 6.0
//!
//! [keys]
//! KeyZ = "MoveForward"   # merged over the default bindings
//!
//! [scene.npc]
//! id = "santa"
//! position = [0.0, -1.0, 0.0]
//! radius = 3.0
//!
//! [dialogue]
//! model = "gemini-flash-lite-latest"
//!
//! [dialogue.session]
//! streaming = true
//!
//! [[dialogue.canned]]
//! contains = "reindeer"
//! reply = "Ho ho ho! Rudolph is napping in the stable."
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use snow_controller::{CameraConfig, ControllerConfig};
use snow_dialogue::gemini::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_SYSTEM_INSTRUCTION};
use snow_dialogue::{CannedRules, SessionConfig};
use snow_input::KeyBindings;
use snow_physics::{PhysicsConfig, PhysicsError};
use thiserror::Error;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "snowquest.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A point of interest placed at scene setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiConfig {
    pub id: String,
    pub position: [f32; 3],
    pub radius: f32,
}

/// Scene layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Avatar spawn point
    pub spawn: [f32; 3],
    /// Height of the walkable ground surface
    pub ground_height: f32,
    /// Half width of the square ground slab
    pub ground_half_extent: f32,
    pub avatar_radius: f32,
    /// Half height of the avatar capsule's cylindrical part
    pub avatar_half_height: f32,
    /// The NPC you talk to
    pub npc: PoiConfig,
    /// The collectible
    pub item: PoiConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            spawn: [0.0, 5.0, 10.0],
            ground_height: -2.0,
            ground_half_extent: 50.0,
            avatar_radius: 0.5,
            avatar_half_height: 0.75,
            npc: PoiConfig {
                id: "santa".to_string(),
                position: [0.0, -1.0, 0.0],
                radius: 3.0,
            },
            item: PoiConfig {
                id: "glasses".to_string(),
                position: [8.0, -1.0, -6.0],
                radius: 2.0,
            },
        }
    }
}

/// Text service and conversation settings. `Debug` never prints the key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Gemini API key. Without one the NPC answers from canned rules and
    /// fallbacks only.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub system_instruction: String,
    pub timeout_secs: u64,
    pub session: SessionConfig,
    /// Canned replies checked before the service, first match wins
    pub canned: CannedRules,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            timeout_secs: 60,
            session: SessionConfig::default(),
            canned: CannedRules::default(),
        }
    }
}

impl std::fmt::Debug for DialogueConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("system_instruction", &self.system_instruction)
            .field("timeout_secs", &self.timeout_secs)
            .field("session", &self.session)
            .field("canned", &self.canned)
            .finish()
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
    /// Key overrides merged over the default bindings
    pub keys: KeyBindings,
    pub scene: SceneConfig,
    pub dialogue: DialogueConfig,
    /// Config file this was loaded from
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            controller: ControllerConfig::default(),
            camera: CameraConfig::default(),
            keys: KeyBindings::empty(),
            scene: SceneConfig::default(),
            dialogue: DialogueConfig::default(),
            config_path: None,
        }
    }
}

impl GameConfig {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("SNOWQUEST_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            _ => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.config_path = Some(path.to_string());
        log::info!("Loaded game config from {}", path);
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.dialogue.api_key = Some(key);
        }

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.is_empty()) {
            log::info!("Model from env: {}", model);
            self.dialogue.model = model;
        }

        if let Some(streaming) = lookup("SNOWQUEST_STREAMING") {
            match streaming.to_lowercase().as_str() {
                "1" | "true" | "on" => self.dialogue.session.streaming = true,
                "0" | "false" | "off" => self.dialogue.session.streaming = false,
                other => log::warn!("Ignoring SNOWQUEST_STREAMING={}", other),
            }
        }
    }

    /// Reject values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        for poi in [&self.scene.npc, &self.scene.item] {
            if !(poi.radius > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "point of interest '{}' needs a positive radius",
                    poi.id
                )));
            }
        }
        if self.scene.npc.id == self.scene.item.id {
            return Err(ConfigError::Invalid(format!(
                "npc and item share the id '{}'",
                self.scene.npc.id
            )));
        }
        Ok(())
    }

    /// Default bindings with the configured overrides applied
    pub fn key_bindings(&self) -> KeyBindings {
        let mut bindings = KeyBindings::default();
        bindings.merge(&self.keys);
        bindings
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Game Configuration:");
        log::info!("  Gravity: {:?}, timestep: {:.4}s", self.physics.gravity, self.physics.timestep);
        log::info!(
            "  Speeds: walk {} / run {}, jump {}",
            self.controller.walk_speed,
            self.controller.run_speed,
            self.controller.jump_impulse
        );
        log::info!(
            "  NPC '{}' r={}, item '{}' r={}",
            self.scene.npc.id,
            self.scene.npc.radius,
            self.scene.item.id,
            self.scene.item.radius
        );
        log::info!(
            "  Dialogue: model={}, streaming={}, API key {}",
            self.dialogue.model,
            self.dialogue.session.streaming,
            if self.dialogue.api_key.is_some() { "set" } else { "not set" }
        );
        if !self.keys.is_empty() {
            log::info!("  Key overrides: {}", self.keys.len());
        }
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path);
        }
    }
}
