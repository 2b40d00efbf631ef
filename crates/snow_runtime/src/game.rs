//! The game: owns every subsystem and runs the tick

use std::sync::Arc;

use glam::Vec3;
use snow_controller::{
    AvatarState, Camera, CameraPose, CameraRig, CharacterController, ControllerEvent, RigCamera,
};
use snow_dialogue::{ConversationSession, Message, SessionStatus, TextService};
use snow_input::{Action, ButtonState, InputSnapshot, InputState};
use snow_physics::{PhysicsHandle, PhysicsWorld};
use snow_quest::{Notification, QuestEffect, QuestFlags, QuestInput, QuestStateMachine};
use snow_triggers::{ProximityEvent, ProximityEventKind, ProximityTracker};
use tokio::task::JoinHandle;

use crate::config::GameConfig;
use crate::scene::{PoiRole, Scene};

/// Top-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Start screen; the tick does nothing
    #[default]
    Menu,
    Playing,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub controller: Vec<ControllerEvent>,
    pub proximity: Vec<ProximityEvent>,
    pub quest: Vec<QuestEffect>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.controller.is_empty() && self.proximity.is_empty() && self.quest.is_empty()
    }
}

/// Everything the presentation layer draws
#[derive(Debug, Clone)]
pub struct HudState {
    pub phase: GamePhase,
    pub avatar: AvatarState,
    pub camera: CameraPose,
    pub quest: QuestFlags,
    pub notification: Option<Notification>,
    pub prompt: Option<&'static str>,
    /// Last two transcript entries
    pub messages: Vec<Message>,
    pub status: SessionStatus,
    /// The send control must be disabled while true
    pub is_loading: bool,
}

/// SnowQuest game state
pub struct Game {
    phase: GamePhase,
    physics: PhysicsWorld,
    scene: Scene,
    input: InputState,
    controller: CharacterController,
    rig: CameraRig,
    camera: RigCamera,
    camera_pose: CameraPose,
    proximity: ProximityTracker,
    quest: QuestStateMachine,
    conversation: ConversationSession,
}

impl Game {
    pub fn new(config: &GameConfig, service: Arc<dyn TextService>) -> Self {
        let mut physics = PhysicsWorld::new(config.physics.clone());
        let scene = Scene::build(&mut physics, &config.scene);

        let mut proximity = ProximityTracker::new();
        for poi in Scene::points_of_interest(&config.scene) {
            proximity.register(poi);
        }

        let controller = CharacterController::new(config.controller.clone(), scene.spawn());
        let rig = CameraRig::new(config.camera.clone());
        let mut camera = RigCamera::default();
        let camera_pose = rig.update(&mut camera, controller.state());

        let conversation = ConversationSession::new(
            service,
            config.dialogue.canned.clone(),
            config.dialogue.session.clone(),
        );

        Self {
            phase: GamePhase::Menu,
            physics,
            scene,
            input: InputState::new(config.key_bindings()),
            controller,
            rig,
            camera,
            camera_pose,
            proximity,
            quest: QuestStateMachine::new(),
            conversation,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Leave the start screen
    pub fn start(&mut self) {
        if self.phase == GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Playing;
        self.physics.sync_query_pipeline();
        log::info!("Game started");
    }

    /// Full reset back to the start screen
    pub fn exit_to_menu(&mut self) {
        if let Some(effect) = self.quest.apply(QuestInput::ExitToMenu) {
            self.apply_effect(effect);
        }
        self.proximity.reset();
        self.input.reset();
        if let Err(e) = self.scene.respawn_avatar(&mut self.physics) {
            log::warn!("Avatar respawn failed: {}", e);
        }
        self.controller.reset(self.scene.spawn());
        self.camera = RigCamera::default();
        self.camera_pose = self.rig.update(&mut self.camera, self.controller.state());
        self.phase = GamePhase::Menu;
        log::info!("Returned to menu");
    }

    /// Feed a raw keyboard event
    pub fn handle_key(&mut self, code: &str, state: ButtonState) {
        self.input.handle_key(code, state);
    }

    /// Feed a pointer delta to the look control. Ignored while the dialogue
    /// owns input focus.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if self.phase == GamePhase::Playing && !self.quest.flags().dialogue_open {
            self.camera.rotate(dx, dy);
        }
    }

    /// Advance the game by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        if self.phase != GamePhase::Playing {
            return report;
        }

        self.physics.step(dt);

        // One-shots are spent even while gated
        let snapshot = self.input.take_snapshot();
        let snapshot = if self.quest.flags().dialogue_open {
            InputSnapshot::idle()
        } else {
            snapshot
        };

        let camera_forward = self.camera.forward();
        {
            let mut avatar = self.scene.avatar(&mut self.physics);
            let handle = avatar.as_mut().map(|a| a as &mut dyn PhysicsHandle);
            if let Some(out) = self.controller.tick(handle, &snapshot, camera_forward) {
                report.controller = out.events;
            }
        }

        report.proximity = self.proximity.update(self.controller.state().position, dt);
        for event in &report.proximity {
            if let Some(input) = self.quest_input_for(event) {
                if let Some(effect) = self.quest.apply(input) {
                    report.quest.push(effect);
                }
            }
        }
        if snapshot.pressed(Action::Interact) {
            if let Some(effect) = self.quest.apply(QuestInput::InteractPressed) {
                report.quest.push(effect);
            }
        }
        for effect in &report.quest {
            self.apply_effect(*effect);
        }

        self.quest.tick(dt);

        self.camera_pose = self.rig.update(&mut self.camera, self.controller.state());

        report
    }

    /// Send a chat line to the NPC. Only accepted while the dialogue is open.
    pub fn send_chat(&self, text: &str) -> Option<JoinHandle<()>> {
        if !self.quest.flags().dialogue_open {
            log::debug!("Chat ignored: dialogue is closed");
            return None;
        }
        self.conversation.send_message(text)
    }

    /// Close the dialogue window
    pub fn close_dialogue(&mut self) -> Option<QuestEffect> {
        let effect = self.quest.apply(QuestInput::CloseDialogue);
        if let Some(effect) = effect {
            self.apply_effect(effect);
        }
        effect
    }

    /// Move the avatar, e.g. for a debug warp
    pub fn place_avatar(&mut self, position: Vec3) {
        if let Err(e) = self.scene.place_avatar(&mut self.physics, position) {
            log::warn!("Avatar placement failed: {}", e);
        }
    }

    pub fn avatar(&self) -> &AvatarState {
        self.controller.state()
    }

    pub fn camera_pose(&self) -> &CameraPose {
        &self.camera_pose
    }

    pub fn camera(&self) -> &RigCamera {
        &self.camera
    }

    pub fn quest(&self) -> &QuestStateMachine {
        &self.quest
    }

    pub fn proximity(&self) -> &ProximityTracker {
        &self.proximity
    }

    pub fn conversation(&self) -> &ConversationSession {
        &self.conversation
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Snapshot for the presentation layer
    pub fn hud(&self) -> HudState {
        HudState {
            phase: self.phase,
            avatar: *self.controller.state(),
            camera: self.camera_pose,
            quest: *self.quest.flags(),
            notification: self.quest.notification().cloned(),
            prompt: self.quest.interaction_prompt(),
            messages: self.conversation.visible_messages(),
            status: self.conversation.status(),
            is_loading: self.conversation.is_loading(),
        }
    }

    fn quest_input_for(&self, event: &ProximityEvent) -> Option<QuestInput> {
        let role = self.scene.role_of(&event.poi)?;
        Some(match (role, event.kind) {
            (PoiRole::Npc, ProximityEventKind::Enter) => QuestInput::NearNpcEnter,
            (PoiRole::Npc, ProximityEventKind::Exit) => QuestInput::NearNpcExit,
            (PoiRole::Item, ProximityEventKind::Enter) => QuestInput::NearItemEnter,
            (PoiRole::Item, ProximityEventKind::Exit) => QuestInput::NearItemExit,
        })
    }

    fn apply_effect(&mut self, effect: QuestEffect) {
        match effect {
            QuestEffect::DialogueOpened => log::info!("Dialogue opened"),
            QuestEffect::DialogueClosed => log::info!("Dialogue closed"),
            QuestEffect::ItemCollected => log::info!("Item collected"),
            QuestEffect::Reset => self.conversation.reset(),
        }
    }
}
