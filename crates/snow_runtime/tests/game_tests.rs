//! Game tick integration tests against a real physics world

use std::sync::Arc;

use approx::assert_relative_eq;
use glam::Vec3;
use snow_controller::{Camera, ControllerEvent, ViewMode};
use snow_dialogue::{OfflineService, SessionStatus};
use snow_input::ButtonState;
use snow_quest::QuestEffect;
use snow_runtime::{Game, GameConfig, GamePhase};
use snow_triggers::ProximityEventKind;

const DT: f32 = 1.0 / 60.0;

fn game_with(config: &GameConfig) -> Game {
    Game::new(config, Arc::new(OfflineService::new("tests run offline")))
}

/// A started game whose avatar has landed on the ground
fn landed_game() -> Game {
    let mut game = game_with(&GameConfig::default());
    game.start();
    for _ in 0..180 {
        game.tick(DT);
    }
    game
}

fn press(game: &mut Game, code: &str) {
    game.handle_key(code, ButtonState::Pressed);
}

fn release(game: &mut Game, code: &str) {
    game.handle_key(code, ButtonState::Released);
}

/// Press, tick, release, tick. Returns the quest effects of both ticks.
fn tap(game: &mut Game, code: &str) -> Vec<QuestEffect> {
    press(game, code);
    let mut effects = game.tick(DT).quest;
    release(game, code);
    effects.extend(game.tick(DT).quest);
    effects
}

/// Warp next to Santa and let proximity pick it up
fn walk_up_to_santa(game: &mut Game) {
    game.place_avatar(Vec3::new(0.0, -0.75, 1.0));
    game.tick(DT);
    assert!(game.quest().flags().near_npc);
}

// ============================================================================
// Phases
// ============================================================================

#[test]
fn menu_tick_is_a_no_op() {
    let mut game = game_with(&GameConfig::default());
    assert_eq!(game.phase(), GamePhase::Menu);

    press(&mut game, "KeyW");
    for _ in 0..30 {
        assert!(game.tick(DT).is_empty());
    }
    assert_eq!(game.avatar().position, Vec3::new(0.0, 5.0, 10.0));
}

#[test]
fn avatar_lands_on_the_ground() {
    let game = landed_game();
    let avatar = game.avatar();

    assert!(avatar.grounded);
    assert_relative_eq!(avatar.position.y, -0.75, epsilon = 0.1);
    assert_eq!(game.camera_pose().mode, ViewMode::FirstPerson);
    assert_relative_eq!(game.camera_pose().position.y, avatar.position.y + 1.6, epsilon = 0.01);
}

// ============================================================================
// Locomotion
// ============================================================================

#[test]
fn run_forward_follows_the_camera() {
    let mut game = landed_game();

    press(&mut game, "KeyW");
    press(&mut game, "ShiftLeft");
    game.tick(DT);

    // Default look direction is -Z
    let velocity = game.avatar().velocity;
    assert_relative_eq!(velocity.z, -6.0, epsilon = 1e-4);
    assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-4);

    release(&mut game, "ShiftLeft");
    game.tick(DT);
    assert_relative_eq!(game.avatar().velocity.z, -3.0, epsilon = 1e-4);
}

#[test]
fn jump_and_toggle_view() {
    let mut game = landed_game();

    press(&mut game, "Space");
    let report = game.tick(DT);
    assert!(report.controller.contains(&ControllerEvent::Jumped));
    assert_relative_eq!(game.avatar().velocity.y, 8.0);

    press(&mut game, "KeyV");
    let report = game.tick(DT);
    assert!(report
        .controller
        .contains(&ControllerEvent::ViewModeChanged(ViewMode::ThirdPerson)));
    assert_eq!(game.camera_pose().mode, ViewMode::ThirdPerson);
}

#[test]
fn look_turns_the_walk_direction() {
    let mut game = landed_game();

    // Quarter turn to the right: forward becomes +X
    let quarter = std::f32::consts::FRAC_PI_2 / game.camera().look_control().sensitivity;
    game.look(quarter, 0.0);
    press(&mut game, "KeyW");
    game.tick(DT);

    let velocity = game.avatar().velocity;
    assert_relative_eq!(velocity.x, 3.0, epsilon = 1e-3);
    assert_relative_eq!(velocity.z, 0.0, epsilon = 1e-3);
}

// ============================================================================
// Proximity and quest
// ============================================================================

#[test]
fn approaching_santa_offers_a_chat() {
    let mut game = landed_game();
    assert_eq!(game.hud().prompt, None);

    game.place_avatar(Vec3::new(0.0, -0.75, 1.0));
    let report = game.tick(DT);

    assert_eq!(report.proximity.len(), 1);
    assert_eq!(report.proximity[0].kind, ProximityEventKind::Enter);
    assert_eq!(report.proximity[0].poi, "santa");
    assert_eq!(game.hud().prompt, Some("Talk to Santa"));

    let effects = tap(&mut game, "KeyE");
    assert_eq!(effects, vec![QuestEffect::DialogueOpened]);
    assert!(game.quest().flags().dialogue_open);
    assert_eq!(game.hud().prompt, None);
}

#[test]
fn leaving_santa_clears_the_prompt() {
    let mut game = landed_game();
    walk_up_to_santa(&mut game);

    game.place_avatar(Vec3::new(0.0, -0.75, 10.0));
    let report = game.tick(DT);

    assert_eq!(report.proximity[0].kind, ProximityEventKind::Exit);
    assert!(!game.quest().flags().near_npc);
    assert_eq!(game.hud().prompt, None);
}

#[test]
fn open_dialogue_gates_movement_and_one_shots() {
    let mut game = landed_game();
    walk_up_to_santa(&mut game);
    tap(&mut game, "KeyE");
    assert!(game.quest().flags().dialogue_open);

    let yaw = game.camera().look_control().yaw;
    game.look(500.0, 0.0);
    assert_eq!(game.camera().look_control().yaw, yaw);

    press(&mut game, "KeyW");
    press(&mut game, "Space");
    press(&mut game, "KeyV");
    let report = game.tick(DT);

    assert!(report.controller.iter().all(|e| matches!(e, ControllerEvent::GroundedChanged(_))));
    assert_eq!(game.avatar().planar_speed(), 0.0);
    assert_eq!(game.avatar().view_mode, ViewMode::FirstPerson);

    // The jump and toggle edges were spent while gated
    assert_eq!(game.close_dialogue(), Some(QuestEffect::DialogueClosed));
    let report = game.tick(DT);
    assert!(!report.controller.contains(&ControllerEvent::Jumped));
    assert_eq!(game.avatar().view_mode, ViewMode::FirstPerson);

    // Held movement resumes
    assert_relative_eq!(game.avatar().planar_speed(), 3.0, epsilon = 1e-3);
}

#[test]
fn npc_wins_when_both_are_in_reach() {
    let mut config = GameConfig::default();
    config.scene.item.position = [1.0, -1.0, 0.0];
    config.scene.item.radius = 3.0;

    let mut game = game_with(&config);
    game.start();
    for _ in 0..180 {
        game.tick(DT);
    }

    game.place_avatar(Vec3::new(0.5, -0.75, 0.5));
    game.tick(DT);
    let flags = *game.quest().flags();
    assert!(flags.near_npc && flags.near_item);
    assert_eq!(game.hud().prompt, Some("Talk to Santa"));

    let effects = tap(&mut game, "KeyE");
    assert_eq!(effects, vec![QuestEffect::DialogueOpened]);
    assert!(!game.quest().flags().item_collected);
    assert!(game.quest().flags().item_visible);
}

#[test]
fn collecting_the_glasses() {
    let mut game = landed_game();

    game.place_avatar(Vec3::new(8.0, -0.75, -5.0));
    game.tick(DT);
    assert_eq!(game.hud().prompt, Some("Pick up glasses"));

    let effects = tap(&mut game, "KeyE");
    assert_eq!(effects, vec![QuestEffect::ItemCollected]);

    let hud = game.hud();
    assert!(hud.quest.item_collected);
    assert!(!hud.quest.item_visible);
    assert!(!hud.quest.near_item);
    assert_eq!(hud.prompt, None);
    assert_eq!(
        hud.notification.map(|n| n.message),
        Some("You found Santa's glasses!".to_string())
    );

    // A second press does nothing
    assert!(tap(&mut game, "KeyE").is_empty());

    for _ in 0..180 {
        game.tick(DT);
    }
    assert!(game.hud().notification.is_none());
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test(start_paused = true)]
async fn chat_needs_an_open_dialogue() {
    let mut game = landed_game();
    assert!(game.send_chat("Hello Santa").is_none());

    walk_up_to_santa(&mut game);
    tap(&mut game, "KeyE");

    game.send_chat("What is 17 divided by 5?").unwrap().await.unwrap();

    let hud = game.hud();
    assert_eq!(hud.messages.len(), 2);
    assert!(hud.messages[1].content.contains("17 ÷ 5 = 3 with remainder 2"));
    assert_eq!(hud.status, SessionStatus::Speaking);
    assert!(!hud.is_loading);
}

#[tokio::test(start_paused = true)]
async fn offline_service_answers_in_character() {
    let mut game = landed_game();
    walk_up_to_santa(&mut game);
    tap(&mut game, "KeyE");

    game.send_chat("Where do reindeer sleep?").unwrap().await.unwrap();
    assert_eq!(game.hud().status, SessionStatus::Errored);
    assert_eq!(game.hud().messages.len(), 2);
}

// ============================================================================
// Reset
// ============================================================================

#[tokio::test(start_paused = true)]
async fn exit_to_menu_resets_everything() {
    let mut game = landed_game();

    game.place_avatar(Vec3::new(8.0, -0.75, -5.0));
    game.tick(DT);
    tap(&mut game, "KeyE");
    walk_up_to_santa(&mut game);
    tap(&mut game, "KeyE");
    game.send_chat("Have you seen my glasses?").unwrap().await.unwrap();
    press(&mut game, "KeyV");

    game.exit_to_menu();

    let hud = game.hud();
    assert_eq!(hud.phase, GamePhase::Menu);
    assert_eq!(hud.quest, Default::default());
    assert!(hud.notification.is_none());
    assert!(hud.messages.is_empty());
    assert_eq!(hud.status, SessionStatus::Idle);
    assert_eq!(hud.avatar.position, Vec3::new(0.0, 5.0, 10.0));
    assert_eq!(hud.avatar.view_mode, ViewMode::FirstPerson);
    assert!(!game.proximity().is_near("santa"));
    assert_eq!(game.camera().look_control().yaw, 0.0);

    // Held keys were dropped, so the new round starts still
    game.start();
    let report = game.tick(DT);
    assert!(report.controller.iter().all(|e| !matches!(e, ControllerEvent::ViewModeChanged(_))));
    assert_eq!(game.avatar().planar_speed(), 0.0);
    assert_eq!(game.camera().position().y, game.avatar().position.y + 1.6);
}
