//! SnowQuest headless runner
//!
//! Plays a scripted session without a renderer: walk to Santa, ask him a
//! question, close the dialogue, find the glasses, then exit to the menu.
//! Every step goes through the same input and tick path a windowed
//! frontend would drive.
//!
//! Run with: cargo run -p snow_runtime
//!       or: GEMINI_API_KEY=... cargo run --bin snowquest

use std::sync::Arc;

use glam::Vec3;
use snow_dialogue::{GeminiClient, OfflineService, TextService};
use snow_input::ButtonState;
use snow_runtime::{Game, GameConfig};

const DT: f32 = 1.0 / 60.0;

/// Give up walking toward a target after this many ticks
const MAX_WALK_TICKS: usize = 60 * 30;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Config rejected ({}), using defaults", e);
            GameConfig::default()
        }
    };
    config.print_summary();

    let service = text_service(&config);
    let mut game = Game::new(&config, service);
    game.start();

    // Let the avatar drop onto the ground
    for _ in 0..120 {
        game.tick(DT);
    }
    log::info!("Landed at {:?} (grounded: {})", game.avatar().position, game.avatar().grounded);

    let santa = Vec3::from_array(config.scene.npc.position);
    if walk_until(&mut game, santa, |g| g.quest().flags().near_npc) {
        log::info!("Prompt: {:?}", game.hud().prompt);
        tap(&mut game, "KeyE");
    }

    if game.quest().flags().dialogue_open {
        for line in ["What is 17 divided by 5?", "Ho ho ho, Merry Christmas Santa!"] {
            log::info!("Player: {}", line);
            if let Some(exchange) = game.send_chat(line) {
                if let Err(e) = exchange.await {
                    log::error!("Exchange task failed: {}", e);
                }
            }
            if let Some(reply) = game.hud().messages.last() {
                log::info!("Santa: {}", reply.content);
            }
        }
        game.close_dialogue();
    }

    let glasses = Vec3::from_array(config.scene.item.position);
    if walk_until(&mut game, glasses, |g| g.quest().flags().near_item) {
        tap(&mut game, "KeyE");
    }
    if let Some(notification) = game.hud().notification {
        log::info!("HUD: {}", notification.message);
    }

    let hud = game.hud();
    log::info!("Final flags: {:?}", hud.quest);

    game.exit_to_menu();
    log::info!("Phase after exit: {:?}", game.phase());
}

fn text_service(config: &GameConfig) -> Arc<dyn TextService> {
    match &config.dialogue.api_key {
        Some(key) => Arc::new(
            GeminiClient::with_timeout(key, &config.dialogue.model, config.dialogue.timeout_secs)
                .with_base_url(&config.dialogue.base_url)
                .with_system_instruction(config.dialogue.system_instruction.clone())
                .with_streaming(config.dialogue.session.streaming),
        ),
        None => {
            log::warn!("GEMINI_API_KEY not set, Santa will answer offline");
            Arc::new(OfflineService::new("no API key configured"))
        }
    }
}

/// Press and release a key across two ticks
fn tap(game: &mut Game, code: &str) {
    game.handle_key(code, ButtonState::Pressed);
    game.tick(DT);
    game.handle_key(code, ButtonState::Released);
    game.tick(DT);
}

/// Turn toward `target` and hold forward until `arrived` holds
fn walk_until(game: &mut Game, target: Vec3, arrived: impl Fn(&Game) -> bool) -> bool {
    game.handle_key("KeyW", ButtonState::Pressed);
    let mut reached = false;
    for _ in 0..MAX_WALK_TICKS {
        face(game, target);
        game.tick(DT);
        if arrived(game) {
            reached = true;
            break;
        }
    }
    game.handle_key("KeyW", ButtonState::Released);
    game.tick(DT);

    if reached {
        log::info!("Reached {:?}", target);
    } else {
        log::warn!("Could not reach {:?}", target);
    }
    reached
}

/// Rotate the look control so the camera faces `target` horizontally
fn face(game: &mut Game, target: Vec3) {
    let to_target = target - game.avatar().position;
    if to_target.x == 0.0 && to_target.z == 0.0 {
        return;
    }
    // Yaw 0 looks down -Z
    let wanted = (-to_target.x).atan2(-to_target.z);
    let look = game.camera().look_control();
    let delta = (look.yaw - wanted + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU)
        - std::f32::consts::PI;
    game.look(delta / look.sensitivity, 0.0);
}
