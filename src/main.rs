//! Star Skirmish headless driver
//!
//! Stands in for a renderer: feeds fixed 60 Hz frames and a simple autopilot
//! into the simulation, and logs the events audio/UI would react to.
//!
//! Usage: `star-skirmish [seed] [tuning.json]`

use std::process::ExitCode;

use star_skirmish::consts::REFERENCE_FRAME_MS;
use star_skirmish::sim::{GameEvent, GameState, TickInput, tick};
use star_skirmish::Tuning;

/// Five minutes of play at 60 fps
const MAX_FRAMES: u32 = 60 * 60 * 5;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Invalid tuning {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut state = match GameState::new(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start session: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Star Skirmish (headless) starting...");

    let mut frame = 0;
    while frame < MAX_FRAMES && !state.is_game_over() {
        let input = autopilot(&state, frame);
        tick(&mut state, &input, REFERENCE_FRAME_MS);
        report_events(&state, frame);
        frame += 1;
    }

    let hud = state.hud();
    match serde_json::to_string(&hud) {
        Ok(json) => println!("{}", json),
        Err(e) => log::warn!("Could not serialize HUD: {}", e),
    }
    log::info!("Finished after {} frames", frame);
    ExitCode::SUCCESS
}

/// Chase the lowest enemy horizontally while firing; weave vertically
fn autopilot(state: &GameState, frame: u32) -> TickInput {
    let player = &state.player;
    let target = state
        .enemies
        .iter()
        .filter(|e| e.pos.y < player.pos.y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };
    if let Some(enemy) = target {
        let dx = enemy.pos.x - player.pos.x;
        input.move_left = dx < -4.0;
        input.move_right = dx > 4.0;
        input.boost = dx.abs() > 150.0;
    }
    // Slow vertical weave, one second each way
    if (frame / 60) % 2 == 0 {
        input.move_up = true;
    } else {
        input.move_down = true;
    }
    input
}

fn report_events(state: &GameState, frame: u32) {
    for event in state.events() {
        match event {
            GameEvent::ShotFired => log::trace!("[{}] pew", frame),
            GameEvent::Explosion { pos, size } => {
                log::debug!("[{}] explosion at ({:.0}, {:.0}) size {}", frame, pos.x, pos.y, size)
            }
            GameEvent::PowerUpCollected { kind } => {
                log::info!("[{}] picked up {:?} ({})", frame, kind, kind.icon())
            }
            GameEvent::PlayerHit { damage } => {
                let hud = state.hud();
                log::debug!(
                    "[{}] hit for {} -> health {} shield {}",
                    frame,
                    damage,
                    hud.health,
                    hud.shield
                )
            }
            GameEvent::LevelUp { level } => log::info!("[{}] level {}", frame, level),
            GameEvent::GameOver { score } => log::info!("[{}] game over, score {}", frame, score),
        }
    }
}
