//! End-to-end gameplay scenarios against the public API

use glam::Vec2;

use star_skirmish::consts::REFERENCE_FRAME_MS;
use star_skirmish::sim::spawner;
use star_skirmish::sim::{
    Bullet, BulletOwner, EnemyKind, GameEvent, GamePhase, GameState, PowerUpKind, TickInput,
    apply_power_up, damage_player, tick,
};
use star_skirmish::Tuning;

fn idle() -> TickInput {
    TickInput::default()
}

/// Session without random enemy spawns or drops
fn quiet_session() -> GameState {
    let tuning = Tuning {
        spawn_interval_ms: 1e9,
        min_spawn_interval_ms: 1e9,
        powerup_drop_chance: 0.0,
        ..Default::default()
    };
    let mut state = GameState::new(2024, tuning).unwrap();
    // Skip the opening spawn
    state.last_enemy_spawn_ms = Some(0.0);
    state
}

#[test]
fn normal_enemy_dies_to_third_bullet() {
    let mut state = quiet_session();
    let pos = Vec2::new(150.0, 80.0);
    let id = spawner::spawn_enemy_at(&mut state, EnemyKind::Normal, pos);
    assert_eq!(state.enemies[0].health, 30.0);

    let mut explosions = 0;
    for hit in 1..=3 {
        state.player.bullets.push(Bullet {
            pos: state.enemies[0].pos,
            size: Vec2::new(4.0, 10.0),
            vel: Vec2::ZERO,
            damage: 10.0,
            owner: BulletOwner::Player,
        });
        tick(&mut state, &idle(), 0.0);
        explosions += state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Explosion { .. }))
            .count();

        if hit < 3 {
            let enemy = state.enemies.iter().find(|e| e.id == id).unwrap();
            assert_eq!(enemy.health, 30.0 - 10.0 * hit as f32);
            assert_eq!(state.score, 0);
        }
    }

    assert!(state.enemies.is_empty());
    assert_eq!(state.score, 20);
    assert_eq!(explosions, 1);
}

#[test]
fn shield_soaks_then_health() {
    let mut state = quiet_session();
    state.player.shield = 15.0;
    state.player.health = 100.0;

    damage_player(&mut state, 40.0);

    assert_eq!(state.player.shield, 0.0);
    assert_eq!(state.player.health, 75.0);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn reaching_threshold_levels_up() {
    let mut state = quiet_session();
    // Default spawn tuning for the interval arithmetic
    state.enemy_spawn_interval_ms = 2000.0;
    assert_eq!(state.level, 1);
    assert_eq!(state.enemies_to_next_level, 5);

    for _ in 0..5 {
        let pos = state.player.pos - Vec2::new(200.0, 150.0);
        spawner::spawn_enemy_at(&mut state, EnemyKind::Normal, pos);
        state.enemies.last_mut().unwrap().health = 10.0;
        state.player.bullets.push(Bullet {
            pos,
            size: Vec2::new(4.0, 10.0),
            vel: Vec2::ZERO,
            damage: 10.0,
            owner: BulletOwner::Player,
        });
        tick(&mut state, &idle(), 0.0);
    }

    assert_eq!(state.level, 2);
    assert_eq!(state.enemies_defeated, 0);
    assert_eq!(state.enemies_to_next_level, 8);
    assert_eq!(state.enemy_spawn_interval_ms, 1900.0);
    assert_eq!(state.player.max_health, 210.0);
    assert_eq!(state.player.health, 210.0);
    assert_eq!(state.player.max_shield, 110.0);
    assert_eq!(state.player.shield, 110.0);
}

#[test]
fn health_pickup_is_capped() {
    let mut state = quiet_session();
    state.player.health = 180.0;
    let pos = state.player.pos;
    spawner::spawn_power_up(&mut state, PowerUpKind::Health, pos);

    tick(&mut state, &idle(), 0.0);

    assert_eq!(state.player.max_health, 200.0);
    assert_eq!(state.player.health, 200.0);
}

#[test]
fn reset_cancels_pending_weapon_reversion() {
    let mut state = quiet_session();
    apply_power_up(&mut state, PowerUpKind::Weapon);
    assert_eq!(state.player.fire_rate_ms, 250.0);

    state.reset();
    assert!(state.timers.is_empty());
    assert_eq!(state.player.fire_rate_ms, 300.0);

    // A stale reversion must not push the rate past baseline later
    for _ in 0..60 {
        tick(&mut state, &idle(), 250.0);
    }
    assert_eq!(state.player.fire_rate_ms, 300.0);
}

#[test]
fn game_over_is_terminal_until_reset() {
    let mut state = quiet_session();
    state.player.shield = 0.0;
    state.player.health = 10.0;
    damage_player(&mut state, 10.0);

    assert!(state.is_game_over());
    assert!(state.events().contains(&GameEvent::GameOver { score: 0 }));

    // Further damage and ticks are ignored
    damage_player(&mut state, 10.0);
    tick(&mut state, &TickInput { fire: true, ..idle() }, REFERENCE_FRAME_MS);
    assert!(state.player.bullets.is_empty());
    assert!(state.events().is_empty());

    state.reset();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.player.health, 200.0);
}

#[test]
fn first_enemy_arrives_on_first_frame() {
    let mut state = GameState::with_seed(1);
    assert!(state.enemies.is_empty());
    tick(&mut state, &idle(), REFERENCE_FRAME_MS);
    assert_eq!(state.enemies.len(), 1);

    // Only one per interval after that
    for _ in 0..60 {
        tick(&mut state, &idle(), REFERENCE_FRAME_MS);
    }
    assert_eq!(state.enemies.len(), 1);
}

#[test]
fn reset_empties_every_pool() {
    let mut state = GameState::with_seed(5);
    let input = TickInput {
        fire: true,
        move_up: true,
        ..idle()
    };
    tick(&mut state, &input, REFERENCE_FRAME_MS);

    let pos = Vec2::new(200.0, 200.0);
    spawner::spawn_enemy_at(&mut state, EnemyKind::Elite, pos);
    let shooter = state.enemies.last_mut().unwrap();
    shooter.bullets.push(Bullet {
        pos,
        size: Vec2::new(4.0, 10.0),
        vel: Vec2::new(0.0, 5.0),
        damage: 15.0,
        owner: BulletOwner::Enemy(shooter.id),
    });
    spawner::spawn_power_up(&mut state, PowerUpKind::Shield, pos);
    spawner::create_explosion(&mut state, pos, 20, 0);
    assert_eq!(state.enemies.len(), 2);
    assert!(!state.player.bullets.is_empty());
    assert!(!state.player.thrust_particles.is_empty());
    assert!(!state.power_ups.is_empty());
    assert!(!state.particles.is_empty());

    state.reset();

    assert!(state.enemies.is_empty());
    assert!(state.power_ups.is_empty());
    assert!(state.particles.is_empty());
    assert!(state.player.bullets.is_empty());
    assert!(state.player.thrust_particles.is_empty());
    assert!(state.events().is_empty());
    assert_eq!(state.time_ms, 0.0);
}

#[test]
fn hud_reflects_session() {
    let mut state = quiet_session();
    state.player.health = 123.7;
    state.score = 70;
    let hud = state.hud();
    assert_eq!(hud.health, 123);
    assert_eq!(hud.score, 70);
    assert_eq!(hud.level, 1);

    let json = serde_json::to_string(&hud).unwrap();
    assert!(json.contains("\"score\":70"));
}

#[test]
fn long_run_stays_consistent() {
    let mut state = GameState::with_seed(77);
    let input = TickInput {
        fire: true,
        move_left: true,
        ..idle()
    };
    for _ in 0..3600 {
        tick(&mut state, &input, REFERENCE_FRAME_MS);
        if state.is_game_over() {
            break;
        }
        assert!(state.enemies_defeated < state.enemies_to_next_level);
        assert!(state.particles.len() <= state.tuning.max_particles);
    }
    assert!(state.time_ms > 0.0);
}
