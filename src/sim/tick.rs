//! Per-frame simulation step
//!
//! Advances the session exactly once per call, in a fixed stage order:
//! player, enemy spawn, enemies, player bullets, power-ups, particles,
//! level progression.

use glam::Vec2;
use rand::Rng;

use super::geom::clamp_inside;
use super::spawner;
use super::state::{Bullet, BulletOwner, GameEvent, GamePhase, GameState, PowerUpKind};
use super::timers::DeferredEffect;
use crate::consts::*;

/// Control state sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    pub boost: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
}

/// Advance the game state by one frame of `elapsed_ms` wall time
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.0} ms", state.time_ms);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let elapsed_ms = sanitize_elapsed(elapsed_ms, state.tuning.max_frame_ms);
    state.time_ms += elapsed_ms as f64;
    let factor = state.tuning.delta_factor(elapsed_ms);

    run_due_timers(state);

    update_player(state, input, factor);

    let interval = state.enemy_spawn_interval_ms as f64;
    let now = state.time_ms;
    if state
        .last_enemy_spawn_ms
        .is_none_or(|last| now - last > interval)
    {
        spawner::spawn_enemy(state);
        state.last_enemy_spawn_ms = Some(now);
    }

    update_enemies(state, factor);
    // Pools freeze the moment the player dies
    if state.is_game_over() {
        return;
    }

    update_player_bullets(state, factor);
    update_power_ups(state);
    update_particles(state, factor);

    if state.enemies_defeated >= state.enemies_to_next_level {
        level_up(state);
    }
}

/// Negative or NaN frames count as zero; long stalls are clamped
fn sanitize_elapsed(elapsed_ms: f32, max_frame_ms: f32) -> f32 {
    if elapsed_ms.is_nan() || elapsed_ms <= 0.0 {
        return 0.0;
    }
    if elapsed_ms > max_frame_ms {
        log::warn!("Frame took {:.1} ms, clamping to {:.1} ms", elapsed_ms, max_frame_ms);
        return max_frame_ms;
    }
    elapsed_ms
}

fn run_due_timers(state: &mut GameState) {
    for effect in state.timers.take_due(state.time_ms) {
        match effect {
            DeferredEffect::RestoreFireRate { amount_ms } => {
                state.player.fire_rate_ms += amount_ms;
                log::debug!("Weapon boost expired, fire rate {} ms", state.player.fire_rate_ms);
            }
        }
    }
}

/// Movement, tilt, firing, shield regen, boundary clamp and exhaust
pub(crate) fn update_player(state: &mut GameState, input: &TickInput, factor: f32) {
    let tilt = state.tuning.turn_tilt;
    let decay = state.tuning.rotation_decay;
    let bounds = state.bounds();
    let player = &mut state.player;

    player.boosting = input.boost;
    let speed = if player.boosting {
        player.boost_speed
    } else {
        player.speed
    } * factor;

    // Axes are independent: diagonals move faster
    if input.move_up {
        player.pos.y -= speed;
    }
    if input.move_down {
        player.pos.y += speed;
    }
    if input.move_left {
        player.pos.x -= speed;
        player.rotation = -tilt;
    }
    if input.move_right {
        player.pos.x += speed;
        player.rotation = tilt;
    }
    if !input.move_left && !input.move_right {
        player.rotation *= decay;
    }

    if player.shield < player.max_shield {
        player.shield = (player.shield + player.shield_recharge_rate * factor).min(player.max_shield);
    }

    player.pos = clamp_inside(player.pos, player.size, bounds);

    if input.fire && state.player.can_fire(state.time_ms) {
        shoot(state);
    }

    // Exhaust spawns at the clamped tail position
    if input.move_up {
        spawner::create_thrust_particle(state);
    }
    state.player.thrust_particles.retain_mut(|p| p.update(factor));
}

fn shoot(state: &mut GameState) {
    let scale = state.tuning.scale;
    let bullet = Bullet {
        pos: state.player.nose(),
        size: Vec2::new(state.tuning.bullet_width, state.tuning.bullet_height) * scale,
        vel: Vec2::new(0.0, -state.tuning.player_bullet_speed * scale),
        damage: state.tuning.player_bullet_damage,
        owner: BulletOwner::Player,
    };
    state.player.bullets.push(bullet);
    state.player.last_shot_ms = Some(state.time_ms);
    state.events.push(GameEvent::ShotFired);
}

/// Seek, fire, advance enemy bullets, resolve hits on the player, cull
pub(crate) fn update_enemies(state: &mut GameState, factor: f32) {
    let now = state.time_ms;
    let scale = state.tuning.scale;
    let engage = state.tuning.engage_distance * scale;
    let bullet_size = Vec2::new(state.tuning.bullet_width, state.tuning.bullet_height) * scale;
    let bullet_speed = state.tuning.enemy_bullet_speed * scale;
    let bounds = state.bounds();
    let margin = state.tuning.cull_margin * scale;
    let player_pos = state.player.pos;
    let player_rect = state.player.rect();

    // Hits on the player, applied after the pass in pool order
    let mut hits: Vec<(Vec2, f32)> = Vec::new();

    for enemy in &mut state.enemies {
        let to_player = player_pos - enemy.pos;
        let dist = to_player.length();
        if dist > engage {
            enemy.pos += to_player / dist * enemy.speed * factor;
        }

        if enemy.can_fire(now) {
            enemy.bullets.push(Bullet {
                pos: Vec2::new(enemy.pos.x, enemy.pos.y + enemy.size.y / 2.0),
                size: bullet_size,
                vel: Vec2::new(0.0, bullet_speed),
                damage: enemy.bullet_damage,
                owner: BulletOwner::Enemy(enemy.id),
            });
            enemy.last_shot_ms = Some(now);
        }

        enemy.bullets.retain_mut(|bullet| {
            bullet.advance(factor);
            if bullet.rect().overlaps(&player_rect) {
                hits.push((bullet.pos, bullet.damage));
                return false;
            }
            bullet.pos.y <= bounds.y
        });
    }

    state.enemies.retain(|e| {
        e.pos.x >= -margin
            && e.pos.x <= bounds.x + margin
            && e.pos.y >= -margin
            && e.pos.y <= bounds.y + margin
    });

    for (pos, damage) in hits {
        spawner::create_explosion(state, pos, 10, COLOR_ENEMY_BULLET_HIT);
        damage_player(state, damage);
        if state.is_game_over() {
            break;
        }
    }
}

/// Shield-first damage, hit sparks, and the game-over transition
pub fn damage_player(state: &mut GameState, amount: f32) {
    if state.is_game_over() {
        return;
    }
    let outcome = state.player.take_damage(amount);
    state.events.push(GameEvent::PlayerHit { damage: amount });
    let pos = state.player.pos;
    spawner::create_particles(state, pos, 10, COLOR_DAMAGE);
    log::debug!(
        "Player hit for {} (shield {}, hull {})",
        amount,
        outcome.absorbed_by_shield,
        outcome.health_lost
    );

    if state.player.is_dead() {
        spawner::create_explosion(state, pos, 40, COLOR_PLAYER);
        state.phase = GamePhase::GameOver;
        state.timers.cancel_all();
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over: score {}, level {}", state.score, state.level);
    }
}

/// Advance player bullets and resolve them against enemies.
///
/// A bullet damages at most one enemy: the first live enemy in pool
/// (insertion) order whose rectangle overlaps it.
pub(crate) fn update_player_bullets(state: &mut GameState, factor: f32) {
    let enemies = &mut state.enemies;
    let mut killed: Vec<usize> = Vec::new();

    state.player.bullets.retain_mut(|bullet| {
        bullet.advance(factor);
        let rect = bullet.rect();
        let target = enemies
            .iter_mut()
            .enumerate()
            .find(|(_, e)| !e.is_dead() && e.rect().overlaps(&rect));
        if let Some((index, enemy)) = target {
            enemy.health -= bullet.damage;
            if enemy.is_dead() {
                killed.push(index);
            }
            return false;
        }
        bullet.pos.y >= 0.0
    });

    if killed.is_empty() {
        return;
    }

    let mut destroyed = Vec::with_capacity(killed.len());
    for &index in &killed {
        let enemy = &state.enemies[index];
        destroyed.push((enemy.pos, enemy.value, enemy.explosion_size, enemy.kind.color()));
    }
    state.enemies.retain(|e| !e.is_dead());

    for (pos, value, explosion_size, color) in destroyed {
        state.score += value;
        state.enemies_defeated += 1;
        spawner::create_explosion(state, pos, explosion_size, color);
        spawner::roll_power_up_drop(state, pos);
    }
}

/// Expire stale power-ups, then collect any overlapping the player
pub(crate) fn update_power_ups(state: &mut GameState) {
    let now = state.time_ms;
    let player_rect = state.player.rect();
    let mut collected = Vec::new();

    state.power_ups.retain(|p| {
        if p.is_expired(now) {
            return false;
        }
        if p.rect().overlaps(&player_rect) {
            collected.push((p.kind, p.pos));
            return false;
        }
        true
    });

    for (kind, pos) in collected {
        apply_power_up(state, kind);
        state.events.push(GameEvent::PowerUpCollected { kind });
        spawner::create_particles(state, pos, 15, kind.color());
    }
}

/// Apply a collected power-up's effect.
///
/// Weapon pickups stack: each takes up to the configured bonus off the fire
/// interval (never below the minimum) and schedules a reversion of exactly
/// the amount it took, so overlapping pickups always return to the baseline.
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Health => state.player.heal(state.tuning.health_restore),
        PowerUpKind::Shield => state.player.restore_shield(state.tuning.shield_restore),
        PowerUpKind::Weapon => {
            let current = state.player.fire_rate_ms;
            let boosted = (current - state.tuning.weapon_fire_rate_bonus_ms)
                .max(state.tuning.min_fire_rate_ms)
                .min(current);
            let taken = current - boosted;
            state.player.fire_rate_ms = boosted;
            if taken > 0.0 {
                state.timers.schedule(
                    state.time_ms,
                    state.tuning.weapon_duration_ms,
                    DeferredEffect::RestoreFireRate { amount_ms: taken },
                );
            }
        }
    }
    log::debug!("Collected {:?} power-up", kind);
}

/// Cosmetic pools: explosion particles and the starfield
pub(crate) fn update_particles(state: &mut GameState, factor: f32) {
    state.particles.retain_mut(|p| p.update(factor));

    let bounds = state.bounds();
    for star in &mut state.stars {
        star.pos.y += star.speed * 0.1 * factor;
        if star.pos.y > bounds.y {
            star.pos.y = 0.0;
            star.pos.x = state.rng.random::<f32>() * bounds.x;
        }
    }
}

/// Raise difficulty and reward the player
pub fn level_up(state: &mut GameState) {
    state.level += 1;
    state.enemies_defeated = 0;
    state.enemies_to_next_level = state.tuning.kill_threshold(state.level);
    state.enemy_spawn_interval_ms = (state.enemy_spawn_interval_ms
        - state.tuning.spawn_interval_step_ms)
        .max(state.tuning.min_spawn_interval_ms);

    let player = &mut state.player;
    player.max_health += state.tuning.level_up_health_bonus;
    player.health = player.max_health;
    player.max_shield += state.tuning.level_up_shield_bonus;
    player.shield = player.max_shield;

    let pos = player.pos;
    spawner::create_particles(state, pos, 30, COLOR_PLAYER);
    state.events.push(GameEvent::LevelUp { level: state.level });
    log::info!(
        "Level {} reached: {} kills to next, spawn every {} ms",
        state.level,
        state.enemies_to_next_level,
        state.enemy_spawn_interval_ms
    );
}
