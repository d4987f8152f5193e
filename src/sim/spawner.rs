//! Entity generation: enemies, power-up drops, particles and stars
//!
//! All randomness comes from the session RNG so runs are reproducible.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Enemy, EnemyKind, EntityId, GameEvent, GameState, Particle, PowerUp, PowerUpKind, Star,
};
use crate::hue_to_rgb;

/// Playfield edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Spawn one enemy just outside a random edge (time gating is the caller's job)
pub fn spawn_enemy(state: &mut GameState) -> EntityId {
    let edge = Edge::ALL[state.rng.random_range(0..Edge::ALL.len())];
    let pos = edge_spawn_point(state, edge);
    let kind = if state.rng.random::<f32>() < state.tuning.elite_chance {
        EnemyKind::Elite
    } else {
        EnemyKind::Normal
    };
    let id = spawn_enemy_at(state, kind, pos);
    log::debug!("Spawned {:?} enemy {} at {:?} ({:?} edge)", kind, id, pos, edge);
    id
}

/// Place an enemy of the given kind at an exact position
pub fn spawn_enemy_at(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> EntityId {
    let id = state.next_entity_id();
    let enemy = Enemy::new(id, kind, pos, &state.tuning);
    state.enemies.push(enemy);
    id
}

fn edge_spawn_point(state: &mut GameState, edge: Edge) -> Vec2 {
    let bounds = state.bounds();
    let offset = state.tuning.spawn_offset * state.tuning.scale;
    let along_x = state.rng.random::<f32>() * bounds.x;
    let along_y = state.rng.random::<f32>() * bounds.y;
    match edge {
        Edge::Top => Vec2::new(along_x, -offset),
        Edge::Right => Vec2::new(bounds.x + offset, along_y),
        Edge::Bottom => Vec2::new(along_x, bounds.y + offset),
        Edge::Left => Vec2::new(-offset, along_y),
    }
}

/// Roll the drop chance after a kill; spawns a random power-up on success
pub fn roll_power_up_drop(state: &mut GameState, pos: Vec2) -> Option<EntityId> {
    if state.rng.random::<f32>() >= state.tuning.powerup_drop_chance {
        return None;
    }
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    Some(spawn_power_up(state, kind, pos))
}

pub fn spawn_power_up(state: &mut GameState, kind: PowerUpKind, pos: Vec2) -> EntityId {
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos,
        size: Vec2::splat(state.tuning.powerup_size * state.tuning.scale),
        spawn_ms: state.time_ms,
        ttl_ms: state.tuning.powerup_lifetime_ms,
    });
    log::debug!("Dropped {:?} power-up {} at {:?}", kind, id, pos);
    id
}

/// Explosion burst; also raises an explosion event
pub fn create_explosion(state: &mut GameState, pos: Vec2, size: u32, color: u32) {
    let scale = state.tuning.scale;
    for _ in 0..size {
        let vel = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * 5.0
            * scale;
        let particle = Particle {
            pos,
            vel,
            size: state.rng.random::<f32>() * 3.0 * scale + 1.0,
            life: state.rng.random::<f32>() * 30.0 + 20.0,
            color,
        };
        state.push_particle(particle);
    }
    state.events.push(GameEvent::Explosion { pos, size });
}

/// Small silent burst (hits, pickups, level-ups)
pub fn create_particles(state: &mut GameState, pos: Vec2, count: u32, color: u32) {
    let scale = state.tuning.scale;
    for _ in 0..count {
        let vel = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * 3.0
            * scale;
        let particle = Particle {
            pos,
            vel,
            size: state.rng.random::<f32>() * 2.0 * scale + 1.0,
            life: state.rng.random::<f32>() * 20.0 + 10.0,
            color,
        };
        state.push_particle(particle);
    }
}

/// Exhaust puff behind the ship
pub fn create_thrust_particle(state: &mut GameState) {
    let scale = state.tuning.scale;
    let particle = Particle {
        pos: state.player.tail(),
        vel: Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 2.0,
            state.rng.random::<f32>() * 2.0 + 1.0,
        ),
        size: state.rng.random::<f32>() * 3.0 * scale + 2.0,
        life: state.rng.random::<f32>() * 20.0 + 10.0,
        color: hue_to_rgb(state.rng.random::<f32>() * 30.0 + 20.0),
    };
    state.player.thrust_particles.push(particle);
}

/// Fill the background with a fresh starfield
pub fn create_stars(state: &mut GameState) {
    let bounds = state.bounds();
    let scale = state.tuning.scale;
    let count = state.tuning.star_count;
    state.stars.clear();
    for _ in 0..count {
        let star = Star {
            pos: Vec2::new(state.rng.random::<f32>() * bounds.x, state.rng.random::<f32>() * bounds.y),
            size: state.rng.random::<f32>() * 2.0 * scale + 1.0,
            speed: state.rng.random::<f32>() * 2.0 + 1.0,
        };
        state.stars.push(star);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_enemies_spawn_outside_playfield() {
        let mut state = GameState::with_seed(42);
        for _ in 0..100 {
            spawn_enemy(&mut state);
        }
        let (w, h) = (state.tuning.width, state.tuning.height);
        for enemy in &state.enemies {
            let outside = enemy.pos.x < 0.0 || enemy.pos.x > w || enemy.pos.y < 0.0 || enemy.pos.y > h;
            assert!(outside, "enemy {} spawned inside at {:?}", enemy.id, enemy.pos);
        }
    }

    #[test]
    fn test_elite_ratio_roughly_twenty_percent() {
        let mut state = GameState::with_seed(7);
        for _ in 0..2000 {
            spawn_enemy(&mut state);
        }
        let elites = state.enemies.iter().filter(|e| e.kind == EnemyKind::Elite).count();
        assert!((300..500).contains(&elites), "elite count {}", elites);
    }

    #[test]
    fn test_all_edges_used() {
        let mut state = GameState::with_seed(11);
        for _ in 0..200 {
            spawn_enemy(&mut state);
        }
        let (w, h) = (state.tuning.width, state.tuning.height);
        assert!(state.enemies.iter().any(|e| e.pos.y < 0.0));
        assert!(state.enemies.iter().any(|e| e.pos.y > h));
        assert!(state.enemies.iter().any(|e| e.pos.x < 0.0));
        assert!(state.enemies.iter().any(|e| e.pos.x > w));
    }

    #[test]
    fn test_ids_increase_in_insertion_order() {
        let mut state = GameState::with_seed(5);
        let a = spawn_enemy(&mut state);
        let b = spawn_enemy(&mut state);
        assert!(b > a);
        assert_eq!(state.enemies[0].id, a);
        assert_eq!(state.enemies[1].id, b);
    }

    #[test]
    fn test_drop_chance_bounds() {
        let never = Tuning {
            powerup_drop_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(1, never).unwrap();
        for _ in 0..100 {
            assert!(roll_power_up_drop(&mut state, Vec2::ZERO).is_none());
        }

        let always = Tuning {
            powerup_drop_chance: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(1, always).unwrap();
        assert!(roll_power_up_drop(&mut state, Vec2::new(5.0, 6.0)).is_some());
        assert_eq!(state.power_ups[0].pos, Vec2::new(5.0, 6.0));
        assert_eq!(state.power_ups[0].ttl_ms, 3000.0);
    }

    #[test]
    fn test_explosion_event_and_particles() {
        let mut state = GameState::with_seed(9);
        create_explosion(&mut state, Vec2::new(10.0, 10.0), 20, 0xFFFFFF);
        assert_eq!(state.particles.len(), 20);
        assert_eq!(
            state.events,
            vec![GameEvent::Explosion {
                pos: Vec2::new(10.0, 10.0),
                size: 20
            }]
        );
        assert!(state.particles.iter().all(|p| p.life >= 20.0 && p.life < 50.0));
    }

    #[test]
    fn test_stars_inside_playfield() {
        let state = GameState::with_seed(3);
        assert!(state
            .stars
            .iter()
            .all(|s| s.pos.x >= 0.0 && s.pos.x <= 800.0 && s.pos.y >= 0.0 && s.pos.y <= 600.0));
    }
}
