//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation-time clock only (pausing freezes every timer)
//! - Seeded RNG only
//! - Stable iteration order (pool insertion order)
//! - No rendering, audio or platform dependencies

pub mod geom;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use geom::{Rect, aabb_overlap, clamp_inside};
pub use state::{
    Bullet, BulletOwner, DamageOutcome, Enemy, EnemyKind, EntityId, GameEvent, GamePhase,
    GameState, Hud, Particle, Player, PowerUp, PowerUpKind, Star, ThrustParticle,
};
pub use tick::{TickInput, apply_power_up, damage_player, level_up, tick};
pub use timers::{DeferredEffect, EffectTimers, TimerId};
