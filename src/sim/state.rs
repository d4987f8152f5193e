//! Game state and core simulation types
//!
//! The whole session lives in one [`GameState`] owned by the driver and
//! passed by `&mut` into [`tick`](super::tick::tick). Nothing in here is
//! global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::spawner;
use super::timers::EffectTimers;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Stable identifier for enemies and power-ups
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Clock and timers frozen
    Paused,
    /// Player destroyed; pools frozen until reset
    GameOver,
}

/// Which side fired a bullet (back-reference only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy(EntityId),
}

/// A projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub owner: BulletOwner,
}

impl Bullet {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn advance(&mut self, factor: f32) {
        self.pos += self.vel * factor;
    }
}

/// A cosmetic particle (explosions, hit sparks, thruster exhaust)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Remaining steps before removal
    pub life: f32,
    /// 0xRRGGBB
    pub color: u32,
}

impl Particle {
    /// Move and age by one step; returns false once expired
    pub fn update(&mut self, factor: f32) -> bool {
        self.pos += self.vel * factor;
        self.life -= 1.0;
        self.life > 0.0
    }
}

/// Exhaust particle owned by the player ship
pub type ThrustParticle = Particle;

/// Background star, wraps vertically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub boost_speed: f32,
    pub boosting: bool,
    /// Cosmetic tilt (radians)
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub shield_recharge_rate: f32,
    /// Milliseconds between shots
    pub fire_rate_ms: f32,
    /// Simulation time of the last shot
    pub last_shot_ms: Option<f64>,
    pub bullets: Vec<Bullet>,
    pub thrust_particles: Vec<ThrustParticle>,
}

/// How an incoming hit was split between shield and hull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub absorbed_by_shield: f32,
    pub health_lost: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.width, tuning.height) * 0.5,
            size: Vec2::splat(tuning.player_size),
            speed: tuning.player_speed,
            boost_speed: tuning.player_boost_speed,
            boosting: false,
            rotation: 0.0,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            shield: tuning.player_max_shield,
            max_shield: tuning.player_max_shield,
            shield_recharge_rate: tuning.shield_recharge_rate,
            fire_rate_ms: tuning.player_fire_rate_ms,
            last_shot_ms: None,
            bullets: Vec::new(),
            thrust_particles: Vec::new(),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Muzzle position (top center)
    #[inline]
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size.y / 2.0)
    }

    /// Exhaust position (bottom center)
    #[inline]
    pub fn tail(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Apply damage: shield soaks first, the rest comes off health
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let amount = amount.max(0.0);
        let absorbed_by_shield = amount.min(self.shield);
        self.shield -= absorbed_by_shield;
        let remaining = amount - absorbed_by_shield;
        let health_lost = remaining.min(self.health.max(0.0));
        self.health = (self.health - remaining).max(0.0);
        DamageOutcome {
            absorbed_by_shield,
            health_lost,
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn restore_shield(&mut self, amount: f32) {
        self.shield = (self.shield + amount).min(self.max_shield);
    }

    /// Whether the weapon has cooled down at simulation time `now_ms`
    pub fn can_fire(&self, now_ms: f64) -> bool {
        self.last_shot_ms
            .is_none_or(|last| now_ms - last >= self.fire_rate_ms as f64)
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    /// Larger, slower, tougher, hits harder and is worth more
    Elite,
}

impl EnemyKind {
    pub fn is_elite(self) -> bool {
        self == EnemyKind::Elite
    }

    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Normal => COLOR_ENEMY_NORMAL,
            EnemyKind::Elite => COLOR_ENEMY_ELITE,
        }
    }
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub fire_rate_ms: f32,
    pub bullet_damage: f32,
    pub last_shot_ms: Option<f64>,
    /// Score awarded on destruction
    pub value: u64,
    pub explosion_size: u32,
    pub bullets: Vec<Bullet>,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, tuning: &Tuning) -> Self {
        let stats = tuning.enemy(kind.is_elite());
        Self {
            id,
            kind,
            pos,
            size: Vec2::splat(stats.size * tuning.scale),
            speed: stats.speed * tuning.scale,
            health: stats.health,
            max_health: stats.health,
            fire_rate_ms: stats.fire_rate_ms,
            bullet_damage: stats.bullet_damage,
            last_shot_ms: None,
            value: stats.value,
            explosion_size: stats.explosion_size,
            bullets: Vec::new(),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        self.last_shot_ms
            .is_none_or(|last| now_ms - last > self.fire_rate_ms as f64)
    }

}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    Weapon,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Health, PowerUpKind::Shield, PowerUpKind::Weapon];

    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Health => COLOR_POWERUP_HEALTH,
            PowerUpKind::Shield => COLOR_POWERUP_SHIELD,
            PowerUpKind::Weapon => COLOR_POWERUP_WEAPON,
        }
    }

    /// HUD glyph
    pub fn icon(self) -> char {
        match self {
            PowerUpKind::Health => 'H',
            PowerUpKind::Shield => 'S',
            PowerUpKind::Weapon => 'W',
        }
    }
}

/// A collectible dropped by a destroyed enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub spawn_ms: f64,
    pub ttl_ms: f32,
}

impl PowerUp {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawn_ms >= self.ttl_ms as f64
    }
}

/// Notifications for audio/UI, collected during one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    Explosion { pos: Vec2, size: u32 },
    PowerUpCollected { kind: PowerUpKind },
    PlayerHit { damage: f32 },
    LevelUp { level: u32 },
    GameOver { score: u64 },
}

/// Values the HUD displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub shield: u32,
    pub max_shield: u32,
    pub enemies_defeated: u32,
    pub enemies_to_next_level: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Validated balance values
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Simulation clock (ms); only advances while playing
    pub time_ms: f64,
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub enemies_defeated: u32,
    pub enemies_to_next_level: u32,
    pub enemy_spawn_interval_ms: f32,
    /// `None` until the first spawn, which happens on the first step
    pub last_enemy_spawn_ms: Option<f64>,
    pub player: Player,
    /// Active enemies (insertion order)
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Explosion and burst particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    /// Pending temporary-effect reversions
    pub timers: EffectTimers,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a session after validating `tuning`
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    /// Session with default balance
    pub fn with_seed(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            player: Player::new(&tuning),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ms: 0.0,
            phase: GamePhase::Playing,
            score: 0,
            level: 1,
            enemies_defeated: 0,
            enemies_to_next_level: tuning.kill_threshold(1),
            enemy_spawn_interval_ms: tuning.spawn_interval_ms,
            last_enemy_spawn_ms: None,
            enemies: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            stars: Vec::new(),
            timers: EffectTimers::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        spawner::create_stars(&mut state);
        log::info!("New session with seed {}", seed);
        state
    }

    /// Start over: clear every pool, cancel pending timers, restore defaults.
    ///
    /// The RNG stream continues so consecutive runs differ.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.player = Player::new(&self.tuning);
        self.enemies.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.events.clear();
        self.time_ms = 0.0;
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.level = 1;
        self.enemies_defeated = 0;
        self.enemies_to_next_level = self.tuning.kill_threshold(1);
        self.enemy_spawn_interval_ms = self.tuning.spawn_interval_ms;
        self.last_enemy_spawn_ms = None;
        spawner::create_stars(self);
        log::info!("Session reset");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Playfield extents
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Events raised by the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            level: self.level,
            health: self.player.health.floor() as u32,
            max_health: self.player.max_health.floor() as u32,
            shield: self.player.shield.floor() as u32,
            max_shield: self.player.max_shield.floor() as u32,
            enemies_defeated: self.enemies_defeated,
            enemies_to_next_level: self.enemies_to_next_level,
        }
    }

    /// Add a particle, evicting the oldest past the cap
    pub fn push_particle(&mut self, particle: Particle) {
        let cap = self.tuning.max_particles;
        if cap == 0 {
            return;
        }
        if self.particles.len() >= cap {
            let excess = self.particles.len() + 1 - cap;
            self.particles.drain(..excess);
        }
        self.particles.push(particle);
    }
}
