//! Game balance and configuration
//!
//! Every gameplay constant lives here so a session can be driven from a JSON
//! tuning file. Values are checked once by [`Tuning::validate`]; the
//! simulation assumes a validated tuning and never re-checks mid-step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::REFERENCE_FRAME_MS;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be at least {min} (got {value})")]
    BelowMinimum {
        field: &'static str,
        value: f32,
        min: f32,
    },

    #[error("{field} must be within [0, 1] (got {value})")]
    NotProbability { field: &'static str, value: f32 },

    #[error("{field} ({value}) must not exceed {limit_field} ({limit})")]
    Exceeds {
        field: &'static str,
        value: f32,
        limit_field: &'static str,
        limit: f32,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// Stats for one enemy variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTuning {
    /// Square side length
    pub size: f32,
    pub speed: f32,
    pub health: f32,
    /// Milliseconds between shots
    pub fire_rate_ms: f32,
    /// Damage dealt by each of its bullets
    pub bullet_damage: f32,
    /// Score awarded on destruction
    pub value: u64,
    /// Explosion particle count on destruction
    pub explosion_size: u32,
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub width: f32,
    pub height: f32,
    /// Multiplies enemy, projectile, power-up and particle sizes/speeds and
    /// spawn offsets (the player ship is not scaled)
    pub scale: f32,

    // === Timing ===
    pub reference_frame_ms: f32,
    /// Longer frames are clamped to this
    pub max_frame_ms: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_boost_speed: f32,
    pub player_max_health: f32,
    pub player_max_shield: f32,
    /// Shield regained per reference frame
    pub shield_recharge_rate: f32,
    pub player_fire_rate_ms: f32,
    /// Rotation (radians) while turning
    pub turn_tilt: f32,
    /// Rotation multiplier per step while not turning
    pub rotation_decay: f32,

    // === Projectiles ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub player_bullet_speed: f32,
    pub player_bullet_damage: f32,
    pub enemy_bullet_speed: f32,

    // === Enemies ===
    pub normal_enemy: EnemyTuning,
    pub elite_enemy: EnemyTuning,
    pub elite_chance: f32,
    /// Distance outside the edge where enemies appear
    pub spawn_offset: f32,
    /// Enemies this far outside the playfield are culled
    pub cull_margin: f32,
    /// Enemies stop closing in at this distance from the player
    pub engage_distance: f32,
    pub spawn_interval_ms: f32,
    pub spawn_interval_step_ms: f32,
    pub min_spawn_interval_ms: f32,

    // === Power-ups ===
    pub powerup_drop_chance: f32,
    pub powerup_size: f32,
    pub powerup_lifetime_ms: f32,
    pub health_restore: f32,
    pub shield_restore: f32,
    /// Fire interval reduction per weapon pickup
    pub weapon_fire_rate_bonus_ms: f32,
    pub min_fire_rate_ms: f32,
    pub weapon_duration_ms: f32,

    // === Progression ===
    pub level_up_health_bonus: f32,
    pub level_up_shield_bonus: f32,
    pub base_kill_threshold: f32,
    pub kill_threshold_per_level: f32,

    // === Cosmetics ===
    pub star_count: usize,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: 1.0,

            reference_frame_ms: REFERENCE_FRAME_MS,
            max_frame_ms: 250.0,

            player_size: 40.0,
            player_speed: 5.0,
            player_boost_speed: 8.0,
            player_max_health: 200.0,
            player_max_shield: 100.0,
            shield_recharge_rate: 0.2,
            player_fire_rate_ms: 300.0,
            turn_tilt: 0.2,
            rotation_decay: 0.9,

            bullet_width: 4.0,
            bullet_height: 10.0,
            player_bullet_speed: 10.0,
            player_bullet_damage: 10.0,
            enemy_bullet_speed: 5.0,

            normal_enemy: EnemyTuning {
                size: 30.0,
                speed: 2.5,
                health: 30.0,
                fire_rate_ms: 1500.0,
                bullet_damage: 10.0,
                value: 20,
                explosion_size: 20,
            },
            elite_enemy: EnemyTuning {
                size: 50.0,
                speed: 1.5,
                health: 60.0,
                fire_rate_ms: 1000.0,
                bullet_damage: 15.0,
                value: 50,
                explosion_size: 30,
            },
            elite_chance: 0.2,
            spawn_offset: 30.0,
            cull_margin: 100.0,
            engage_distance: 100.0,
            spawn_interval_ms: 2000.0,
            spawn_interval_step_ms: 100.0,
            min_spawn_interval_ms: 500.0,

            powerup_drop_chance: 0.2,
            powerup_size: 20.0,
            powerup_lifetime_ms: 3000.0,
            health_restore: 30.0,
            shield_restore: 40.0,
            weapon_fire_rate_bonus_ms: 50.0,
            min_fire_rate_ms: 100.0,
            weapon_duration_ms: 10_000.0,

            level_up_health_bonus: 10.0,
            level_up_shield_bonus: 10.0,
            base_kill_threshold: 5.0,
            kill_threshold_per_level: 1.5,

            star_count: 200,
            max_particles: 1024,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    // NaN fails this too
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::Negative { field, value })
    }
}

fn probability(field: &'static str, value: f32) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::NotProbability { field, value })
    }
}

fn at_most(
    field: &'static str,
    value: f32,
    limit_field: &'static str,
    limit: f32,
) -> Result<(), TuningError> {
    if value <= limit {
        Ok(())
    } else {
        Err(TuningError::Exceeds {
            field,
            value,
            limit_field,
            limit,
        })
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), TuningError> {
    if value >= min {
        Ok(())
    } else {
        Err(TuningError::BelowMinimum { field, value, min })
    }
}

fn check_enemy(prefix: &'static str, enemy: &EnemyTuning) -> Result<(), TuningError> {
    positive(prefix, enemy.size)?;
    positive(prefix, enemy.speed)?;
    positive(prefix, enemy.health)?;
    positive(prefix, enemy.fire_rate_ms)?;
    non_negative(prefix, enemy.bullet_damage)
}

impl Tuning {
    /// Parse a JSON tuning file; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a JSON tuning file from disk
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot honor
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("scale", self.scale)?;

        positive("reference_frame_ms", self.reference_frame_ms)?;
        positive("max_frame_ms", self.max_frame_ms)?;

        positive("player_size", self.player_size)?;
        at_most("player_size", self.player_size, "height", self.height)?;
        at_most("player_size", self.player_size, "width", self.width)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("player_boost_speed", self.player_boost_speed)?;
        positive("player_max_health", self.player_max_health)?;
        non_negative("player_max_shield", self.player_max_shield)?;
        non_negative("shield_recharge_rate", self.shield_recharge_rate)?;
        positive("player_fire_rate_ms", self.player_fire_rate_ms)?;
        probability("rotation_decay", self.rotation_decay)?;

        positive("bullet_width", self.bullet_width)?;
        positive("bullet_height", self.bullet_height)?;
        positive("player_bullet_speed", self.player_bullet_speed)?;
        non_negative("player_bullet_damage", self.player_bullet_damage)?;
        positive("enemy_bullet_speed", self.enemy_bullet_speed)?;

        check_enemy("normal_enemy", &self.normal_enemy)?;
        check_enemy("elite_enemy", &self.elite_enemy)?;
        probability("elite_chance", self.elite_chance)?;
        non_negative("spawn_offset", self.spawn_offset)?;
        non_negative("cull_margin", self.cull_margin)?;
        non_negative("engage_distance", self.engage_distance)?;
        positive("spawn_interval_ms", self.spawn_interval_ms)?;
        non_negative("spawn_interval_step_ms", self.spawn_interval_step_ms)?;
        positive("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        at_most(
            "min_spawn_interval_ms",
            self.min_spawn_interval_ms,
            "spawn_interval_ms",
            self.spawn_interval_ms,
        )?;

        probability("powerup_drop_chance", self.powerup_drop_chance)?;
        positive("powerup_size", self.powerup_size)?;
        positive("powerup_lifetime_ms", self.powerup_lifetime_ms)?;
        non_negative("health_restore", self.health_restore)?;
        non_negative("shield_restore", self.shield_restore)?;
        non_negative("weapon_fire_rate_bonus_ms", self.weapon_fire_rate_bonus_ms)?;
        positive("min_fire_rate_ms", self.min_fire_rate_ms)?;
        at_most(
            "min_fire_rate_ms",
            self.min_fire_rate_ms,
            "player_fire_rate_ms",
            self.player_fire_rate_ms,
        )?;
        positive("weapon_duration_ms", self.weapon_duration_ms)?;

        non_negative("level_up_health_bonus", self.level_up_health_bonus)?;
        non_negative("level_up_shield_bonus", self.level_up_shield_bonus)?;
        // Every level needs at least one kill
        at_least("base_kill_threshold", self.base_kill_threshold, 1.0)?;
        non_negative("kill_threshold_per_level", self.kill_threshold_per_level)?;

        Ok(())
    }

    /// Kills required to leave `level`
    ///
    /// The first level uses the base threshold; later ones grow with level.
    pub fn kill_threshold(&self, level: u32) -> u32 {
        if level <= 1 {
            self.base_kill_threshold.floor() as u32
        } else {
            (self.base_kill_threshold + level as f32 * self.kill_threshold_per_level).floor() as u32
        }
    }

    /// Convert elapsed wall time to the time-delta factor
    pub fn delta_factor(&self, elapsed_ms: f32) -> f32 {
        elapsed_ms / self.reference_frame_ms
    }

    /// Stats for the requested enemy variant
    pub fn enemy(&self, elite: bool) -> &EnemyTuning {
        if elite {
            &self.elite_enemy
        } else {
            &self.normal_enemy
        }
    }
}
