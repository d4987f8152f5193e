//! Star Skirmish - A top-down arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Reference frame duration (ms); elapsed time is normalized against this
    pub const REFERENCE_FRAME_MS: f32 = 16.67;

    /// Colors (0xRRGGBB) handed to the presentation layer
    pub const COLOR_PLAYER: u32 = 0x4CAF50;
    pub const COLOR_ENEMY_NORMAL: u32 = 0xF44336;
    pub const COLOR_ENEMY_ELITE: u32 = 0xFF5722;
    pub const COLOR_ENEMY_BULLET_HIT: u32 = 0xFF9800;
    pub const COLOR_DAMAGE: u32 = 0xFF0000;
    pub const COLOR_POWERUP_HEALTH: u32 = 0x4CAF50;
    pub const COLOR_POWERUP_SHIELD: u32 = 0x2196F3;
    pub const COLOR_POWERUP_WEAPON: u32 = 0xFFC107;
}

/// Convert a fully saturated, half-lightness HSL hue (degrees) to 0xRRGGBB
pub fn hue_to_rgb(hue: f32) -> u32 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let channel = |c: f32| (c * 255.0).round() as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}
