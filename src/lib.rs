//! Space Shooter - simulation core for a single-player asteroid shooter
//!
//! Core modules:
//! - `sim`: Entity simulation (movement, collisions, combat, game state)
//! - `config`: Data-driven entity tuning loaded from JSON manifests
//! - `error`: Configuration error taxonomy
//!
//! Rendering, audio, asset loading and input capture live outside this crate.
//! They drive [`sim::step`] once per frame and react to [`sim::GameEvent`]s.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;

use glam::Vec2;

/// Game tuning defaults
pub mod consts {
    /// Nominal frame delta (one frame at the target frame rate)
    pub const NOMINAL_DT: f32 = 1.0;

    /// Distance outside the viewport edge where asteroids appear
    pub const SPAWN_BUFFER: f32 = 50.0;
    /// Asteroid speed when aimed at the ship (px per nominal frame)
    pub const ASTEROID_BASE_SPEED: f32 = 2.0;
    /// Asteroid speed when aimed at a random point
    pub const ASTEROID_IDLE_SPEED: f32 = 1.0;
    /// Per-asteroid angular speed range (radians per nominal frame)
    pub const ASTEROID_SPIN_MIN: f32 = 0.01;
    pub const ASTEROID_SPIN_MAX: f32 = 0.03;

    /// Pointer distance (per axis) below which the ship ignores the pointer
    pub const POINTER_DEAD_ZONE: f32 = 10.0;

    /// Difficulty curve
    pub const STARTING_ASTEROIDS: usize = 10;
    pub const MAX_ASTEROIDS: usize = 30;
    pub const POINTS_PER_EXTRA_ASTEROID: u64 = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector a sprite with the given rotation points along.
///
/// Sprites are drawn nose-up, so rotation 0 faces screen-up (-y).
#[inline]
pub fn facing_vector(rotation: f32) -> Vec2 {
    Vec2::from_angle(rotation - std::f32::consts::FRAC_PI_2)
}

/// Rotate a local offset by `angle` radians into world space
#[inline]
pub fn rotate_offset(offset: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(offset)
}
