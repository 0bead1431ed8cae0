//! Asteroid spawn policy
//!
//! How many asteroids should be alive for the current score, where new ones
//! appear (just outside a random viewport edge) and which way they travel.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Viewport;
use crate::config::SpawnConfig;

/// Heading used when spawn point and target coincide
const DEFAULT_HEADING: Vec2 = Vec2::X;

/// Step-function difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPolicy {
    starting_count: usize,
    max_count: usize,
    points_per_increment: u64,
    /// Current target, only ever raised until `reset`
    target: usize,
}

impl SpawnPolicy {
    /// Build from a validated config (`points_per_increment` is non-zero)
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            starting_count: config.starting_count,
            max_count: config.max_count,
            points_per_increment: config.points_per_increment,
            target: config.starting_count.min(config.max_count),
        }
    }

    pub fn starting_count(&self) -> usize {
        self.starting_count
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// `min(max, starting + floor(score / points_per_increment))`
    pub fn target_for_score(&self, score: u64) -> usize {
        let steps = usize::try_from(score / self.points_per_increment).unwrap_or(usize::MAX);
        self.starting_count.saturating_add(steps).min(self.max_count)
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Raise the target for the given score. Never lowers it.
    pub fn update(&mut self, score: u64) -> usize {
        let next = self.target_for_score(score);
        if next > self.target {
            log::debug!("Asteroid target raised {} -> {} at score {}", self.target, next, score);
            self.target = next;
        }
        self.target
    }

    /// Back to the starting count (new session)
    pub fn reset(&mut self) {
        self.target = self.starting_count.min(self.max_count);
    }

    /// How many asteroids must be spawned to reach the target
    pub fn deficit(&self, live: usize) -> usize {
        self.target.saturating_sub(live)
    }
}

/// Initial motion of a freshly spawned asteroid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    pub vel: Vec2,
    /// Heading angle of `vel`
    pub rotation: f32,
}

/// Pick a point `buffer` pixels outside a uniformly chosen viewport edge
pub fn compute_offscreen_spawn<R: Rng + ?Sized>(viewport: Viewport, buffer: f32, rng: &mut R) -> Vec2 {
    let along_x = rng.random::<f32>() * viewport.width;
    let along_y = rng.random::<f32>() * viewport.height;
    match rng.random_range(0..4) {
        0 => Vec2::new(along_x, -buffer),
        1 => Vec2::new(viewport.width + buffer, along_y),
        2 => Vec2::new(along_x, viewport.height + buffer),
        _ => Vec2::new(-buffer, along_y),
    }
}

/// Uniform random point inside the viewport
pub fn random_point_in<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * viewport.width,
        rng.random::<f32>() * viewport.height,
    )
}

/// Velocity of magnitude `speed` from `spawn` toward `target`, facing its travel direction
pub fn compute_initial_trajectory(spawn: Vec2, target: Vec2, speed: f32) -> Trajectory {
    let dir = match (target - spawn).try_normalize() {
        Some(dir) => dir,
        None => {
            log::warn!("Degenerate asteroid trajectory at {spawn}, using default heading");
            DEFAULT_HEADING
        }
    };
    Trajectory {
        vel: dir * speed,
        rotation: dir.y.atan2(dir.x),
    }
}
