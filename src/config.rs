//! Static entity configuration
//!
//! Loaded once from a JSON manifest before the simulation starts. Field names
//! are camelCase on the wire so the manifests shipped with the sprite sheets
//! can be read as-is (sprite metadata is ignored here).

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Sprite-sheet animation timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Number of frames in the sheet
    pub frame_count: u32,
    /// Frames advanced per nominal tick
    pub animation_speed: f32,
}

impl AnimationConfig {
    /// Ticks needed to play the whole sheet once
    pub fn duration_ticks(&self) -> f32 {
        self.frame_count as f32 / self.animation_speed
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::invalid(field, "frameCount must be at least 1"));
        }
        if !(self.animation_speed > 0.0) {
            return Err(ConfigError::invalid(field, "animationSpeed must be positive"));
        }
        Ok(())
    }
}

/// Rectangular hit-box relative to the sprite anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectHitBox {
    pub x_offset: f32,
    pub y_offset: f32,
    pub width: f32,
    pub height: f32,
}

impl RectHitBox {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x_offset, self.y_offset)
    }
}

/// Circular hit-box relative to the sprite anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleHitBox {
    pub x_offset: f32,
    pub y_offset: f32,
    pub radius: f32,
}

impl CircleHitBox {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x_offset, self.y_offset)
    }
}

/// Firing origin on the ship, discharged at one frame of the firing animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponPort {
    pub x_offset: f32,
    pub y_offset: f32,
    pub fire_frame: u32,
}

impl WeaponPort {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x_offset, self.y_offset)
    }
}

/// Player ship tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipConfig {
    #[serde(default)]
    pub name: String,
    /// Distance moved per nominal tick while a movement key is held
    pub acceleration: f32,
    pub health_points: i32,
    pub hit_box: RectHitBox,
    pub firing_animation: AnimationConfig,
    pub destruction_animation: AnimationConfig,
    pub weapon_ports: Vec<WeaponPort>,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            name: "battle-cruiser".to_string(),
            acceleration: 5.0,
            health_points: 100,
            hit_box: RectHitBox {
                x_offset: 0.0,
                y_offset: 0.0,
                width: 40.0,
                height: 60.0,
            },
            firing_animation: AnimationConfig {
                frame_count: 8,
                animation_speed: 0.5,
            },
            destruction_animation: AnimationConfig {
                frame_count: 14,
                animation_speed: 0.25,
            },
            weapon_ports: vec![
                WeaponPort {
                    x_offset: 24.0,
                    y_offset: -14.0,
                    fire_frame: 1,
                },
                WeaponPort {
                    x_offset: 24.0,
                    y_offset: 14.0,
                    fire_frame: 4,
                },
            ],
        }
    }
}

/// Asteroid tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsteroidConfig {
    pub health_points: i32,
    /// Damage dealt to the ship on contact
    pub damage: i32,
    pub hit_box: CircleHitBox,
    /// Points awarded when a projectile destroys the asteroid
    #[serde(default = "default_score_value")]
    pub score_value: u64,
    pub destruction_animation: AnimationConfig,
}

fn default_score_value() -> u64 {
    1
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            health_points: 3,
            damage: 20,
            hit_box: CircleHitBox {
                x_offset: 0.0,
                y_offset: 0.0,
                radius: 30.0,
            },
            score_value: default_score_value(),
            destruction_animation: AnimationConfig {
                frame_count: 8,
                animation_speed: 0.3,
            },
        }
    }
}

/// Projectile tuning (shared by every bolt)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileConfig {
    pub speed: f32,
    pub damage: i32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            damage: 1,
        }
    }
}

/// Difficulty curve and spawn geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpawnConfig {
    pub starting_count: usize,
    pub max_count: usize,
    pub points_per_increment: u64,
    pub spawn_buffer: f32,
    pub base_speed: f32,
    pub idle_speed: f32,
    pub spin_min: f32,
    pub spin_max: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            starting_count: STARTING_ASTEROIDS,
            max_count: MAX_ASTEROIDS,
            points_per_increment: POINTS_PER_EXTRA_ASTEROID,
            spawn_buffer: SPAWN_BUFFER,
            base_speed: ASTEROID_BASE_SPEED,
            idle_speed: ASTEROID_IDLE_SPEED,
            spin_min: ASTEROID_SPIN_MIN,
            spin_max: ASTEROID_SPIN_MAX,
        }
    }
}

/// Input handling tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlsConfig {
    pub pointer_dead_zone: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            pointer_dead_zone: POINTER_DEAD_ZONE,
        }
    }
}

/// Complete configuration for one game session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub ship: ShipConfig,
    pub asteroid: AsteroidConfig,
    pub bolt: ProjectileConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

impl GameConfig {
    /// Parse and validate a JSON manifest
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON manifest from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON (used to dump the built-in defaults)
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ship = &self.ship;
        if ship.health_points <= 0 {
            return Err(ConfigError::invalid("ship.healthPoints", "must be positive"));
        }
        if !(ship.acceleration >= 0.0) {
            return Err(ConfigError::invalid("ship.acceleration", "must not be negative"));
        }
        if !(ship.hit_box.width > 0.0 && ship.hit_box.height > 0.0) {
            return Err(ConfigError::invalid("ship.hitBox", "width and height must be positive"));
        }
        ship.firing_animation.validate("ship.firingAnimation")?;
        ship.destruction_animation.validate("ship.destructionAnimation")?;
        if ship.weapon_ports.is_empty() {
            return Err(ConfigError::invalid("ship.weaponPorts", "at least one port is required"));
        }
        let frames = ship.firing_animation.frame_count;
        if let Some(port) = ship.weapon_ports.iter().find(|p| p.fire_frame >= frames) {
            return Err(ConfigError::invalid(
                "ship.weaponPorts",
                format!("fireFrame {} is outside the {frames}-frame firing animation", port.fire_frame),
            ));
        }

        let asteroid = &self.asteroid;
        if asteroid.health_points <= 0 {
            return Err(ConfigError::invalid("asteroid.healthPoints", "must be positive"));
        }
        if asteroid.damage < 0 {
            return Err(ConfigError::invalid("asteroid.damage", "must not be negative"));
        }
        if !(asteroid.hit_box.radius > 0.0) {
            return Err(ConfigError::invalid("asteroid.hitBox.radius", "must be positive"));
        }
        asteroid
            .destruction_animation
            .validate("asteroid.destructionAnimation")?;

        if !(self.bolt.speed > 0.0) {
            return Err(ConfigError::invalid("bolt.speed", "must be positive"));
        }
        if self.bolt.damage < 0 {
            return Err(ConfigError::invalid("bolt.damage", "must not be negative"));
        }

        let spawn = &self.spawn;
        if spawn.points_per_increment == 0 {
            return Err(ConfigError::invalid("spawn.pointsPerIncrement", "must be at least 1"));
        }
        if spawn.max_count < spawn.starting_count {
            return Err(ConfigError::invalid(
                "spawn.maxCount",
                format!("{} is below startingCount {}", spawn.max_count, spawn.starting_count),
            ));
        }
        if !(spawn.spawn_buffer >= 0.0) {
            return Err(ConfigError::invalid("spawn.spawnBuffer", "must not be negative"));
        }
        if !(spawn.spin_min <= spawn.spin_max) {
            return Err(ConfigError::invalid("spawn.spinMin", "must not exceed spinMax"));
        }
        if !(self.controls.pointer_dead_zone >= 0.0) {
            return Err(ConfigError::invalid("controls.pointerDeadZone", "must not be negative"));
        }
        Ok(())
    }
}
