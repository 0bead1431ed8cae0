//! Game state and core simulation types
//!
//! Entity records (ship, asteroid, projectile), their lifecycles, and the
//! top-level [`GameState`] that the step function mutates.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, RotatedRect, Viewport};
use super::events::{EntityKind, GameEvent};
use super::registry::{EntityId, EntityRegistry};
use super::spawn::{SpawnPolicy, Trajectory};
use crate::config::{AnimationConfig, AsteroidConfig, CircleHitBox, GameConfig, RectHitBox, ShipConfig, WeaponPort};
use crate::error::ConfigError;
use crate::{facing_vector, normalize_angle, rotate_offset};

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to start
    NotStarted,
    /// Active gameplay
    Running,
    /// Ship finished its destruction sequence; summary not yet shown
    PlayerDead,
    /// Terminal summary is on screen, waiting for restart
    GameOver,
}

/// Destruction progress shared by ships and asteroids
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Destruction sequence playing, `remaining` ticks left
    Destroying { remaining: f32 },
    /// Sequence finished
    Destroyed,
}

impl Lifecycle {
    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }

    fn begin(animation: &AnimationConfig) -> Self {
        Lifecycle::Destroying {
            remaining: animation.duration_ticks(),
        }
    }

    /// Count down the destruction sequence. Returns true on the tick it completes.
    pub fn advance(&mut self, dt: f32) -> bool {
        if let Lifecycle::Destroying { remaining } = self {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *self = Lifecycle::Destroyed;
                return true;
            }
        }
        false
    }
}

/// Result of applying damage to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Entity already destroyed, nothing changed
    Ignored,
    /// Health reduced, entity still alive
    Damaged,
    /// Health reduced and the destruction sequence started
    Destroyed,
}

/// Ship-relative movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thrust {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: EntityId,
    pub pos: Vec2,
    /// Sprite rotation (0 = nose up)
    pub rotation: f32,
    pub acceleration: f32,
    pub health: i32,
    pub max_health: i32,
    pub hit_box: RectHitBox,
    pub weapon_ports: Vec<WeaponPort>,
    pub firing_animation: AnimationConfig,
    pub destruction_animation: AnimationConfig,
    pub lifecycle: Lifecycle,
    /// Frame position of the firing animation in progress
    pub firing: Option<f32>,
    pub engines_on: bool,
    pub shield_active: bool,
}

impl Ship {
    pub fn new(id: EntityId, pos: Vec2, config: &ShipConfig) -> Self {
        Self {
            id,
            pos,
            rotation: 0.0,
            acceleration: config.acceleration,
            health: config.health_points,
            max_health: config.health_points,
            hit_box: config.hit_box,
            weapon_ports: config.weapon_ports.clone(),
            firing_animation: config.firing_animation,
            destruction_animation: config.destruction_animation,
            lifecycle: Lifecycle::Alive,
            firing: None,
            engines_on: false,
            shield_active: false,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        !self.lifecycle.is_alive()
    }

    pub fn is_firing(&self) -> bool {
        self.firing.is_some()
    }

    /// Health as a percentage of max, clamped to [0, 100]
    pub fn health_percentage(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32 * 100.0).clamp(0.0, 100.0)
    }

    /// World-space hit-box (rotates with the sprite)
    pub fn hit_rect(&self) -> RotatedRect {
        RotatedRect {
            center: self.pos + rotate_offset(self.hit_box.offset(), self.rotation),
            width: self.hit_box.width,
            height: self.hit_box.height,
            rotation: self.rotation,
        }
    }

    /// Turn the nose toward a point
    pub fn face_point(&mut self, point: Vec2) {
        if self.is_destroyed() {
            return;
        }
        let d = point - self.pos;
        self.rotation = d.y.atan2(d.x) + std::f32::consts::FRAC_PI_2;
    }

    /// Move relative to the current facing, then clamp to the viewport
    pub fn thrust(&mut self, direction: Thrust, viewport: Viewport, dt: f32) {
        if self.is_destroyed() {
            return;
        }
        let forward = facing_vector(self.rotation);
        let step = match direction {
            Thrust::Forward => forward,
            Thrust::Backward => -forward,
            Thrust::StrafeLeft => -forward.perp(),
            Thrust::StrafeRight => forward.perp(),
        };
        self.pos = viewport.clamp(self.pos + step * self.acceleration * dt);
    }

    /// World position of a weapon port. Port offsets are in the facing frame (+x forward).
    pub fn port_position(&self, port: usize) -> Option<Vec2> {
        let port = self.weapon_ports.get(port)?;
        let angle = self.rotation - std::f32::consts::FRAC_PI_2;
        Some(self.pos + rotate_offset(port.offset(), angle))
    }

    fn ports_at_frame(&self, frame: u32) -> impl Iterator<Item = usize> + '_ {
        self.weapon_ports
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.fire_frame == frame)
            .map(|(i, _)| i)
    }

    /// Start a firing cycle. Returns the ports that discharge on frame 0.
    ///
    /// Ignored while a cycle is already playing or the ship is destroyed.
    pub fn request_fire(&mut self) -> Vec<usize> {
        if self.is_destroyed() || self.is_firing() {
            return Vec::new();
        }
        let ports: Vec<usize> = self.ports_at_frame(0).collect();
        let last = self.firing_animation.frame_count.saturating_sub(1);
        self.firing = if last == 0 { None } else { Some(0.0) };
        ports
    }

    /// Advance the firing animation. Returns the ports whose frame was reached.
    pub fn advance_fire(&mut self, dt: f32) -> Vec<usize> {
        let Some(frame) = self.firing else {
            return Vec::new();
        };
        if self.is_destroyed() {
            self.firing = None;
            return Vec::new();
        }

        let last = self.firing_animation.frame_count.saturating_sub(1);
        let prev = frame.floor() as u32;
        let next_pos = frame + self.firing_animation.animation_speed * dt;
        let next = (next_pos.floor() as u32).min(last);

        let ports = ((prev + 1)..=next)
            .flat_map(|f| self.ports_at_frame(f))
            .collect();

        self.firing = if next >= last { None } else { Some(next_pos) };
        ports
    }

    /// Apply contact damage. Health never rises; a destroyed ship ignores damage.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_destroyed() {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.lifecycle = Lifecycle::begin(&self.destruction_animation);
            self.firing = None;
            self.engines_on = false;
            self.shield_active = false;
            return DamageOutcome::Destroyed;
        }
        DamageOutcome::Damaged
    }
}

/// An asteroid drifting along a fixed trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: EntityId,
    pub pos: Vec2,
    /// Heading angle; advanced by `spin` every tick
    pub rotation: f32,
    pub vel: Vec2,
    /// Angular speed (radians per nominal tick)
    pub spin: f32,
    pub health: i32,
    pub damage: i32,
    pub score_value: u64,
    pub hit_box: CircleHitBox,
    pub destruction_animation: AnimationConfig,
    pub has_entered_view: bool,
    /// A projectile dealt the lethal damage before the asteroid was on screen
    pub killed_by_projectile: bool,
    pub lifecycle: Lifecycle,
}

impl Asteroid {
    pub fn new(id: EntityId, pos: Vec2, config: &AsteroidConfig) -> Self {
        Self {
            id,
            pos,
            rotation: 0.0,
            vel: Vec2::ZERO,
            spin: 0.0,
            health: config.health_points,
            damage: config.damage,
            score_value: config.score_value,
            hit_box: config.hit_box,
            destruction_animation: config.destruction_animation,
            has_entered_view: false,
            killed_by_projectile: false,
            lifecycle: Lifecycle::Alive,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        !self.lifecycle.is_alive()
    }

    pub fn set_trajectory(&mut self, trajectory: Trajectory) {
        self.vel = trajectory.vel;
        self.rotation = trajectory.rotation;
    }

    /// Move and spin for one tick
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.rotation = normalize_angle(self.rotation + self.spin * dt);
    }

    /// Latch the entered-view flag. Returns true only on the first call.
    pub fn mark_entered_view(&mut self) -> bool {
        if self.has_entered_view {
            return false;
        }
        self.has_entered_view = true;
        true
    }

    /// World-space hit-box (offset rotates with the sprite)
    pub fn hit_circle(&self) -> Circle {
        Circle {
            center: self.pos + rotate_offset(self.hit_box.offset(), self.rotation),
            radius: self.hit_box.radius,
        }
    }

    /// Start the destruction sequence.
    ///
    /// Refused until the asteroid has been on screen, so off-screen asteroids
    /// never play a visible destruction. Returns true if destruction began.
    pub fn try_destroy(&mut self) -> bool {
        if !self.has_entered_view || self.is_destroyed() {
            return false;
        }
        self.lifecycle = Lifecycle::begin(&self.destruction_animation);
        true
    }

    /// Apply projectile damage; a destroyed asteroid ignores further hits.
    ///
    /// A lethal hit before the asteroid is visible is remembered so the kill
    /// can be credited once destruction actually starts.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_destroyed() {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        if self.health > 0 {
            return DamageOutcome::Damaged;
        }
        if self.try_destroy() {
            return DamageOutcome::Destroyed;
        }
        self.killed_by_projectile = true;
        DamageOutcome::Damaged
    }
}

/// A bolt travelling in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    /// Inherited from the ship when fired
    pub rotation: f32,
    /// Set once the presentation layer has picked the bolt up
    pub rendered: bool,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, rotation: f32) -> Self {
        Self {
            id,
            pos,
            rotation,
            rendered: false,
        }
    }

    pub fn heading(&self) -> Vec2 {
        facing_vector(self.rotation)
    }

    pub fn advance(&mut self, speed: f32, dt: f32) {
        self.pos += self.heading() * speed * dt;
    }
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) config: GameConfig,
    pub registry: EntityRegistry,
    pub spawn: SpawnPolicy,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    pub(crate) score: u64,
    /// Game-over summary already emitted for the current death
    pub(crate) game_over_shown: bool,
    /// Next backfill is the opening wave (aimed at random points)
    pub(crate) opening_wave_pending: bool,
    pub(crate) events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new session. The config is validated here so a bad one is
    /// rejected before the first step.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn = SpawnPolicy::new(&config.spawn);
        Ok(Self {
            seed,
            config,
            registry: EntityRegistry::new(),
            spawn,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            score: 0,
            game_over_shown: false,
            opening_wave_pending: false,
            events: Vec::new(),
            time_ticks: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Ship health for the HUD (0 when no ship exists)
    pub fn ship_health_percentage(&self) -> f32 {
        self.registry.ship().map_or(0.0, Ship::health_percentage)
    }

    /// Notifications queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin play: place the ship at the viewport centre and queue the opening wave
    pub fn start(&mut self, viewport: Viewport) -> bool {
        if self.phase != GamePhase::NotStarted {
            log::warn!("Ignoring start request in phase {:?}", self.phase);
            return false;
        }
        if self.registry.ship().is_none() {
            self.spawn_player_ship(viewport);
        }
        self.opening_wave_pending = true;
        log::info!("Game started with seed: {}", self.seed);
        self.set_phase(GamePhase::Running);
        true
    }

    /// Reset the session after the player died
    pub fn restart(&mut self, viewport: Viewport) -> bool {
        if !matches!(self.phase, GamePhase::PlayerDead | GamePhase::GameOver) {
            log::warn!("Ignoring restart request in phase {:?}", self.phase);
            return false;
        }

        for id in self.registry.remove_all_asteroids() {
            self.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Asteroid,
                id,
            });
        }
        for id in self.registry.remove_all_projectiles() {
            self.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Projectile,
                id,
            });
        }
        if let Some(old) = self.registry.ship() {
            let id = old.id;
            self.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Ship,
                id,
            });
        }

        self.score = 0;
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.spawn.reset();
        self.game_over_shown = false;
        self.opening_wave_pending = true;
        self.spawn_player_ship(viewport);

        log::info!("Game restarted");
        self.set_phase(GamePhase::Running);
        true
    }

    /// Flip the `rendered` flag on new projectiles, returning their ids
    pub fn take_unrendered_projectiles(&mut self) -> Vec<EntityId> {
        let mut fresh = Vec::new();
        for id in self.registry.projectile_ids() {
            if let Some(p) = self.registry.projectile_mut(id) {
                if !p.rendered {
                    p.rendered = true;
                    fresh.push(id);
                }
            }
        }
        fresh
    }

    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        if self.phase == to {
            return;
        }
        let from = self.phase;
        self.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    pub(crate) fn add_score(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    fn spawn_player_ship(&mut self, viewport: Viewport) {
        let id = self.registry.allocate_id();
        let ship = Ship::new(id, viewport.center(), &self.config.ship);
        self.registry.set_ship(ship);
        self.events.push(GameEvent::EntitySpawned {
            kind: EntityKind::Ship,
            id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnimationConfig, WeaponPort};
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn ship_at(x: f32, y: f32) -> Ship {
        Ship::new(EntityId(1), Vec2::new(x, y), &ShipConfig::default())
    }

    fn firing_ship(frames: u32, speed: f32, port_frames: &[u32]) -> Ship {
        let config = ShipConfig {
            firing_animation: AnimationConfig {
                frame_count: frames,
                animation_speed: speed,
            },
            weapon_ports: port_frames
                .iter()
                .map(|&f| WeaponPort {
                    x_offset: 10.0,
                    y_offset: 0.0,
                    fire_frame: f,
                })
                .collect(),
            ..ShipConfig::default()
        };
        Ship::new(EntityId(1), Vec2::new(100.0, 100.0), &config)
    }

    fn entered_asteroid() -> Asteroid {
        let mut a = Asteroid::new(EntityId(2), Vec2::new(50.0, 50.0), &AsteroidConfig::default());
        a.mark_entered_view();
        a
    }

    #[test]
    fn test_face_point() {
        let mut ship = ship_at(100.0, 100.0);
        ship.face_point(Vec2::new(100.0, 0.0)); // straight up
        assert!(ship.rotation.abs() < 1e-5);
        ship.face_point(Vec2::new(200.0, 100.0)); // right
        assert!((ship.rotation - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_thrust_is_relative_to_facing() {
        let view = Viewport::new(1000.0, 1000.0);
        let mut ship = ship_at(500.0, 500.0);
        ship.acceleration = 10.0;

        // Nose up: forward is -y, strafe left is -x
        ship.thrust(Thrust::Forward, view, 1.0);
        assert!((ship.pos - Vec2::new(500.0, 490.0)).length() < 1e-4);
        ship.thrust(Thrust::StrafeLeft, view, 1.0);
        assert!((ship.pos - Vec2::new(490.0, 490.0)).length() < 1e-4);

        // Nose right: forward is +x, strafe right is +y
        ship.rotation = FRAC_PI_2;
        ship.thrust(Thrust::Forward, view, 1.0);
        assert!((ship.pos - Vec2::new(500.0, 490.0)).length() < 1e-4);
        ship.thrust(Thrust::StrafeRight, view, 1.0);
        assert!((ship.pos - Vec2::new(500.0, 500.0)).length() < 1e-4);
        ship.thrust(Thrust::Backward, view, 2.0);
        assert!((ship.pos - Vec2::new(480.0, 500.0)).length() < 1e-4);
    }

    #[test]
    fn test_destroyed_ship_does_not_move_or_fire() {
        let view = Viewport::new(1000.0, 1000.0);
        let mut ship = ship_at(500.0, 500.0);
        assert_eq!(ship.apply_damage(ship.health), DamageOutcome::Destroyed);

        ship.thrust(Thrust::Forward, view, 1.0);
        ship.face_point(Vec2::new(0.0, 500.0));
        assert_eq!(ship.pos, Vec2::new(500.0, 500.0));
        assert_eq!(ship.rotation, 0.0);
        assert!(ship.request_fire().is_empty());
        assert_eq!(ship.apply_damage(10), DamageOutcome::Ignored);
    }

    #[test]
    fn test_ship_health_percentage() {
        let mut ship = ship_at(0.0, 0.0);
        ship.max_health = 200;
        ship.health = 200;
        assert_eq!(ship.apply_damage(50), DamageOutcome::Damaged);
        assert_eq!(ship.health_percentage(), 75.0);
        ship.apply_damage(500);
        assert_eq!(ship.health_percentage(), 0.0);
    }

    #[test]
    fn test_fire_cycle_discharges_ports_on_their_frames() {
        let mut ship = firing_ship(4, 1.0, &[0, 2]);

        assert_eq!(ship.request_fire(), vec![0]);
        assert!(ship.is_firing());
        // Locked while the cycle plays
        assert!(ship.request_fire().is_empty());

        assert!(ship.advance_fire(1.0).is_empty()); // frame 1
        assert_eq!(ship.advance_fire(1.0), vec![1]); // frame 2
        assert!(ship.advance_fire(1.0).is_empty()); // frame 3 = last
        assert!(!ship.is_firing());

        assert_eq!(ship.request_fire(), vec![0]);
    }

    #[test]
    fn test_fire_cycle_fractional_speed() {
        let mut ship = firing_ship(3, 0.5, &[1]);
        assert!(ship.request_fire().is_empty());
        assert!(ship.advance_fire(1.0).is_empty()); // 0.5
        assert_eq!(ship.advance_fire(1.0), vec![0]); // 1.0
        assert!(ship.advance_fire(1.0).is_empty()); // 1.5
        assert!(ship.is_firing());
        assert!(ship.advance_fire(1.0).is_empty()); // 2.0 = last
        assert!(!ship.is_firing());
    }

    #[test]
    fn test_fire_cycle_large_step_does_not_skip_ports() {
        let mut ship = firing_ship(6, 1.0, &[1, 3, 4]);
        ship.request_fire();
        assert_eq!(ship.advance_fire(10.0), vec![0, 1, 2]);
        assert!(!ship.is_firing());
    }

    #[test]
    fn test_port_position_uses_facing_frame() {
        let ship = firing_ship(4, 1.0, &[0]);
        // Nose up, port 10 units forward
        let p = ship.port_position(0).unwrap();
        assert!((p - Vec2::new(100.0, 90.0)).length() < 1e-4);
        assert!(ship.port_position(5).is_none());
    }

    #[test]
    fn test_ship_hit_rect_follows_rotation() {
        let mut ship = ship_at(0.0, 0.0);
        ship.hit_box.y_offset = -10.0;
        ship.rotation = PI;
        let rect = ship.hit_rect();
        assert!((rect.center - Vec2::new(0.0, 10.0)).length() < 1e-4);
        assert_eq!(rect.rotation, PI);
    }

    #[test]
    fn test_asteroid_not_destroyed_before_entering_view() {
        let mut a = Asteroid::new(EntityId(3), Vec2::new(-40.0, 10.0), &AsteroidConfig::default());
        assert_eq!(a.apply_damage(a.health), DamageOutcome::Damaged);
        assert!(a.health <= 0);
        assert!(!a.is_destroyed());

        a.mark_entered_view();
        assert!(a.try_destroy());
        assert!(a.is_destroyed());
    }

    #[test]
    fn test_offscreen_lethal_hit_is_remembered() {
        let mut a = Asteroid::new(EntityId(3), Vec2::new(-40.0, 10.0), &AsteroidConfig::default());
        a.health = 3;
        a.apply_damage(1);
        assert!(!a.killed_by_projectile);
        a.apply_damage(2);
        assert!(a.killed_by_projectile);
        assert!(!a.is_destroyed());

        // On-screen kills are credited immediately instead
        let mut b = entered_asteroid();
        b.health = 1;
        assert_eq!(b.apply_damage(1), DamageOutcome::Destroyed);
        assert!(!b.killed_by_projectile);
    }

    #[test]
    fn test_exact_damage_destroys_and_second_hit_is_noop() {
        let mut a = entered_asteroid();
        a.health = 2;
        assert_eq!(a.apply_damage(2), DamageOutcome::Destroyed);
        assert_eq!(a.health, 0);
        assert!(a.is_destroyed());
        assert_eq!(a.apply_damage(2), DamageOutcome::Ignored);
        assert_eq!(a.health, 0);
    }

    #[test]
    fn test_lifecycle_completes_once() {
        let mut a = entered_asteroid();
        a.destruction_animation = AnimationConfig {
            frame_count: 4,
            animation_speed: 1.0,
        };
        a.try_destroy();
        assert!(!a.lifecycle.advance(2.0));
        assert!(a.lifecycle.advance(2.0));
        assert_eq!(a.lifecycle, Lifecycle::Destroyed);
        assert!(!a.lifecycle.advance(2.0));
    }

    #[test]
    fn test_asteroid_advance_and_hit_circle() {
        let mut a = entered_asteroid();
        a.vel = Vec2::new(2.0, -1.0);
        a.spin = 0.1;
        a.hit_box.x_offset = 5.0;
        a.advance(2.0);
        assert_eq!(a.pos, Vec2::new(54.0, 48.0));
        assert!((a.rotation - 0.2).abs() < 1e-6);

        a.rotation = FRAC_PI_2;
        let c = a.hit_circle();
        assert!((c.center - Vec2::new(54.0, 53.0)).length() < 1e-4);
    }

    #[test]
    fn test_projectile_moves_along_heading() {
        let mut p = Projectile::new(EntityId(9), Vec2::new(10.0, 10.0), FRAC_PI_2);
        p.advance(5.0, 2.0);
        assert!((p.pos - Vec2::new(20.0, 10.0)).length() < 1e-4);
        assert!(!p.rendered);
    }

    #[test]
    fn test_start_places_ship_and_runs() {
        let mut state = GameState::new(GameConfig::default(), 7).unwrap();
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert!(state.start(Viewport::new(800.0, 600.0)));
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.registry.ship().unwrap().pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ship_health_percentage(), 100.0);
        assert!(!state.start(Viewport::new(800.0, 600.0)));

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::NotStarted,
            to: GamePhase::Running
        }));
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = GameConfig::default();
        config.spawn.spin_min = 0.05;
        config.spawn.spin_max = 0.03;
        assert!(matches!(
            GameState::new(config, 7),
            Err(ConfigError::Invalid { field: "spawn.spinMin", .. })
        ));

        let mut config = GameConfig::default();
        config.ship.destruction_animation.animation_speed = 0.0;
        assert!(GameState::new(config, 7).is_err());

        let mut config = GameConfig::default();
        config.spawn.points_per_increment = 0;
        assert!(matches!(
            GameState::new(config, 7),
            Err(ConfigError::Invalid { field: "spawn.pointsPerIncrement", .. })
        ));
    }

    #[test]
    fn test_restart_refused_while_running() {
        let mut state = GameState::new(GameConfig::default(), 7).unwrap();
        let view = Viewport::new(800.0, 600.0);
        assert!(!state.restart(view));
        state.start(view);
        assert!(!state.restart(view));
    }

    #[test]
    fn test_take_unrendered_projectiles_is_one_shot() {
        let mut state = GameState::new(GameConfig::default(), 7).unwrap();
        let id = state.registry.allocate_id();
        state.registry.add_projectile(Projectile::new(id, Vec2::ZERO, 0.0));

        assert_eq!(state.take_unrendered_projectiles(), vec![id]);
        assert!(state.take_unrendered_projectiles().is_empty());
        assert!(state.registry.projectile(id).unwrap().rendered);
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_viewport(
            x in -2000.0f32..4000.0,
            y in -2000.0f32..4000.0,
            rotation in -10.0f32..10.0,
            width in 1.0f32..2000.0,
            height in 1.0f32..2000.0,
            accel in 0.0f32..500.0,
            dir in 0usize..4,
        ) {
            let view = Viewport::new(width, height);
            let mut ship = ship_at(x, y);
            ship.rotation = rotation;
            ship.acceleration = accel;
            let direction = [Thrust::Forward, Thrust::Backward, Thrust::StrafeLeft, Thrust::StrafeRight][dir];
            ship.thrust(direction, view, 1.0);
            prop_assert!(ship.pos.x >= 0.0 && ship.pos.x <= width);
            prop_assert!(ship.pos.y >= 0.0 && ship.pos.y <= height);
        }

        #[test]
        fn prop_entered_view_never_reverts(steps in proptest::collection::vec(any::<bool>(), 1..50)) {
            let mut a = Asteroid::new(EntityId(1), Vec2::ZERO, &AsteroidConfig::default());
            let mut seen = false;
            let mut transitions = 0;
            for in_view in steps {
                if in_view && a.mark_entered_view() {
                    transitions += 1;
                }
                seen |= in_view;
                prop_assert_eq!(a.has_entered_view, seen);
            }
            prop_assert!(transitions <= 1);
        }
    }
}
