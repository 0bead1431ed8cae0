//! Per-frame simulation step
//!
//! One call advances the whole game by `dt` (1.0 = one frame at the target
//! frame rate). Phases run in a fixed order: gate, death acknowledgement,
//! ship input, firing, shield, spawn backfill, asteroid pass, projectile pass.

use glam::Vec2;
use rand::Rng;

use super::collision::{Viewport, point_in_circle, rotated_rect_circle_collision, within_buffer};
use super::events::{EntityKind, GameEvent, HitCue};
use super::registry::EntityId;
use super::spawn::{compute_initial_trajectory, compute_offscreen_spawn, random_point_in};
use super::state::{Asteroid, DamageOutcome, GamePhase, GameState, Projectile, Ship, Thrust};

/// Held input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Primary fire (left mouse)
    pub fire_primary: bool,
    /// Shield (right mouse)
    pub fire_secondary: bool,
    /// Pointer position in viewport coordinates
    pub pointer: Option<Vec2>,
}

impl TickInput {
    pub fn any_movement(&self) -> bool {
        self.move_up || self.move_down || self.move_left || self.move_right
    }

    fn thrusts(&self) -> impl Iterator<Item = Thrust> {
        [
            (self.move_left, Thrust::StrafeLeft),
            (self.move_right, Thrust::StrafeRight),
            (self.move_up, Thrust::Forward),
            (self.move_down, Thrust::Backward),
        ]
        .into_iter()
        .filter_map(|(held, thrust)| held.then_some(thrust))
    }
}

/// Advance the game state by one frame
pub fn step(state: &mut GameState, input: &TickInput, dt: f32, viewport: Viewport) {
    if state.registry.ship().is_none() {
        return;
    }

    match state.phase {
        GamePhase::NotStarted | GamePhase::GameOver => return,
        GamePhase::PlayerDead => {
            acknowledge_death(state);
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    if advance_ship_destruction(state, dt) {
        return;
    }

    steer_ship(state, input, dt, viewport);
    fire_weapons(state, input, dt);
    toggle_shield(state, input);
    backfill_asteroids(state, viewport);
    update_asteroids(state, dt, viewport);
    update_projectiles(state, dt, viewport);
}

/// Show the summary once, then clear the field
fn acknowledge_death(state: &mut GameState) {
    if state.game_over_shown {
        return;
    }
    state.game_over_shown = true;
    log::info!("Game over with score {}", state.score);
    state.events.push(GameEvent::GameOverShown { score: state.score });

    for id in state.registry.remove_all_asteroids() {
        state.events.push(GameEvent::EntityRemoved {
            kind: EntityKind::Asteroid,
            id,
        });
    }
    state.set_phase(GamePhase::GameOver);
}

/// Count down the ship's destruction. Returns true once the player is dead.
fn advance_ship_destruction(state: &mut GameState, dt: f32) -> bool {
    let Some(ship) = state.registry.ship_mut() else {
        return false;
    };
    if !ship.lifecycle.advance(dt) {
        return false;
    }
    log::info!("Ship {} destruction complete", ship.id);
    state.set_phase(GamePhase::PlayerDead);
    true
}

fn steer_ship(state: &mut GameState, input: &TickInput, dt: f32, viewport: Viewport) {
    let dead_zone = state.config.controls.pointer_dead_zone;
    let Some(ship) = state.registry.ship_mut() else {
        return;
    };
    if ship.is_destroyed() {
        return;
    }

    let in_dead_zone = input
        .pointer
        .is_some_and(|p| within_buffer(ship.pos, p, dead_zone));

    if !in_dead_zone {
        if let Some(pointer) = input.pointer {
            ship.face_point(pointer);
        }
        for thrust in input.thrusts() {
            ship.thrust(thrust, viewport, dt);
        }
    }

    let engines = !in_dead_zone && input.any_movement();
    if ship.engines_on != engines {
        ship.engines_on = engines;
        state.events.push(GameEvent::EnginesToggled { active: engines });
    }
}

fn fire_weapons(state: &mut GameState, input: &TickInput, dt: f32) {
    let Some(ship) = state.registry.ship_mut() else {
        return;
    };

    let mut ports = ship.advance_fire(dt);
    if input.fire_primary {
        ports.extend(ship.request_fire());
    }
    if ports.is_empty() {
        return;
    }

    let rotation = ship.rotation;
    let origins: Vec<(usize, Vec2)> = ports
        .into_iter()
        .filter_map(|port| ship.port_position(port).map(|pos| (port, pos)))
        .collect();

    for (port, pos) in origins {
        let id = state.registry.allocate_id();
        state.registry.add_projectile(Projectile::new(id, pos, rotation));
        state.events.push(GameEvent::ShipFired {
            port,
            projectile: id,
        });
    }
}

fn toggle_shield(state: &mut GameState, input: &TickInput) {
    let Some(ship) = state.registry.ship_mut() else {
        return;
    };
    if ship.is_destroyed() || ship.shield_active == input.fire_secondary {
        return;
    }
    ship.shield_active = input.fire_secondary;
    state.events.push(GameEvent::ShieldToggled {
        active: input.fire_secondary,
    });
}

/// Top the field up to the spawn policy's target
fn backfill_asteroids(state: &mut GameState, viewport: Viewport) {
    state.spawn.update(state.score);
    let deficit = state.spawn.deficit(state.registry.asteroid_count());
    let opening = std::mem::take(&mut state.opening_wave_pending);
    if deficit == 0 {
        return;
    }

    let aim = if opening { None } else { ship_position(state) };
    for _ in 0..deficit {
        spawn_asteroid(state, viewport, aim);
    }
}

fn ship_position(state: &GameState) -> Option<Vec2> {
    state.registry.ship().map(|s| s.pos)
}

/// Spawn one asteroid off screen, aimed at `aim` (or a random point at idle speed)
fn spawn_asteroid(state: &mut GameState, viewport: Viewport, aim: Option<Vec2>) -> EntityId {
    let spawn = state.config.spawn;
    let pos = compute_offscreen_spawn(viewport, spawn.spawn_buffer, &mut state.rng);
    let (target, speed) = match aim {
        Some(target) => (target, spawn.base_speed),
        None => (random_point_in(viewport, &mut state.rng), spawn.idle_speed),
    };
    let spin = state.rng.random_range(spawn.spin_min..=spawn.spin_max);

    let id = state.registry.allocate_id();
    let mut asteroid = Asteroid::new(id, pos, &state.config.asteroid);
    asteroid.set_trajectory(compute_initial_trajectory(pos, target, speed));
    asteroid.spin = spin;
    state.registry.add_asteroid(asteroid);

    log::debug!("Spawned asteroid {} at {} toward {}", id, pos, target);
    state.events.push(GameEvent::EntitySpawned {
        kind: EntityKind::Asteroid,
        id,
    });
    id
}

fn update_asteroids(state: &mut GameState, dt: f32, viewport: Viewport) {
    for id in state.registry.asteroid_ids() {
        let ship_rect = state
            .registry
            .ship()
            .filter(|s| !s.is_destroyed())
            .map(Ship::hit_rect);

        let Some(asteroid) = state.registry.asteroid_mut(id) else {
            continue;
        };

        asteroid.advance(dt);
        if viewport.contains(asteroid.pos) {
            asteroid.mark_entered_view();
        }

        if asteroid.lifecycle.advance(dt) {
            state.registry.remove_asteroid(id);
            state.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Asteroid,
                id,
            });
            continue;
        }

        // Killed while off screen: finish the job once it is visible
        if asteroid.health <= 0 && asteroid.try_destroy() {
            log::debug!("Asteroid {} destroyed on entering view", id);
            state.events.push(GameEvent::EntityDestroyed {
                kind: EntityKind::Asteroid,
                id,
            });
            if asteroid.killed_by_projectile {
                let points = asteroid.score_value;
                state.add_score(points);
            }
        }
        let Some(asteroid) = state.registry.asteroid_mut(id) else {
            continue;
        };

        if asteroid.has_entered_view && viewport.is_outside(asteroid.pos) {
            log::debug!("Asteroid {} left the viewport at {}", id, asteroid.pos);
            state.registry.remove_asteroid(id);
            state.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Asteroid,
                id,
            });
            let aim = ship_position(state);
            spawn_asteroid(state, viewport, aim);
            continue;
        }

        if asteroid.is_destroyed() {
            continue;
        }
        let Some(ship_rect) = ship_rect else {
            continue;
        };
        if !rotated_rect_circle_collision(asteroid.hit_circle(), ship_rect) {
            continue;
        }

        let damage = asteroid.damage;
        if asteroid.try_destroy() {
            log::debug!("Asteroid {} rammed the ship", id);
            state.events.push(GameEvent::EntityDestroyed {
                kind: EntityKind::Asteroid,
                id,
            });
        }
        damage_ship(state, damage);
    }
}

fn damage_ship(state: &mut GameState, amount: i32) {
    let Some(ship) = state.registry.ship_mut() else {
        return;
    };
    let id = ship.id;
    let outcome = ship.apply_damage(amount);
    if outcome == DamageOutcome::Ignored {
        return;
    }
    state.events.push(GameEvent::HealthChanged {
        kind: EntityKind::Ship,
        id,
        health: ship.health,
    });
    if outcome == DamageOutcome::Destroyed {
        log::info!("Ship {} destroyed", id);
        state.events.push(GameEvent::EntityDestroyed {
            kind: EntityKind::Ship,
            id,
        });
    }
}

fn update_projectiles(state: &mut GameState, dt: f32, viewport: Viewport) {
    let bolt = state.config.bolt;

    for id in state.registry.projectile_ids() {
        let Some(projectile) = state.registry.projectile_mut(id) else {
            continue;
        };
        projectile.advance(bolt.speed, dt);
        let pos = projectile.pos;

        // First asteroid in id order wins
        let hit = state
            .registry
            .asteroids_iter()
            .find(|a| {
                let circle = a.hit_circle();
                point_in_circle(pos, circle.center, circle.radius)
            })
            .map(|a| a.id);

        if let Some(asteroid_id) = hit {
            state.registry.remove_projectile(id);
            state.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Projectile,
                id,
            });
            let cue = if state.rng.random_bool(0.5) {
                HitCue::Primary
            } else {
                HitCue::Secondary
            };
            state.events.push(GameEvent::AsteroidHit { id: asteroid_id, cue });
            damage_asteroid(state, asteroid_id, bolt.damage);
            continue;
        }

        if viewport.is_outside(pos) {
            state.registry.remove_projectile(id);
            state.events.push(GameEvent::EntityRemoved {
                kind: EntityKind::Projectile,
                id,
            });
        }
    }
}

fn damage_asteroid(state: &mut GameState, id: EntityId, amount: i32) {
    let Some(asteroid) = state.registry.asteroid_mut(id) else {
        return;
    };
    let points = asteroid.score_value;
    let outcome = asteroid.apply_damage(amount);
    if outcome == DamageOutcome::Ignored {
        return;
    }
    state.events.push(GameEvent::HealthChanged {
        kind: EntityKind::Asteroid,
        id,
        health: asteroid.health,
    });
    if outcome == DamageOutcome::Destroyed {
        log::debug!("Asteroid {} destroyed by projectile", id);
        state.events.push(GameEvent::EntityDestroyed {
            kind: EntityKind::Asteroid,
            id,
        });
        state.add_score(points);
    }
}
