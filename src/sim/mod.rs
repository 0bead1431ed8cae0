//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-scaled timestep supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    Aabb, Circle, RotatedRect, Viewport, aabb_overlap, point_in_circle, rotated_rect_circle_collision,
    within_buffer,
};
pub use events::{EntityKind, GameEvent, HitCue};
pub use registry::{EntityId, EntityRegistry};
pub use spawn::{SpawnPolicy, Trajectory, compute_initial_trajectory, compute_offscreen_spawn, random_point_in};
pub use state::{Asteroid, DamageOutcome, GamePhase, GameState, Lifecycle, Projectile, Ship, Thrust};
pub use tick::{TickInput, step};
