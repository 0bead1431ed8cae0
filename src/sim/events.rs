//! Typed notifications emitted by the simulation step.
//!
//! Presentation and audio layers drain these after each step instead of
//! being called back from inside entity code.

use serde::{Deserialize, Serialize};

use super::registry::EntityId;
use super::state::GamePhase;

/// Which registry an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Asteroid,
    Projectile,
}

/// Which of the two asteroid impact sounds to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCue {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    EntitySpawned { kind: EntityKind, id: EntityId },
    /// A weapon port discharged and created `projectile`
    ShipFired { port: usize, projectile: EntityId },
    /// Destruction began; the entity plays its destruction sequence
    EntityDestroyed { kind: EntityKind, id: EntityId },
    /// The entity left its registry (hit, evicted or finished destroying)
    EntityRemoved { kind: EntityKind, id: EntityId },
    HealthChanged { kind: EntityKind, id: EntityId, health: i32 },
    ScoreChanged { score: u64 },
    AsteroidHit { id: EntityId, cue: HitCue },
    ShieldToggled { active: bool },
    EnginesToggled { active: bool },
    /// Terminal summary should be shown (emitted once per death)
    GameOverShown { score: u64 },
}
