//! Entity registry
//!
//! Owns every live entity. Asteroids and projectiles are keyed by a
//! generated [`EntityId`]; the ship occupies a single optional slot.
//! Storage is ordered by id so iteration is stable from run to run.
//!
//! Passes that remove entities while iterating take a snapshot of the ids
//! first (`asteroid_ids`, `projectile_ids`) and re-resolve each id against
//! the live maps, skipping entries removed earlier in the same pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::{Asteroid, Projectile, Ship};

/// Unique identifier shared across entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    ship: Option<Ship>,
    asteroids: BTreeMap<EntityId, Asteroid>,
    projectiles: BTreeMap<EntityId, Projectile>,
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            ship: None,
            asteroids: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // --- Ship ---

    pub fn set_ship(&mut self, ship: Ship) {
        self.ship = Some(ship);
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship.as_ref()
    }

    pub fn ship_mut(&mut self) -> Option<&mut Ship> {
        self.ship.as_mut()
    }

    // --- Asteroids ---

    /// Insert an asteroid. Returns false (and keeps the existing entry) if
    /// the id is already registered.
    pub fn add_asteroid(&mut self, asteroid: Asteroid) -> bool {
        if self.asteroids.contains_key(&asteroid.id) {
            return false;
        }
        self.asteroids.insert(asteroid.id, asteroid);
        true
    }

    /// Remove an asteroid; removing an unknown id is a no-op
    pub fn remove_asteroid(&mut self, id: EntityId) -> Option<Asteroid> {
        self.asteroids.remove(&id)
    }

    /// Drop every asteroid, returning the ids that were removed
    pub fn remove_all_asteroids(&mut self) -> Vec<EntityId> {
        let ids = self.asteroid_ids();
        self.asteroids.clear();
        ids
    }

    pub fn asteroid(&self, id: EntityId) -> Option<&Asteroid> {
        self.asteroids.get(&id)
    }

    pub fn asteroid_mut(&mut self, id: EntityId) -> Option<&mut Asteroid> {
        self.asteroids.get_mut(&id)
    }

    /// Snapshot of asteroid ids in ascending order
    pub fn asteroid_ids(&self) -> Vec<EntityId> {
        self.asteroids.keys().copied().collect()
    }

    /// Copy of every live asteroid (for drawing)
    pub fn asteroids(&self) -> Vec<Asteroid> {
        self.asteroids.values().cloned().collect()
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids.len()
    }

    pub(crate) fn asteroids_iter(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.values()
    }

    // --- Projectiles ---

    /// Insert a projectile. First write wins on duplicate ids.
    pub fn add_projectile(&mut self, projectile: Projectile) -> bool {
        if self.projectiles.contains_key(&projectile.id) {
            return false;
        }
        self.projectiles.insert(projectile.id, projectile);
        true
    }

    pub fn remove_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    pub fn remove_all_projectiles(&mut self) -> Vec<EntityId> {
        let ids = self.projectile_ids();
        self.projectiles.clear();
        ids
    }

    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    pub fn projectile_ids(&self) -> Vec<EntityId> {
        self.projectiles.keys().copied().collect()
    }

    pub fn projectiles(&self) -> Vec<Projectile> {
        self.projectiles.values().cloned().collect()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }
}
