//! Entity collections
//!
//! Removal is always mark-then-compact so iteration never skips or repeats a
//! neighbour of a removed entity.

use serde::{Deserialize, Serialize};

use super::state::{Boss, Enemy, EntityId, Pickup, Projectile};

/// Remove and return every element matching `pred`, keeping the rest in order
pub fn extract_where<T>(items: &mut Vec<T>, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
    let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(items).into_iter().partition(|t| pred(t));
    *items = kept;
    removed
}

/// Owner of every transient entity in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    /// Player bullets
    pub bullets: Vec<Projectile>,
    /// Boss projectiles
    pub fireballs: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub bosses: Vec<Boss>,
    pub pickups: Vec<Pickup>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            bullets: Vec::new(),
            fireballs: Vec::new(),
            enemies: Vec::new(),
            bosses: Vec::new(),
            pickups: Vec::new(),
            next_id: 1,
        }
    }
}

impl EntityRegistry {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn has_boss(&self) -> bool {
        !self.bosses.is_empty()
    }

    /// Level-transition wipe: hostiles and every projectile in flight
    pub fn clear_hostiles(&mut self) {
        self.enemies.clear();
        self.bosses.clear();
        self.fireballs.clear();
        self.bullets.clear();
    }

    /// Drop entities that left the playfield. Returns how many were removed.
    pub fn cull_offscreen(&mut self, width: f32, height: f32) -> usize {
        let before = self.total();
        self.bullets.retain(|b| {
            b.pos.y >= -10.0 && b.pos.y <= height + 10.0 && b.pos.x >= -10.0 && b.pos.x <= width + 10.0
        });
        self.enemies.retain(|e| e.pos.y <= height + 50.0);
        self.fireballs.retain(|f| f.pos.y <= height + 20.0);
        self.pickups.retain(|p| p.pos.y <= height + 20.0);
        before - self.total()
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bullets.sort_by_key(|b| b.id);
        self.fireballs.sort_by_key(|f| f.id);
        self.enemies.sort_by_key(|e| e.id);
        self.bosses.sort_by_key(|b| b.id);
        self.pickups.sort_by_key(|p| p.id);
    }

    pub fn total(&self) -> usize {
        self.bullets.len() + self.fireballs.len() + self.enemies.len() + self.bosses.len() + self.pickups.len()
    }
}
