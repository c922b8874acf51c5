//! Collision events and per-frame motion reports

use crate::ecs::Entity;
use std::collections::HashSet;

/// An unordered pair of colliding entities.
///
/// Stored smaller key first, so the pair A-B and the pair B-A compare and
/// hash identically and a contact discovered from both sides is reported
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// The smaller of the two entity keys
    pub first: Entity,
    /// The larger of the two entity keys
    pub second: Entity,
}

impl CollisionPair {
    /// Create a pair, normalizing the order of the two entities.
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Whether the pair involves the given entity.
    pub fn involves(&self, entity: Entity) -> bool {
        self.first == entity || self.second == entity
    }

    /// The pair member that is not `entity`, if `entity` is a member.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.first == entity {
            Some(self.second)
        } else if self.second == entity {
            Some(self.first)
        } else {
            None
        }
    }
}

/// Everything a motion pass wants to tell the caller about one frame.
#[derive(Debug, Default)]
pub struct MotionEvents {
    /// Contacts registered during movement, deduplicated per pair
    pub collisions: HashSet<CollisionPair>,
    /// Pairs resting within one unit of each other after resolution;
    /// reported every frame the contact persists, moving or not
    pub touching: HashSet<CollisionPair>,
    /// Entities that left the world rectangle plus margin this frame
    pub out_of_bounds: Vec<Entity>,
    /// Entities that travelled past their maximum distance this frame
    pub expired: Vec<Entity>,
}

impl MotionEvents {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contact between two entities.
    pub fn record_collision(&mut self, a: Entity, b: Entity) {
        self.collisions.insert(CollisionPair::new(a, b));
    }

    /// Record two entities resting in contact.
    pub fn record_touching(&mut self, a: Entity, b: Entity) {
        self.touching.insert(CollisionPair::new(a, b));
    }

    /// Contacts involving `entity` this frame.
    pub fn collisions_of(&self, entity: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.collisions
            .iter()
            .filter_map(move |pair| pair.other(entity))
    }

    /// Forget everything, keeping allocations.
    pub fn clear(&mut self) {
        self.collisions.clear();
        self.touching.clear();
        self.out_of_bounds.clear();
        self.expired.clear();
    }
}
