//! Collision layer definitions
//!
//! Layers are a bitmask, so an entity can live on several layers at once
//! and a query can look at several layers at once. Filtering is asymmetric:
//! whether A's query sees B depends only on A's `collides_with` mask and
//! B's `exists_on` mask, so B can be invisible to A while A stays visible
//! to B.

use bitflags::bitflags;

bitflags! {
    /// Bitmask of collision layers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// No layers
        const NONE = 0;
        /// Static level geometry (walls, floors)
        const LEVEL = 1 << 0;
        /// Any character, friendly or hostile
        const ACTOR = 1 << 1;
        /// The player character
        const PLAYER = 1 << 2;
        /// Hostile actors
        const ENEMY = 1 << 3;
        /// Player-fired projectiles
        const PLAYER_BULLET = 1 << 4;
        /// Enemy-fired projectiles
        const ENEMY_BULLET = 1 << 5;
        /// Items that can be picked up
        const PICKUP = 1 << 6;
        /// Entities that detection cones can see
        const DETECTABLE = 1 << 7;
        /// Every layer
        const ALL = u32::MAX;
    }
}

/// Layer assignment for a collidable entity.
///
/// `exists_on` is where the entity lives; `collides_with` is what its own
/// queries look at. An entity with an empty `collides_with` still blocks
/// and appears in other entities' queries through its `exists_on` mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    /// Layers this entity occupies
    pub exists_on: CollisionLayer,
    /// Layers this entity's queries test against
    pub collides_with: CollisionLayer,
}

impl Layer {
    /// Create a layer assignment.
    pub fn new(exists_on: CollisionLayer, collides_with: CollisionLayer) -> Self {
        Self {
            exists_on,
            collides_with,
        }
    }

    /// Whether a query carrying this assignment registers `other`.
    pub fn interacts_with(&self, other: &Layer) -> bool {
        self.collides_with.intersects(other.exists_on)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            exists_on: CollisionLayer::NONE,
            collides_with: CollisionLayer::NONE,
        }
    }
}

impl crate::ecs::Component for Layer {}
