//! Collision-related components

use crate::ecs::Component;
use crate::foundation::math::{safe_normalize, Vec2};
use crate::geometry::Rect;
use crate::physics::layers::CollisionLayer;

/// Axis-aligned collision box attached to an entity.
///
/// The rectangle is in local space, relative to the entity's rounded
/// integer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    /// Local-space collision rectangle
    pub rect: Rect,
}

impl Collider {
    /// Create a collider from a local-space rectangle.
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Collider centered on the entity origin.
    pub fn centered(width: i32, height: i32) -> Self {
        Self {
            rect: Rect::new(-width / 2, -height / 2, width, height),
        }
    }
}

impl Component for Collider {}

/// Layers whose collisions register but do not block this entity's motion.
///
/// During a sweep, a contact with another entity blocks movement unless
/// the contact's `exists_on` mask overlaps this override. Overridden
/// contacts are still reported as collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanMoveThroughDespiteCollision(pub CollisionLayer);

impl Default for CanMoveThroughDespiteCollision {
    fn default() -> Self {
        Self(CollisionLayer::NONE)
    }
}

impl Component for CanMoveThroughDespiteCollision {}

/// Marker making an entity visible to detection cones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanBeDetected;

impl Component for CanBeDetected {}

/// Vision cone for an observer entity.
///
/// The cone opens `half_angle` radians to each side of the entity's
/// facing and reaches `max_distance` world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionCone {
    /// Half the cone's opening angle, in radians
    pub half_angle: f32,
    /// How far the cone reaches, in world units
    pub max_distance: f32,
    /// Unit facing direction of the observer
    pub facing: Vec2,
}

impl DetectionCone {
    /// Create a cone facing along `facing`.
    pub fn new(half_angle: f32, max_distance: f32, facing: Vec2) -> Self {
        Self {
            half_angle,
            max_distance,
            facing: safe_normalize(facing),
        }
    }

    /// Point the cone along a new direction.
    pub fn set_facing(&mut self, facing: Vec2) {
        self.facing = safe_normalize(facing);
    }
}

impl Component for DetectionCone {}
