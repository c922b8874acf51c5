//! Vision cones
//!
//! An observer with a [`DetectionCone`] sees by casting a fan of rays
//! across its cone, one ray per configured angular step. Each ray stops
//! at the first entity that blocks sight, so anything behind a wall stays
//! unseen; entities marked [`CanBeDetected`] that a ray touches before
//! stopping are seen.
//!
//! The ray stop points double as the vertices of the cone's visibility
//! polygon, in sweep order, ready for rendering a light or vision shape.
//!
//! Reports hold one frame's sightings only; remembering a target after it
//! breaks line of sight is the caller's job.

use crate::core::CollisionConfig;
use crate::ecs::components::{CanBeDetected, DetectionCone, Position};
use crate::ecs::{Entity, World};
use crate::foundation::math::{angle_from_unit_vector, unit_vector_from_angle, Vec2};
use crate::physics::layers::CollisionLayer;
use crate::physics::query::CollisionQuery;
use crate::physics::ray::Ray;
use std::collections::HashSet;

/// What one observer saw this frame.
#[derive(Debug, Clone)]
pub struct ConeView {
    /// The observing entity
    pub observer: Entity,
    /// Visibility polygon vertices: the observer's position followed by
    /// every ray's stop point in sweep order
    pub vertices: Vec<Vec2>,
    /// Detectable entities with a clear line of sight to the observer
    pub detected: HashSet<Entity>,
}

/// Casts every observer's vision cone.
pub struct DetectionSystem {
    angle_step: f32,
}

impl DetectionSystem {
    /// Create a detection system with the configured ray density.
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            angle_step: config.detection_angle_step,
        }
    }

    /// Cast every cone in the world against the current spatial hash.
    ///
    /// Expects the hash to be up to date, so this runs after the frame's
    /// motion pass. Observers are reported in creation order.
    pub fn update(&self, world: &World, query: &mut CollisionQuery) -> Vec<ConeView> {
        let observers: Vec<Entity> = world
            .entities()
            .filter(|e| world.has::<DetectionCone>(*e) && world.has::<Position>(*e))
            .collect();

        observers
            .into_iter()
            .map(|observer| self.cast_cone(world, query, observer))
            .collect()
    }

    fn cast_cone(
        &self,
        world: &World,
        query: &mut CollisionQuery,
        observer: Entity,
    ) -> ConeView {
        let origin = world
            .get::<Position>(observer)
            .map_or_else(Vec2::zeros, |p| p.as_vec());
        let cone = world
            .get::<DetectionCone>(observer)
            .copied()
            .unwrap_or_else(|| DetectionCone::new(0.0, 0.0, Vec2::new(1.0, 0.0)));

        let facing = angle_from_unit_vector(cone.facing);
        let mut vertices = vec![origin];
        let mut detected = HashSet::new();

        // Sweep from one cone edge to the other, landing exactly on both
        // edges regardless of how the step divides the opening angle.
        let ray_count = (2.0 * cone.half_angle / self.angle_step).ceil() as usize;
        for i in 0..=ray_count {
            let offset = (-cone.half_angle + i as f32 * self.angle_step).min(cone.half_angle);
            let direction = unit_vector_from_angle(facing + offset);
            let ray = Ray::from_direction(origin, direction, cone.max_distance);

            let result = query.raycast_vs_aabbs(
                world,
                Some(observer),
                ray,
                CollisionLayer::LEVEL | CollisionLayer::DETECTABLE,
                CollisionLayer::DETECTABLE,
            );
            vertices.push(result.stop);
            for hit in &result.hits {
                if world.has::<CanBeDetected>(hit.entity) {
                    detected.insert(hit.entity);
                }
            }
        }

        ConeView {
            observer,
            vertices,
            detected,
        }
    }
}
