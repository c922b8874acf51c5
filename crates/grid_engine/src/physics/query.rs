//! Broad- and narrow-phase collision queries
//!
//! [`CollisionQuery`] owns the spatial hash and the per-frame scratch
//! state of the collision pass. Two queries are offered: an AABB overlap
//! test used by the sweep at every candidate position, and a raycast that
//! walks the grid and resolves everything a ray touches.
//!
//! Both queries filter by layer mask: a hit registers only when the
//! querying entity's `collides_with` mask overlaps the other entity's
//! `exists_on` mask. A registered hit blocks unless the querying entity's
//! move-through override covers the other entity's layers.

use crate::core::CollisionConfig;
use crate::ecs::components::{CanMoveThroughDespiteCollision, Collider, Position};
use crate::ecs::{Entity, World};
use crate::foundation::logging::trace;
use crate::foundation::math::Vec2;
use crate::geometry::WorldRect;
use crate::physics::layers::{CollisionLayer, Layer};
use crate::physics::ray::Ray;
use crate::spatial::SpatialHash;
use std::collections::{HashMap, HashSet};

/// Callback invoked for every resolved raycast, with the ray and the
/// point it stopped at. Hook for debug visualization.
pub type RayObserver = Box<dyn FnMut(&Ray, Vec2) + Send>;

/// One entity touched by a raycast, with the point the ray met it at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// The entity the ray touched
    pub entity: Entity,
    /// Where the ray met the entity's collision box
    pub point: Vec2,
}

/// Outcome of a raycast.
#[derive(Debug, Clone, PartialEq)]
pub struct RaycastResult {
    /// Touched entities no farther than the blocker, nearest first
    pub hits: Vec<RaycastHit>,
    /// The nearest entity that blocks the ray, if any
    pub blocker: Option<RaycastHit>,
    /// Where the ray stopped: the blocker's hit point, or the ray's end
    pub stop: Vec2,
}

/// Spatial hash plus the scratch state of one frame's collision queries.
pub struct CollisionQuery {
    hash: SpatialHash,
    hit_entities: HashSet<Entity>,
    raycast_scratch: HashMap<Entity, Vec2>,
    ray_observer: Option<RayObserver>,
}

impl CollisionQuery {
    /// Create a query context over an empty grid.
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            hash: SpatialHash::new(config),
            hit_entities: HashSet::new(),
            raycast_scratch: HashMap::new(),
            ray_observer: None,
        }
    }

    /// The underlying grid.
    pub fn spatial_hash(&self) -> &SpatialHash {
        &self.hash
    }

    /// Mutable access to the grid, for in-place updates during motion.
    pub fn spatial_hash_mut(&mut self) -> &mut SpatialHash {
        &mut self.hash
    }

    /// Install a callback observing every resolved raycast.
    pub fn set_ray_observer(&mut self, observer: RayObserver) {
        self.ray_observer = Some(observer);
    }

    /// Rebuild the grid from every entity carrying a position and collider.
    ///
    /// Called once at the start of a frame; the motion pass then keeps the
    /// grid current as entities move.
    pub fn reset_spatial_hash(&mut self, world: &World) {
        self.hash.clear();
        for entity in world.entities() {
            let (Some(position), Some(collider)) = (
                world.get::<Position>(entity),
                world.get::<Collider>(entity),
            ) else {
                continue;
            };
            self.hash
                .insert(entity, collider.rect.world_rect(position.rounded_vec()));
        }
    }

    /// Entities registered as hit since the last [`Self::clear_hits`].
    pub fn hits(&self) -> impl Iterator<Item = Entity> + '_ {
        self.hit_entities.iter().copied()
    }

    /// Forget registered hits. Called per moving entity per frame.
    pub fn clear_hits(&mut self) {
        self.hit_entities.clear();
    }

    /// Test `rect` (a candidate placement of `entity`) against the grid.
    ///
    /// Returns whether the placement is blocked. Every layer-matching
    /// overlap registers as a hit whether it blocks or not, and blocking
    /// is sticky: one blocking contact blocks the placement no matter how
    /// many passable contacts surround it.
    pub fn check_collisions_aabb(
        &mut self,
        world: &World,
        entity: Entity,
        rect: &WorldRect,
    ) -> bool {
        let layer = world.get::<Layer>(entity).copied().unwrap_or_default();
        let move_through = world
            .get::<CanMoveThroughDespiteCollision>(entity)
            .map_or(CollisionLayer::NONE, |m| m.0);

        let Self {
            hash, hit_entities, ..
        } = self;

        let mut blocked = false;
        for (other, other_rect) in hash.retrieve(entity, rect) {
            let other_layer = world.get::<Layer>(*other).copied().unwrap_or_default();
            if !layer.collides_with.intersects(other_layer.exists_on) {
                continue;
            }
            if !rect.intersects(other_rect) {
                continue;
            }
            hit_entities.insert(*other);
            if !move_through.intersects(other_layer.exists_on) {
                blocked = true;
            }
        }
        blocked
    }

    /// Resolve a ray against every collider in the world.
    ///
    /// The grid is walked cell by cell; cells the ray misses are rejected
    /// with a single slab test before their contents are looked at. An
    /// entity spanning several cells is resolved once, keeping its nearest
    /// intersection point.
    ///
    /// Hits beyond the nearest blocking entity are discarded, so the hit
    /// list is exactly what the ray touched before stopping.
    ///
    /// A zero-displacement ray is degenerate and reports nothing, even
    /// when its origin lies inside a collider.
    pub fn raycast_vs_aabbs(
        &mut self,
        world: &World,
        source: Option<Entity>,
        ray: Ray,
        collides_with: CollisionLayer,
        move_through: CollisionLayer,
    ) -> RaycastResult {
        self.raycast_scratch.clear();
        if ray.displacement == Vec2::zeros() {
            return RaycastResult {
                hits: Vec::new(),
                blocker: None,
                stop: ray.origin,
            };
        }

        for row in 0..self.hash.rows() {
            for col in 0..self.hash.cols() {
                if self.hash.cell(row, col).is_empty() {
                    continue;
                }
                if !ray.intersects(&self.hash.cell_bounds(row, col)) {
                    continue;
                }
                for (entity, rect) in self.hash.cell(row, col) {
                    if source == Some(*entity) {
                        continue;
                    }
                    let other_layer = world.get::<Layer>(*entity).copied().unwrap_or_default();
                    if !collides_with.intersects(other_layer.exists_on) {
                        continue;
                    }
                    let Some(point) = ray.intersection_point(rect) else {
                        continue;
                    };
                    // Keep the nearest intersection when the entity shows
                    // up in more than one cell.
                    let dist = (point - ray.origin).magnitude_squared();
                    self.raycast_scratch
                        .entry(*entity)
                        .and_modify(|best| {
                            if dist < (*best - ray.origin).magnitude_squared() {
                                *best = point;
                            }
                        })
                        .or_insert(point);
                }
            }
        }

        let mut blocker: Option<RaycastHit> = None;
        let mut blocker_dist = f32::INFINITY;
        for (&entity, &point) in &self.raycast_scratch {
            let other_layer = world.get::<Layer>(entity).copied().unwrap_or_default();
            if move_through.intersects(other_layer.exists_on) {
                continue;
            }
            let dist = (point - ray.origin).magnitude_squared();
            // Equidistant blockers resolve by entity key, independent of
            // map iteration order.
            let closer = match &blocker {
                None => true,
                Some(best) => {
                    dist < blocker_dist || (dist == blocker_dist && entity < best.entity)
                }
            };
            if closer {
                blocker_dist = dist;
                blocker = Some(RaycastHit { entity, point });
            }
        }

        let mut hits: Vec<RaycastHit> = self
            .raycast_scratch
            .iter()
            .map(|(&entity, &point)| RaycastHit { entity, point })
            .filter(|hit| (hit.point - ray.origin).magnitude_squared() <= blocker_dist)
            .collect();
        hits.sort_by(|a, b| {
            let da = (a.point - ray.origin).magnitude_squared();
            let db = (b.point - ray.origin).magnitude_squared();
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.entity.cmp(&b.entity))
        });

        let stop = blocker.map_or_else(|| ray.end(), |b| b.point);
        trace!("raycast resolved {} hits", hits.len());

        if let Some(observer) = &mut self.ray_observer {
            observer(&ray, stop);
        }

        RaycastResult {
            hits,
            blocker,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn setup() -> (World, CollisionQuery) {
        (World::new(), CollisionQuery::new(&CollisionConfig::default()))
    }

    fn spawn_box(world: &mut World, x: f32, y: f32, w: i32, h: i32, layer: Layer) -> Entity {
        let e = world.create_entity();
        world.set(e, Position::new(x, y));
        world.set(e, Collider::new(Rect::new(0, 0, w, h)));
        world.set(e, layer);
        e
    }

    fn wall_layer() -> Layer {
        Layer::new(CollisionLayer::LEVEL, CollisionLayer::NONE)
    }

    fn player_layer() -> Layer {
        Layer::new(CollisionLayer::PLAYER, CollisionLayer::LEVEL | CollisionLayer::PICKUP)
    }

    #[test]
    fn test_overlap_with_wall_blocks() {
        let (mut world, mut query) = setup();
        spawn_box(&mut world, 100.0, 100.0, 32, 32, wall_layer());
        let player = spawn_box(&mut world, 0.0, 0.0, 16, 16, player_layer());
        query.reset_spatial_hash(&world);

        let overlapping = WorldRect::new(90.0, 90.0, 16.0, 16.0);
        assert!(query.check_collisions_aabb(&world, player, &overlapping));

        let clear = WorldRect::new(0.0, 0.0, 16.0, 16.0);
        query.clear_hits();
        assert!(!query.check_collisions_aabb(&world, player, &clear));
        assert_eq!(query.hits().count(), 0);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let (mut world, mut query) = setup();
        spawn_box(&mut world, 100.0, 100.0, 48, 48, wall_layer());
        spawn_box(&mut world, 10.0, 10.0, 16, 16, wall_layer());

        query.reset_spatial_hash(&world);
        let first: Vec<usize> = (0..query.spatial_hash().rows())
            .flat_map(|r| (0..query.spatial_hash().cols()).map(move |c| (r, c)))
            .map(|(r, c)| query.spatial_hash().cell(r, c).len())
            .collect();

        query.reset_spatial_hash(&world);
        let second: Vec<usize> = (0..query.spatial_hash().rows())
            .flat_map(|r| (0..query.spatial_hash().cols()).map(move |c| (r, c)))
            .map(|(r, c)| query.spatial_hash().cell(r, c).len())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_layer_filtering_skips_unmatched() {
        let (mut world, mut query) = setup();
        // An enemy the player's mask does not look at.
        spawn_box(
            &mut world,
            100.0,
            100.0,
            32,
            32,
            Layer::new(CollisionLayer::ENEMY, CollisionLayer::NONE),
        );
        let player = spawn_box(&mut world, 0.0, 0.0, 16, 16, player_layer());
        query.reset_spatial_hash(&world);

        let overlapping = WorldRect::new(90.0, 90.0, 16.0, 16.0);
        assert!(!query.check_collisions_aabb(&world, player, &overlapping));
        assert_eq!(query.hits().count(), 0);
    }

    #[test]
    fn test_move_through_registers_but_does_not_block() {
        let (mut world, mut query) = setup();
        let pickup = spawn_box(
            &mut world,
            100.0,
            100.0,
            16,
            16,
            Layer::new(CollisionLayer::PICKUP, CollisionLayer::NONE),
        );
        let player = spawn_box(&mut world, 0.0, 0.0, 16, 16, player_layer());
        world.set(
            player,
            CanMoveThroughDespiteCollision(CollisionLayer::PICKUP),
        );
        query.reset_spatial_hash(&world);

        let overlapping = WorldRect::new(95.0, 95.0, 16.0, 16.0);
        assert!(!query.check_collisions_aabb(&world, player, &overlapping));
        assert_eq!(query.hits().collect::<Vec<_>>(), vec![pickup]);
    }

    #[test]
    fn test_blocking_is_sticky_across_contacts() {
        let (mut world, mut query) = setup();
        // A passable pickup and a blocking wall under the same placement.
        spawn_box(
            &mut world,
            100.0,
            100.0,
            16,
            16,
            Layer::new(CollisionLayer::PICKUP, CollisionLayer::NONE),
        );
        spawn_box(&mut world, 104.0, 100.0, 16, 16, wall_layer());
        let player = spawn_box(&mut world, 0.0, 0.0, 16, 16, player_layer());
        world.set(
            player,
            CanMoveThroughDespiteCollision(CollisionLayer::PICKUP),
        );
        query.reset_spatial_hash(&world);

        let overlapping = WorldRect::new(95.0, 95.0, 16.0, 16.0);
        assert!(query.check_collisions_aabb(&world, player, &overlapping));
        assert_eq!(query.hits().count(), 2);
    }

    #[test]
    fn test_raycast_stops_at_nearest_blocker() {
        let (mut world, mut query) = setup();
        let near = spawn_box(&mut world, 50.0, -5.0, 10, 10, wall_layer());
        let far = spawn_box(&mut world, 80.0, -5.0, 10, 10, wall_layer());
        query.reset_spatial_hash(&world);

        let ray = Ray::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let result = query.raycast_vs_aabbs(
            &world,
            None,
            ray,
            CollisionLayer::LEVEL,
            CollisionLayer::NONE,
        );

        let blocker = result.blocker.unwrap();
        assert_eq!(blocker.entity, near);
        assert!((blocker.point.x - 50.0).abs() < 1e-4);
        assert_eq!(result.stop, blocker.point);

        // The far wall is behind the blocker and must not be reported.
        assert_eq!(result.hits.len(), 1);
        assert!(result.hits.iter().all(|h| h.entity != far));
    }

    #[test]
    fn test_zero_vector_raycast_reports_nothing() {
        let (mut world, mut query) = setup();
        spawn_box(&mut world, 0.0, 0.0, 32, 32, wall_layer());
        query.reset_spatial_hash(&world);

        // Origin inside the wall's box; a degenerate ray still sees nothing.
        let ray = Ray::new(Vec2::new(5.0, 5.0), Vec2::zeros());
        let result = query.raycast_vs_aabbs(
            &world,
            None,
            ray,
            CollisionLayer::LEVEL,
            CollisionLayer::NONE,
        );

        assert!(result.hits.is_empty());
        assert!(result.blocker.is_none());
        assert_eq!(result.stop, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_equidistant_blockers_resolve_by_entity_key() {
        let (mut world, mut query) = setup();
        // Two walls whose near faces sit at the same x; the grazing ray
        // meets both at exactly (50, 0).
        let first = spawn_box(&mut world, 50.0, -5.0, 10, 5, wall_layer());
        let second = spawn_box(&mut world, 50.0, 0.0, 10, 5, wall_layer());
        query.reset_spatial_hash(&world);

        let ray = Ray::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let result = query.raycast_vs_aabbs(
            &world,
            None,
            ray,
            CollisionLayer::LEVEL,
            CollisionLayer::NONE,
        );

        assert_eq!(result.blocker.unwrap().entity, first);
        assert_eq!(result.hits[0].entity, first);
        assert_eq!(result.hits[1].entity, second);
    }

    #[test]
    fn test_raycast_passes_through_override_layers() {
        let (mut world, mut query) = setup();
        let ghost = spawn_box(
            &mut world,
            30.0,
            -5.0,
            10,
            10,
            Layer::new(CollisionLayer::DETECTABLE, CollisionLayer::NONE),
        );
        let wall = spawn_box(&mut world, 70.0, -5.0, 10, 10, wall_layer());
        query.reset_spatial_hash(&world);

        let ray = Ray::new(Vec2::zeros(), Vec2::new(200.0, 0.0));
        let result = query.raycast_vs_aabbs(
            &world,
            None,
            ray,
            CollisionLayer::LEVEL | CollisionLayer::DETECTABLE,
            CollisionLayer::DETECTABLE,
        );

        // Both are touched, in near-to-far order, and the wall stops the ray.
        assert_eq!(result.hits.len(), 2);
        assert_eq!(result.hits[0].entity, ghost);
        assert_eq!(result.hits[1].entity, wall);
        assert_eq!(result.blocker.unwrap().entity, wall);
    }

    #[test]
    fn test_raycast_miss_reaches_ray_end() {
        let (mut world, mut query) = setup();
        spawn_box(&mut world, 50.0, 200.0, 10, 10, wall_layer());
        query.reset_spatial_hash(&world);

        let ray = Ray::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let result = query.raycast_vs_aabbs(
            &world,
            None,
            ray,
            CollisionLayer::LEVEL,
            CollisionLayer::NONE,
        );

        assert!(result.hits.is_empty());
        assert!(result.blocker.is_none());
        assert_eq!(result.stop, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_raycast_resolves_spanning_entity_once() {
        let (mut world, mut query) = setup();
        // A wall spanning five grid cells along the ray.
        let wall = spawn_box(&mut world, 64.0, -5.0, 160, 10, wall_layer());
        query.reset_spatial_hash(&world);

        let ray = Ray::new(Vec2::zeros(), Vec2::new(400.0, 0.0));
        let result = query.raycast_vs_aabbs(
            &world,
            None,
            ray,
            CollisionLayer::LEVEL,
            CollisionLayer::NONE,
        );

        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].entity, wall);
        assert!((result.hits[0].point.x - 64.0).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_excludes_source_entity() {
        let (mut world, mut query) = setup();
        let shooter = spawn_box(&mut world, 0.0, -5.0, 10, 10, wall_layer());
        query.reset_spatial_hash(&world);

        let ray = Ray::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        let result = query.raycast_vs_aabbs(
            &world,
            Some(shooter),
            ray,
            CollisionLayer::ALL,
            CollisionLayer::NONE,
        );
        assert!(result.hits.is_empty());
    }

    #[test]
    fn test_ray_observer_sees_stop_point() {
        use std::sync::{Arc, Mutex};

        let (mut world, mut query) = setup();
        spawn_box(&mut world, 50.0, -5.0, 10, 10, wall_layer());
        query.reset_spatial_hash(&world);

        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        query.set_ray_observer(Box::new(move |_, stop| {
            sink.lock().unwrap().push(stop);
        }));

        let ray = Ray::new(Vec2::zeros(), Vec2::new(100.0, 0.0));
        query.raycast_vs_aabbs(&world, None, ray, CollisionLayer::LEVEL, CollisionLayer::NONE);

        let observed = observed.lock().unwrap();
        assert_eq!(observed.len(), 1);
        assert!((observed[0].x - 50.0).abs() < 1e-4);
    }
}
