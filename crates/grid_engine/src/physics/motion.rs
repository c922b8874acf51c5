//! Motion resolution
//!
//! Moves every entity carrying a [`Movement`] component, resolving
//! collisions as it goes. Entities are processed in creation order, so a
//! frame is deterministic for a given world state.
//!
//! Colliding entities move by a swept test: each axis is stepped in whole
//! units and every candidate placement is tested before being committed,
//! so a mover can never end a frame overlapping something that blocks it.
//! The X axis is resolved first against the entity's original Y, then the
//! Y axis against the resolved X. That ordering is what makes an entity
//! pushed diagonally into a wall slide along it instead of stopping dead.
//!
//! When per-axis travel exceeds the configured threshold the sweep
//! switches to a coarse stepper that advances both axes a few units at a
//! time, keeping the number of overlap tests bounded for very fast
//! movers. Hitscan movers skip stepping entirely and resolve the whole
//! frame with one raycast.

use crate::core::CollisionConfig;
use crate::ecs::components::{CanMoveThroughDespiteCollision, Collider, Movement, Position};
use crate::ecs::{Entity, World};
use crate::foundation::logging::debug;
use crate::foundation::math::{IntegerSteps, Vec2};
use crate::geometry::WorldRect;
use crate::physics::events::MotionEvents;
use crate::physics::layers::{CollisionLayer, Layer};
use crate::physics::query::CollisionQuery;
use crate::physics::ray::Ray;

/// Runs the per-frame motion pass.
pub struct MotionResolver {
    config: CollisionConfig,
}

impl MotionResolver {
    /// Create a resolver with the given tunables.
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    /// The resolver's configuration.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Advance every moving entity by `dt` seconds.
    ///
    /// Rebuilds the spatial hash from the world, then resolves movers in
    /// creation order, keeping the hash current as each one lands. The
    /// returned report lists contacts, out-of-bounds entities and movers
    /// whose travel budget ran out; destroying them is the caller's call.
    pub fn update(
        &self,
        world: &mut World,
        query: &mut CollisionQuery,
        dt: f32,
    ) -> MotionEvents {
        query.reset_spatial_hash(world);
        let mut events = MotionEvents::new();

        let movers: Vec<Entity> = world
            .entities()
            .filter(|e| world.has::<Movement>(*e) && world.has::<Position>(*e))
            .collect();
        for entity in movers {
            let _ = self.resolve(world, query, entity, dt, &mut events);
        }

        self.relate_touching(world, query, &mut events);
        events
    }

    /// Relate resting contacts after all movers have settled.
    ///
    /// Probes each collidable's four one-unit-adjacent placements, so an
    /// entity standing flush against geometry keeps reporting the contact
    /// every frame even though its own sweep never runs.
    fn relate_touching(
        &self,
        world: &World,
        query: &mut CollisionQuery,
        events: &mut MotionEvents,
    ) {
        let collidables: Vec<Entity> = world
            .entities()
            .filter(|e| world.has::<Position>(*e) && world.has::<Collider>(*e))
            .collect();
        for entity in collidables {
            let (Some(&position), Some(&collider)) = (
                world.get::<Position>(entity),
                world.get::<Collider>(entity),
            ) else {
                continue;
            };
            query.clear_hits();
            let base = position.rounded_vec();
            for offset in [
                Vec2::new(1.0, 0.0),
                Vec2::new(-1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, -1.0),
            ] {
                let rect = collider.rect.world_rect(base + offset);
                let _ = query.check_collisions_aabb(world, entity, &rect);
            }
            let hits: Vec<Entity> = query.hits().collect();
            for hit in hits {
                events.record_touching(entity, hit);
            }
        }
    }

    /// Resolve one entity's motion for this frame.
    ///
    /// Returns the entity's new position, or `None` when it has no
    /// movement or position to resolve. Contacts and expiries land in
    /// `events`. The spatial hash must be current when this is called.
    pub fn resolve(
        &self,
        world: &mut World,
        query: &mut CollisionQuery,
        entity: Entity,
        dt: f32,
        events: &mut MotionEvents,
    ) -> Option<Position> {
        let (Some(&movement), Some(&position)) = (
            world.get::<Movement>(entity),
            world.get::<Position>(entity),
        ) else {
            return None;
        };
        let mut movement = movement;
        let old = position.as_vec();

        movement.apply_acceleration(dt);
        if movement.speed > 0.0 && movement.direction() != Vec2::zeros() {
            let displacement = movement.velocity() * dt;

            let new_raw = if movement.hitscan {
                self.resolve_hitscan(world, query, entity, position, displacement, events)
            } else if world.has::<Collider>(entity) {
                self.resolve_swept(world, query, entity, position, displacement, events)
            } else {
                let target = old + displacement;
                if movement.force_integer {
                    Vec2::new(target.x.round(), target.y.round())
                } else {
                    target
                }
            };
            world.set(entity, Position::from_vec(new_raw));

            movement.travelled += (new_raw - old).magnitude();
            if movement
                .max_distance
                .is_some_and(|max| movement.travelled >= max)
            {
                debug!("mover exceeded its travel distance, reporting as expired");
                events.expired.push(entity);
            }
        }

        movement.apply_damping(dt);
        world.set(entity, movement);

        let resolved = world.get::<Position>(entity).copied();
        if let Some(position) = resolved {
            if !self.bounds_with_margin().contains_point(position.as_vec()) {
                events.out_of_bounds.push(entity);
            }
        }
        resolved
    }

    /// Swept move for a colliding entity. Returns the new raw position.
    fn resolve_swept(
        &self,
        world: &World,
        query: &mut CollisionQuery,
        entity: Entity,
        position: Position,
        displacement: Vec2,
        events: &mut MotionEvents,
    ) -> Vec2 {
        let Some(&collider) = world.get::<Collider>(entity) else {
            return position.as_vec() + displacement;
        };
        let old_rect = collider.rect.world_rect(position.rounded_vec());
        let target = position.as_vec() + displacement;

        let start_x = position.x();
        let start_y = position.y();
        let end_x = target.x.round() as i32;
        let end_y = target.y.round() as i32;

        query.clear_hits();

        let span = (end_x - start_x).abs().max((end_y - start_y).abs());
        let (final_x, x_blocked, final_y, y_blocked) =
            if span as f32 > self.config.high_speed_threshold {
                self.coarse_sweep(
                    world, query, entity, collider, start_x, end_x, start_y, end_y, span,
                )
            } else {
                // X against the original Y, then Y against the resolved X.
                let (final_x, x_blocked) =
                    step_axis(world, query, entity, collider, start_x, end_x, 1, |x| {
                        Vec2::new(x as f32, start_y as f32)
                    });
                let (final_y, y_blocked) =
                    step_axis(world, query, entity, collider, start_y, end_y, 1, |y| {
                        Vec2::new(final_x as f32, y as f32)
                    });
                (final_x, x_blocked, final_y, y_blocked)
            };

        let hits: Vec<Entity> = query.hits().collect();
        for hit in hits {
            events.record_collision(entity, hit);
        }

        // A blocked axis lands on the last clear whole unit; a free axis
        // keeps its sub-unit remainder.
        let mut resolved = Position::from_vec(target);
        if x_blocked {
            resolved = resolved.with_x(final_x);
        }
        if y_blocked {
            resolved = resolved.with_y(final_y);
        }
        let new_raw = resolved.as_vec();

        let new_rect = collider
            .rect
            .world_rect(Vec2::new(new_raw.x.round(), new_raw.y.round()));
        let hash = query.spatial_hash_mut();
        hash.remove(entity, &old_rect);
        hash.insert(entity, new_rect);

        new_raw
    }

    /// Coarse sweep for very fast movers: both axes advance by a larger
    /// step each iteration, X before Y within the iteration.
    #[allow(clippy::too_many_arguments)]
    fn coarse_sweep(
        &self,
        world: &World,
        query: &mut CollisionQuery,
        entity: Entity,
        collider: Collider,
        start_x: i32,
        end_x: i32,
        start_y: i32,
        end_y: i32,
        span: i32,
    ) -> (i32, bool, i32, bool) {
        let step = (span as f32 / self.config.high_speed_threshold).ceil() as i32;
        let mut xs = IntegerSteps::with_step(start_x, end_x, step);
        let mut ys = IntegerSteps::with_step(start_y, end_y, step);

        let mut current_x = start_x;
        let mut current_y = start_y;
        let mut x_blocked = false;
        let mut y_blocked = false;

        loop {
            let next_x = if x_blocked { None } else { xs.next() };
            let next_y = if y_blocked { None } else { ys.next() };
            if next_x.is_none() && next_y.is_none() {
                break;
            }
            if let Some(x) = next_x {
                let rect = collider
                    .rect
                    .world_rect(Vec2::new(x as f32, current_y as f32));
                if query.check_collisions_aabb(world, entity, &rect) {
                    x_blocked = true;
                } else {
                    current_x = x;
                }
            }
            if let Some(y) = next_y {
                let rect = collider
                    .rect
                    .world_rect(Vec2::new(current_x as f32, y as f32));
                if query.check_collisions_aabb(world, entity, &rect) {
                    y_blocked = true;
                } else {
                    current_y = y;
                }
            }
        }

        (current_x, x_blocked, current_y, y_blocked)
    }

    /// Hitscan move: the whole frame resolves as one raycast.
    fn resolve_hitscan(
        &self,
        world: &World,
        query: &mut CollisionQuery,
        entity: Entity,
        position: Position,
        displacement: Vec2,
        events: &mut MotionEvents,
    ) -> Vec2 {
        let layer = world.get::<Layer>(entity).copied().unwrap_or_default();
        let move_through = world
            .get::<CanMoveThroughDespiteCollision>(entity)
            .map_or(CollisionLayer::NONE, |m| m.0);

        let ray = Ray::new(position.as_vec(), displacement);
        let result = query.raycast_vs_aabbs(world, Some(entity), ray, layer.collides_with, move_through);
        for hit in &result.hits {
            events.record_collision(entity, hit.entity);
        }

        if let Some(&collider) = world.get::<Collider>(entity) {
            let old_rect = collider.rect.world_rect(position.rounded_vec());
            let new_rect = collider
                .rect
                .world_rect(Vec2::new(result.stop.x.round(), result.stop.y.round()));
            let hash = query.spatial_hash_mut();
            hash.remove(entity, &old_rect);
            hash.insert(entity, new_rect);
        }

        result.stop
    }

    /// World rectangle grown by the out-of-bounds margin.
    fn bounds_with_margin(&self) -> WorldRect {
        let margin = self.config.bounds_margin;
        WorldRect::new(
            -margin,
            -margin,
            self.config.world_width as f32 + 2.0 * margin,
            self.config.world_height as f32 + 2.0 * margin,
        )
    }
}

/// Step one axis in whole units, committing each clear position.
///
/// Returns the last clear coordinate and whether the axis hit a block.
fn step_axis(
    world: &World,
    query: &mut CollisionQuery,
    entity: Entity,
    collider: Collider,
    from: i32,
    to: i32,
    step: i32,
    placement: impl Fn(i32) -> Vec2,
) -> (i32, bool) {
    let mut committed = from;
    for candidate in IntegerSteps::with_step(from, to, step) {
        let rect = collider.rect.world_rect(placement(candidate));
        if query.check_collisions_aabb(world, entity, &rect) {
            return (committed, true);
        }
        committed = candidate;
    }
    (committed, false)
}
