//! # Grid Engine
//!
//! Collision and motion core for real-time 2D action games.
//!
//! ## Features
//!
//! - **Spatial Hash**: uniform-grid broad phase over a fixed world rectangle
//! - **Swept Motion**: integer-stepped AABB sweeps that never tunnel, with
//!   wall sliding and a coarse mode for very fast movers
//! - **Raycasts**: slab-method ray versus AABB with layer filtering
//! - **Layer Masks**: asymmetric `exists_on` / `collides_with` filtering,
//!   plus per-entity move-through overrides
//! - **Detection Cones**: fan-of-rays vision with visibility polygons
//!
//! ## Quick Start
//!
//! ```rust
//! use grid_engine::prelude::*;
//!
//! let config = CollisionConfig::default();
//! let mut world = World::new();
//! let mut query = CollisionQuery::new(&config);
//! let resolver = MotionResolver::new(config);
//!
//! let wall = world.create_entity();
//! world.set(wall, Position::new(64.0, 0.0));
//! world.set(wall, Collider::new(Rect::new(0, 0, 32, 32)));
//! world.set(wall, Layer::new(CollisionLayer::LEVEL, CollisionLayer::NONE));
//!
//! let player = world.create_entity();
//! world.set(player, Position::new(0.0, 8.0));
//! world.set(player, Collider::new(Rect::new(0, 0, 16, 16)));
//! world.set(player, Layer::new(CollisionLayer::PLAYER, CollisionLayer::LEVEL));
//! world.set(player, Movement::with_velocity(Vec2::new(1.0, 0.0), 120.0));
//!
//! // One full second of travel: the player sweeps up to the wall and
//! // stops flush against it.
//! let events = resolver.update(&mut world, &mut query, 1.0);
//! assert_eq!(world.get::<Position>(player).unwrap().x(), 48);
//! assert!(!events.collisions.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod ecs;
pub mod foundation;
pub mod geometry;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{CollisionConfig, ConfigError},
        ecs::{
            components::{
                CanBeDetected, CanMoveThroughDespiteCollision, Collider, DetectionCone, Movement,
                Position,
            },
            Component, Entity, World,
        },
        foundation::math::Vec2,
        geometry::{Rect, WorldRect},
        physics::{
            CollisionLayer, CollisionPair, CollisionQuery, ConeView, DetectionSystem, Layer,
            MotionEvents, MotionResolver, Ray, RaycastHit, RaycastResult,
        },
        spatial::SpatialHash,
    };
}
