//! Entity-Component-System implementation
//!
//! A minimal typed store: the collision core only needs to look up a
//! handful of components per entity and iterate the collidable and moving
//! sets in a deterministic order.

pub mod component;
pub mod components;
pub mod entity;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use world::World;
