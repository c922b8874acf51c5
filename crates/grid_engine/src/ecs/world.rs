//! World container for entities and components
//!
//! Component storages are `SecondaryMap`s keyed by the generational
//! [`Entity`] key, boxed behind a small erased trait so the world can
//! hold any number of component types without knowing them up front.
//!
//! Entity iteration is in creation order. Motion resolution and collision
//! queries walk entities through [`World::entities`], so keeping that
//! order stable keeps a whole frame deterministic.

use super::{Component, Entity};
use slotmap::{SecondaryMap, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;

trait AnyStorage: Send + Sync {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Storage<T: Component>(SecondaryMap<Entity, T>);

impl<T: Component> AnyStorage for Storage<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.0.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Container for all entities and their components.
#[derive(Default)]
pub struct World {
    entities: SlotMap<Entity, ()>,
    spawn_order: Vec<Entity>,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.insert(());
        self.spawn_order.push(entity);
        entity
    }

    /// Destroy an entity and drop all of its components.
    ///
    /// Destroying an already-dead entity is a no-op.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if self.entities.remove(entity).is_none() {
            return;
        }
        self.spawn_order.retain(|e| *e != entity);
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
    }

    /// Whether the entity is still alive.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Attach (or replace) a component on an entity.
    ///
    /// Setting a component on a dead entity is silently ignored.
    pub fn set<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.entities.contains_key(entity) {
            return;
        }
        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Storage::<T>(SecondaryMap::new())));
        if let Some(storage) = storage.as_any_mut().downcast_mut::<Storage<T>>() {
            storage.0.insert(entity, component);
        }
    }

    /// Borrow a component.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>().and_then(|s| s.0.get(entity))
    }

    /// Mutably borrow a component.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>().and_then(|s| s.0.get_mut(entity))
    }

    /// Detach a component, returning it if it was present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>().and_then(|s| s.0.remove(entity))
    }

    /// Whether the entity carries a component of type `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Iterate live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.spawn_order.iter().copied()
    }

    fn storage<T: Component>(&self) -> Option<&Storage<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<Storage<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut Storage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<Storage<T>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(u32);
    impl Component for Health {}

    struct Tag;
    impl Component for Tag {}

    #[test]
    fn test_set_get_remove() {
        let mut world = World::new();
        let e = world.create_entity();

        world.set(e, Health(10));
        assert_eq!(world.get::<Health>(e).map(|h| h.0), Some(10));

        world.get_mut::<Health>(e).unwrap().0 = 7;
        assert_eq!(world.get::<Health>(e).map(|h| h.0), Some(7));

        assert!(world.remove::<Health>(e).is_some());
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut world = World::new();
        let e = world.create_entity();

        world.set(e, Health(1));
        world.set(e, Health(2));
        assert_eq!(world.get::<Health>(e).map(|h| h.0), Some(2));
    }

    #[test]
    fn test_destroy_drops_components() {
        let mut world = World::new();
        let e = world.create_entity();
        world.set(e, Health(10));
        world.set(e, Tag);

        world.destroy_entity(e);
        assert!(!world.contains(e));
        assert!(world.get::<Health>(e).is_none());
        assert!(world.get::<Tag>(e).is_none());
        assert_eq!(world.entities().count(), 0);

        // A later entity must not inherit the dead key's components.
        let e2 = world.create_entity();
        assert!(world.get::<Health>(e2).is_none());
    }

    #[test]
    fn test_iteration_is_creation_order() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();
        world.destroy_entity(b);
        let d = world.create_entity();

        let order: Vec<Entity> = world.entities().collect();
        assert_eq!(order, vec![a, c, d]);
    }

    #[test]
    fn test_set_on_dead_entity_is_ignored() {
        let mut world = World::new();
        let e = world.create_entity();
        world.destroy_entity(e);
        world.set(e, Health(5));
        assert!(world.get::<Health>(e).is_none());
    }
}
