use std::collections::BTreeMap;

use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Entities keyed by id. Iteration follows id order, which is spawn order
/// since ids come from `EngineContext::next_id`, so render output is stable.
#[derive(Default)]
pub struct Scene {
    entities: BTreeMap<EntityId, Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. An entity already using the same id is replaced.
    pub fn spawn(&mut self, entity: Entity) {
        if let Some(old) = self.entities.insert(entity.id, entity) {
            log::warn!("scene: entity {:?} ('{}') replaced", old.id, old.tag);
        }
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Entities that carry a rigid body.
    pub fn with_bodies_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut().filter(|e| e.body.is_some())
    }

    /// First entity (lowest id) with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.tag == tag)
    }

    pub fn id_by_tag(&self, tag: &str) -> Option<EntityId> {
        self.find_by_tag(tag).map(|e| e.id)
    }

    /// All entities with the given tag, in id order.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.values().filter(move |e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec3::new(-5.5, 6.62, -2.2)));
        let e = scene.get(id).unwrap();
        assert_eq!(e.pos, Vec3::new(-5.5, 6.62, -2.2));
        assert_eq!(e.rotation, Quat::IDENTITY);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn despawn_twice() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)));
        assert!(scene.despawn(EntityId(1)).is_some());
        assert!(scene.is_empty());
        assert!(scene.despawn(EntityId(1)).is_none());
    }

    #[test]
    fn respawn_replaces() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(4)).with_tag("red"));
        scene.spawn(Entity::new(EntityId(4)).with_tag("white"));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(EntityId(4)).unwrap().tag, "white");
    }

    #[test]
    fn iteration_follows_id_order() {
        let mut scene = Scene::new();
        for n in [3, 1, 2] {
            scene.spawn(Entity::new(EntityId(n)));
        }
        let ids: Vec<u32> = scene.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn tag_lookup() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("white"));
        scene.spawn(Entity::new(EntityId(3)).with_tag("pin"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("pin"));
        assert_eq!(scene.id_by_tag("white"), Some(EntityId(1)));
        assert_eq!(scene.id_by_tag("pin"), Some(EntityId(2)));
        assert_eq!(scene.tagged("pin").count(), 2);
        assert!(scene.find_by_tag("red").is_none());
    }

    #[test]
    fn tag_lookup_outlives_the_tag_string() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(5)).with_tag("yellow"));
        let found = {
            let tag = String::from("yellow");
            scene.find_by_tag(&tag)
        };
        assert_eq!(found.map(|e| e.id), Some(EntityId(5)));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(7)));
        if let Some(e) = scene.get_mut(EntityId(7)) {
            e.active = false;
        }
        assert!(!scene.get(EntityId(7)).unwrap().active);
        assert_eq!(scene.with_bodies_mut().count(), 0);
    }
}
