//! Entity identity, id allocation, and per-entity component storage.
//!
//! An [`Entity`] is a node in the scene graph: it carries a name, at most
//! one component per [`ComponentKind`], a non-owning back-reference to its
//! parent, and an ordered list of child ids. Hierarchy links are mutated
//! only by the registry so the tree invariant cannot be broken from
//! outside.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind};
use crate::error::SceneError;

/// A unique entity identifier.
///
/// Ids are allocated by the registry, start at 1, and are never reused:
/// a stale id held after a destroy can never alias a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The null / invalid entity sentinel.
    pub const INVALID: EntityId = EntityId(0);

    /// Create an id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw `u64` value.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids.
///
/// Ids of destroyed entities are never recycled. This is what makes a
/// dangling id harmless: it can only ever miss, never hit a different
/// entity.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. Ids start at 1 (0 is [`EntityId::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocate a fresh id.
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Total ids handed out so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A scene-graph node owning its components.
///
/// Entities are constructed only by the registry. The parent link is a
/// back-reference for lookup and cycle detection; destruction never walks
/// it.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    name: String,
    components: BTreeMap<ComponentKind, Component>,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: String) -> Self {
        Self {
            id,
            name,
            components: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// This entity's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// This entity's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent's id, or `None` for a root entity.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Ids of this entity's children, in attach order.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    // -- Component operations --

    /// Attach a component, taking ownership of it.
    ///
    /// Fails with [`SceneError::DuplicateKind`] — without mutating anything —
    /// if a component of the same kind is already attached. On success,
    /// returns a mutable reference to the stored component, valid until it
    /// is detached or the entity is destroyed.
    pub fn attach_component(
        &mut self,
        component: Component,
    ) -> Result<&mut Component, SceneError> {
        let kind = component.kind();
        match self.components.entry(kind) {
            Entry::Occupied(_) => Err(SceneError::DuplicateKind {
                entity: self.id,
                kind,
            }),
            Entry::Vacant(slot) => Ok(slot.insert(component)),
        }
    }

    /// Detach the component of the given kind, returning it by value.
    ///
    /// Ownership moves to the caller; no reference into the entity can
    /// survive the move. Fails with [`SceneError::ComponentNotFound`] if no
    /// component of that kind is attached.
    pub fn detach_component(&mut self, kind: ComponentKind) -> Result<Component, SceneError> {
        self.components
            .remove(&kind)
            .ok_or(SceneError::ComponentNotFound {
                entity: self.id,
                kind,
            })
    }

    /// Non-owning lookup of the component of the given kind.
    #[must_use]
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.get(&kind)
    }

    /// Mutable lookup of the component of the given kind.
    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components.get_mut(&kind)
    }

    /// Returns `true` if a component of the given kind is attached.
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains_key(&kind)
    }

    /// Kinds of all attached components, in kind order.
    pub fn component_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.components.keys().copied()
    }

    /// Number of attached components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Tick every attached component, in kind order.
    pub fn update(&mut self, dt: f32) {
        for component in self.components.values_mut() {
            component.update(dt);
        }
    }

    // -- Hierarchy links, mutated only by the registry --

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: EntityId) -> bool {
        if let Some(pos) = self.children.iter().position(|&c| c == child) {
            self.children.remove(pos);
            return true;
        }
        false
    }

    /// A copy of this node under a new id, with components deep-cloned and
    /// hierarchy links supplied by the caller.
    pub(crate) fn clone_node(
        &self,
        id: EntityId,
        parent: Option<EntityId>,
        children: Vec<EntityId>,
    ) -> Entity {
        Entity {
            id,
            name: self.name.clone(),
            components: self.components.clone(),
            parent,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use scene_math::Transform;

    use super::*;
    use crate::component::{Script, Sprite};

    fn entity() -> Entity {
        Entity::new(EntityId(1), "test".to_string())
    }

    #[test]
    fn test_entity_id_sentinel_and_display() {
        assert!(!EntityId::INVALID.is_valid());
        assert!(EntityId::from_raw(3).is_valid());
        assert_eq!(EntityId(7).to_string(), "Entity(7)");
    }

    #[test]
    fn test_allocator_ids_are_monotonic() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<u64> = (0..4).map(|_| alloc.allocate().id()).collect();
        // Strictly increasing from 1; nothing handed out twice.
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(alloc.count(), 4);
    }

    #[test]
    fn test_attach_duplicate_kind_does_not_mutate() {
        let mut e = entity();
        e.attach_component(Component::from(Transform::IDENTITY))
            .unwrap();
        let err = e
            .attach_component(Component::from(Transform::from_position(
                scene_math::Vec3::X,
            )))
            .unwrap_err();
        assert_eq!(
            err,
            SceneError::DuplicateKind {
                entity: EntityId(1),
                kind: ComponentKind::Transform
            }
        );
        // The original component is untouched.
        assert_eq!(e.component_count(), 1);
        assert_eq!(
            e.component(ComponentKind::Transform),
            Some(&Component::from(Transform::IDENTITY))
        );
    }

    #[test]
    fn test_detach_then_reattach() {
        let mut e = entity();
        e.attach_component(Component::from(Sprite::new(2, 2).unwrap()))
            .unwrap();
        let detached = e.detach_component(ComponentKind::Sprite).unwrap();
        assert_eq!(detached.kind(), ComponentKind::Sprite);
        assert!(!e.has_component(ComponentKind::Sprite));

        // A fresh attach of the same kind succeeds and there is exactly one.
        e.attach_component(Component::from(Sprite::new(4, 4).unwrap()))
            .unwrap();
        assert_eq!(e.component_count(), 1);
    }

    #[test]
    fn test_detach_absent_kind() {
        let mut e = entity();
        let err = e.detach_component(ComponentKind::Script).unwrap_err();
        assert_eq!(
            err,
            SceneError::ComponentNotFound {
                entity: EntityId(1),
                kind: ComponentKind::Script
            }
        );
    }

    #[test]
    fn test_component_kinds_in_kind_order() {
        let mut e = entity();
        assert_eq!(e.id(), EntityId(1));
        e.attach_component(Component::from(Script::new())).unwrap();
        e.attach_component(Component::from(Transform::IDENTITY))
            .unwrap();
        let kinds: Vec<ComponentKind> = e.component_kinds().collect();
        assert_eq!(kinds, vec![ComponentKind::Transform, ComponentKind::Script]);
    }

    #[test]
    fn test_update_forwards_to_components() {
        let mut e = entity();
        e.attach_component(Component::from(Script::new())).unwrap();
        e.update(0.5);
        e.update(0.5);
        let Some(Component::Script(script)) = e.component(ComponentKind::Script) else {
            panic!("expected script component");
        };
        assert!((script.elapsed() - 1.0).abs() < f32::EPSILON);
    }
}
