//! The entity registry: single authority for creation and destruction.
//!
//! [`EntityRegistry`] is the arena holding every live entity, keyed by id.
//! Entities with no parent are roots. All hierarchy mutation goes through
//! the registry because attach/detach touch two entities' links and must
//! apply atomically; `&mut self` on every mutating method guarantees
//! exclusive access.
//!
//! The registry is an explicit value constructed and passed by the caller.
//! There is no process-wide default.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::entity::{Entity, EntityAllocator, EntityId};
use crate::error::SceneError;

/// Arena and ownership authority for a scene's entities.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    allocator: EntityAllocator,
    entities: HashMap<EntityId, Entity>,
}

impl EntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            entities: HashMap::new(),
        }
    }

    // -- Lifecycle --

    /// Create a new root entity and return its id.
    ///
    /// Ids are fresh and never reused, even after the entity is destroyed.
    pub fn create(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.allocator.allocate();
        let name = name.into();
        debug!(entity = %id, %name, "created entity");
        self.entities.insert(id, Entity::new(id, name));
        id
    }

    /// Create a new entity directly under `parent`.
    ///
    /// Fails with [`SceneError::EntityNotFound`] if `parent` is unknown;
    /// nothing is created in that case.
    pub fn create_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
    ) -> Result<EntityId, SceneError> {
        if !self.entities.contains_key(&parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        let id = self.create(name);
        self.attach_child(parent, id)?;
        Ok(id)
    }

    /// Destroy the entity and everything its subtree owns.
    ///
    /// The entity is first unlinked from its parent (if any); the subtree
    /// is then removed by walking child links only — parent back-references
    /// are never followed, so a destroy cannot revisit or loop. Returns the
    /// number of entities released, or [`SceneError::EntityNotFound`] if the
    /// id is unknown (already destroyed ids report this, letting callers
    /// distinguish "already gone" from "released now").
    pub fn destroy(&mut self, id: EntityId) -> Result<usize, SceneError> {
        let parent = self
            .entities
            .get(&id)
            .ok_or(SceneError::EntityNotFound(id))?
            .parent();
        if let Some(parent_id) = parent {
            if let Some(parent_entity) = self.entities.get_mut(&parent_id) {
                parent_entity.remove_child(id);
            }
        }

        let mut stack = vec![id];
        let mut released = 0;
        while let Some(current) = stack.pop() {
            if let Some(entity) = self.entities.remove(&current) {
                stack.extend_from_slice(entity.children());
                released += 1;
            }
        }
        debug!(entity = %id, released, "destroyed entity subtree");
        Ok(released)
    }

    /// Destroy every entity, visiting each exactly once.
    ///
    /// Returns the number of entities released.
    pub fn clear(&mut self) -> usize {
        let released = self.entities.len();
        self.entities.clear();
        debug!(released, "cleared registry");
        released
    }

    // -- Lookup --

    /// Non-owning lookup. The reference is valid until the entity is
    /// destroyed or the registry is mutated.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if the id names a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities, roots and children alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all root entities (entities with no parent).
    pub fn roots(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.parent().is_none())
    }

    // -- Hierarchy --

    /// Attach `child` under `parent`.
    ///
    /// If `child` already has a parent it is first detached from it — this
    /// is a re-parent, never a second owner. Fails, leaving both trees
    /// unchanged, with [`SceneError::EntityNotFound`] for an unknown id,
    /// [`SceneError::SelfParent`] if `parent == child`, or
    /// [`SceneError::CycleDetected`] if `child` is an ancestor of `parent`.
    pub fn attach_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), SceneError> {
        if !self.entities.contains_key(&parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        if !self.entities.contains_key(&child) {
            return Err(SceneError::EntityNotFound(child));
        }
        if parent == child {
            return Err(SceneError::SelfParent(parent));
        }
        // Walk the ancestor chain before linking anything.
        if self.is_ancestor(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }

        let previous = self.entities.get(&child).and_then(Entity::parent);
        if let Some(previous_id) = previous {
            if let Some(previous_entity) = self.entities.get_mut(&previous_id) {
                previous_entity.remove_child(child);
            }
        }
        if let Some(parent_entity) = self.entities.get_mut(&parent) {
            parent_entity.push_child(child);
        }
        if let Some(child_entity) = self.entities.get_mut(&child) {
            child_entity.set_parent(Some(parent));
        }
        Ok(())
    }

    /// Detach `child` from `parent` without destroying it.
    ///
    /// The child keeps all its components and children and becomes a root,
    /// still owned by the registry: the caller re-attaches it elsewhere or
    /// destroys it explicitly. Fails with [`SceneError::ChildNotFound`] if
    /// `child` is not currently a child of `parent`.
    pub fn detach_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), SceneError> {
        if !self.entities.contains_key(&parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        let child_parent = self
            .entities
            .get(&child)
            .ok_or(SceneError::EntityNotFound(child))?
            .parent();
        if child_parent != Some(parent) {
            return Err(SceneError::ChildNotFound { parent, child });
        }

        if let Some(parent_entity) = self.entities.get_mut(&parent) {
            parent_entity.remove_child(child);
        }
        if let Some(child_entity) = self.entities.get_mut(&child) {
            child_entity.set_parent(None);
        }
        Ok(())
    }

    /// Deep-clone the subtree rooted at `id` under fresh ids.
    ///
    /// The clone is structurally equal — same names, kinds, and field
    /// values — but shares nothing owned with the original: every component
    /// is deep-cloned, so mutating a clone's sprite buffer never touches
    /// the original's. The clone is a root regardless of where the original
    /// sits. Returns the clone's root id.
    ///
    /// Defined only for acyclic subtrees: a child link looping back fails
    /// with [`SceneError::CyclicStructure`] instead of recursing forever.
    /// The attach invariants make such a loop unreachable through this API;
    /// the check guards the traversal itself.
    pub fn clone_deep(&mut self, id: EntityId) -> Result<EntityId, SceneError> {
        if !self.entities.contains_key(&id) {
            return Err(SceneError::EntityNotFound(id));
        }

        // Collect the subtree, rejecting revisits.
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                return Err(SceneError::CyclicStructure(id));
            }
            let entity = self
                .entities
                .get(&current)
                .ok_or(SceneError::EntityNotFound(current))?;
            stack.extend_from_slice(entity.children());
            order.push(current);
        }

        // Fresh ids for every node, then materialise clones with links
        // rewritten into the new id space. The subtree root's parent falls
        // outside the map and correctly becomes None.
        let mut id_map: HashMap<EntityId, EntityId> = HashMap::with_capacity(order.len());
        for &old in &order {
            id_map.insert(old, self.allocator.allocate());
        }
        for &old in &order {
            let Some(original) = self.entities.get(&old) else {
                return Err(SceneError::EntityNotFound(old));
            };
            let Some(&new_id) = id_map.get(&old) else {
                return Err(SceneError::EntityNotFound(old));
            };
            let parent = original.parent().and_then(|p| id_map.get(&p).copied());
            let children = original
                .children()
                .iter()
                .filter_map(|c| id_map.get(c).copied())
                .collect();
            let clone = original.clone_node(new_id, parent, children);
            self.entities.insert(new_id, clone);
        }

        let root = id_map.get(&id).copied().ok_or(SceneError::EntityNotFound(id))?;
        debug!(source = %id, clone = %root, nodes = order.len(), "deep-cloned subtree");
        Ok(root)
    }

    /// Tick every live entity's components.
    pub fn update_all(&mut self, dt: f32) {
        for entity in self.entities.values_mut() {
            entity.update(dt);
        }
    }

    /// Returns `true` if `candidate` appears in the ancestor chain of `of`.
    fn is_ancestor(&self, candidate: EntityId, of: EntityId) -> bool {
        let mut current = self.entities.get(&of).and_then(Entity::parent);
        while let Some(ancestor) = current {
            if ancestor == candidate {
                return true;
            }
            current = self.entities.get(&ancestor).and_then(Entity::parent);
        }
        false
    }
}
