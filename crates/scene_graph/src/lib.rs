//! # scene_graph
//!
//! A minimal entity/component ownership core with an explicit lifecycle:
//! polymorphic components ([`Transform`](scene_math::Transform),
//! [`Sprite`], [`Script`]), entities forming a parent/child tree, and an
//! [`EntityRegistry`] that is the single authority for creation and
//! destruction.
//!
//! Ownership is structural. Components move into an entity on attach and
//! move back out on detach; hierarchy links are ids into the registry's
//! arena, mutated only through the registry so the tree invariant holds;
//! destroying an entity walks child links only and releases every owned
//! object exactly once. There is no shallow clone: [`EntityRegistry::clone_deep`]
//! duplicates everything a subtree owns.
//!
//! ```
//! use scene_graph::{Component, EntityRegistry, Sprite};
//!
//! let mut registry = EntityRegistry::new();
//! let ship = registry.create("ship");
//! let turret = registry.create_child(ship, "turret").unwrap();
//!
//! registry
//!     .get_mut(turret)
//!     .unwrap()
//!     .attach_component(Component::from(Sprite::new(16, 16).unwrap()))
//!     .unwrap();
//!
//! let fleet = registry.clone_deep(ship).unwrap();
//! assert_eq!(registry.destroy(fleet), Ok(2));
//! assert_eq!(registry.len(), 2);
//! ```

pub mod component;
pub mod entity;
pub mod error;
pub mod registry;

pub use component::{Component, ComponentKind, Script, Sprite, UserData};
pub use entity::{Entity, EntityAllocator, EntityId};
pub use error::SceneError;
pub use registry::EntityRegistry;
