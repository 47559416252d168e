//! Scene-graph error types.

use crate::component::ComponentKind;
use crate::entity::EntityId;

/// Errors returned by entity and registry operations.
///
/// Every variant is a recoverable contract violation reported to the
/// caller. None abort the process, and none are transient: retrying only
/// makes sense with corrected arguments.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// A component of this kind is already attached to the entity.
    #[error("entity {entity} already has a {kind} component")]
    DuplicateKind {
        entity: EntityId,
        kind: ComponentKind,
    },

    /// No component of this kind is attached to the entity.
    #[error("entity {entity} has no {kind} component")]
    ComponentNotFound {
        entity: EntityId,
        kind: ComponentKind,
    },

    /// The entity id is unknown to the registry.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// The entity is not a child of the given parent.
    #[error("entity {child} is not a child of entity {parent}")]
    ChildNotFound { parent: EntityId, child: EntityId },

    /// An entity cannot be attached as its own child.
    #[error("entity {0} cannot be its own parent")]
    SelfParent(EntityId),

    /// Linking child under parent would make an entity its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    CycleDetected { parent: EntityId, child: EntityId },

    /// The subtree contains a back-reference and cannot be cloned.
    #[error("subtree of entity {0} is cyclic")]
    CyclicStructure(EntityId),

    /// Pixel coordinates outside a sprite's dimensions.
    #[error("pixel ({x}, {y}) out of range for {width}x{height} sprite")]
    OutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A supplied pixel buffer does not match `width * height * 4` bytes.
    #[error("pixel buffer is {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Sprite dimensions whose byte size does not fit in `usize`.
    #[error("sprite dimensions {width}x{height} overflow the buffer size")]
    DimensionOverflow { width: u32, height: u32 },
}
