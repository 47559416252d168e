//! # scene_math
//!
//! Math types for the scene graph. Re-exports [`glam`] for linear algebra
//! and defines the spatial value types that components carry as payloads.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use transform::Transform;
