//! Spatial transform value type.
//!
//! [`Transform`] bundles position, rotation, and scale. It is a plain value
//! type: trivially copyable, no owned resources, so cloning it can never
//! alias anything.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation, and scale of an entity.
///
/// `Transform` is `Copy`: duplicating one is always a full, independent
/// copy of its fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position relative to the parent entity (or world origin for roots).
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale factors.
    pub scale: Vec3,
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// A transform at the given position with default rotation and scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// An origin transform with the given per-axis scale.
    #[must_use]
    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Translate by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.position += offset;
        self
    }

    /// Apply an additional rotation.
    #[must_use]
    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }

    /// Apply a uniform scale factor.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.scale *= factor;
        self
    }

    /// The 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t, Transform::IDENTITY);
        assert_eq!(t.to_matrix(), glam::Mat4::IDENTITY);
    }

    #[test]
    fn test_builder_chain() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0))
            .translated(Vec3::new(0.0, -2.0, 0.0))
            .scaled(2.0);
        assert_eq!(t.position, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(t.scale, Vec3::splat(2.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_rotated_composes() {
        let quarter = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let t = Transform::IDENTITY.rotated(quarter).rotated(quarter);
        let half = Quat::from_rotation_z(std::f32::consts::PI);
        assert!(t.rotation.angle_between(half) < 1e-5);
    }

    #[test]
    fn test_scale_reaches_matrix() {
        let t = Transform::from_scale(Vec3::new(2.0, 3.0, 4.0));
        let scaled = t.to_matrix().transform_point3(Vec3::ONE);
        assert_eq!(scaled, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_copy_is_independent() {
        let mut a = Transform::from_position(Vec3::X);
        let b = a;
        a.position = Vec3::Y;
        assert_eq!(b.position, Vec3::X);
    }
}
