//! Component variants and their ownership contracts.
//!
//! A [`Component`] is a capability unit attached to exactly one entity at a
//! time. Components are moved into an entity on attach and moved back out
//! on detach, so two owners can never hold the same instance. Cloning is
//! deep for everything a component owns; the one deliberate exception is
//! the [`Script`] user-data handle, which is shared by value because the
//! component never owns the resource behind it.

use serde::{Deserialize, Serialize};

use scene_math::Transform;

use crate::error::SceneError;

/// The kind of a component. An entity holds at most one component of each
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Transform,
    Sprite,
    Script,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentKind::Transform => "Transform",
            ComponentKind::Sprite => "Sprite",
            ComponentKind::Script => "Script",
        };
        f.write_str(name)
    }
}

/// An opaque handle to externally owned user data.
///
/// The scene graph never owns, duplicates, or releases whatever the handle
/// designates — the caller keeps full responsibility for that resource.
/// Copying a `UserData` copies the handle value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserData(pub u64);

impl std::fmt::Display for UserData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserData({})", self.0)
    }
}

/// An RGBA image component. Sole owner of its pixel buffer.
///
/// The buffer is always exactly `width * height * 4` bytes. Cloning a
/// `Sprite` duplicates the buffer; two sprites never alias pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Sprite {
    /// Bytes per RGBA pixel.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Create a sprite with a zero-filled buffer.
    ///
    /// Fails with [`SceneError::DimensionOverflow`] if `width * height * 4`
    /// does not fit in `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self, SceneError> {
        let len = Self::buffer_len(width, height)
            .ok_or(SceneError::DimensionOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Create a sprite taking ownership of an existing pixel buffer.
    ///
    /// Fails with [`SceneError::DimensionOverflow`] if the byte size of the
    /// dimensions overflows, or [`SceneError::BufferSizeMismatch`] if the
    /// buffer is not exactly `width * height * 4` bytes.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SceneError> {
        let expected = Self::buffer_len(width, height)
            .ok_or(SceneError::DimensionOverflow { width, height })?;
        if pixels.len() != expected {
            return Err(SceneError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA buffer.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA bytes of the pixel at `(x, y)`, or `None` if out of range.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let start = self.offset(x, y)?;
        Some(&self.pixels[start..start + Self::BYTES_PER_PIXEL])
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// Fails with [`SceneError::OutOfRange`] without touching the buffer if
    /// the coordinates fall outside the sprite.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<(), SceneError> {
        let start = self.offset(x, y).ok_or(SceneError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.pixels[start..start + Self::BYTES_PER_PIXEL].copy_from_slice(&rgba);
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        index.checked_mul(Self::BYTES_PER_PIXEL)
    }

    /// Byte length of a `width` x `height` RGBA buffer, or `None` if it
    /// overflows `usize`.
    fn buffer_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::BYTES_PER_PIXEL)
    }
}

/// A behaviour stub carrying an optional [`UserData`] handle.
///
/// The handle's resource is externally owned: cloning a `Script` copies the
/// handle value, and the resource behind it is shared, not duplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    user_data: Option<UserData>,
    elapsed: f32,
}

impl Script {
    /// A script with no user data attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the user-data handle, returning the displaced handle so the
    /// caller can release the resource it designates. A handle is never
    /// silently dropped.
    pub fn set_user_data(&mut self, data: UserData) -> Option<UserData> {
        self.user_data.replace(data)
    }

    /// Remove and return the current handle, if any.
    pub fn take_user_data(&mut self) -> Option<UserData> {
        self.user_data.take()
    }

    /// The current handle, if any.
    #[must_use]
    pub fn user_data(&self) -> Option<UserData> {
        self.user_data
    }

    /// Seconds of simulated time this script has been updated for.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// A capability unit attached to exactly one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Transform(Transform),
    Sprite(Sprite),
    Script(Script),
}

impl Component {
    /// The kind of this component's variant.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Transform(_) => ComponentKind::Transform,
            Component::Sprite(_) => ComponentKind::Sprite,
            Component::Script(_) => ComponentKind::Script,
        }
    }

    /// Per-frame mutation. Never moves or releases owned state.
    pub fn update(&mut self, dt: f32) {
        match self {
            Component::Script(script) => script.elapsed += dt,
            Component::Transform(_) | Component::Sprite(_) => {}
        }
    }
}

impl From<Transform> for Component {
    fn from(transform: Transform) -> Self {
        Component::Transform(transform)
    }
}

impl From<Sprite> for Component {
    fn from(sprite: Sprite) -> Self {
        Component::Sprite(sprite)
    }
}

impl From<Script> for Component {
    fn from(script: Script) -> Self {
        Component::Script(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_buffer_size() {
        let sprite = Sprite::new(64, 32).unwrap();
        assert_eq!(sprite.pixels().len(), 64 * 32 * 4);
    }

    #[test]
    fn test_sprite_from_pixels_rejects_wrong_length() {
        let err = Sprite::from_pixels(4, 4, vec![0; 10]).unwrap_err();
        assert_eq!(
            err,
            SceneError::BufferSizeMismatch {
                expected: 64,
                actual: 10
            }
        );
    }

    #[test]
    fn test_sprite_rejects_overflowing_dimensions() {
        // width * height * 4 exceeds usize; the buffer must never silently
        // wrap to a smaller allocation.
        let err = Sprite::new(1 << 31, 1 << 31).unwrap_err();
        assert_eq!(
            err,
            SceneError::DimensionOverflow {
                width: 1 << 31,
                height: 1 << 31
            }
        );
    }

    #[test]
    fn test_from_pixels_rejects_overflowing_dimensions() {
        // Overflow is reported as such, not as a buffer-length mismatch
        // against a wrapped size.
        let err = Sprite::from_pixels(u32::MAX, u32::MAX, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            SceneError::DimensionOverflow {
                width: u32::MAX,
                height: u32::MAX
            }
        );
    }

    #[test]
    fn test_sprite_pixel_roundtrip() {
        let mut sprite = Sprite::new(8, 8).unwrap();
        sprite.set_pixel(3, 5, [1, 2, 3, 4]).unwrap();
        assert_eq!(sprite.pixel(3, 5).unwrap(), &[1, 2, 3, 4]);
        assert_eq!(sprite.pixel(0, 0).unwrap(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_sprite_set_pixel_out_of_range_leaves_buffer_unchanged() {
        let mut sprite = Sprite::new(4, 4).unwrap();
        let before = sprite.pixels().to_vec();
        let err = sprite.set_pixel(4, 0, [255; 4]).unwrap_err();
        assert_eq!(
            err,
            SceneError::OutOfRange {
                x: 4,
                y: 0,
                width: 4,
                height: 4
            }
        );
        assert_eq!(sprite.pixels(), before.as_slice());
    }

    #[test]
    fn test_sprite_clone_does_not_alias() {
        let mut original = Sprite::new(2, 2).unwrap();
        original.set_pixel(0, 0, [9, 9, 9, 9]).unwrap();
        let mut copy = original.clone();
        copy.set_pixel(0, 0, [1, 1, 1, 1]).unwrap();
        assert_eq!(original.pixel(0, 0).unwrap(), &[9, 9, 9, 9]);
        assert_eq!(copy.pixel(0, 0).unwrap(), &[1, 1, 1, 1]);
    }

    #[test]
    fn test_script_set_user_data_returns_displaced_handle() {
        let mut script = Script::new();
        assert_eq!(script.set_user_data(UserData(42)), None);
        assert_eq!(script.set_user_data(UserData(100)), Some(UserData(42)));
        assert_eq!(script.user_data(), Some(UserData(100)));
    }

    #[test]
    fn test_script_take_user_data() {
        let mut script = Script::new();
        script.set_user_data(UserData(7));
        assert_eq!(script.take_user_data(), Some(UserData(7)));
        assert_eq!(script.user_data(), None);
    }

    #[test]
    fn test_script_clone_shares_handle_value() {
        let mut script = Script::new();
        script.set_user_data(UserData(11));
        let copy = script.clone();
        // Same handle value; the resource behind it is shared, not copied.
        assert_eq!(copy.user_data(), Some(UserData(11)));
    }

    #[test]
    fn test_component_kind() {
        assert_eq!(
            Component::from(Transform::IDENTITY).kind(),
            ComponentKind::Transform
        );
        assert_eq!(Component::from(Sprite::new(1, 1).unwrap()).kind(), ComponentKind::Sprite);
        assert_eq!(Component::from(Script::new()).kind(), ComponentKind::Script);
    }

    #[test]
    fn test_update_accumulates_script_time() {
        let mut component = Component::from(Script::new());
        component.update(0.5);
        component.update(0.25);
        let Component::Script(script) = &component else {
            panic!("expected script variant");
        };
        assert!((script.elapsed() - 0.75).abs() < f32::EPSILON);
    }
}
