use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::category::UniformCategory;
use crate::color::Color;
use crate::texture::TextureHandle;

/// Shared storage for values that are updated in place.
///
/// Cloning a slot shares it: every clone reads the components most recently
/// written by the registry. Only the registry writes.
#[derive(Clone)]
pub struct Slot<T: Copy>(Rc<Cell<T>>);

impl<T: Copy> Slot<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    /// Current components.
    pub fn get(&self) -> T {
        self.0.get()
    }

    /// True when both handles point at the same storage.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn store(&self, value: T) {
        self.0.set(value);
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.get()).finish()
    }
}

/// A uniform value tagged with its category.
///
/// Equality is structural: two values are equal when their categories and
/// components match, regardless of slot identity.
#[derive(Clone, Debug)]
pub enum UniformValue {
    Scalar(f32),
    Integer(i32),
    Boolean(bool),
    Vector2(Slot<Vec2>),
    Vector3(Slot<Vec3>),
    Vector4(Slot<Vec4>),
    Color(Slot<Color>),
    Texture(TextureHandle),
    Matrix3(Slot<Mat3>),
    Matrix4(Slot<Mat4>),
}

impl UniformValue {
    pub fn category(&self) -> UniformCategory {
        match self {
            UniformValue::Scalar(_) => UniformCategory::Scalar,
            UniformValue::Integer(_) => UniformCategory::Integer,
            UniformValue::Boolean(_) => UniformCategory::Boolean,
            UniformValue::Vector2(_) => UniformCategory::Vector2,
            UniformValue::Vector3(_) => UniformCategory::Vector3,
            UniformValue::Vector4(_) => UniformCategory::Vector4,
            UniformValue::Color(_) => UniformCategory::Color,
            UniformValue::Texture(_) => UniformCategory::Texture,
            UniformValue::Matrix3(_) => UniformCategory::Matrix3,
            UniformValue::Matrix4(_) => UniformCategory::Matrix4,
        }
    }

    /// True when both values reference the same storage.
    ///
    /// Slots compare by slot identity and textures by handle identity.
    /// Plain scalars, integers and booleans have no identity and never share.
    pub fn shares_storage(&self, other: &UniformValue) -> bool {
        match (self, other) {
            (UniformValue::Vector2(a), UniformValue::Vector2(b)) => Slot::ptr_eq(a, b),
            (UniformValue::Vector3(a), UniformValue::Vector3(b)) => Slot::ptr_eq(a, b),
            (UniformValue::Vector4(a), UniformValue::Vector4(b)) => Slot::ptr_eq(a, b),
            (UniformValue::Color(a), UniformValue::Color(b)) => Slot::ptr_eq(a, b),
            (UniformValue::Matrix3(a), UniformValue::Matrix3(b)) => Slot::ptr_eq(a, b),
            (UniformValue::Matrix4(a), UniformValue::Matrix4(b)) => Slot::ptr_eq(a, b),
            (UniformValue::Texture(a), UniformValue::Texture(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            UniformValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            UniformValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UniformValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            UniformValue::Vector2(slot) => Some(slot.get()),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            UniformValue::Vector3(slot) => Some(slot.get()),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            UniformValue::Vector4(slot) => Some(slot.get()),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            UniformValue::Color(slot) => Some(slot.get()),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureHandle> {
        match self {
            UniformValue::Texture(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn as_mat3(&self) -> Option<Mat3> {
        match self {
            UniformValue::Matrix3(slot) => Some(slot.get()),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<Mat4> {
        match self {
            UniformValue::Matrix4(slot) => Some(slot.get()),
            _ => None,
        }
    }
}

impl PartialEq for UniformValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UniformValue::Scalar(a), UniformValue::Scalar(b)) => a == b,
            (UniformValue::Integer(a), UniformValue::Integer(b)) => a == b,
            (UniformValue::Boolean(a), UniformValue::Boolean(b)) => a == b,
            (UniformValue::Vector2(a), UniformValue::Vector2(b)) => a.get() == b.get(),
            (UniformValue::Vector3(a), UniformValue::Vector3(b)) => a.get() == b.get(),
            (UniformValue::Vector4(a), UniformValue::Vector4(b)) => a.get() == b.get(),
            (UniformValue::Color(a), UniformValue::Color(b)) => a.get() == b.get(),
            (UniformValue::Texture(a), UniformValue::Texture(b)) => a == b,
            (UniformValue::Matrix3(a), UniformValue::Matrix3(b)) => a.get() == b.get(),
            (UniformValue::Matrix4(a), UniformValue::Matrix4(b)) => a.get() == b.get(),
            _ => false,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Scalar(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Integer(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Boolean(value)
    }
}

impl From<Vec2> for UniformValue {
    fn from(value: Vec2) -> Self {
        UniformValue::Vector2(Slot::new(value))
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        UniformValue::Vector3(Slot::new(value))
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        UniformValue::Vector4(Slot::new(value))
    }
}

impl From<Color> for UniformValue {
    fn from(value: Color) -> Self {
        UniformValue::Color(Slot::new(value))
    }
}

impl From<TextureHandle> for UniformValue {
    fn from(value: TextureHandle) -> Self {
        UniformValue::Texture(value)
    }
}

impl From<Mat3> for UniformValue {
    fn from(value: Mat3) -> Self {
        UniformValue::Matrix3(Slot::new(value))
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Matrix4(Slot::new(value))
    }
}
