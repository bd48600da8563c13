use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of value kinds a uniform may hold.
///
/// Serialized with the short tags shader authors already use (`f`, `v2`,
/// `m4`, ...); the long names are accepted as aliases when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniformCategory {
    #[serde(rename = "f", alias = "scalar")]
    Scalar,
    #[serde(rename = "i", alias = "integer")]
    Integer,
    #[serde(rename = "b", alias = "boolean")]
    Boolean,
    #[serde(rename = "v2", alias = "vector2")]
    Vector2,
    #[serde(rename = "v3", alias = "vector3")]
    Vector3,
    #[serde(rename = "v4", alias = "vector4")]
    Vector4,
    #[serde(rename = "c", alias = "color")]
    Color,
    #[serde(rename = "t", alias = "texture")]
    Texture,
    #[serde(rename = "m3", alias = "matrix3")]
    Matrix3,
    #[serde(rename = "m4", alias = "matrix4")]
    Matrix4,
}

/// How [`crate::UniformRegistry::set`] applies a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPolicy {
    /// Swap the stored value; holders of the previous value keep the old one.
    Replace,
    /// Copy components into the existing slot; slot identity never changes.
    InPlace,
}

impl UniformCategory {
    pub const ALL: [UniformCategory; 10] = [
        UniformCategory::Scalar,
        UniformCategory::Integer,
        UniformCategory::Boolean,
        UniformCategory::Vector2,
        UniformCategory::Vector3,
        UniformCategory::Vector4,
        UniformCategory::Color,
        UniformCategory::Texture,
        UniformCategory::Matrix3,
        UniformCategory::Matrix4,
    ];

    /// Mutation policy table keyed by category.
    pub fn policy(self) -> MutationPolicy {
        match self {
            UniformCategory::Scalar
            | UniformCategory::Integer
            | UniformCategory::Boolean
            | UniformCategory::Texture => MutationPolicy::Replace,
            UniformCategory::Vector2
            | UniformCategory::Vector3
            | UniformCategory::Vector4
            | UniformCategory::Color
            | UniformCategory::Matrix3
            | UniformCategory::Matrix4 => MutationPolicy::InPlace,
        }
    }

    /// Short tag used in configuration files.
    pub fn tag(self) -> &'static str {
        match self {
            UniformCategory::Scalar => "f",
            UniformCategory::Integer => "i",
            UniformCategory::Boolean => "b",
            UniformCategory::Vector2 => "v2",
            UniformCategory::Vector3 => "v3",
            UniformCategory::Vector4 => "v4",
            UniformCategory::Color => "c",
            UniformCategory::Texture => "t",
            UniformCategory::Matrix3 => "m3",
            UniformCategory::Matrix4 => "m4",
        }
    }

    /// WGSL type used inside the packed uniform block.
    ///
    /// Textures are bound separately and have no block representation.
    /// Booleans are not host-shareable in WGSL and travel as `u32`.
    pub fn wgsl_type(self) -> Option<&'static str> {
        match self {
            UniformCategory::Scalar => Some("f32"),
            UniformCategory::Integer => Some("i32"),
            UniformCategory::Boolean => Some("u32"),
            UniformCategory::Vector2 => Some("vec2<f32>"),
            UniformCategory::Vector3 | UniformCategory::Color => Some("vec3<f32>"),
            UniformCategory::Vector4 => Some("vec4<f32>"),
            UniformCategory::Matrix3 => Some("mat3x3<f32>"),
            UniformCategory::Matrix4 => Some("mat4x4<f32>"),
            UniformCategory::Texture => None,
        }
    }

    /// `(alignment, size)` in bytes under the std140/WGSL uniform rules.
    pub(crate) fn std140_layout(self) -> Option<(usize, usize)> {
        match self {
            UniformCategory::Scalar | UniformCategory::Integer | UniformCategory::Boolean => {
                Some((4, 4))
            }
            UniformCategory::Vector2 => Some((8, 8)),
            UniformCategory::Vector3 | UniformCategory::Color => Some((16, 12)),
            UniformCategory::Vector4 => Some((16, 16)),
            UniformCategory::Matrix3 => Some((16, 48)),
            UniformCategory::Matrix4 => Some((16, 64)),
            UniformCategory::Texture => None,
        }
    }
}

impl fmt::Display for UniformCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniformCategory::Scalar => "scalar",
            UniformCategory::Integer => "integer",
            UniformCategory::Boolean => "boolean",
            UniformCategory::Vector2 => "vector2",
            UniformCategory::Vector3 => "vector3",
            UniformCategory::Vector4 => "vector4",
            UniformCategory::Color => "color",
            UniformCategory::Texture => "texture",
            UniformCategory::Matrix3 => "matrix3",
            UniformCategory::Matrix4 => "matrix4",
        };
        f.write_str(name)
    }
}

impl FromStr for UniformCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        UniformCategory::ALL
            .into_iter()
            .find(|category| category.tag() == normalized || category.to_string() == normalized)
            .ok_or_else(|| format!("unknown uniform category '{value}'"))
    }
}
