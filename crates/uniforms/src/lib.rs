//! Typed uniform registry for shader parameters.
//!
//! Every parameter a shader consumes is declared once with a
//! [`UniformCategory`] and a value of the matching shape. Updates go through
//! [`UniformRegistry::set`], which applies one of two mutation policies:
//!
//! ```text
//!   set("u_time", 1.5)            ──▶ replace   (scalar / integer / bool / texture)
//!   set("u_mouse", Vec2(..))      ──▶ in place  (vectors / color / matrices)
//!                                        │
//!                                        └─▶ every clone of the Slot sees it
//! ```
//!
//! In-place values live in a shared [`Slot`]. Anything that cloned the slot
//! before an update (a material, a binding cache) observes the new
//! components without being re-bound. [`BlockLayout`] packs the registry into
//! a std140 byte block for GPU upload and emits the matching WGSL struct.

mod category;
mod color;
mod layout;
mod registry;
mod texture;
mod value;

pub use category::{MutationPolicy, UniformCategory};
pub use color::Color;
pub use layout::{BlockField, BlockLayout};
pub use registry::{UniformEntry, UniformError, UniformMap, UniformRegistry};
pub use texture::{Texture, TextureHandle};
pub use value::{Slot, UniformValue};

pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
