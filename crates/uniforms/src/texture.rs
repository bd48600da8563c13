use std::sync::Arc;

use uuid::Uuid;

/// Descriptor for a texture owned by the rendering engine.
///
/// The registry never touches pixel data; it only tracks which texture a
/// sampler parameter currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    id: Uuid,
    label: String,
    width: u32,
    height: u32,
}

/// Shared handle stored in texture uniforms. Updates swap the handle.
pub type TextureHandle = Arc<Texture>;

impl Texture {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> TextureHandle {
        Arc::new(Self {
            id: Uuid::new_v4(),
            label: label.into(),
            width,
            height,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
