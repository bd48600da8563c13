//! Contracts between the frame orchestrator and the engine that draws.
//!
//! The orchestrator never talks to a GPU directly. It drives a
//! [`RenderBackend`] bound to a [`RenderSurface`]; the wgpu implementation
//! lives in [`crate::gpu`], and tests substitute recording doubles.

use anyhow::Result;
use uniforms::UniformMap;

use crate::camera::PerspectiveCamera;
use crate::scene::Scene;

/// Layout box of a surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height, or 1.0 for a collapsed surface.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Physical pixel extent for the given device pixel ratio, never below 1x1.
    pub fn physical(&self, pixel_ratio: f32) -> (u32, u32) {
        let scale = |logical: f32| ((logical * pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Something the orchestrator can attach a drawing target to.
pub trait RenderSurface {
    /// Current layout size in logical pixels.
    fn layout_size(&self) -> SurfaceSize;

    /// Physical pixels per logical pixel.
    fn pixel_ratio(&self) -> f32 {
        1.0
    }
}

/// Engine capable of drawing a scene through a camera with a uniform map.
pub trait RenderBackend {
    type Surface: RenderSurface;

    fn set_pixel_ratio(&mut self, ratio: f32);

    /// Records the drawing-buffer size; called before and after `attach`.
    fn set_size(&mut self, size: SurfaceSize);

    /// Binds the drawing target to `surface`.
    fn attach(&mut self, surface: &Self::Surface) -> Result<()>;

    fn detach(&mut self);

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        uniforms: &UniformMap,
    ) -> Result<()>;

    /// Releases every GPU resource held by the backend.
    fn dispose(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(SurfaceSize::new(800.0, 400.0).aspect(), 2.0);
        assert_eq!(SurfaceSize::new(800.0, 0.0).aspect(), 1.0);
        assert!(SurfaceSize::new(800.0, 0.0).is_empty());
    }

    #[test]
    fn physical_size_scales_and_clamps() {
        assert_eq!(SurfaceSize::new(800.0, 600.0).physical(2.0), (1600, 1200));
        assert_eq!(SurfaceSize::new(0.0, 0.0).physical(1.0), (1, 1));
    }
}
