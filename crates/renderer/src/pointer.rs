use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use crate::engine::SurfaceSize;

/// Coordinate space written into the pointer uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSpace {
    /// Surface-relative offset in logical pixels, origin top-left.
    Raw,
    /// `offset / size`, each axis in `[0, 1]`, origin top-left.
    #[default]
    Normalized,
    /// Normalized device coordinates in `[-1, 1]`, y pointing up.
    Device,
}

impl fmt::Display for PointerSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointerSpace::Raw => "raw",
            PointerSpace::Normalized => "normalized",
            PointerSpace::Device => "device",
        };
        f.write_str(name)
    }
}

impl FromStr for PointerSpace {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "raw" | "pixels" => Ok(PointerSpace::Raw),
            "normalized" | "std" => Ok(PointerSpace::Normalized),
            "device" | "ndc" => Ok(PointerSpace::Device),
            other => Err(format!("unknown pointer space '{other}'")),
        }
    }
}

/// One pointer sample expressed in every supported space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub raw: Vec2,
    pub normalized: Vec2,
    pub device: Vec2,
}

impl PointerPosition {
    /// Derives all spaces from a surface-relative offset.
    ///
    /// Degenerate surfaces are treated as one pixel wide so the result
    /// stays finite.
    pub fn from_offset(offset: Vec2, size: SurfaceSize) -> Self {
        let extent = Vec2::new(size.width.max(1.0), size.height.max(1.0));
        let normalized = offset / extent;
        let device = Vec2::new(normalized.x * 2.0 - 1.0, -normalized.y * 2.0 + 1.0);
        Self {
            raw: offset,
            normalized,
            device,
        }
    }

    pub fn in_space(&self, space: PointerSpace) -> Vec2 {
        match space {
            PointerSpace::Raw => self.raw,
            PointerSpace::Normalized => self.normalized,
            PointerSpace::Device => self.device,
        }
    }
}

/// Last pointer sample plus primary-button drag tracking.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Option<PointerPosition>,
    drag_delta: Vec2,
    is_pressed: bool,
}

impl PointerState {
    pub fn handle_moved(&mut self, position: PointerPosition) {
        if self.is_pressed {
            if let Some(previous) = self.position {
                self.drag_delta += position.raw - previous.raw;
            }
        }
        self.position = Some(position);
    }

    pub fn handle_button(&mut self, pressed: bool) {
        self.is_pressed = pressed;
    }

    /// Returns and clears the raw-pixel drag distance accumulated since the last call.
    pub fn take_drag_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.drag_delta)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
