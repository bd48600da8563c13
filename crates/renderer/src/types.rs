use glam::Vec3;

use crate::pointer::PointerSpace;
use crate::runtime::RenderPolicy;

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Registry parameter names the orchestrator writes every frame.
///
/// The coordinate space pushed into `pointer` is fixed per deployment through
/// `pointer_space`; it is never inferred from the shader.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBindings {
    /// Scalar receiving elapsed seconds.
    pub time: String,
    /// Vector2 receiving the surface layout size.
    pub resolution: String,
    /// Vector2 receiving the pointer position.
    pub pointer: String,
    /// Space the pointer position is expressed in.
    pub pointer_space: PointerSpace,
    /// Optional scalar receiving seconds since the previous frame.
    pub time_delta: Option<String>,
    /// Optional integer receiving the frame index.
    pub frame: Option<String>,
}

impl Default for UniformBindings {
    fn default() -> Self {
        Self {
            time: "u_time".into(),
            resolution: "u_resolution".into(),
            pointer: "u_mouse".into(),
            pointer_space: PointerSpace::Normalized,
            time_delta: None,
            frame: None,
        }
    }
}

/// Perspective camera parameters and the pose applied on attach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Attach orbit controls with inertial damping.
    pub orbit_controls: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::splat(5.0),
            target: Vec3::ZERO,
            orbit_controls: false,
        }
    }
}

/// Everything the frame orchestrator needs besides its collaborators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorConfig {
    pub bindings: UniformBindings,
    pub camera: CameraSettings,
}

/// Configuration for the windowed host loop.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    pub antialiasing: Antialiasing,
    pub policy: RenderPolicy,
    pub orchestrator: OrchestratorConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "shaderstage".into(),
            antialiasing: Antialiasing::default(),
            policy: RenderPolicy::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}
