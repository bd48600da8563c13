//! Frame orchestration for shader stages.
//!
//! The crate sits between the host window and the GPU. It owns the surface
//! lifecycle, a perspective camera, the clock and pointer tracking, and keeps
//! a [`uniforms::UniformRegistry`] in step with them before every frame:
//!
//! ```text
//!   winit events ──▶ FrameOrchestrator ──▶ UniformRegistry (replace / in place)
//!        │               │   ▲
//!        │               │   └── TimeSource / PointerPosition / SurfaceSize
//!        ▼               ▼
//!   FrameScheduler   RenderBackend::render(scene, camera, registry.get_all())
//!                        │
//!                        └─▶ WgpuBackend: std140 block ─▶ WGSL passes
//! ```
//!
//! [`FrameOrchestrator`] only talks to the engine through [`RenderBackend`]
//! and [`RenderSurface`], so everything above the GPU can be exercised with
//! test doubles. [`run_window`] wires the wgpu backend to a winit window.

mod camera;
mod compile;
mod controls;
mod engine;
mod gpu;
mod orchestrator;
mod pointer;
mod runtime;
mod scene;
mod types;
mod window;

pub use camera::PerspectiveCamera;
pub use compile::{validate_fragment, wrap_fragment, STAGE_STRUCT};
pub use controls::OrbitControls;
pub use engine::{RenderBackend, RenderSurface, SurfaceSize};
pub use gpu::WgpuBackend;
pub use orchestrator::{FrameOrchestrator, FrameStatus, Lifecycle, OrchestratorError};
pub use pointer::{PointerPosition, PointerSpace, PointerState};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FrameLoopHandle, FrameScheduler,
    RenderPolicy, SystemTimeSource, TimeSample, TimeSource,
};
pub use scene::{ObjectId, Scene, SceneObject, ShaderMaterial};
pub use types::{Antialiasing, CameraSettings, OrchestratorConfig, RendererConfig, UniformBindings};
pub use window::{run_window, WindowSurface};
