//! wgpu implementation of the render backend.
//!
//! - `context` owns instance/device/surface wiring and the swapchain
//!   configuration, including MSAA sample selection.
//! - `pipeline` builds one render pipeline per scene object from its WGSL
//!   pass, sharing a single bind group layout.
//! - `backend` packs the uniform map into the std140 block every frame,
//!   keeps pipelines in step with the scene, and draws the passes in order.

mod backend;
mod context;
mod pipeline;

pub use backend::WgpuBackend;
