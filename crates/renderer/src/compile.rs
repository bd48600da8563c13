use std::borrow::Cow;

use anyhow::{anyhow, Result};
use uniforms::BlockLayout;
use wgpu::naga;

/// WGSL struct name of the packed uniform block bound as `stage`.
pub const STAGE_STRUCT: &str = "StageUniforms";

pub(crate) const VERTEX_ENTRY: &str = "vs_main";
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

/// Compiles the static full-screen triangle vertex shader.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("fullscreen triangle vertex"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(VERTEX_SHADER_WGSL)),
    })
}

/// Wraps a pass fragment with the generated prelude and compiles it.
pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    layout: &BlockLayout,
    label: &str,
    source: &str,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Owned(wrap_fragment(layout, source))),
    })
}

/// Produces a self-contained WGSL fragment module from a pass body.
///
/// The pass supplies `fn shade(frag_coord: vec2<f32>) -> vec4<f32>`.
/// Lines binding into group 0 are dropped; that group belongs to the
/// prelude. `frag_coord` is in logical pixels, top-left origin, so it
/// lines up with the resolution uniform.
pub fn wrap_fragment(layout: &BlockLayout, source: &str) -> String {
    let mut wrapped = layout.wgsl_struct(STAGE_STRUCT);
    wrapped.push_str(CAMERA_PRELUDE);
    wrapped.push_str(&format!(
        "@group(0) @binding(0) var<uniform> stage: {STAGE_STRUCT};\n\
         @group(0) @binding(1) var<uniform> camera: StageCamera;\n\n"
    ));

    let mut dropped = 0usize;
    for line in source.lines() {
        if line.trim_start().starts_with("@group(0)") {
            dropped += 1;
            continue;
        }
        wrapped.push_str(line);
        wrapped.push('\n');
    }
    if dropped > 0 {
        tracing::debug!(dropped, "removed group(0) bindings from pass source");
    }

    wrapped.push_str(FOOTER);
    wrapped
}

/// Parses and validates a wrapped pass without touching a GPU.
pub fn validate_fragment(layout: &BlockLayout, source: &str) -> Result<()> {
    let wrapped = wrap_fragment(layout, source);
    let module = naga::front::wgsl::parse_str(&wrapped)
        .map_err(|err| anyhow!("{}", err.emit_to_string(&wrapped)))?;
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|err| anyhow!("{}", err.emit_to_string(&wrapped)))?;
    Ok(())
}

const CAMERA_PRELUDE: &str = r"struct StageCamera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    view_projection: mat4x4<f32>,
    position: vec4<f32>,
    viewport: vec4<f32>,
};
";

/// Remaps the hardware position to logical pixels and delegates to `shade`.
const FOOTER: &str = r"
@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    let pixel_ratio = max(camera.viewport.z, 1e-4);
    return shade(position.xy / pixel_ratio);
}
";

const VERTEX_SHADER_WGSL: &str = r"@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -3.0),
        vec2<f32>(3.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    return vec4<f32>(positions[index], 0.0, 1.0);
}
";
