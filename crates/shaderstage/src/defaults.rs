//! Built-in stage used when no config file is given.

/// Pass name the built-in config points at.
pub const DEFAULT_PASS_NAME: &str = "gradient";

pub const DEFAULT_STAGE: &str = r#"
version = 1

[window]
title = "shaderstage"

[uniforms.u_time]
type = "f"

[uniforms.u_resolution]
type = "v2"

[uniforms.u_mouse]
type = "v2"
value = [0.5, 0.5]

[[passes]]
name = "gradient"
shader = "gradient.wgsl"
"#;

pub const DEFAULT_PASS: &str = r"
fn shade(frag_coord: vec2<f32>) -> vec4<f32> {
    let uv = frag_coord / max(stage.u_resolution, vec2<f32>(1.0));
    let glow = 1.0 - smoothstep(0.0, 0.35, distance(uv, stage.u_mouse));
    let wave = 0.5 + 0.5 * cos(stage.u_time + uv.xyx + vec3<f32>(0.0, 2.0, 4.0));
    return vec4<f32>(wave + vec3<f32>(glow * 0.25), 1.0);
}
";
