use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use uniforms::{
    Color, Texture, UniformCategory, UniformEntry, UniformError, UniformRegistry, UniformValue,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Uniform(#[from] UniformError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    pub version: u32,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub bindings: BindingsSection,
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub uniforms: BTreeMap<String, UniformDecl>,
    #[serde(default)]
    pub passes: Vec<PassDecl>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowSection {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_antialias_opt")]
    pub antialias: Option<AntialiasSetting>,
    /// Render a single still frame at this timestamp instead of animating.
    #[serde(default, deserialize_with = "deserialize_duration_opt")]
    pub still_time: Option<Duration>,
}

impl WindowSection {
    pub const DEFAULT_SIZE: (u32, u32) = (1280, 720);

    pub fn size(&self) -> (u32, u32) {
        (
            self.width.unwrap_or(Self::DEFAULT_SIZE.0),
            self.height.unwrap_or(Self::DEFAULT_SIZE.1),
        )
    }
}

/// Names of the registry entries the frame loop writes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BindingsSection {
    pub time: String,
    pub resolution: String,
    pub pointer: String,
    pub pointer_space: PointerSpaceSetting,
    pub time_delta: Option<String>,
    pub frame: Option<String>,
}

impl Default for BindingsSection {
    fn default() -> Self {
        Self {
            time: "u_time".into(),
            resolution: "u_resolution".into(),
            pointer: "u_mouse".into(),
            pointer_space: PointerSpaceSetting::Normalized,
            time_delta: None,
            frame: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSpaceSetting {
    #[serde(alias = "pixels")]
    Raw,
    #[default]
    #[serde(alias = "std")]
    Normalized,
    #[serde(alias = "ndc")]
    Device,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub orbit: bool,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [5.0, 5.0, 5.0],
            target: [0.0, 0.0, 0.0],
            orbit: false,
        }
    }
}

/// One `[uniforms.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct UniformDecl {
    #[serde(rename = "type")]
    pub category: UniformCategory,
    /// Initial value; omitted means zero, black, identity or a 1x1 texture.
    #[serde(default)]
    pub value: Option<toml::Value>,
}

/// One `[[passes]]` entry: a WGSL file providing `shade`.
#[derive(Debug, Clone, Deserialize)]
pub struct PassDecl {
    pub name: Option<String>,
    pub shader: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl AntialiasSetting {
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            0 | 1 => Some(Self::Off),
            2 => Some(Self::Samples2),
            4 => Some(Self::Samples4),
            8 => Some(Self::Samples8),
            16 => Some(Self::Samples16),
            _ => None,
        }
    }
}

impl std::str::FromStr for AntialiasSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_antialias(raw)
    }
}

fn parse_antialias(raw: &str) -> Result<AntialiasSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(AntialiasSetting::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(AntialiasSetting::Off),
        "2" => Ok(AntialiasSetting::Samples2),
        "4" => Ok(AntialiasSetting::Samples4),
        "8" => Ok(AntialiasSetting::Samples8),
        "16" => Ok(AntialiasSetting::Samples16),
        other => Err(format!("invalid antialias setting '{other}'")),
    }
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<AntialiasSetting>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    let raw = match helper {
        None => return Ok(None),
        Some(Helper::Str(raw)) => raw,
        Some(Helper::Num(value)) if value < 0 => {
            return Err(de::Error::custom("antialias value must be non-negative"));
        }
        Some(Helper::Num(value)) => value.to_string(),
    };
    parse_antialias(&raw).map(Some).map_err(de::Error::custom)
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(v)
                .map(|secs| Some(Duration::from_secs(secs)))
                .map_err(|_| E::custom("duration must be non-negative"))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() || !v.is_finite() {
                return Err(E::custom("duration must be a non-negative number of seconds"));
            }
            Ok(Some(Duration::from_secs_f64(v)))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl StageConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: StageConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Loads a config file; pass shaders resolve relative to its directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        Ok(config.with_base_dir(path.parent().unwrap_or(Path::new("."))))
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        let (width, height) = self.window.size();
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {width}x{height}"
            )));
        }
        if let Some(fps) = self.window.fps {
            if !fps.is_finite() || fps < 0.0 {
                return Err(ConfigError::Invalid("window.fps must be >= 0".into()));
            }
        }

        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(ConfigError::Invalid(
                "camera.fov must be between 0 and 180 degrees".into(),
            ));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::Invalid(
                "camera requires 0 < near < far".into(),
            ));
        }
        if camera.position == camera.target {
            return Err(ConfigError::Invalid(
                "camera.position must differ from camera.target".into(),
            ));
        }

        for name in self.uniforms.keys() {
            if !is_wgsl_identifier(name) {
                return Err(ConfigError::Invalid(format!(
                    "uniform name '{name}' is not a valid shader identifier"
                )));
            }
        }

        let bindings = &self.bindings;
        self.check_binding("bindings.time", &bindings.time, UniformCategory::Scalar)?;
        self.check_binding(
            "bindings.resolution",
            &bindings.resolution,
            UniformCategory::Vector2,
        )?;
        self.check_binding("bindings.pointer", &bindings.pointer, UniformCategory::Vector2)?;
        if let Some(name) = &bindings.time_delta {
            self.check_binding("bindings.time_delta", name, UniformCategory::Scalar)?;
        }
        if let Some(name) = &bindings.frame {
            self.check_binding("bindings.frame", name, UniformCategory::Integer)?;
        }

        if self.passes.is_empty() {
            return Err(ConfigError::Invalid(
                "config must define at least one [[passes]] entry".into(),
            ));
        }
        for (index, pass) in self.passes.iter().enumerate() {
            if pass.shader.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "pass {index} has an empty shader path"
                )));
            }
        }

        self.registry().map(|_| ())
    }

    fn check_binding(
        &self,
        key: &str,
        name: &str,
        expected: UniformCategory,
    ) -> Result<(), ConfigError> {
        match self.uniforms.get(name) {
            None => Err(ConfigError::Invalid(format!(
                "{key} references undeclared uniform '{name}'"
            ))),
            Some(decl) if decl.category != expected => Err(ConfigError::Invalid(format!(
                "{key} needs a {expected} uniform but '{name}' is declared as {}",
                decl.category
            ))),
            Some(_) => Ok(()),
        }
    }

    /// Builds a fresh registry holding every declared uniform at its initial value.
    pub fn registry(&self) -> Result<UniformRegistry, ConfigError> {
        let mut entries = Vec::with_capacity(self.uniforms.len());
        for (name, decl) in &self.uniforms {
            let value = parse_value(name, decl.category, decl.value.as_ref())?;
            let entry = UniformEntry::new(decl.category, value)
                .map_err(|err| err.for_parameter(name))?;
            entries.push((name.clone(), entry));
        }
        Ok(UniformRegistry::from_entries(entries)?)
    }

    /// Pass names paired with shader paths resolved against the config directory.
    pub fn resolved_passes(&self) -> Vec<(String, PathBuf)> {
        self.passes
            .iter()
            .enumerate()
            .map(|(index, pass)| {
                let name = pass.name.clone().unwrap_or_else(|| {
                    pass.shader
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_else(|| format!("pass{index}"))
                });
                (name, self.resolve_path(&pass.shader))
            })
            .collect()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// WGSL keywords, reserved words and predeclared type names.
const WGSL_RESERVED: &[&str] = &[
    "alias", "break", "case", "const", "const_assert", "continue", "continuing", "default",
    "diagnostic", "discard", "else", "enable", "false", "fn", "for", "if", "let", "loop",
    "override", "requires", "return", "struct", "switch", "true", "var", "while", "array",
    "atomic", "bool", "f16", "f32", "i32", "u32", "mat2x2", "mat2x3", "mat2x4", "mat3x2",
    "mat3x3", "mat3x4", "mat4x2", "mat4x3", "mat4x4", "ptr", "sampler", "sampler_comparison",
    "vec2", "vec3", "vec4", "texture_2d", "texture_3d", "texture_cube", "NULL", "Self",
    "abstract", "active", "alignas", "alignof", "as", "asm", "asm_fragment", "async",
    "attribute", "auto", "await", "become", "binding_array", "cast", "catch", "class",
    "co_await", "co_return", "co_yield", "coherent", "column_major", "common", "compile",
    "compile_fragment", "concept", "const_cast", "consteval", "constexpr", "constinit",
    "crate", "debugger", "decltype", "delete", "demote", "demote_to_helper", "do",
    "dynamic_cast", "enum", "explicit", "export", "extends", "extern", "external",
    "fallthrough", "filter", "final", "finally", "friend", "from", "fxgroup", "get", "goto",
    "groupshared", "highp", "impl", "implements", "import", "inline", "instanceof",
    "interface", "layout", "lowp", "macro", "macro_rules", "match", "mediump", "meta", "mod",
    "module", "move", "mut", "mutable", "namespace", "new", "nil", "noexcept", "noinline",
    "nointerpolation", "noperspective", "null", "nullptr", "of", "operator", "package",
    "packoffset", "partition", "pass", "patch", "pixelfragment", "precise", "precision",
    "premerge", "priv", "protected", "pub", "public", "readonly", "ref", "regardless",
    "register", "reinterpret_cast", "require", "resource", "restrict", "self", "set",
    "shared", "sizeof", "smooth", "snorm", "static", "static_assert", "static_cast", "std",
    "subroutine", "super", "target", "template", "this", "thread_local", "throw", "trait",
    "try", "type", "typedef", "typeid", "typename", "typeof", "union", "unless", "unorm",
    "unsafe", "unsized", "use", "using", "varying", "virtual", "volatile", "wgsl", "where",
    "with", "writeonly", "yield",
];

fn is_wgsl_identifier(name: &str) -> bool {
    if WGSL_RESERVED.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && name != "_"
        && !name.starts_with("__")
}

fn parse_value(
    name: &str,
    category: UniformCategory,
    value: Option<&toml::Value>,
) -> Result<UniformValue, ConfigError> {
    let Some(value) = value else {
        return Ok(default_value(name, category));
    };
    let invalid = |expected: &str| {
        ConfigError::Invalid(format!("uniform '{name}' ({category}) expects {expected}"))
    };

    let parsed = match category {
        UniformCategory::Scalar => number(value).ok_or_else(|| invalid("a number"))?.into(),
        UniformCategory::Integer => value
            .as_integer()
            .and_then(|raw| i32::try_from(raw).ok())
            .ok_or_else(|| invalid("a 32-bit integer"))?
            .into(),
        UniformCategory::Boolean => value.as_bool().ok_or_else(|| invalid("a boolean"))?.into(),
        UniformCategory::Vector2 => Vec2::from_array(
            numbers(value).ok_or_else(|| invalid("an array of 2 numbers"))?,
        )
        .into(),
        UniformCategory::Vector3 => Vec3::from_array(
            numbers(value).ok_or_else(|| invalid("an array of 3 numbers"))?,
        )
        .into(),
        UniformCategory::Vector4 => Vec4::from_array(
            numbers(value).ok_or_else(|| invalid("an array of 4 numbers"))?,
        )
        .into(),
        UniformCategory::Color => {
            let color = match value {
                toml::Value::String(hex) => Color::parse_hex(hex),
                other => numbers::<3>(other).map(Color::from),
            };
            color
                .ok_or_else(|| invalid("a \"#rrggbb\" string or an array of 3 numbers"))?
                .into()
        }
        UniformCategory::Texture => texture(name, value)
            .ok_or_else(|| invalid("a table with positive width and height"))?
            .into(),
        UniformCategory::Matrix3 => Mat3::from_cols_array(
            &numbers(value).ok_or_else(|| invalid("9 numbers in column-major order"))?,
        )
        .into(),
        UniformCategory::Matrix4 => Mat4::from_cols_array(
            &numbers(value).ok_or_else(|| invalid("16 numbers in column-major order"))?,
        )
        .into(),
    };
    Ok(parsed)
}

fn default_value(name: &str, category: UniformCategory) -> UniformValue {
    match category {
        UniformCategory::Scalar => 0.0_f32.into(),
        UniformCategory::Integer => 0_i32.into(),
        UniformCategory::Boolean => false.into(),
        UniformCategory::Vector2 => Vec2::ZERO.into(),
        UniformCategory::Vector3 => Vec3::ZERO.into(),
        UniformCategory::Vector4 => Vec4::ZERO.into(),
        UniformCategory::Color => Color::BLACK.into(),
        UniformCategory::Texture => Texture::new(name, 1, 1).into(),
        UniformCategory::Matrix3 => Mat3::IDENTITY.into(),
        UniformCategory::Matrix4 => Mat4::IDENTITY.into(),
    }
}

fn number(value: &toml::Value) -> Option<f32> {
    match value {
        toml::Value::Float(raw) => Some(*raw as f32),
        toml::Value::Integer(raw) => Some(*raw as f32),
        _ => None,
    }
}

fn numbers<const N: usize>(value: &toml::Value) -> Option<[f32; N]> {
    let array = value.as_array()?;
    if array.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(array) {
        *slot = number(item)?;
    }
    Some(out)
}

fn texture(name: &str, value: &toml::Value) -> Option<uniforms::TextureHandle> {
    let table = value.as_table()?;
    let dimension = |key: &str| {
        table
            .get(key)?
            .as_integer()
            .and_then(|raw| u32::try_from(raw).ok())
            .filter(|raw| *raw > 0)
    };
    let label = match table.get("label") {
        Some(label) => label.as_str()?,
        None => name,
    };
    Some(Texture::new(label, dimension("width")?, dimension("height")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
version = 1

[window]
title = "ripples"
width = 800
height = 600
fps = 30
antialias = 4
still_time = "1500ms"

[bindings]
pointer_space = "ndc"
frame = "u_frame"

[camera]
fov = 60
position = [0, 2, 8]
orbit = true

[uniforms.u_time]
type = "f"

[uniforms.u_frame]
type = "i"

[uniforms.u_resolution]
type = "v2"

[uniforms.u_mouse]
type = "vector2"
value = [1, 2]

[uniforms.u_tint]
type = "c"
value = "#336699"

[uniforms.u_noise]
type = "t"
value = { label = "noise", width = 256, height = 128 }

[uniforms.u_model]
type = "m4"

[uniforms.u_enabled]
type = "b"
value = true

[[passes]]
shader = "ripples.wgsl"

[[passes]]
name = "overlay"
shader = "/opt/stage/overlay.wgsl"
"##;

    fn minimal(extra: &str) -> String {
        format!(
            r#"
version = 1

[uniforms.u_time]
type = "f"

[uniforms.u_resolution]
type = "v2"

[uniforms.u_mouse]
type = "v2"

[[passes]]
shader = "main.wgsl"
{extra}
"#
        )
    }

    #[test]
    fn parses_sample_config() {
        let config = StageConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.window.size(), (800, 600));
        assert_eq!(config.window.antialias, Some(AntialiasSetting::Samples4));
        assert_eq!(config.window.still_time, Some(Duration::from_millis(1500)));
        assert_eq!(config.bindings.pointer_space, PointerSpaceSetting::Device);
        assert_eq!(config.bindings.time, "u_time");
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 0.1);
        assert!(config.camera.orbit);
    }

    #[test]
    fn builds_registry_from_declarations() {
        let config = StageConfig::from_toml_str(SAMPLE).unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.get("u_mouse").unwrap().as_vec2(), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(
            registry.get("u_tint").unwrap().as_color(),
            Some(Color::from_hex(0x336699))
        );
        assert_eq!(registry.get("u_model").unwrap().as_mat4(), Some(Mat4::IDENTITY));
        assert_eq!(registry.get("u_enabled").unwrap().as_bool(), Some(true));
        let noise = registry.get("u_noise").unwrap().as_texture().unwrap().clone();
        assert_eq!((noise.label(), noise.size()), ("noise", (256, 128)));
        assert_eq!(
            registry.entry("u_frame").unwrap().category(),
            UniformCategory::Integer
        );
    }

    #[test]
    fn malformed_value_names_the_parameter() {
        let input = minimal("").replace(
            "[uniforms.u_mouse]\ntype = \"v2\"",
            "[uniforms.u_mouse]\ntype = \"v2\"\nvalue = [1, 2, 3]",
        );
        let err = StageConfig::from_toml_str(&input).unwrap_err();
        match err {
            ConfigError::Invalid(message) => assert!(message.contains("u_mouse"), "{message}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bindings_must_exist_with_matching_category() {
        let missing = minimal("[bindings]\ntime = \"u_clock\"");
        let err = StageConfig::from_toml_str(&missing).unwrap_err();
        assert!(err.to_string().contains("u_clock"));

        let mistyped = minimal("[bindings]\nresolution = \"u_time\"");
        let err = StageConfig::from_toml_str(&mistyped).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("vector2"));
    }

    #[test]
    fn rejects_unsupported_version_and_missing_passes() {
        let err = StageConfig::from_toml_str(&minimal("").replace("version = 1", "version = 2"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let no_passes = minimal("").replace("[[passes]]\nshader = \"main.wgsl\"", "");
        assert!(StageConfig::from_toml_str(&no_passes).is_err());
    }

    #[test]
    fn rejects_unknown_category_tags_and_bad_names() {
        let bad_tag = minimal("[uniforms.u_extra]\ntype = \"v5\"");
        assert!(matches!(
            StageConfig::from_toml_str(&bad_tag).unwrap_err(),
            ConfigError::Parse(_)
        ));

        let bad_name = minimal("[uniforms.\"2fast\"]\ntype = \"f\"");
        let err = StageConfig::from_toml_str(&bad_name).unwrap_err();
        assert!(err.to_string().contains("2fast"));

        for keyword in ["loop", "var", "fn", "struct", "vec2"] {
            let input = minimal(&format!("[uniforms.{keyword}]\ntype = \"f\""));
            let err = StageConfig::from_toml_str(&input).unwrap_err();
            assert!(err.to_string().contains(keyword), "{keyword}: {err}");
        }
        assert!(StageConfig::from_toml_str(&minimal("[uniforms.looping]\ntype = \"f\"")).is_ok());
    }

    #[test]
    fn camera_must_not_sit_on_its_target() {
        let input = minimal("[camera]\nposition = [1, 2, 3]\ntarget = [1, 2, 3]");
        let err = StageConfig::from_toml_str(&input).unwrap_err();
        assert!(err.to_string().contains("camera.position"), "{err}");
    }

    #[test]
    fn passes_resolve_relative_to_the_config_directory() {
        let config = StageConfig::from_toml_str(SAMPLE)
            .unwrap()
            .with_base_dir("/home/stage");
        let passes = config.resolved_passes();
        assert_eq!(
            passes[0],
            ("ripples".to_string(), PathBuf::from("/home/stage/ripples.wgsl"))
        );
        assert_eq!(
            passes[1],
            ("overlay".to_string(), PathBuf::from("/opt/stage/overlay.wgsl"))
        );
    }

    #[test]
    fn antialias_accepts_names_and_sample_counts() {
        assert_eq!("max".parse::<AntialiasSetting>(), Ok(AntialiasSetting::Auto));
        assert_eq!("none".parse::<AntialiasSetting>(), Ok(AntialiasSetting::Off));
        assert_eq!("16".parse::<AntialiasSetting>(), Ok(AntialiasSetting::Samples16));
        assert!("3".parse::<AntialiasSetting>().is_err());
        assert_eq!(AntialiasSetting::from_samples(8), Some(AntialiasSetting::Samples8));
    }
}
