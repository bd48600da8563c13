use std::time::Duration;

use glam::Vec3;
use renderer::{
    Antialiasing, CameraSettings, OrchestratorConfig, PointerSpace, RenderPolicy,
    UniformBindings,
};
use stageconfig::{AntialiasSetting, BindingsSection, CameraSection, PointerSpaceSetting};

pub fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting {
        AntialiasSetting::Auto => Antialiasing::Auto,
        AntialiasSetting::Off => Antialiasing::Off,
        AntialiasSetting::Samples2 => Antialiasing::Samples(2),
        AntialiasSetting::Samples4 => Antialiasing::Samples(4),
        AntialiasSetting::Samples8 => Antialiasing::Samples(8),
        AntialiasSetting::Samples16 => Antialiasing::Samples(16),
    }
}

pub fn map_pointer_space(setting: PointerSpaceSetting) -> PointerSpace {
    match setting {
        PointerSpaceSetting::Raw => PointerSpace::Raw,
        PointerSpaceSetting::Normalized => PointerSpace::Normalized,
        PointerSpaceSetting::Device => PointerSpace::Device,
    }
}

pub fn uniform_bindings(section: &BindingsSection) -> UniformBindings {
    UniformBindings {
        time: section.time.clone(),
        resolution: section.resolution.clone(),
        pointer: section.pointer.clone(),
        pointer_space: map_pointer_space(section.pointer_space),
        time_delta: section.time_delta.clone(),
        frame: section.frame.clone(),
    }
}

pub fn camera_settings(section: &CameraSection) -> CameraSettings {
    CameraSettings {
        fov_degrees: section.fov,
        near: section.near,
        far: section.far,
        position: Vec3::from_array(section.position),
        target: Vec3::from_array(section.target),
        orbit_controls: section.orbit,
    }
}

pub fn orchestrator_config(bindings: &BindingsSection, camera: &CameraSection) -> OrchestratorConfig {
    OrchestratorConfig {
        bindings: uniform_bindings(bindings),
        camera: camera_settings(camera),
    }
}

/// A still timestamp wins over an FPS cap; a cap of zero means uncapped.
pub fn render_policy(fps: Option<f32>, still_time: Option<Duration>) -> RenderPolicy {
    match still_time {
        Some(time) => RenderPolicy::Still {
            time: time.as_secs_f32(),
        },
        None => RenderPolicy::Animate {
            target_fps: fps.filter(|fps| *fps > 0.0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_map_to_renderer_types() {
        assert_eq!(map_antialias(AntialiasSetting::Samples4), Antialiasing::Samples(4));
        assert_eq!(map_pointer_space(PointerSpaceSetting::Raw), PointerSpace::Raw);

        let camera = camera_settings(&CameraSection::default());
        assert_eq!(camera, CameraSettings::default());

        let bindings = uniform_bindings(&BindingsSection::default());
        assert_eq!(bindings, UniformBindings::default());
    }

    #[test]
    fn still_time_overrides_fps_cap() {
        assert_eq!(
            render_policy(Some(30.0), Some(Duration::from_millis(1500))),
            RenderPolicy::Still { time: 1.5 }
        );
        assert_eq!(
            render_policy(Some(0.0), None),
            RenderPolicy::Animate { target_fps: None }
        );
        assert_eq!(
            render_policy(Some(24.0), None),
            RenderPolicy::Animate { target_fps: Some(24.0) }
        );
    }
}
