use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;

/// Frame rate the damping factor is tuned for.
const DAMPING_REFERENCE_FPS: f32 = 60.0;
const POLAR_EPSILON: f32 = 1e-4;

/// Spherical orbit around a target with inertial damping.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    center: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    rotate_delta: Vec2,
}

impl OrbitControls {
    /// Starts orbiting around the camera's current target from its current position.
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let center = camera.target();
        let offset = camera.position() - center;
        let radius = offset.length().max(f32::EPSILON);
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,
            center,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            rotate_delta: Vec2::ZERO,
        }
    }

    /// Queues a rotation from a drag of `delta` logical pixels.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let per_pixel = TAU / viewport_height.max(1.0);
        self.rotate_delta -= delta * per_pixel * self.rotate_speed;
    }

    /// Wheel zoom; positive `scroll` moves towards the target.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let scale = (1.0 - self.zoom_speed).powf(scroll.abs());
        if scroll > 0.0 {
            self.radius *= scale;
        } else {
            self.radius /= scale;
        }
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);
    }

    /// Advances pending rotation by `dt` seconds and poses the camera.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt: f32) {
        if self.enable_damping {
            let retention = (1.0 - self.damping_factor).powf(dt.max(0.0) * DAMPING_REFERENCE_FPS);
            let applied = self.rotate_delta * (1.0 - retention);
            self.theta += applied.x;
            self.phi += applied.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }
        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let offset = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius;
        camera.set_position(self.center + offset);
        camera.look_at(self.center);
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// True while queued rotation is still being applied.
    pub fn is_settling(&self) -> bool {
        self.rotate_delta.length_squared() > 1e-10
    }
}
