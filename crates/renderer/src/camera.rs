use glam::{Mat4, Vec3};

/// Right-handed perspective camera with cached view and projection matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    view_matrix: Mat4,
    projection_matrix: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera.update_view_matrix();
        camera
    }

    /// Recomputes the projection after `fov`, `aspect`, `near` or `far` change.
    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        self.projection_matrix = Mat4::perspective_rh(self.fov, aspect, self.near, self.far);
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view_matrix();
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        self.update_view_matrix();
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    fn update_view_matrix(&mut self) {
        // Looking straight along `up` would produce a degenerate basis.
        let forward = (self.target - self.position).normalize_or_zero();
        let up = if forward.cross(self.up).length_squared() < f32::EPSILON {
            Vec3::Z
        } else {
            self.up
        };
        self.view_matrix = Mat4::look_at_rh(self.position, self.target, up);
    }
}
