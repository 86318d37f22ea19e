use crate::{Mat4, Vec3};

/// Perspective camera (right-handed).
///
/// The projection matrix is cached; after touching `aspect`, `fov_y_rad`
/// or the clip planes call [`Camera::update_projection_matrix`].
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
    projection: Mat4,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        let mut camera = Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Cached projection, depth in [0, 1] as wgpu expects.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        );
    }

    /// Set aspect from a pixel size; zero dimensions are clamped to 1.
    #[inline]
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }
}
