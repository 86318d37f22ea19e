use crate::{EulerRot, Mat4, Quat, Vec3};

/// Node transform with Euler rotation (XYZ order, radians).
///
/// `rotation_euler.y` is the yaw driven by drag and auto-rotation,
/// `rotation_euler.x` the pitch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_euler: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    #[inline]
    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = Vec3::splat(s);
    }

    /// Rotation about the vertical axis.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.rotation_euler.y
    }

    /// Rotation about the horizontal axis.
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.rotation_euler.x
    }

    #[inline]
    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.rotation_euler.y += d_yaw;
        self.rotation_euler.x += d_pitch;
    }

    /// Build matrix = T * R * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_euler.x,
            self.rotation_euler.y,
            self.rotation_euler.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
