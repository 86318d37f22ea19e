//! The seam between scene state and a concrete GPU backend.

use thiserror::Error;

use crate::camera::Camera;
use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface must be reconfigured; the frame was skipped.
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("render failed: {0}")]
    Other(String),
}

/// Shadow map filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShadowMode {
    #[default]
    Disabled,
    /// Single depth comparison.
    Hard,
    /// Percentage-closer filtering over a 3x3 kernel.
    PcfSoft,
}

/// Turns a scene into pixels through a camera.
pub trait SceneRenderer {
    /// Logical-to-physical pixel scale.
    fn set_pixel_ratio(&mut self, ratio: f32);
    /// Output size in logical pixels.
    fn set_size(&mut self, width: u32, height: u32);
    fn set_shadow_mode(&mut self, mode: ShadowMode);
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;
}
