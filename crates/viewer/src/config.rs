//! Fixed viewer constants, grouped so hosts and tests can tweak them.

use std::path::PathBuf;
use std::time::Duration;

use corelib::Vec3;
use corelib::light::ShadowConfig;
use corelib::render::ShadowMode;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub camera_position: Vec3,

    pub shadow_mode: ShadowMode,
    pub directional_shadow: ShadowConfig,

    pub asset_path: PathBuf,
    pub load_timeout: Duration,
    /// Delay between window creation and viewer construction.
    pub init_delay: Duration,
    pub model_scale: f32,

    /// Radians per pixel of drag.
    pub drag_sensitivity: f32,
    /// Radians per frame added to the primary model's yaw when idle.
    pub auto_rotate_speed: f32,
    /// Per-frame (yaw, pitch) increments of the other meshes.
    pub spin_speed: (f32, f32),
    /// Frames between "still animating" debug lines.
    pub frame_log_interval: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            z_near: 0.1,
            z_far: 1000.0,
            camera_position: Vec3::new(0.0, 0.0, 5.0),
            shadow_mode: ShadowMode::PcfSoft,
            directional_shadow: ShadowConfig {
                map_width: 2048,
                map_height: 2048,
            },
            asset_path: PathBuf::from("assets/model.glb"),
            load_timeout: Duration::from_secs(15),
            init_delay: Duration::from_secs(1),
            model_scale: 0.01,
            drag_sensitivity: 0.01,
            auto_rotate_speed: 0.005,
            spin_speed: (0.01, 0.005),
            frame_log_interval: 100,
        }
    }
}
