//! CPU mirrors of the WGSL structs in `shaders/mesh.wgsl`.

use bytemuck::{Pod, Zeroable};
use corelib::Mat4;
use corelib::light::Light;
use corelib::render::ShadowMode;
use corelib::scene::{DrawItem, LightItem};
use wgpu::{VertexBufferLayout, VertexStepMode};

/// Lights of one kind the forward pass evaluates.
pub const MAX_LIGHTS: usize = 4;

/// Vertex: position + normal + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GpuVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
    };
}

impl From<&corelib::geometry::MeshVertex> for GpuVertex {
    fn from(v: &corelib::geometry::MeshVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

/// Directional: `vector` points towards the light. Point: `vector` is the position.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct LightSlot {
    pub vector: [f32; 4],
    pub color: [f32; 4],
}

/// Per-frame UBO (16-byte aligned, 448 bytes).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    /// x: directional count, y: point count, z: shadowed directional slot, w: shadow mode.
    pub counts: [u32; 4],
    /// xy: shadow texel size, z: depth bias.
    pub shadow: [f32; 4],
    pub directional: [LightSlot; MAX_LIGHTS],
    pub points: [LightSlot; MAX_LIGHTS],
}

pub const NO_SHADOW_SLOT: u32 = u32::MAX;

impl FrameUniform {
    /// Packs the scene lights. Extra lights beyond [`MAX_LIGHTS`] per kind are dropped.
    pub fn new(view_proj: Mat4, camera_pos: corelib::Vec3, lights: impl Iterator<Item = LightItem>) -> Self {
        let mut u = Self::zeroed();
        u.view_proj = view_proj.to_cols_array_2d();
        u.light_view_proj = Mat4::IDENTITY.to_cols_array_2d();
        u.camera_pos = camera_pos.extend(1.0).to_array();
        u.counts[2] = NO_SHADOW_SLOT;

        let mut ambient = [0.0f32; 3];
        let (mut n_dir, mut n_point) = (0usize, 0usize);
        for item in lights {
            let radiance = item.light.radiance().to_array();
            match item.light {
                Light::Ambient { .. } => {
                    for (a, r) in ambient.iter_mut().zip(radiance) {
                        *a += r;
                    }
                }
                Light::Directional { .. } if n_dir < MAX_LIGHTS => {
                    let towards = item.position.normalize_or(corelib::Vec3::Y);
                    u.directional[n_dir] = LightSlot {
                        vector: towards.extend(0.0).to_array(),
                        color: [radiance[0], radiance[1], radiance[2], 1.0],
                    };
                    if item.light.casts_shadow() && u.counts[2] == NO_SHADOW_SLOT {
                        u.counts[2] = n_dir as u32;
                    }
                    n_dir += 1;
                }
                Light::Point { .. } if n_point < MAX_LIGHTS => {
                    u.points[n_point] = LightSlot {
                        vector: item.position.extend(1.0).to_array(),
                        color: [radiance[0], radiance[1], radiance[2], 1.0],
                    };
                    n_point += 1;
                }
                _ => log::debug!("Light limit reached, ignoring {:?}", item.light),
            }
        }
        u.ambient = [ambient[0], ambient[1], ambient[2], 1.0];
        u.counts[0] = n_dir as u32;
        u.counts[1] = n_point as u32;
        u
    }

    pub fn set_shadow(&mut self, mode: ShadowMode, light_view_proj: Mat4, map_size: (u32, u32)) {
        self.counts[3] = match mode {
            ShadowMode::Disabled => 0,
            ShadowMode::Hard => 1,
            ShadowMode::PcfSoft => 2,
        };
        self.light_view_proj = light_view_proj.to_cols_array_2d();
        self.shadow = [
            1.0 / map_size.0.max(1) as f32,
            1.0 / map_size.1.max(1) as f32,
            0.002,
            0.0,
        ];
    }
}

/// Per-draw UBO, bound with a dynamic offset.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb + opacity.
    pub color: [f32; 4],
    /// x: lit, y: receives shadow.
    pub flags: [f32; 4],
}

impl From<&DrawItem> for DrawUniform {
    fn from(item: &DrawItem) -> Self {
        let c = item.material.color;
        let lit = item.material.shading == corelib::material::Shading::Phong;
        Self {
            model: item.world.to_cols_array_2d(),
            normal_matrix: item.world.inverse().transpose().to_cols_array_2d(),
            color: [c.r, c.g, c.b, item.material.opacity],
            flags: [
                if lit { 1.0 } else { 0.0 },
                if item.receive_shadow { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::Vec3;
    use corelib::light::ShadowConfig;
    use corelib::material::Color;

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 448);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 160);
        assert_eq!(std::mem::size_of::<GpuVertex>(), 32);
    }

    #[test]
    fn lights_are_packed_by_kind() {
        let lights = vec![
            LightItem {
                position: Vec3::ZERO,
                light: Light::ambient(Color::WHITE, 0.4),
            },
            LightItem {
                position: Vec3::new(5.0, 5.0, 5.0),
                light: Light::directional(Color::WHITE, 0.8).with_shadow(ShadowConfig::default()),
            },
            LightItem {
                position: Vec3::new(-5.0, 5.0, 5.0),
                light: Light::point(Color::WHITE, 0.5),
            },
        ];
        let u = FrameUniform::new(Mat4::IDENTITY, Vec3::Z, lights.into_iter());
        assert_eq!(&u.counts[..3], &[1, 1, 0]);
        assert!((u.ambient[0] - 0.4).abs() < 1e-6);
        assert!((u.directional[0].color[1] - 0.8).abs() < 1e-6);
        let d = u.directional[0].vector;
        assert!((d[0] - d[1]).abs() < 1e-6 && (d[0] - 3f32.sqrt().recip()).abs() < 1e-5);
        assert_eq!(u.points[0].vector, [-5.0, 5.0, 5.0, 1.0]);
    }

    #[test]
    fn unshadowed_scene_has_no_shadow_slot() {
        let lights = vec![LightItem {
            position: Vec3::Y,
            light: Light::directional(Color::WHITE, 1.0),
        }];
        let u = FrameUniform::new(Mat4::IDENTITY, Vec3::Z, lights.into_iter());
        assert_eq!(u.counts[2], NO_SHADOW_SLOT);
    }
}
