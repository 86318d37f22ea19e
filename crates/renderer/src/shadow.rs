//! Directional shadow map: depth target, comparison sampler, light matrix.

use corelib::{Mat4, Vec3};
use wgpu::{Device, Sampler, TextureFormat, TextureView};

pub const SHADOW_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Half extent of the orthographic box the light sees, in world units.
const SHADOW_EXTENT: f32 = 6.0;

pub struct ShadowMap {
    pub view: TextureView,
    pub sampler: Sampler,
    pub width: u32,
    pub height: u32,
}

impl ShadowMap {
    pub fn new(device: &Device, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Shadow Map View"),
            aspect: wgpu::TextureAspect::DepthOnly,
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Comparison Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        log::debug!("Shadow map {}x{} created", width, height);
        Self {
            view,
            sampler,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// World to light clip space for a directional light at `position`
/// shining at the origin.
pub fn directional_light_matrix(position: Vec3) -> Mat4 {
    let dir = position.normalize_or(Vec3::Y);
    let eye = dir * SHADOW_EXTENT * 2.0;
    let up = if dir.abs_diff_eq(Vec3::Y, 1e-3) || dir.abs_diff_eq(-Vec3::Y, 1e-3) {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, up);
    let proj = Mat4::orthographic_rh(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        0.1,
        SHADOW_EXTENT * 4.0,
    );
    proj * view
}
