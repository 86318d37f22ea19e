//! GPU copies of scene textures, bound as group 2 of the forward pass.

use corelib::texture::TextureData;
use wgpu::util::{DeviceExt, TextureDataOrder};
use wgpu::{BindGroup, BindGroupLayout, Device, Queue, Sampler, TextureFormat};

/// Base colour maps hold sRGB-encoded colours.
pub const BASE_COLOR_FORMAT: TextureFormat = TextureFormat::Rgba8UnormSrgb;

pub fn bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Texture BGL"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Repeating linear sampler shared by every base colour map.
pub fn create_sampler(device: &Device) -> Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Base Color Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn descriptor<'a>(label: &'a str, data: &TextureData) -> wgpu::TextureDescriptor<'a> {
    wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: BASE_COLOR_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    }
}

/// Uploads `data` and returns the bind group that samples it.
pub fn upload(
    device: &Device,
    queue: &Queue,
    layout: &BindGroupLayout,
    sampler: &Sampler,
    label: &str,
    data: &TextureData,
) -> BindGroup {
    let texture = device.create_texture_with_data(
        queue,
        &descriptor(label, data),
        TextureDataOrder::LayerMajor,
        &data.rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_matches_image() {
        let data = TextureData::new_rgba8(4, 2, vec![0; 32]).unwrap();
        let desc = descriptor("t", &data);
        assert_eq!((desc.size.width, desc.size.height), (4, 2));
        assert_eq!(desc.size.depth_or_array_layers, 1);
        assert_eq!(desc.format, BASE_COLOR_FORMAT);
        assert!(desc.format.is_srgb());
        assert!(desc.usage.contains(wgpu::TextureUsages::TEXTURE_BINDING));
    }
}
