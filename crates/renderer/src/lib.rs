//! Renderer: wgpu implementation of [`SceneRenderer`].
//! wgpu = 0.26.x, winit = 0.30.x
//!
//! One frame is a depth-only shadow pass from the shadowed directional
//! light followed by a forward pass (opaque, then blended back to front).
//! Untextured materials sample a 1x1 white texture.

mod mesh;
mod shadow;
mod texture;
mod uniforms;

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{Context, Result};
use corelib::camera::Camera;
use corelib::light::Light;
use corelib::material::Side;
use corelib::render::{RenderError, SceneRenderer, ShadowMode};
use corelib::scene::{DrawItem, GeometryId, Scene, TextureId};
use corelib::texture::TextureData;
use wgpu::{
    BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType,
    BlendState, Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, DepthBiasState, DepthStencilState, Device, DeviceDescriptor,
    Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayout, PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    Sampler, ShaderModule, ShaderModuleDescriptor, ShaderSource, ShaderStages, StoreOp, Surface,
    SurfaceConfiguration, SurfaceError, TextureDescriptor, TextureDimension, TextureFormat,
    TextureUsages, TextureView, TextureViewDescriptor, VertexState,
};
use winit::window::Window;

use crate::mesh::GpuMesh;
use crate::shadow::{SHADOW_FORMAT, ShadowMap, directional_light_matrix};
use crate::uniforms::{DrawUniform, FrameUniform, GpuVertex};

pub use crate::uniforms::MAX_LIGHTS;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const INITIAL_DRAW_CAPACITY: usize = 16;

/// Forward pipelines keyed by blending and face culling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PipelineKey {
    blended: bool,
    double_sided: bool,
}

impl PipelineKey {
    const ALL: [PipelineKey; 4] = [
        PipelineKey { blended: false, double_sided: false },
        PipelineKey { blended: false, double_sided: true },
        PipelineKey { blended: true, double_sided: false },
        PipelineKey { blended: true, double_sided: true },
    ];

    fn of(item: &DrawItem) -> Self {
        Self {
            blended: item.material.is_blended(),
            double_sided: item.material.side == Side::Double,
        }
    }
}

/// Dynamic-offset uniform buffer holding one [`DrawUniform`] per draw.
struct DrawBuffer {
    buffer: Buffer,
    bind_group: BindGroup,
    stride: u64,
    capacity: usize,
}

impl DrawBuffer {
    fn new(device: &Device, layout: &BindGroupLayout, stride: u64, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw UBO"),
            size: stride * capacity as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw BG"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }

    fn offset(&self, slot: usize) -> u32 {
        (self.stride * slot as u64) as u32
    }
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines
    pipelines: HashMap<PipelineKey, RenderPipeline>,
    shadow_pipeline: RenderPipeline,

    // Per-frame bindings
    frame_bgl: BindGroupLayout,
    frame_buf: Buffer,
    frame_bg: BindGroup,
    shadow_frame_bg: BindGroup,
    draw_bgl: BindGroupLayout,
    draws: DrawBuffer,
    texture_bgl: BindGroupLayout,
    texture_sampler: Sampler,
    white_texture: BindGroup,

    // Targets
    depth_view: TextureView,
    shadow_map: ShadowMap,

    meshes: HashMap<GeometryId, GpuMesh>,
    textures: HashMap<TextureId, BindGroup>,

    // Size cache (logical pixels)
    width: u32,
    height: u32,
    pixel_ratio: f32,
    shadow_mode: ShadowMode,
}

impl GpuState {
    /// Create GPU state bound to an `Arc<Window>`, restricted to `backends`.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self> {
        let size = window.inner_size();
        let pixel_ratio = window.scale_factor() as f32;
        let logical = size.to_logical::<f64>(window.scale_factor());

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Showcase3D Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("request_device failed")?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Bind group layouts ====
        let frame_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Frame BGL"),
            entries: &[
                uniform_entry(0, ShaderStages::VERTEX_FRAGMENT, false, std::mem::size_of::<FrameUniform>()),
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        // The shadow pass writes the map, so it must not see it bound.
        let shadow_frame_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Shadow Frame BGL"),
            entries: &[uniform_entry(0, ShaderStages::VERTEX, false, std::mem::size_of::<FrameUniform>())],
        });
        let draw_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Draw BGL"),
            entries: &[uniform_entry(0, ShaderStages::VERTEX_FRAGMENT, true, std::mem::size_of::<DrawUniform>())],
        });

        let frame_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame UBO"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shadow_map = ShadowMap::new(&device, 1, 1);
        let frame_bg = create_frame_bind_group(&device, &frame_bgl, &frame_buf, &shadow_map);
        let shadow_frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Frame BG"),
            layout: &shadow_frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = (std::mem::size_of::<DrawUniform>() as u64).div_ceil(align) * align;
        let draws = DrawBuffer::new(&device, &draw_bgl, stride, INITIAL_DRAW_CAPACITY);

        let texture_bgl = texture::bind_group_layout(&device);
        let texture_sampler = texture::create_sampler(&device);
        let white_texture = texture::upload(
            &device,
            &queue,
            &texture_bgl,
            &texture_sampler,
            "White Texture",
            &TextureData::solid([255; 4]),
        );

        // ==== Shaders & pipelines ====
        let mesh_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });
        let shadow_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Shadow WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/shadow.wgsl").into()),
        });

        let forward_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Forward PipelineLayout"),
            bind_group_layouts: &[&frame_bgl, &draw_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let pipelines = PipelineKey::ALL
            .into_iter()
            .map(|key| {
                let p = create_forward_pipeline(&device, &forward_layout, &mesh_shader, surface_format, key);
                (key, p)
            })
            .collect();

        let shadow_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Shadow PipelineLayout"),
            bind_group_layouts: &[&shadow_frame_bgl, &draw_bgl],
            push_constant_ranges: &[],
        });
        let shadow_pipeline = create_shadow_pipeline(&device, &shadow_layout, &shadow_shader);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipelines,
            shadow_pipeline,
            frame_bgl,
            frame_buf,
            frame_bg,
            shadow_frame_bg,
            draw_bgl,
            draws,
            texture_bgl,
            texture_sampler,
            white_texture,
            depth_view,
            shadow_map,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            width: (logical.width.round() as u32).max(1),
            height: (logical.height.round() as u32).max(1),
            pixel_ratio,
            shadow_mode: ShadowMode::Disabled,
        })
    }

    /// Reconfigure the surface at logical size × pixel ratio and recreate the depth view.
    fn reconfigure(&mut self) {
        let physical = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        self.surface_config.width = physical(self.width);
        self.surface_config.height = physical(self.height);
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Uploads geometries seen for the first time. Geometries are immutable once added.
    fn upload_meshes(&mut self, scene: &Scene, items: &[DrawItem]) {
        for item in items {
            if self.meshes.contains_key(&item.geometry) {
                continue;
            }
            match scene.geometry(item.geometry) {
                Some(data) => {
                    let label = format!("Geometry {}", item.geometry.index());
                    self.meshes
                        .insert(item.geometry, GpuMesh::upload(&self.device, &label, data));
                }
                None => log::warn!("Draw references unknown geometry {:?}", item.geometry),
            }
        }
    }

    /// Uploads base colour maps seen for the first time.
    fn upload_textures(&mut self, scene: &Scene, items: &[DrawItem]) {
        for id in items.iter().filter_map(|i| i.material.base_color_map) {
            if self.textures.contains_key(&id) {
                continue;
            }
            match scene.texture(id) {
                Some(data) => {
                    let label = format!("Texture {}", id.index());
                    log::debug!("Uploading {} ({}x{})", label, data.width, data.height);
                    let bg = texture::upload(
                        &self.device,
                        &self.queue,
                        &self.texture_bgl,
                        &self.texture_sampler,
                        &label,
                        data,
                    );
                    self.textures.insert(id, bg);
                }
                None => log::warn!("Draw references unknown texture {:?}", id),
            }
        }
    }

    /// Resizes the shadow map to the shadow-casting light's settings.
    fn ensure_shadow_map(&mut self, size: (u32, u32)) {
        if self.shadow_map.size() == size {
            return;
        }
        self.shadow_map = ShadowMap::new(&self.device, size.0, size.1);
        self.frame_bg =
            create_frame_bind_group(&self.device, &self.frame_bgl, &self.frame_buf, &self.shadow_map);
    }

    fn ensure_draw_capacity(&mut self, count: usize) {
        if count <= self.draws.capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        log::debug!("Growing draw buffer to {} slots", capacity);
        self.draws = DrawBuffer::new(&self.device, &self.draw_bgl, self.draws.stride, capacity);
    }
}

impl SceneRenderer for GpuState {
    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = if ratio > 0.0 { ratio } else { 1.0 };
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.reconfigure();
    }

    fn set_shadow_mode(&mut self, mode: ShadowMode) {
        self.shadow_mode = mode;
    }

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        // --- gather draws: opaque first, then blended back to front
        let view = camera.view();
        let mut items = scene.draw_items();
        let sort_key = |i: &DrawItem| {
            let depth = view.transform_point3(i.world.w_axis.truncate()).z;
            (i.material.is_blended(), depth)
        };
        items.sort_by(|a, b| {
            sort_key(a)
                .partial_cmp(&sort_key(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.upload_meshes(scene, &items);
        self.upload_textures(scene, &items);
        self.ensure_draw_capacity(items.len());

        // --- uniforms
        let mut frame = FrameUniform::new(camera.proj_view(), camera.eye, scene.lights());
        let caster = scene.lights().find_map(|l| match l.light {
            Light::Directional { shadow: Some(cfg), .. } => Some((l.position, cfg)),
            _ => None,
        });
        let shadow_mode = if caster.is_some() { self.shadow_mode } else { ShadowMode::Disabled };
        if let Some((position, cfg)) = caster.filter(|_| shadow_mode != ShadowMode::Disabled) {
            self.ensure_shadow_map((cfg.map_width, cfg.map_height));
            frame.set_shadow(shadow_mode, directional_light_matrix(position), self.shadow_map.size());
        }
        self.queue.write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&frame));

        let stride = self.draws.stride as usize;
        let mut draw_bytes = vec![0u8; stride * items.len()];
        for (chunk, item) in draw_bytes.chunks_exact_mut(stride).zip(&items) {
            let u = DrawUniform::from(item);
            chunk[..std::mem::size_of::<DrawUniform>()].copy_from_slice(bytemuck::bytes_of(&u));
        }
        if !draw_bytes.is_empty() {
            self.queue.write_buffer(&self.draws.buffer, 0, &draw_bytes);
        }

        // --- frame
        let frame_tex = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                self.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(e.to_string())),
        };
        let target = frame_tex.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        if shadow_mode != ShadowMode::Disabled {
            let mut spass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("ShadowPass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            spass.set_pipeline(&self.shadow_pipeline);
            spass.set_bind_group(0, &self.shadow_frame_bg, &[]);
            for (slot, item) in items.iter().enumerate().filter(|(_, i)| i.cast_shadow) {
                let Some(mesh) = self.meshes.get(&item.geometry) else {
                    continue;
                };
                spass.set_bind_group(1, &self.draws.bind_group, &[self.draws.offset(slot)]);
                spass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                spass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                spass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        {
            let bg = scene.background;
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target,
                    depth_slice: None, // required in 0.26
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            rpass.set_bind_group(0, &self.frame_bg, &[]);
            let mut bound: Option<PipelineKey> = None;
            for (slot, item) in items.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&item.geometry) else {
                    continue;
                };
                let key = PipelineKey::of(item);
                if bound != Some(key) {
                    if let Some(p) = self.pipelines.get(&key) {
                        rpass.set_pipeline(p);
                    }
                    bound = Some(key);
                }
                let base_color = item
                    .material
                    .base_color_map
                    .and_then(|id| self.textures.get(&id))
                    .unwrap_or(&self.white_texture);
                rpass.set_bind_group(1, &self.draws.bind_group, &[self.draws.offset(slot)]);
                rpass.set_bind_group(2, base_color, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                rpass.set_index_buffer(mesh.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame_tex.present();
        Ok(())
    }
}

fn uniform_entry(binding: u32, visibility: ShaderStages, dynamic: bool, size: usize) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn create_frame_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    frame_buf: &Buffer,
    shadow_map: &ShadowMap,
) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Frame BG"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&shadow_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
            },
        ],
    })
}

fn create_forward_pipeline(
    device: &Device,
    layout: &PipelineLayout,
    shader: &ShaderModule,
    format: TextureFormat,
    key: PipelineKey,
) -> RenderPipeline {
    let label = format!(
        "Forward Pipeline ({}, {})",
        if key.blended { "blended" } else { "opaque" },
        if key.double_sided { "double" } else { "front" }
    );
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[GpuVertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(ColorTargetState {
                format,
                blend: Some(if key.blended {
                    BlendState::ALPHA_BLENDING
                } else {
                    BlendState::REPLACE
                }),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            cull_mode: if key.double_sided { None } else { Some(wgpu::Face::Back) },
            ..Default::default()
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: !key.blended,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_shadow_pipeline(device: &Device, layout: &PipelineLayout, shader: &ShaderModule) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("Shadow Pipeline"),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[GpuVertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: None,
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(DepthStencilState {
            format: SHADOW_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
