use std::collections::HashMap;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration};

use crate::surface::Surface as Image;

pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub shapes_pipeline: RenderPipeline,
    pub textured_pipeline: RenderPipeline,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenUniforms {
    pub screen_size: [f32; 2],
    pub _padding: [f32; 2], // Padding to make it 16-byte aligned
}

pub struct ScreenBuffers {
    pub uniform: Buffer,
    pub bind_group: BindGroup,
}

/// Vertex and index buffers that are replaced when a frame outgrows them.
pub struct MeshBuffers {
    label: &'static str,
    pub vertex: Option<Buffer>,
    pub index: Option<Buffer>,
}

impl MeshBuffers {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            vertex: None,
            index: None,
        }
    }

    pub fn upload<V: bytemuck::Pod>(&mut self, device: &Device, queue: &Queue, vertices: &[V], indices: &[u32]) {
        if vertices.is_empty() || indices.is_empty() {
            return;
        }
        write_or_grow(
            device,
            queue,
            &mut self.vertex,
            self.label,
            bytemuck::cast_slice(vertices),
            wgpu::BufferUsages::VERTEX,
        );
        write_or_grow(
            device,
            queue,
            &mut self.index,
            self.label,
            bytemuck::cast_slice(indices),
            wgpu::BufferUsages::INDEX,
        );
    }
}

fn write_or_grow(
    device: &Device,
    queue: &Queue,
    slot: &mut Option<Buffer>,
    label: &str,
    contents: &[u8],
    usage: wgpu::BufferUsages,
) {
    match slot {
        Some(buffer) if buffer.size() >= contents.len() as u64 => {
            queue.write_buffer(buffer, 0, contents);
        }
        _ => {
            *slot = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            }));
        }
    }
}

/// An RGBA texture with the bind group the textured pipeline samples it through.
pub struct TextureSlot {
    pub texture: wgpu::Texture,
    pub bind_group: BindGroup,
}

impl TextureSlot {
    pub fn new(
        device: &Device,
        layout: &BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
        width: u32,
        height: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            label: Some(label),
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
        });
        Self { texture, bind_group }
    }

    pub fn write(&self, queue: &Queue, pixels: &[u8], width: u32, height: u32) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// GPU copies of the images drawn in recent frames, keyed by surface id.
pub struct TextureCache {
    pub layout: BindGroupLayout,
    pub sampler: wgpu::Sampler,
    pub atlas: TextureSlot,
    surfaces: HashMap<u64, TextureSlot>,
}

impl TextureCache {
    pub fn new(device: &Device, layout: BindGroupLayout, atlas_size: u32) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let atlas = TextureSlot::new(device, &layout, &sampler, "glyph atlas", atlas_size, atlas_size);
        Self {
            layout,
            sampler,
            atlas,
            surfaces: HashMap::new(),
        }
    }

    /// Uploads surfaces not seen before and drops textures no longer drawn.
    pub fn sync(&mut self, device: &Device, queue: &Queue, used: &HashMap<u64, Image>) {
        self.surfaces.retain(|id, _| used.contains_key(id));
        for (id, image) in used {
            if self.surfaces.contains_key(id) {
                continue;
            }
            let slot = TextureSlot::new(
                device,
                &self.layout,
                &self.sampler,
                "surface",
                image.width(),
                image.height(),
            );
            slot.write(queue, image.pixels(), image.width(), image.height());
            self.surfaces.insert(*id, slot);
        }
    }

    pub fn surface(&self, id: u64) -> Option<&TextureSlot> {
        self.surfaces.get(&id)
    }
}
