use crate::app_state::State;
use crate::frame::{ClipRect, Frame, Pipeline, TextureKey};
use crate::text_renderer::GlyphAtlas;

impl State {
    pub fn render(&mut self, frame: &Frame, atlas: &mut GlyphAtlas) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;

        if atlas.is_dirty() {
            self.textures
                .atlas
                .write(queue, atlas.pixels(), atlas.size(), atlas.size());
            atlas.mark_uploaded();
        }
        self.textures.sync(device, queue, &frame.surfaces);
        self.shapes
            .upload(device, queue, &frame.shapes.vertices, &frame.shapes.indices);
        self.textured
            .upload(device, queue, &frame.textured.vertices, &frame.textured.indices);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.screen.bind_group, &[]);
            let (width, height) = (self.gpu.config.width, self.gpu.config.height);

            for call in &frame.calls {
                let clip = match call.clip {
                    Some(clip) => match clip.clamp_to(width, height) {
                        Some(clip) => clip,
                        // entirely off screen
                        None => continue,
                    },
                    None => ClipRect {
                        x: 0,
                        y: 0,
                        width,
                        height,
                    },
                };
                render_pass.set_scissor_rect(clip.x, clip.y, clip.width, clip.height);

                match call.pipeline {
                    Pipeline::Shapes => {
                        let (Some(vertex), Some(index)) = (&self.shapes.vertex, &self.shapes.index) else {
                            continue;
                        };
                        render_pass.set_pipeline(&self.gpu.shapes_pipeline);
                        render_pass.set_vertex_buffer(0, vertex.slice(..));
                        render_pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                    }
                    Pipeline::Textured(key) => {
                        let (Some(vertex), Some(index)) = (&self.textured.vertex, &self.textured.index) else {
                            continue;
                        };
                        let slot = match key {
                            TextureKey::Glyphs => Some(&self.textures.atlas),
                            TextureKey::Surface(id) => self.textures.surface(id),
                        };
                        let Some(slot) = slot else {
                            log::warn!("no texture for {key:?}");
                            continue;
                        };
                        render_pass.set_pipeline(&self.gpu.textured_pipeline);
                        render_pass.set_bind_group(1, &slot.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, vertex.slice(..));
                        render_pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                    }
                }
                render_pass.draw_indexed(call.indices.clone(), 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
