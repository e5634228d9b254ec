use std::collections::HashMap;
use std::ops::Range;

use crate::color::Color;
use crate::geometry::Rectangle;
use crate::surface::Surface;
use crate::tessellate::Mesh;
use crate::vertex::{TexVertex, Vertex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    Glyphs,
    Surface(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Shapes,
    Textured(TextureKey),
}

/// Scissor rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    /// Pixel bounds of a window-space rectangle, rounded outward.
    pub fn from_rectangle(rect: Rectangle) -> Self {
        let x = rect.left().max(0.0).floor();
        let y = rect.bottom().max(0.0).floor();
        let right = rect.right().max(0.0).ceil();
        let bottom = rect.top().max(0.0).ceil();
        Self {
            x: x as u32,
            y: y as u32,
            width: (right - x) as u32,
            height: (bottom - y) as u32,
        }
    }

    /// Clamped to a target of `width` x `height`; `None` when nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<ClipRect> {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let w = (self.x + self.width).min(width) - x;
        let h = (self.y + self.height).min(height) - y;
        (w > 0 && h > 0).then_some(ClipRect {
            x,
            y,
            width: w,
            height: h,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub pipeline: Pipeline,
    pub indices: Range<u32>,
    pub clip: Option<ClipRect>,
}

/// Everything recorded for one redraw of the window, in painter's order.
pub struct Frame {
    pub clear: Color,
    pub shapes: Mesh<Vertex>,
    pub textured: Mesh<TexVertex>,
    pub calls: Vec<DrawCall>,
    pub surfaces: HashMap<u64, Surface>,
    clip: Option<ClipRect>,
}

impl Frame {
    pub fn new(clear: Color) -> Self {
        Self {
            clear,
            shapes: Mesh::new(),
            textured: Mesh::new(),
            calls: Vec::new(),
            surfaces: HashMap::new(),
            clip: None,
        }
    }

    pub fn clip(&self) -> Option<ClipRect> {
        self.clip
    }

    pub fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.clip = clip;
    }

    pub fn push_shapes(&mut self, build: impl FnOnce(&mut Mesh<Vertex>)) {
        let start = self.shapes.indices.len() as u32;
        build(&mut self.shapes);
        let end = self.shapes.indices.len() as u32;
        self.record(Pipeline::Shapes, start..end);
    }

    pub fn push_textured(&mut self, key: TextureKey, build: impl FnOnce(&mut Mesh<TexVertex>)) {
        let start = self.textured.indices.len() as u32;
        build(&mut self.textured);
        let end = self.textured.indices.len() as u32;
        self.record(Pipeline::Textured(key), start..end);
    }

    /// Keeps the surface alive until the frame has been rendered.
    pub fn use_surface(&mut self, surface: &Surface) {
        self.surfaces
            .entry(surface.id())
            .or_insert_with(|| surface.clone());
    }

    fn record(&mut self, pipeline: Pipeline, indices: Range<u32>) {
        if indices.is_empty() {
            return;
        }
        if let Some(last) = self.calls.last_mut() {
            if last.pipeline == pipeline && last.clip == self.clip && last.indices.end == indices.start
            {
                last.indices.end = indices.end;
                return;
            }
        }
        self.calls.push(DrawCall {
            pipeline,
            indices,
            clip: self.clip,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;
    use crate::tessellate::fill_quad;

    fn quad(mesh: &mut Mesh<Vertex>) {
        fill_quad(mesh, [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]], [1.0; 4]);
    }

    #[test]
    fn test_consecutive_shapes_merge_into_one_call() {
        let mut frame = Frame::new(WHITE);
        frame.push_shapes(quad);
        frame.push_shapes(quad);
        assert_eq!(frame.calls.len(), 1);
        assert_eq!(frame.calls[0].indices, 0..12);
    }

    #[test]
    fn test_clip_or_pipeline_change_splits_calls() {
        let mut frame = Frame::new(WHITE);
        frame.push_shapes(quad);
        frame.set_clip(Some(ClipRect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        }));
        frame.push_shapes(quad);
        frame.push_textured(TextureKey::Glyphs, |_| {});
        frame.push_shapes(quad);
        // the empty textured call is dropped, so the last two shape pushes merge
        assert_eq!(frame.calls.len(), 2);
        assert_eq!(frame.calls[1].indices, 6..18);
    }

    #[test]
    fn test_clip_rect_rounds_outward_and_clamps() {
        let clip = ClipRect::from_rectangle(Rectangle::new((10.5, 2.2), (20.1, 30.0)));
        assert_eq!(
            clip,
            ClipRect {
                x: 10,
                y: 2,
                width: 11,
                height: 28
            }
        );
        assert_eq!(clip.clamp_to(15, 100).map(|c| c.width), Some(5));
        assert_eq!(clip.clamp_to(5, 100), None);
    }
}
