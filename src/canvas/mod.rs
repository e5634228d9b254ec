use std::fmt;

use crate::camera::Camera;
use crate::color::Color;
use crate::error::Result;
use crate::frame::{ClipRect, Frame};
use crate::geometry::{Point2D, Rectangle};
use crate::graphics::Renderer;
use crate::text_renderer::TextEngine;

pub type DrawCallback = Box<dyn FnMut(&mut Renderer<'_>)>;

/// A drawing area inside the main window, with its own camera.
///
/// The draw callback runs whenever the canvas is repainted; the renderer it
/// receives knows the canvas size through [`Renderer::width`] and [`Renderer::height`].
pub struct Canvas {
    id: String,
    camera: Camera,
    background: Color,
    draw: DrawCallback,
    // window pixels
    placement: Rectangle,
    dirty: bool,
}

impl Canvas {
    pub fn new(
        id: impl Into<String>,
        world: Rectangle,
        background: Color,
        draw: impl FnMut(&mut Renderer<'_>) + 'static,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            camera: Camera::new(world)?,
            background,
            draw: Box::new(draw),
            placement: Rectangle::with_size(Point2D::ORIGIN, 1.0, 1.0),
            dirty: true,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Changes made through the camera are picked up on the next [`redraw`](Self::redraw).
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
        self.dirty = true;
    }

    pub fn set_draw_callback(&mut self, draw: impl FnMut(&mut Renderer<'_>) + 'static) {
        self.draw = Box::new(draw);
        self.dirty = true;
    }

    /// Requests a repaint on the next frame.
    pub fn redraw(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn placement(&self) -> Rectangle {
        self.placement
    }

    pub fn width(&self) -> f64 {
        self.placement.width()
    }

    pub fn height(&self) -> f64 {
        self.placement.height()
    }

    pub(crate) fn place(&mut self, placement: Rectangle) -> Result<()> {
        if placement == self.placement {
            return Ok(());
        }
        self.camera
            .update_screen(placement.width(), placement.height())?;
        self.placement = placement;
        self.dirty = true;
        Ok(())
    }

    /// Whether a window pixel lies on this canvas.
    pub fn contains(&self, window: Point2D) -> bool {
        self.placement.contains(window)
    }

    /// Window pixels to canvas pixels.
    pub fn to_local(&self, window: Point2D) -> Point2D {
        window - self.placement.bottom_left()
    }

    /// Window pixels to world coordinates.
    pub fn to_world(&self, window: Point2D) -> Point2D {
        self.camera.screen_to_world(self.to_local(window))
    }

    pub(crate) fn paint(&mut self, frame: &mut Frame, text: &mut TextEngine) {
        let outer = frame.clip();
        frame.set_clip(Some(ClipRect::from_rectangle(self.placement)));
        let requested = {
            let mut renderer =
                Renderer::new(&self.camera, self.placement.bottom_left(), frame, text);
            renderer.clear(self.background);
            (self.draw)(&mut renderer);
            renderer.requested_world()
        };
        frame.set_clip(outer);
        self.dirty = false;

        if let Some(world) = requested {
            // already validated by the renderer
            if let Err(err) = self.camera.set_world(world) {
                log::warn!("canvas {}: {err}", self.id);
            }
        }
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("id", &self.id)
            .field("camera", &self.camera)
            .field("placement", &self.placement)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
