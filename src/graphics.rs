use crate::camera::Camera;
use crate::color::Color;
use crate::error::Result;
use crate::frame::{Frame, TextureKey};
use crate::geometry::{Point2D, Rectangle};
use crate::style::{
    CoordinateSystem, FontFace, HorizontalJustification, LineCap, LineDash, VerticalJustification,
};
use crate::surface::Surface;
use crate::tessellate::{self, StrokeStyle};
use crate::text_renderer::{TextEngine, TextExtents, TextPlacement};
use crate::vertex::TexVertex;

/// Immediate-mode drawing onto one canvas.
///
/// Coordinates are world units unless [`set_coordinate_system`](Self::set_coordinate_system)
/// switched to [`CoordinateSystem::Screen`], in which case they are canvas pixels
/// with the origin at the top-left. Line widths and font sizes are always pixels.
/// Angles are degrees, counter-clockwise from the positive x axis.
pub struct Renderer<'a> {
    camera: &'a Camera,
    // set by set_visible_world, handed back to the canvas after drawing
    adjusted: Option<Camera>,
    // canvas top-left in window pixels
    origin: Point2D,
    frame: &'a mut Frame,
    text: &'a mut TextEngine,
    color: Color,
    line_width: f64,
    cap: LineCap,
    dash: LineDash,
    font: FontFace,
    font_size: f64,
    text_rotation: f64,
    horizontal: HorizontalJustification,
    vertical: VerticalJustification,
    coordinates: CoordinateSystem,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(
        camera: &'a Camera,
        origin: Point2D,
        frame: &'a mut Frame,
        text: &'a mut TextEngine,
    ) -> Self {
        Self {
            camera,
            adjusted: None,
            origin,
            frame,
            text,
            color: Color::default(),
            line_width: 1.0,
            cap: LineCap::default(),
            dash: LineDash::default(),
            font: FontFace::default(),
            font_size: 12.0,
            text_rotation: 0.0,
            horizontal: HorizontalJustification::default(),
            vertical: VerticalJustification::default(),
            coordinates: CoordinateSystem::default(),
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> f64 {
        self.camera().screen().width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> f64 {
        self.camera().screen().height()
    }

    pub fn camera(&self) -> &Camera {
        self.adjusted.as_ref().unwrap_or(self.camera)
    }

    /// The world rectangle that spans the whole canvas.
    pub fn visible_world(&self) -> Rectangle {
        self.camera().view()
    }

    /// The canvas in its own pixels, origin at the top-left.
    pub fn visible_screen(&self) -> Rectangle {
        self.camera().screen()
    }

    /// Shows `world` from here on, expanded to the canvas aspect like any other
    /// world. Drawing that follows uses it, and the canvas keeps it afterwards.
    pub fn set_visible_world(&mut self, world: Rectangle) -> Result<()> {
        let mut camera = self.camera().clone();
        camera.set_world(world)?;
        self.adjusted = Some(camera);
        Ok(())
    }

    /// The world requested through [`set_visible_world`](Self::set_visible_world), if any.
    pub(crate) fn requested_world(&self) -> Option<Rectangle> {
        self.adjusted.as_ref().map(Camera::world)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_color_rgba(&mut self, red: u8, green: u8, blue: u8, alpha: u8) {
        self.color = Color::rgba(red, green, blue, alpha);
    }

    /// `alpha` in `0.0..=1.0`.
    pub fn set_color_with_alpha(&mut self, color: Color, alpha: f32) {
        self.color = color.with_alpha(alpha);
    }

    /// Width in pixels; zero or less gives the thinnest visible line.
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = if width > 0.0 { width } else { 1.0 };
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.cap = cap;
    }

    pub fn set_line_dash(&mut self, dash: LineDash) {
        self.dash = dash;
    }

    pub fn set_coordinate_system(&mut self, coordinates: CoordinateSystem) {
        self.coordinates = coordinates;
    }

    pub fn format_font(&mut self, face: FontFace, size: f64) {
        self.font = face;
        self.set_font_size(size);
    }

    pub fn format_font_face(&mut self, face: FontFace) {
        self.font = face;
    }

    pub fn set_font_size(&mut self, size: f64) {
        if size > 0.0 {
            self.font_size = size;
        } else {
            log::warn!("ignoring font size {size}");
        }
    }

    /// Degrees counter-clockwise.
    pub fn set_text_rotation(&mut self, degrees: f64) {
        self.text_rotation = degrees;
    }

    /// How text lines up with its anchor along x; centred by default.
    pub fn set_horiz_justification(&mut self, justification: HorizontalJustification) {
        self.horizontal = justification;
    }

    /// How text lines up with its anchor along y; centred by default.
    pub fn set_vert_justification(&mut self, justification: VerticalJustification) {
        self.vertical = justification;
    }

    // window pixels, still in double precision
    fn to_window(&self, point: Point2D) -> Point2D {
        let canvas = match self.coordinates {
            CoordinateSystem::World => self.camera().world_to_screen(point),
            CoordinateSystem::Screen => point,
        };
        canvas + self.origin
    }

    fn to_pixels(&self, point: Point2D) -> [f32; 2] {
        self.to_window(point).to_f32()
    }

    fn length_to_pixels(&self, length: f64, horizontal: bool) -> f32 {
        let length = match self.coordinates {
            CoordinateSystem::World if horizontal => length * self.camera().scale().x,
            CoordinateSystem::World => length * self.camera().scale().y,
            CoordinateSystem::Screen => length,
        };
        length.abs() as f32
    }

    /// Strokes a path given in window pixels. Parts that cannot be seen are cut
    /// off first so that dashing only walks what is visible.
    fn stroke(&mut self, points: &[Point2D], closed: bool) {
        let style = StrokeStyle {
            width: self.line_width as f32,
            cap: self.cap,
            dash: self.dash.pattern(),
            dash_offset: 0.0,
        };
        let color = self.color.to_f32();

        // the scissor when one is set, else the canvas
        let visible = match self.frame.clip() {
            Some(clip) => Rectangle::with_size(
                (f64::from(clip.x), f64::from(clip.y)),
                f64::from(clip.width),
                f64::from(clip.height),
            ),
            None => Rectangle::with_size(self.origin, self.width(), self.height()),
        };
        // caps and joins never reach a line width past a cut end
        let margin = self.line_width + 1.0;
        let min = [visible.left() - margin, visible.bottom() - margin];
        let max = [visible.right() + margin, visible.top() + margin];
        let path: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        let inside = path
            .iter()
            .all(|p| (min[0]..=max[0]).contains(&p[0]) && (min[1]..=max[1]).contains(&p[1]));

        self.frame.push_shapes(|mesh| {
            if inside {
                let pixels: Vec<[f32; 2]> = points.iter().map(|p| p.to_f32()).collect();
                tessellate::stroke_polyline(mesh, &pixels, closed, &style, color);
                return;
            }
            for run in tessellate::clip_polyline(&path, closed, min, max) {
                let style = StrokeStyle {
                    dash_offset: run.offset,
                    ..style
                };
                tessellate::stroke_polyline(mesh, &run.points, false, &style, color);
            }
        });
    }

    fn rectangle_corners(&self, rect: Rectangle) -> [Point2D; 4] {
        [
            self.to_window(Point2D::new(rect.left(), rect.bottom())),
            self.to_window(Point2D::new(rect.right(), rect.bottom())),
            self.to_window(Point2D::new(rect.right(), rect.top())),
            self.to_window(Point2D::new(rect.left(), rect.top())),
        ]
    }

    pub fn draw_line(&mut self, start: impl Into<Point2D>, end: impl Into<Point2D>) {
        let points = [self.to_window(start.into()), self.to_window(end.into())];
        self.stroke(&points, false);
    }

    /// Outlines `rect`; build it with [`Rectangle::new`] from two corners or
    /// [`Rectangle::with_size`] from a corner and a size.
    pub fn draw_rectangle(&mut self, rect: Rectangle) {
        let corners = self.rectangle_corners(rect);
        self.stroke(&corners, true);
    }

    pub fn fill_rectangle(&mut self, rect: Rectangle) {
        let corners = self.rectangle_corners(rect).map(Point2D::to_f32);
        let color = self.color.to_f32();
        self.frame
            .push_shapes(|mesh| tessellate::fill_quad(mesh, corners, color));
    }

    /// Fills a simple polygon. Needs at least three points.
    pub fn fill_poly(&mut self, points: &[Point2D]) {
        if points.len() < 3 {
            log::warn!("fill_poly needs at least 3 points, got {}", points.len());
            return;
        }
        let pixels: Vec<[f32; 2]> = points.iter().map(|&p| self.to_pixels(p)).collect();
        let color = self.color.to_f32();
        self.frame
            .push_shapes(|mesh| tessellate::fill_polygon(mesh, &pixels, color));
    }

    fn arc_points(
        &self,
        center: Point2D,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        extent: f64,
    ) -> ([f32; 2], Vec<[f32; 2]>) {
        let c = self.to_pixels(center);
        let rx = self.length_to_pixels(radius_x, true);
        let ry = self.length_to_pixels(radius_y, false);
        let start = start_angle.to_radians() as f32;
        let extent = extent.clamp(-360.0, 360.0).to_radians() as f32;
        let segments = tessellate::segment_count(rx.max(ry), extent);
        (c, tessellate::ellipse_points(c, rx, ry, start, extent, segments, true))
    }

    pub fn draw_arc(&mut self, center: impl Into<Point2D>, radius: f64, start_angle: f64, extent: f64) {
        self.draw_elliptic_arc(center, radius, radius, start_angle, extent);
    }

    /// Fills the pie slice between the arc and its centre.
    pub fn fill_arc(&mut self, center: impl Into<Point2D>, radius: f64, start_angle: f64, extent: f64) {
        self.fill_elliptic_arc(center, radius, radius, start_angle, extent);
    }

    pub fn draw_elliptic_arc(
        &mut self,
        center: impl Into<Point2D>,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        extent: f64,
    ) {
        let (_, mut points) = self.arc_points(center.into(), radius_x, radius_y, start_angle, extent);
        let full = extent.abs() >= 360.0;
        if full {
            points.pop();
        }
        let points: Vec<Point2D> = points
            .iter()
            .map(|&[x, y]| Point2D::new(f64::from(x), f64::from(y)))
            .collect();
        self.stroke(&points, full);
    }

    pub fn fill_elliptic_arc(
        &mut self,
        center: impl Into<Point2D>,
        radius_x: f64,
        radius_y: f64,
        start_angle: f64,
        extent: f64,
    ) {
        let (c, points) = self.arc_points(center.into(), radius_x, radius_y, start_angle, extent);
        let color = self.color.to_f32();
        self.frame
            .push_shapes(|mesh| tessellate::fill_fan(mesh, c, &points, color));
    }

    /// Extents of `text` in pixels with the current font, or `None` without fonts.
    pub fn text_extents(&mut self, text: &str) -> Option<TextExtents> {
        self.text.extents(&self.font, self.font_size, text)
    }

    /// Draws `text` at `anchor` according to the current justification,
    /// centred unless changed.
    pub fn draw_text(&mut self, anchor: impl Into<Point2D>, text: &str) {
        let placement = TextPlacement {
            anchor: self.to_pixels(anchor.into()),
            horizontal: self.horizontal,
            vertical: self.vertical,
            rotation: self.text_rotation,
        };
        let color = self.color.to_f32();
        let (font, size) = (&self.font, self.font_size);
        let engine = &mut *self.text;
        self.frame.push_textured(TextureKey::Glyphs, |mesh| {
            engine.layout_text(mesh, font, size, text, &placement, color);
        });
    }

    /// Like [`draw_text`](Self::draw_text) but skips text wider than `bound_x` or
    /// taller than `bound_y`, both in the current coordinate system.
    pub fn draw_text_bounded(&mut self, anchor: impl Into<Point2D>, text: &str, bound_x: f64, bound_y: f64) {
        let Some(extents) = self.text_extents(text) else {
            return;
        };
        let max_width = self.length_to_pixels(bound_x, true) as f64;
        let max_height = self.length_to_pixels(bound_y, false) as f64;
        if extents.width > max_width || extents.height > max_height {
            log::trace!("'{text}' does not fit in {max_width}x{max_height} px");
            return;
        }
        self.draw_text(anchor, text);
    }

    /// Draws an image with its top-left corner at `top_left`. Each image pixel
    /// covers `scale` canvas pixels along both axes.
    pub fn draw_surface(&mut self, surface: &Surface, top_left: impl Into<Point2D>, scale: f64) {
        if scale <= 0.0 {
            return;
        }
        let [x0, y0] = self.to_pixels(top_left.into());
        let x1 = x0 + (surface.width() as f64 * scale) as f32;
        let y1 = y0 + (surface.height() as f64 * scale) as f32;
        let color = [1.0, 1.0, 1.0, self.color.alpha as f32 / 255.0];

        self.frame.use_surface(surface);
        self.frame
            .push_textured(TextureKey::Surface(surface.id()), |mesh| {
                mesh.push_quad([
                    TexVertex { position: [x0, y0], uv: [0.0, 0.0], color },
                    TexVertex { position: [x1, y0], uv: [1.0, 0.0], color },
                    TexVertex { position: [x1, y1], uv: [1.0, 1.0], color },
                    TexVertex { position: [x0, y1], uv: [0.0, 1.0], color },
                ]);
            });
    }

    /// Covers the whole canvas with `color`.
    pub fn clear(&mut self, color: Color) {
        let (w, h) = (self.width(), self.height());
        let [x0, y0] = self.origin.to_f32();
        let (x1, y1) = (x0 + w as f32, y0 + h as f32);
        let color = color.to_f32();
        self.frame.push_shapes(|mesh| {
            tessellate::fill_quad(mesh, [[x0, y0], [x1, y0], [x1, y1], [x0, y1]], color)
        });
    }
}
