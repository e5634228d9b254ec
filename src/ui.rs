use crate::camera::Camera;
use crate::color::{self, Color};
use crate::error::{Error, Result};
use crate::frame::{ClipRect, Frame};
use crate::geometry::{Point2D, Rectangle};
use crate::graphics::Renderer;
use crate::style::{CoordinateSystem, FontFace, HorizontalJustification};
use crate::text_renderer::TextEngine;

pub const PANEL_WIDTH: f64 = 180.0;
pub const STATUS_HEIGHT: f64 = 26.0;
pub const GRID_COLUMNS: u32 = 3;
const ROW_HEIGHT: f64 = 32.0;
const MARGIN: f64 = 6.0;
const FONT_SIZE: f64 = 13.0;

const PANEL_BACKGROUND: Color = Color::rgb(0xE8, 0xE8, 0xE8);
const BUTTON_FACE: Color = Color::rgb(0xF6, 0xF6, 0xF6);
const BUTTON_HOVER: Color = Color::rgb(0xD4, 0xE4, 0xF7);
const BORDER: Color = Color::rgb(0x9A, 0x9A, 0x9A);

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Button { label: String },
    Label { text: String },
    ComboBox { options: Vec<String>, active: usize },
}

/// Position in the panel grid, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl GridCell {
    /// A full-width row.
    pub fn row(top: u32) -> Self {
        Self {
            left: 0,
            top,
            width: GRID_COLUMNS,
            height: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: String,
    pub kind: WidgetKind,
    pub cell: GridCell,
    // window pixels, set by layout
    rect: Rectangle,
}

impl Widget {
    pub fn new(id: impl Into<String>, kind: WidgetKind, cell: GridCell) -> Self {
        Self {
            id: id.into(),
            kind,
            cell,
            rect: Rectangle::default(),
        }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    /// The text shown on the widget.
    pub fn text(&self) -> &str {
        match &self.kind {
            WidgetKind::Button { label } => label,
            WidgetKind::Label { text } => text,
            WidgetKind::ComboBox { options, active } => {
                options.get(*active).map(String::as_str).unwrap_or("")
            }
        }
    }
}

/// The widget column on the right of the main window.
#[derive(Debug, Clone)]
pub struct Panel {
    id: String,
    widgets: Vec<Widget>,
    bounds: Rectangle,
}

impl Panel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            widgets: Vec::new(),
            bounds: Rectangle::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn add(&mut self, widget: Widget) -> Result<()> {
        if self.find(&widget.id).is_some() {
            return Err(Error::DuplicateWidget(widget.id));
        }
        log::debug!("adding widget {} at {:?}", widget.id, widget.cell);
        self.widgets.push(widget);
        self.layout(self.bounds);
        Ok(())
    }

    /// First row below every widget.
    pub fn next_row(&self) -> u32 {
        self.widgets
            .iter()
            .map(|w| w.cell.top + w.cell.height)
            .max()
            .unwrap_or(0)
    }

    /// Moves every widget at or below `row` one row down.
    pub fn insert_row(&mut self, row: u32) {
        for widget in self.widgets.iter_mut().filter(|w| w.cell.top >= row) {
            widget.cell.top += 1;
        }
    }

    pub fn find(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    pub fn find_button_by_label(&self, label: &str) -> Option<&Widget> {
        self.widgets
            .iter()
            .find(|w| matches!(&w.kind, WidgetKind::Button { label: l } if l == label))
    }

    pub fn remove(&mut self, id: &str) -> Option<Widget> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(index))
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn layout(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
        for widget in &mut self.widgets {
            widget.rect = cell_rect(bounds, widget.cell);
        }
    }

    pub fn hit_test(&self, window: Point2D) -> Option<&Widget> {
        if !self.bounds.contains(window) {
            return None;
        }
        self.widgets.iter().rev().find(|w| w.rect.contains(window))
    }

    pub fn paint(&self, frame: &mut Frame, text: &mut TextEngine, hovered: Option<&str>) {
        let bounds = self.bounds;
        paint_in(bounds, frame, text, |g| {
            g.set_color(PANEL_BACKGROUND);
            g.fill_rectangle(bounds);
            for widget in &self.widgets {
                let hot = hovered == Some(widget.id.as_str());
                paint_widget(g, widget, hot);
            }
        });
    }
}

/// Window-pixel rectangle of a grid cell inside `bounds`. The rectangle's
/// `bottom()` is its upper edge on screen since window y grows downward.
pub fn cell_rect(bounds: Rectangle, cell: GridCell) -> Rectangle {
    let column = (bounds.width() - MARGIN) / GRID_COLUMNS as f64;
    let x = bounds.left() + MARGIN + cell.left as f64 * column;
    let y = bounds.bottom() + MARGIN + cell.top as f64 * ROW_HEIGHT;
    Rectangle::with_size(
        (x, y),
        column * cell.width.max(1) as f64 - MARGIN,
        ROW_HEIGHT * cell.height.max(1) as f64 - MARGIN,
    )
}

fn paint_widget(g: &mut Renderer<'_>, widget: &Widget, hot: bool) {
    let rect = widget.rect;
    let center = rect.center();
    match &widget.kind {
        WidgetKind::Button { label } => {
            g.set_color(if hot { BUTTON_HOVER } else { BUTTON_FACE });
            g.fill_rectangle(rect);
            g.set_color(BORDER);
            g.draw_rectangle(rect);
            g.set_color(color::BLACK);
            g.draw_text(center, label);
        }
        WidgetKind::Label { text } => {
            g.set_color(color::BLACK);
            g.draw_text(center, text);
        }
        WidgetKind::ComboBox { .. } => {
            g.set_color(if hot { BUTTON_HOVER } else { color::WHITE });
            g.fill_rectangle(rect);
            g.set_color(BORDER);
            g.draw_rectangle(rect);
            g.set_color(color::BLACK);
            g.draw_text(Point2D::new(center.x - 6.0, center.y), widget.text());
            let (x, y) = (rect.right() - 12.0, center.y);
            g.fill_poly(&[
                Point2D::new(x - 4.0, y - 2.0),
                Point2D::new(x + 4.0, y - 2.0),
                Point2D::new(x, y + 3.0),
            ]);
        }
    }
}

/// Runs `paint` with a renderer taking window pixels, clipped to `bounds`.
pub(crate) fn paint_in(
    bounds: Rectangle,
    frame: &mut Frame,
    text: &mut TextEngine,
    paint: impl FnOnce(&mut Renderer<'_>),
) {
    let local = Rectangle::with_size(Point2D::ORIGIN, bounds.width(), bounds.height());
    let Ok(mut camera) = Camera::new(local) else {
        return;
    };
    if camera.update_screen(bounds.width(), bounds.height()).is_err() {
        return;
    }

    let outer = frame.clip();
    frame.set_clip(Some(ClipRect::from_rectangle(bounds)));
    {
        let mut g = Renderer::new(&camera, Point2D::ORIGIN, frame, text);
        g.set_coordinate_system(CoordinateSystem::Screen);
        g.format_font(FontFace::default(), FONT_SIZE);
        paint(&mut g);
    }
    frame.set_clip(outer);
}

/// One line of text along the bottom of the window.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    id: String,
    message: String,
    bounds: Rectangle,
}

impl StatusBar {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn layout(&mut self, bounds: Rectangle) {
        self.bounds = bounds;
    }

    pub fn paint(&self, frame: &mut Frame, text: &mut TextEngine) {
        let bounds = self.bounds;
        let message = self.message.as_str();
        paint_in(bounds, frame, text, |g| {
            g.set_color(PANEL_BACKGROUND);
            g.fill_rectangle(bounds);
            g.set_color(BORDER);
            g.draw_line(
                (bounds.left(), bounds.bottom()),
                (bounds.right(), bounds.bottom()),
            );
            g.set_color(color::BLACK);
            g.set_horiz_justification(HorizontalJustification::Left);
            g.draw_text((bounds.left() + MARGIN, bounds.center_y()), message);
        });
    }
}
