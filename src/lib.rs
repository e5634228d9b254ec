//! A small 2D drawing toolkit: a window with one or more canvases that map a
//! world coordinate system onto the screen, pan and zoom controls, simple widgets
//! and an immediate-mode renderer.

mod app;
mod app_state;
mod application;
pub mod builder;
mod camera;
mod canvas;
pub mod color;
pub mod control;
mod dialog;
mod error;
mod event;
mod event_handler;
mod frame;
mod geometry;
mod graphics;
mod renderer;
mod settings;
mod state;
mod style;
mod surface;
mod tessellate;
mod text_renderer;
mod ui;
mod update_logic;
mod vertex;

// Re-export the main public interface
pub use application::{
    Application, ButtonCallback, ComboBoxCallback, KeyCallback, MouseCallback, SetupCallback,
};
pub use builder::{UiDescription, UiSource};
pub use camera::Camera;
pub use canvas::{Canvas, DrawCallback};
pub use color::Color;
pub use dialog::{Dialog, DialogCallback, DialogResponse};
pub use error::{Error, Result};
pub use event::{KeyEvent, Modifiers, MouseButton, MouseEvent};
pub use geometry::{Point2D, Rectangle};
pub use graphics::Renderer;
pub use settings::{FontSettings, Settings, WindowSettings};
pub use style::{
    CoordinateSystem, FontFace, FontSlant, FontWeight, HorizontalJustification, LineCap, LineDash,
    VerticalJustification,
};
pub use surface::Surface;
pub use text_renderer::TextExtents;
pub use ui::{GridCell, Widget, WidgetKind};
