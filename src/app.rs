use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::app_state::State;
use crate::application::Application;
use crate::error::{Error, Result};
use crate::event::KeyEvent;
use crate::geometry::Point2D;

// pixels per wheel notch for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f64 = 40.0;

struct App<'a> {
    application: &'a mut Application,
    state: Option<State>,
    error: Option<Error>,
}

impl App<'_> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<State> {
        self.application.prepare()?;

        let (title, width, height) = self.application.window_attributes();
        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height));

        let window = event_loop
            .create_window(window_attributes)
            .map_err(|err| Error::Gpu(anyhow::Error::new(err).context("failed to create the window")))?;

        pollster::block_on(State::new(Arc::new(window))).map_err(Error::Gpu)
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }

        match self.open_window(event_loop) {
            Ok(state) => {
                let size = state.size;
                self.state = Some(state);
                self.application
                    .start(size.width as f64, size.height as f64);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if window_id != state.window().id() {
            return;
        }

        let application = &mut *self.application;
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                log::debug!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                state.resize(physical_size);
                application.resize(physical_size.width as f64, physical_size.height as f64);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                application.modifiers_changed(modifiers.state().into());
            }
            WindowEvent::CursorMoved { position, .. } => {
                application.cursor_moved(Point2D::new(position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => application.cursor_left(),
            WindowEvent::MouseInput { state: pressed, button, .. } => {
                application.mouse_button(button.into(), pressed == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y as f64,
                    MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_LINE,
                };
                application.scroll(lines);
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if key_event.state == ElementState::Pressed {
                    let modifiers = application.input.modifiers;
                    let event = KeyEvent::from_winit(&key_event.logical_key, key_event.text.as_deref(), modifiers);
                    application.key_pressed(event);
                }
            }
            WindowEvent::RedrawRequested => {
                let frame = application.paint();
                match state.render(&frame, application.text.atlas_mut()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => state.resize(state.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of graphics memory");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("{e:?}"),
                }
            }
            _ => {}
        }

        if application.quit_requested() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if self.application.needs_redraw() {
                state.window().request_redraw();
            }
        }
    }
}

/// Runs until the window closes or the application asks to quit.
pub(crate) fn run_event_loop(application: &mut Application) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        application,
        state: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
