use crate::application::Application;
use crate::control;
use crate::dialog::DialogResponse;
use crate::event::{KeyEvent, Modifiers, MouseButton, MouseEvent};
use crate::geometry::Point2D;
use crate::ui::WidgetKind;

impl Application {
    pub(crate) fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.size = (width, height);
            self.layout();
        }
    }

    pub(crate) fn modifiers_changed(&mut self, modifiers: Modifiers) {
        self.input.modifiers = modifiers;
    }

    fn canvas_at(&self, window: Point2D) -> Option<usize> {
        self.canvases.iter().position(|c| c.contains(window))
    }

    fn mouse_event(&self, index: usize, window: Point2D, button: Option<MouseButton>) -> MouseEvent {
        let canvas = &self.canvases[index];
        MouseEvent {
            canvas: canvas.id().to_string(),
            button,
            widget: canvas.to_local(window),
            world: canvas.to_world(window),
            modifiers: self.input.modifiers,
        }
    }

    pub(crate) fn cursor_moved(&mut self, position: Point2D) {
        self.input.cursor = Some(position);

        if let Some((index, last)) = self.input.pan {
            let (dx, dy) = (position.x - last.x, position.y - last.y);
            if let Err(err) = control::pan_by_pixels(&mut self.canvases[index], dx, dy) {
                log::warn!("pan failed: {err}");
            }
            self.input.pan = Some((index, position));
        }

        if self.dialog_open() {
            return;
        }

        let hovered = self.panel.hit_test(position).map(|w| w.id.clone());
        if hovered != self.input.hovered {
            self.input.hovered = hovered;
            self.needs_paint = true;
        }

        let Some(index) = self.canvas_at(position) else {
            return;
        };
        if self.handlers.mouse_move.is_none() {
            return;
        }
        let event = self.mouse_event(index, position, None);
        if let Some(mut callback) = self.handlers.mouse_move.take() {
            callback(self, &event);
            if self.handlers.mouse_move.is_none() {
                self.handlers.mouse_move = Some(callback);
            }
        }
    }

    pub(crate) fn cursor_left(&mut self) {
        self.input.cursor = None;
        self.input.pan = None;
        if self.input.hovered.take().is_some() {
            self.needs_paint = true;
        }
    }

    pub(crate) fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        let Some(position) = self.input.cursor else {
            return;
        };

        if button == MouseButton::Middle && !pressed {
            self.input.pan = None;
        }

        if self.dialog_open() {
            if pressed && button == MouseButton::Left {
                let response = self.dialogs.front().and_then(|d| d.hit_test(position));
                if let Some(response) = response {
                    self.respond_to_dialog(response);
                }
            }
            return;
        }

        if pressed && button == MouseButton::Left {
            let hit = self
                .panel
                .hit_test(position)
                .map(|w| (w.id.clone(), matches!(w.kind, WidgetKind::ComboBox { .. })));
            if let Some((id, is_combo)) = hit {
                if is_combo {
                    self.cycle_combo_box(&id);
                } else {
                    // labels have no action
                    self.run_button(&id);
                }
                return;
            }
        }

        let Some(index) = self.canvas_at(position) else {
            return;
        };

        if !pressed {
            self.dispatch_release(index, position, button);
            return;
        }

        if button == MouseButton::Middle {
            self.input.pan = Some((index, position));
            return;
        }

        if self.handlers.mouse_press.is_some() {
            let event = self.mouse_event(index, position, Some(button));
            if let Some(mut callback) = self.handlers.mouse_press.take() {
                callback(self, &event);
                if self.handlers.mouse_press.is_none() {
                    self.handlers.mouse_press = Some(callback);
                }
            }
            return;
        }

        let factor = self.settings().zoom_factor;
        let canvas = &mut self.canvases[index];
        let local = canvas.to_local(position);
        let result = match button {
            MouseButton::Left => control::zoom_in_at(canvas, local, factor),
            MouseButton::Right => control::zoom_out_at(canvas, local, factor),
            _ => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("zoom failed: {err}");
        }
    }

    fn dispatch_release(&mut self, index: usize, position: Point2D, button: MouseButton) {
        if self.handlers.mouse_release.is_none() {
            return;
        }
        let event = self.mouse_event(index, position, Some(button));
        if let Some(mut callback) = self.handlers.mouse_release.take() {
            callback(self, &event);
            if self.handlers.mouse_release.is_none() {
                self.handlers.mouse_release = Some(callback);
            }
        }
    }

    /// Positive `lines` scroll up and zoom in around the cursor.
    pub(crate) fn scroll(&mut self, lines: f64) {
        if self.dialog_open() || lines == 0.0 {
            return;
        }
        let Some(position) = self.input.cursor else {
            return;
        };
        let Some(index) = self.canvas_at(position) else {
            return;
        };

        let factor = self.settings().zoom_factor;
        let canvas = &mut self.canvases[index];
        let local = canvas.to_local(position);
        let result = if lines > 0.0 {
            control::zoom_in_at(canvas, local, factor)
        } else {
            control::zoom_out_at(canvas, local, factor)
        };
        if let Err(err) = result {
            log::warn!("zoom failed: {err}");
        }
    }

    pub(crate) fn key_pressed(&mut self, event: KeyEvent) {
        if self.dialog_open() {
            if event.is_escape() {
                self.respond_to_dialog(DialogResponse::Reject);
            } else if event.key_name == "Enter" {
                self.respond_to_dialog(DialogResponse::Accept);
            }
            return;
        }

        match self.handlers.key_press.take() {
            Some(mut callback) => {
                callback(self, &event);
                if self.handlers.key_press.is_none() {
                    self.handlers.key_press = Some(callback);
                }
            }
            None if event.is_escape() => self.quit(),
            None => log::debug!("unhandled key {}", event.key_name),
        }
    }

    /// Whether anything changed since the last paint.
    pub(crate) fn needs_redraw(&self) -> bool {
        self.needs_paint || self.canvases.iter().any(|c| c.is_dirty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::geometry::Rectangle;
    use crate::settings::Settings;
    use crate::ui::PANEL_WIDTH;
    use std::cell::RefCell;
    use std::rc::Rc;
    use winit::keyboard::{Key, NamedKey};

    fn started_app() -> Application {
        let mut app = Application::new(Settings::default());
        app.add_canvas(
            "MainCanvas",
            Rectangle::new((0.0, 0.0), (100.0, 100.0)),
            color::WHITE,
            |_| {},
        )
        .unwrap();
        app.prepare().unwrap();
        app.start(800.0, 600.0);
        app
    }

    fn key(named: NamedKey) -> KeyEvent {
        KeyEvent::from_winit(&Key::Named(named), None, Modifiers::default())
    }

    fn world_width(app: &Application) -> f64 {
        app.canvas("MainCanvas").unwrap().camera().world().width()
    }

    #[test]
    fn test_left_click_zooms_in_and_right_click_zooms_out() {
        let mut app = started_app();
        let before = world_width(&app);

        app.cursor_moved(Point2D::new(100.0, 100.0));
        app.mouse_button(MouseButton::Left, true);
        let zoomed = world_width(&app);
        assert!((zoomed - before * 3.0 / 5.0).abs() < 1e-9);

        app.mouse_button(MouseButton::Right, true);
        assert!((world_width(&app) - before).abs() < 1e-9);
    }

    #[test]
    fn test_click_keeps_the_point_under_the_cursor() {
        let mut app = started_app();
        let cursor = Point2D::new(150.0, 420.0);
        let before = app.canvas("MainCanvas").unwrap().to_world(cursor);

        app.cursor_moved(cursor);
        app.mouse_button(MouseButton::Left, true);
        app.scroll(1.0);
        let after = app.canvas("MainCanvas").unwrap().to_world(cursor);

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_middle_drag_pans() {
        let mut app = started_app();
        let start = Point2D::new(200.0, 200.0);
        app.cursor_moved(start);
        let grabbed = app.canvas("MainCanvas").unwrap().to_world(start);

        app.mouse_button(MouseButton::Middle, true);
        app.cursor_moved(Point2D::new(260.0, 150.0));
        app.cursor_moved(Point2D::new(300.0, 120.0));
        app.mouse_button(MouseButton::Middle, false);

        let under_cursor = app.canvas("MainCanvas").unwrap().to_world(Point2D::new(300.0, 120.0));
        assert!((grabbed.x - under_cursor.x).abs() < 1e-9);
        assert!((grabbed.y - under_cursor.y).abs() < 1e-9);

        // released: further motion leaves the world alone
        let world = app.canvas("MainCanvas").unwrap().camera().world();
        app.cursor_moved(Point2D::new(10.0, 10.0));
        assert_eq!(app.canvas("MainCanvas").unwrap().camera().world(), world);
    }

    #[test]
    fn test_press_callback_replaces_default_zoom() {
        let mut app = started_app();
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        app.on_mouse_press(move |_, event| log.borrow_mut().push(event.clone()));

        let before = world_width(&app);
        app.cursor_moved(Point2D::new(50.0, 60.0));
        app.mouse_button(MouseButton::Left, true);

        assert_eq!(world_width(&app), before);
        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].canvas, "MainCanvas");
        assert_eq!(events[0].button, Some(MouseButton::Left));
        assert_eq!(events[0].widget, Point2D::new(50.0, 60.0));
        let expected = app.canvas("MainCanvas").unwrap().to_world(Point2D::new(50.0, 60.0));
        assert_eq!(events[0].world, expected);
    }

    #[test]
    fn test_motion_and_release_callbacks() {
        let mut app = started_app();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let moves = seen.clone();
        let releases = seen.clone();
        app.on_mouse_move(move |_, e| moves.borrow_mut().push(("move", e.button)));
        app.on_mouse_release(move |_, e| releases.borrow_mut().push(("release", e.button)));

        app.cursor_moved(Point2D::new(10.0, 10.0));
        // over the panel: no canvas event
        app.cursor_moved(Point2D::new(800.0 - PANEL_WIDTH / 2.0, 300.0));
        app.cursor_moved(Point2D::new(20.0, 10.0));
        app.mouse_button(MouseButton::Right, false);

        assert_eq!(
            *seen.borrow(),
            vec![("move", None), ("move", None), ("release", Some(MouseButton::Right))]
        );
    }

    #[test]
    fn test_panel_click_runs_the_button() {
        let mut app = started_app();
        let center = app.find_widget("ProceedButton").unwrap().rect().center();
        app.cursor_moved(center);
        assert_eq!(app.input.hovered.as_deref(), Some("ProceedButton"));

        app.mouse_button(MouseButton::Left, true);
        assert!(app.quit_requested());
    }

    #[test]
    fn test_dialog_blocks_canvas_input() {
        let mut app = started_app();
        let answers = Rc::new(RefCell::new(Vec::new()));
        let log = answers.clone();
        app.create_dialog_window("Confirm", "Proceed?", move |_, r| log.borrow_mut().push(r));

        let before = world_width(&app);
        app.cursor_moved(Point2D::new(5.0, 5.0));
        app.mouse_button(MouseButton::Left, true);
        app.scroll(1.0);
        assert_eq!(world_width(&app), before);
        assert!(app.dialog_open());

        app.key_pressed(key(NamedKey::Escape));
        assert!(!app.dialog_open());
        assert!(!app.quit_requested());
        assert_eq!(*answers.borrow(), vec![DialogResponse::Reject]);
    }

    #[test]
    fn test_dialog_button_click_answers() {
        let mut app = started_app();
        let answers = Rc::new(RefCell::new(Vec::new()));
        let log = answers.clone();
        app.create_dialog_window("Confirm", "Proceed?", move |_, r| log.borrow_mut().push(r));

        // OK sits left of centre, below the message
        let bounds = app.dialogs.front().unwrap().bounds();
        app.cursor_moved(Point2D::new(bounds.center_x() - 50.0, bounds.top() - 24.0));
        app.mouse_button(MouseButton::Left, true);
        assert_eq!(*answers.borrow(), vec![DialogResponse::Accept]);
    }

    #[test]
    fn test_escape_quits_without_key_handler() {
        let mut app = started_app();
        app.key_pressed(KeyEvent::from_winit(&Key::Character("q".into()), Some("q"), Modifiers::default()));
        assert!(!app.quit_requested());
        app.key_pressed(key(NamedKey::Escape));
        assert!(app.quit_requested());
    }

    #[test]
    fn test_key_handler_receives_keys() {
        let mut app = started_app();
        let keys = Rc::new(RefCell::new(Vec::new()));
        let log = keys.clone();
        app.on_key_press(move |app, e| {
            log.borrow_mut().push(e.key_name.clone());
            app.update_message(&e.key_name);
        });

        app.key_pressed(key(NamedKey::Escape));
        app.key_pressed(key(NamedKey::ArrowUp));
        assert!(!app.quit_requested());
        assert_eq!(*keys.borrow(), vec!["Escape".to_string(), "ArrowUp".to_string()]);
        assert_eq!(app.status.message(), "ArrowUp");
    }

    #[test]
    fn test_resize_relayouts_and_marks_dirty() {
        let mut app = started_app();
        let mut frame = crate::frame::Frame::new(color::WHITE);
        app.canvases[0].paint(&mut frame, &mut app.text);
        app.needs_paint = false;
        assert!(!app.needs_redraw());

        app.resize(1000.0, 700.0);
        assert!(app.needs_redraw());
        assert_eq!(app.canvas("MainCanvas").unwrap().width(), 1000.0 - PANEL_WIDTH);

        app.resize(0.0, 700.0);
        assert_eq!(app.canvas("MainCanvas").unwrap().width(), 1000.0 - PANEL_WIDTH);
    }
}
