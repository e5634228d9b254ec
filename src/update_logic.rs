use crate::application::Application;
use crate::color;
use crate::frame::Frame;

impl Application {
    /// Records the whole window: canvases, panel, status bar, then the front dialog.
    pub(crate) fn paint(&mut self) -> Frame {
        let mut frame = Frame::new(color::WHITE);
        self.text.atlas_mut().begin_frame();

        for canvas in &mut self.canvases {
            canvas.paint(&mut frame, &mut self.text);
        }
        self.panel
            .paint(&mut frame, &mut self.text, self.input.hovered.as_deref());
        self.status.paint(&mut frame, &mut self.text);
        if let Some(dialog) = self.dialogs.front() {
            dialog.paint(&mut frame, &mut self.text);
        }

        self.needs_paint = false;
        frame
    }
}

#[cfg(test)]
mod tests {
    use crate::application::Application;
    use crate::color;
    use crate::geometry::Rectangle;
    use crate::settings::Settings;
    use std::cell::Cell;
    use std::rc::Rc;

    fn app_counting_draws(draws: Rc<Cell<u32>>) -> Application {
        let mut app = Application::new(Settings::default());
        app.add_canvas(
            "MainCanvas",
            Rectangle::new((0.0, 0.0), (10.0, 10.0)),
            color::LIGHT_SKY_BLUE,
            move |g| {
                draws.set(draws.get() + 1);
                g.set_color(color::RED);
                g.fill_rectangle(Rectangle::new((1.0, 1.0), (2.0, 2.0)));
            },
        )
        .unwrap();
        app.prepare().unwrap();
        app.start(640.0, 480.0);
        app
    }

    #[test]
    fn test_paint_runs_draw_callbacks_and_clears_dirty_state() {
        let draws = Rc::new(Cell::new(0));
        let mut app = app_counting_draws(draws.clone());
        assert!(app.needs_redraw());

        let frame = app.paint();
        assert_eq!(draws.get(), 1);
        assert!(!app.needs_redraw());
        assert!(!frame.shapes.is_empty());

        app.refresh_drawing();
        assert!(app.needs_redraw());
    }

    #[test]
    fn test_canvas_calls_are_clipped_to_the_canvas() {
        let mut app = app_counting_draws(Rc::new(Cell::new(0)));
        let frame = app.paint();
        let placement = app.canvas("MainCanvas").unwrap().placement();

        let first = frame.calls.first().unwrap();
        let clip = first.clip.unwrap();
        assert_eq!(clip.x, 0);
        assert_eq!(clip.width, placement.width() as u32);
        assert_eq!(clip.height, placement.height() as u32);
    }

    #[test]
    fn test_only_the_front_dialog_is_painted() {
        let mut app = app_counting_draws(Rc::new(Cell::new(0)));
        let without = app.paint().calls.len();
        app.create_popup_message("One", "first");
        app.create_popup_message("Two", "second");
        let with_dialogs = app.paint().calls.len();
        app.respond_to_dialog(crate::dialog::DialogResponse::Accept);
        let with_one = app.paint().calls.len();
        assert!(with_dialogs > without);
        assert_eq!(with_dialogs, with_one);
    }
}
