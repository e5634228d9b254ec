use std::fmt;

use crate::application::Application;
use crate::color::{self, Color};
use crate::frame::Frame;
use crate::geometry::{Point2D, Rectangle};
use crate::text_renderer::TextEngine;
use crate::ui::paint_in;

const WIDTH: f64 = 360.0;
const HEIGHT: f64 = 160.0;
const TITLE_HEIGHT: f64 = 28.0;
const BUTTON_WIDTH: f64 = 90.0;
const BUTTON_HEIGHT: f64 = 28.0;
const SPACING: f64 = 10.0;

const SHADE: Color = Color::rgba(0, 0, 0, 96);
const TITLE_BAR: Color = Color::rgb(0x3C, 0x5A, 0x82);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Accept,
    Reject,
}

pub type DialogCallback = Box<dyn FnMut(&mut Application, DialogResponse)>;

/// A modal box with a message and a row of buttons.
pub struct Dialog {
    title: String,
    message: String,
    buttons: Vec<(String, DialogResponse)>,
    callback: Option<DialogCallback>,
    bounds: Rectangle,
    window: Rectangle,
}

impl Dialog {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        buttons: Vec<(String, DialogResponse)>,
        callback: Option<DialogCallback>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons,
            callback,
            bounds: Rectangle::default(),
            window: Rectangle::default(),
        }
    }

    /// OK accepts, CANCEL rejects.
    pub fn confirm(title: impl Into<String>, message: impl Into<String>, callback: DialogCallback) -> Self {
        Self::new(
            title,
            message,
            vec![
                ("OK".to_string(), DialogResponse::Accept),
                ("CANCEL".to_string(), DialogResponse::Reject),
            ],
            Some(callback),
        )
    }

    /// A single DONE button.
    pub fn popup(title: impl Into<String>, message: impl Into<String>, callback: Option<DialogCallback>) -> Self {
        Self::new(
            title,
            message,
            vec![("DONE".to_string(), DialogResponse::Accept)],
            callback,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn take_callback(&mut self) -> Option<DialogCallback> {
        self.callback.take()
    }

    /// Centres the dialog in the window.
    pub fn layout(&mut self, window: Rectangle) {
        let width = WIDTH.min(window.width());
        let height = HEIGHT.min(window.height());
        let center = window.center();
        self.window = window;
        self.bounds = Rectangle::with_size(
            (center.x - width / 2.0, center.y - height / 2.0),
            width,
            height,
        );
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn button_rects(&self) -> impl Iterator<Item = (Rectangle, &(String, DialogResponse))> {
        let count = self.buttons.len() as f64;
        let total = count * BUTTON_WIDTH + (count - 1.0).max(0.0) * SPACING;
        let start = self.bounds.center_x() - total / 2.0;
        // bottom() is the upper edge in window pixels
        let y = self.bounds.top() - SPACING - BUTTON_HEIGHT;
        self.buttons.iter().enumerate().map(move |(i, button)| {
            let x = start + i as f64 * (BUTTON_WIDTH + SPACING);
            (Rectangle::with_size((x, y), BUTTON_WIDTH, BUTTON_HEIGHT), button)
        })
    }

    pub fn hit_test(&self, window: Point2D) -> Option<DialogResponse> {
        self.button_rects()
            .find(|(rect, _)| rect.contains(window))
            .map(|(_, (_, response))| *response)
    }

    pub fn paint(&self, frame: &mut Frame, text: &mut TextEngine) {
        let window = self.window;
        paint_in(window, frame, text, |g| {
            g.set_color(SHADE);
            g.fill_rectangle(window);
        });

        let bounds = self.bounds;
        paint_in(bounds, frame, text, |g| {
            g.set_color(color::WHITE);
            g.fill_rectangle(bounds);

            let title_bar = Rectangle::with_size(bounds.bottom_left(), bounds.width(), TITLE_HEIGHT);
            g.set_color(TITLE_BAR);
            g.fill_rectangle(title_bar);
            g.set_color(color::WHITE);
            g.draw_text(title_bar.center(), &self.title);

            g.set_color(color::BLACK);
            let body = (bounds.bottom() + TITLE_HEIGHT + bounds.top() - BUTTON_HEIGHT - SPACING) / 2.0;
            g.draw_text((bounds.center_x(), body), &self.message);

            for (rect, (label, _)) in self.button_rects() {
                g.set_color(color::GREY_75);
                g.fill_rectangle(rect);
                g.set_color(color::GREY_55);
                g.draw_rectangle(rect);
                g.set_color(color::BLACK);
                g.draw_text(rect.center(), label);
            }

            g.set_color(color::GREY_55);
            g.draw_rectangle(bounds);
        });
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("buttons", &self.buttons)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_is_centred() {
        let mut dialog = Dialog::popup("Note", "Saved", None);
        dialog.layout(Rectangle::with_size((0.0, 0.0), 800.0, 600.0));

        let bounds = dialog.bounds();
        assert_eq!(bounds.center(), Point2D::new(400.0, 300.0));
        assert_eq!(bounds.width(), WIDTH);
    }

    #[test]
    fn test_buttons_map_to_responses() {
        let mut dialog = Dialog::confirm("Quit", "Really quit?", Box::new(|_, _| {}));
        dialog.layout(Rectangle::with_size((0.0, 0.0), 800.0, 600.0));

        let rects: Vec<Rectangle> = dialog.button_rects().map(|(r, _)| r).collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(dialog.hit_test(rects[0].center()), Some(DialogResponse::Accept));
        assert_eq!(dialog.hit_test(rects[1].center()), Some(DialogResponse::Reject));
        assert_eq!(dialog.hit_test(dialog.bounds().center()), None);
        // buttons stay inside the dialog
        assert!(rects.iter().all(|r| dialog.bounds().contains(r.center())));
    }

    #[test]
    fn test_callback_is_taken_once() {
        let mut dialog = Dialog::confirm("Quit", "Really quit?", Box::new(|_, _| {}));
        assert!(dialog.take_callback().is_some());
        assert!(dialog.take_callback().is_none());
    }
}
