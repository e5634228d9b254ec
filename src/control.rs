//! Pan and zoom over a canvas' camera.
//!
//! Every helper that changes a canvas also marks it for redraw.

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::geometry::{Point2D, Rectangle};

fn check_factor(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidZoomFactor(factor))
    }
}

/// Shrinks the distance from `anchor` to every edge of `world` by `factor`.
pub fn zoom_in_world(anchor: Point2D, world: Rectangle, factor: f64) -> Rectangle {
    Rectangle::new(
        (
            anchor.x - (anchor.x - world.left()) / factor,
            anchor.y - (anchor.y - world.bottom()) / factor,
        ),
        (
            anchor.x + (world.right() - anchor.x) / factor,
            anchor.y + (world.top() - anchor.y) / factor,
        ),
    )
}

/// Grows the distance from `anchor` to every edge of `world` by `factor`.
pub fn zoom_out_world(anchor: Point2D, world: Rectangle, factor: f64) -> Rectangle {
    Rectangle::new(
        (
            anchor.x - (anchor.x - world.left()) * factor,
            anchor.y - (anchor.y - world.bottom()) * factor,
        ),
        (
            anchor.x + (world.right() - anchor.x) * factor,
            anchor.y + (world.top() - anchor.y) * factor,
        ),
    )
}

fn set_world(canvas: &mut Canvas, world: Rectangle) -> Result<()> {
    canvas.camera_mut().set_world(world)?;
    canvas.redraw();
    Ok(())
}

/// Zooms in around the centre of the world.
pub fn zoom_in(canvas: &mut Canvas, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let world = canvas.camera().world();
    set_world(canvas, zoom_in_world(world.center(), world, factor))
}

pub fn zoom_out(canvas: &mut Canvas, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let world = canvas.camera().world();
    set_world(canvas, zoom_out_world(world.center(), world, factor))
}

/// Zooms in keeping the world point under `screen` (canvas pixels) in place.
pub fn zoom_in_at(canvas: &mut Canvas, screen: Point2D, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let camera = canvas.camera();
    let anchor = camera.screen_to_world(screen);
    let world = zoom_in_world(anchor, camera.world(), factor);
    set_world(canvas, world)
}

pub fn zoom_out_at(canvas: &mut Canvas, screen: Point2D, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let camera = canvas.camera();
    let anchor = camera.screen_to_world(screen);
    let world = zoom_out_world(anchor, camera.world(), factor);
    set_world(canvas, world)
}

/// Shows exactly `world`, usually the canvas' initial world.
pub fn zoom_fit(canvas: &mut Canvas, world: Rectangle) -> Result<()> {
    set_world(canvas, world)
}

/// Moves the world by `dx`, `dy` world units.
pub fn translate(canvas: &mut Canvas, dx: f64, dy: f64) -> Result<()> {
    let mut world = canvas.camera().world();
    world.offset(dx, dy);
    set_world(canvas, world)
}

/// Moves up by `1 / factor` of the visible height.
pub fn translate_up(canvas: &mut Canvas, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let dy = canvas.camera().view().height() / factor;
    translate(canvas, 0.0, dy)
}

pub fn translate_down(canvas: &mut Canvas, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let dy = canvas.camera().view().height() / factor;
    translate(canvas, 0.0, -dy)
}

pub fn translate_left(canvas: &mut Canvas, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let dx = canvas.camera().view().width() / factor;
    translate(canvas, -dx, 0.0)
}

pub fn translate_right(canvas: &mut Canvas, factor: f64) -> Result<()> {
    check_factor(factor)?;
    let dx = canvas.camera().view().width() / factor;
    translate(canvas, dx, 0.0)
}

/// Drags the content by `dx`, `dy` screen pixels so it follows the pointer.
pub fn pan_by_pixels(canvas: &mut Canvas, dx: f64, dy: f64) -> Result<()> {
    let units = canvas.camera().world_scale_factor();
    // screen y grows downward, world y upward
    translate(canvas, -dx * units.x, dy * units.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::frame::Frame;
    use crate::text_renderer::TextEngine;

    const EPS: f64 = 1e-9;

    fn canvas(width: f64, height: f64) -> Canvas {
        let mut canvas = Canvas::new(
            "MainCanvas",
            Rectangle::new((0.0, 0.0), (100.0, 100.0)),
            color::WHITE,
            |_| {},
        )
        .unwrap();
        canvas
            .place(Rectangle::with_size((0.0, 0.0), width, height))
            .unwrap();
        canvas
    }

    fn assert_rect(actual: Rectangle, expected: Rectangle) {
        for (a, b) in [
            (actual.left(), expected.left()),
            (actual.bottom(), expected.bottom()),
            (actual.right(), expected.right()),
            (actual.top(), expected.top()),
        ] {
            assert!((a - b).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_zoom_in_world_around_center() {
        let world = Rectangle::new((0.0, 0.0), (100.0, 100.0));
        let zoomed = zoom_in_world(Point2D::new(50.0, 50.0), world, 5.0 / 3.0);
        assert_rect(zoomed, Rectangle::new((20.0, 20.0), (80.0, 80.0)));

        let back = zoom_out_world(Point2D::new(50.0, 50.0), zoomed, 5.0 / 3.0);
        assert_rect(back, world);
    }

    #[test]
    fn test_zoom_keeps_anchor_on_screen() {
        for (w, h) in [(400.0, 300.0), (300.0, 600.0)] {
            let mut canvas = canvas(w, h);
            let cursor = Point2D::new(w * 0.3, h * 0.8);
            let anchor = canvas.camera().screen_to_world(cursor);

            zoom_in_at(&mut canvas, cursor, 5.0 / 3.0).unwrap();
            let after = canvas.camera().world_to_screen(anchor);
            assert!((after.x - cursor.x).abs() < 1e-6 && (after.y - cursor.y).abs() < 1e-6);

            zoom_out_at(&mut canvas, cursor, 2.5).unwrap();
            let after = canvas.camera().world_to_screen(anchor);
            assert!((after.x - cursor.x).abs() < 1e-6 && (after.y - cursor.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zoom_is_monotonic() {
        let mut canvas = canvas(320.0, 200.0);
        let before = canvas.camera().view();

        zoom_in(&mut canvas, 1.5).unwrap();
        let inner = canvas.camera().view();
        assert!(inner.width() < before.width() && inner.height() < before.height());

        zoom_out(&mut canvas, 3.0).unwrap();
        let outer = canvas.camera().view();
        assert!(outer.width() > inner.width() && outer.height() > inner.height());
    }

    #[test]
    fn test_invalid_factor_leaves_canvas_alone() {
        let mut canvas = canvas(100.0, 100.0);
        canvas.paint(&mut Frame::new(color::WHITE), &mut TextEngine::default());
        let before = canvas.camera().clone();

        for factor in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                zoom_in(&mut canvas, factor),
                Err(Error::InvalidZoomFactor(_))
            ));
            assert!(translate_up(&mut canvas, factor).is_err());
        }
        assert_eq!(canvas.camera(), &before);
        assert!(!canvas.is_dirty());
    }

    #[test]
    fn test_zoom_fit_restores_initial_world() {
        let mut canvas = canvas(200.0, 100.0);
        zoom_in(&mut canvas, 4.0).unwrap();
        translate(&mut canvas, 13.0, -7.0).unwrap();

        let initial = canvas.camera().initial_world();
        zoom_fit(&mut canvas, initial).unwrap();
        assert_rect(canvas.camera().world(), initial);
        assert!(canvas.is_dirty());
    }

    #[test]
    fn test_translate_by_fraction_of_view() {
        let mut canvas = canvas(200.0, 100.0);
        // view is 200 x 100 world units here
        translate_right(&mut canvas, 5.0).unwrap();
        assert!((canvas.camera().world().left() - 40.0).abs() < EPS);

        translate_up(&mut canvas, 5.0).unwrap();
        assert!((canvas.camera().world().bottom() - 20.0).abs() < EPS);

        translate_left(&mut canvas, 5.0).unwrap();
        translate_down(&mut canvas, 5.0).unwrap();
        assert_rect(canvas.camera().world(), Rectangle::new((0.0, 0.0), (100.0, 100.0)));
    }

    #[test]
    fn test_pan_follows_the_pointer() {
        let mut canvas = canvas(200.0, 200.0);
        let grabbed = Point2D::new(50.0, 50.0);
        let at = canvas.camera().world_to_screen(grabbed);

        pan_by_pixels(&mut canvas, 30.0, -10.0).unwrap();
        let now = canvas.camera().world_to_screen(grabbed);
        assert!((now.x - (at.x + 30.0)).abs() < 1e-9);
        assert!((now.y - (at.y - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_out_stops_before_the_world_overflows() {
        let mut canvas = canvas(200.0, 100.0);
        let mut steps = 0;
        while zoom_out(&mut canvas, 1e10).is_ok() {
            steps += 1;
            assert!(steps < 100, "zooming out never failed");
        }

        let camera = canvas.camera();
        assert!(camera.world().is_proper());
        assert!(camera.scale().x.is_finite() && camera.scale().x > 0.0);
        let p = camera.screen_to_world(Point2D::new(10.0, 10.0));
        assert!(p.is_finite());
    }
}
