use crate::error::{Error, Result};
use crate::geometry::{Point2D, Rectangle};

/// Maps a world coordinate system onto the pixels of a canvas.
///
/// The world is user defined and grows upward along y; the screen is the canvas in
/// pixels with its origin at the top-left corner and y growing downward. The y axis
/// is only flipped in the final pixel mapping.
///
/// The canvas rarely has the aspect ratio of the world, so the camera derives a
/// `view`: the world expanded along one axis until it matches the screen, with the
/// surplus split equally on both sides. The whole world stays visible, nothing is
/// stretched, and the world sits centred on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    world: Rectangle,
    initial_world: Rectangle,
    view: Rectangle,
    screen: Rectangle,
    // pixels per world unit
    scale: Point2D,
}

impl Camera {
    /// Creates a camera for `world`. Until the first [`update_screen`](Self::update_screen)
    /// the screen is a single pixel.
    pub fn new(world: Rectangle) -> Result<Self> {
        let screen = Rectangle::with_size(Point2D::ORIGIN, 1.0, 1.0);
        let (view, scale) = fit_view(world, screen)?;
        Ok(Self {
            world,
            initial_world: world,
            view,
            screen,
            scale: Point2D::new(scale, scale),
        })
    }

    pub fn world(&self) -> Rectangle {
        self.world
    }

    pub fn initial_world(&self) -> Rectangle {
        self.initial_world
    }

    pub fn view(&self) -> Rectangle {
        self.view
    }

    pub fn screen(&self) -> Rectangle {
        self.screen
    }

    /// Pixels per world unit along each axis.
    pub fn scale(&self) -> Point2D {
        self.scale
    }

    /// World units per pixel along each axis.
    pub fn world_scale_factor(&self) -> Point2D {
        Point2D::new(1.0 / self.scale.x, 1.0 / self.scale.y)
    }

    /// Called whenever the drawing surface changes size.
    ///
    /// Rejects empty or non-finite dimensions and leaves the camera untouched.
    pub fn update_screen(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::DegenerateScreen { width, height });
        }

        let screen = Rectangle::with_size(Point2D::ORIGIN, width, height);
        let (view, scale) = fit_view(self.world, screen)?;
        self.screen = screen;
        self.view = view;
        self.scale = Point2D::new(scale, scale);
        log::debug!(
            "camera screen {}x{}, view {:?}, scale {:?}",
            width,
            height,
            self.view,
            self.scale
        );
        Ok(())
    }

    /// Changes the visible world, keeping the initial world for zoom-fit.
    pub fn set_world(&mut self, world: Rectangle) -> Result<()> {
        let (view, scale) = fit_view(world, self.screen)?;
        self.world = world;
        self.view = view;
        self.scale = Point2D::new(scale, scale);
        Ok(())
    }

    /// Replaces both the visible and the initial world.
    pub fn reset_world(&mut self, world: Rectangle) -> Result<()> {
        self.set_world(world)?;
        self.initial_world = world;
        Ok(())
    }

    pub fn world_to_screen(&self, world: Point2D) -> Point2D {
        Point2D::new(
            (world.x - self.view.left()) * self.scale.x,
            (self.view.top() - world.y) * self.scale.y,
        )
    }

    pub fn screen_to_world(&self, screen: Point2D) -> Point2D {
        Point2D::new(
            self.view.left() + screen.x / self.scale.x,
            self.view.top() - screen.y / self.scale.y,
        )
    }

    pub fn world_to_screen_rect(&self, world: Rectangle) -> Rectangle {
        Rectangle::new(
            self.world_to_screen(world.bottom_left()),
            self.world_to_screen(world.top_right()),
        )
    }

    pub fn screen_to_world_rect(&self, screen: Rectangle) -> Rectangle {
        Rectangle::new(
            self.screen_to_world(screen.bottom_left()),
            self.screen_to_world(screen.top_right()),
        )
    }

    /// The pixels covered by the world rectangle itself.
    pub fn world_on_screen(&self) -> Rectangle {
        self.world_to_screen_rect(self.world)
    }
}

// The world expanded to the screen's aspect, centred, and the pixels per world
// unit. Fails when the ratio of the two sizes has no finite non-zero value.
fn fit_view(world: Rectangle, screen: Rectangle) -> Result<(Rectangle, f64)> {
    if !world.is_proper() {
        return Err(Error::DegenerateWorld(world));
    }
    let screen_width = screen.width();
    let screen_height = screen.height();

    let x_scale = screen_width / world.width();
    let y_scale = screen_height / world.height();

    let (scale, view_width, view_height) = if x_scale * world.height() > screen_height {
        // the width-driven scale would overflow vertically
        (y_scale, screen_width / y_scale, world.height())
    } else {
        (x_scale, world.width(), screen_height / x_scale)
    };

    let center = world.center();
    let view = Rectangle::new(
        (center.x - view_width * 0.5, center.y - view_height * 0.5),
        (center.x + view_width * 0.5, center.y + view_height * 0.5),
    );
    if !(scale.is_finite() && scale > 0.0 && view.is_proper()) {
        return Err(Error::DegenerateWorld(world));
    }
    Ok((view, scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS * a.abs().max(b.abs()).max(1.0)
    }

    fn square_world() -> Rectangle {
        Rectangle::new((0.0, 0.0), (100.0, 100.0))
    }

    #[test]
    fn test_wide_screen_widens_view() {
        let mut camera = Camera::new(square_world()).unwrap();
        camera.update_screen(200.0, 100.0).unwrap();

        let view = camera.view();
        assert!(close(view.width(), 200.0));
        assert!(close(view.height(), 100.0));
        assert!(close(view.left(), -50.0));
        assert!(close(view.right(), 150.0));

        let center = camera.world_to_screen(Point2D::new(50.0, 50.0));
        assert!(close(center.x, 100.0));
        assert!(close(center.y, 50.0));
    }

    #[test]
    fn test_tall_screen_heightens_view() {
        let mut camera = Camera::new(square_world()).unwrap();
        camera.update_screen(100.0, 400.0).unwrap();

        let view = camera.view();
        assert!(close(view.width(), 100.0));
        assert!(close(view.height(), 400.0));
        assert!(close(view.bottom(), -150.0));
        assert!(close(camera.scale().x, 1.0));
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let mut camera = Camera::new(square_world()).unwrap();
        camera.update_screen(100.0, 100.0).unwrap();

        let top_left = camera.world_to_screen(Point2D::new(0.0, 100.0));
        let bottom_right = camera.world_to_screen(Point2D::new(100.0, 0.0));
        assert!(close(top_left.x, 0.0) && close(top_left.y, 0.0));
        assert!(close(bottom_right.x, 100.0) && close(bottom_right.y, 100.0));
    }

    #[test]
    fn test_round_trip() {
        let mut camera = Camera::new(Rectangle::new((-3.5, 12.0), (40.0, 19.25))).unwrap();
        camera.update_screen(731.0, 377.0).unwrap();

        let view = camera.view();
        for i in 0..=10 {
            for j in 0..=10 {
                let p = Point2D::new(
                    view.left() + view.width() * i as f64 / 10.0,
                    view.bottom() + view.height() * j as f64 / 10.0,
                );
                let back = camera.screen_to_world(camera.world_to_screen(p));
                assert!(close(back.x, p.x), "{p:?} -> {back:?}");
                assert!(close(back.y, p.y), "{p:?} -> {back:?}");
            }
        }
    }

    #[test]
    fn test_aspect_preserved_for_any_screen() {
        let world = Rectangle::new((0.0, 0.0), (300.0, 100.0));
        let mut camera = Camera::new(world).unwrap();

        for (w, h) in [(640.0, 480.0), (100.0, 900.0), (1920.0, 200.0), (3.0, 3.0)] {
            camera.update_screen(w, h).unwrap();

            let on_screen = camera.world_on_screen();
            assert!(close(on_screen.aspect_ratio(), world.aspect_ratio()));
            assert!(close(camera.scale().x, camera.scale().y));
            // the world is entirely visible
            assert!(on_screen.left() >= -EPS && on_screen.right() <= w + 1e-6);
            assert!(on_screen.bottom() >= -EPS && on_screen.top() <= h + 1e-6);
            // and the view matches the screen
            assert!(close(camera.view().aspect_ratio(), w / h));
        }
    }

    #[test]
    fn test_world_is_centred_on_screen() {
        let mut camera = Camera::new(square_world()).unwrap();

        camera.update_screen(500.0, 200.0).unwrap();
        let on_screen = camera.world_on_screen();
        assert!(close(on_screen.left(), 500.0 - on_screen.right()));
        assert!(close(on_screen.bottom(), 0.0));

        camera.update_screen(200.0, 500.0).unwrap();
        let on_screen = camera.world_on_screen();
        assert!(close(on_screen.bottom(), 500.0 - on_screen.top()));
        assert!(close(on_screen.left(), 0.0));
    }

    #[test]
    fn test_degenerate_inputs_are_rejected() {
        assert!(matches!(
            Camera::new(Rectangle::new((1.0, 1.0), (1.0, 5.0))),
            Err(Error::DegenerateWorld(_))
        ));

        let mut camera = Camera::new(square_world()).unwrap();
        camera.update_screen(200.0, 100.0).unwrap();
        let before = camera.clone();

        assert!(matches!(
            camera.update_screen(0.0, 100.0),
            Err(Error::DegenerateScreen { .. })
        ));
        assert!(camera.update_screen(f64::NAN, 100.0).is_err());
        assert!(camera.set_world(Rectangle::new((0.0, 0.0), (10.0, 0.0))).is_err());
        assert_eq!(camera, before);
    }

    #[test]
    fn test_reset_world_replaces_initial_world() {
        let mut camera = Camera::new(square_world()).unwrap();
        let zoomed = Rectangle::new((10.0, 10.0), (20.0, 20.0));

        camera.set_world(zoomed).unwrap();
        assert_eq!(camera.initial_world(), square_world());

        camera.reset_world(zoomed).unwrap();
        assert_eq!(camera.initial_world(), zoomed);
    }

    #[test]
    fn test_world_scale_factor_is_reciprocal() {
        let mut camera = Camera::new(square_world()).unwrap();
        camera.update_screen(400.0, 400.0).unwrap();
        assert!(close(camera.world_scale_factor().x, 0.25));
        assert!(close(camera.world_scale_factor().y, 0.25));
    }

    #[test]
    fn test_overflowing_world_is_rejected() {
        let huge = Rectangle::new((-1e308, 0.0), (1e308, 1.0));
        assert!(matches!(Camera::new(huge), Err(Error::DegenerateWorld(_))));

        let mut camera = Camera::new(square_world()).unwrap();
        camera.update_screen(640.0, 480.0).unwrap();
        let before = camera.clone();
        assert!(matches!(camera.set_world(huge), Err(Error::DegenerateWorld(_))));
        assert_eq!(camera, before);
        let p = camera.screen_to_world(Point2D::new(10.0, 10.0));
        assert!(p.is_finite());
    }

    #[test]
    fn test_world_too_small_for_a_pixel_scale_is_rejected() {
        // width is subnormal, so pixels per unit overflow to infinity
        let tiny = Rectangle::new((0.0, 0.0), (1e-320, 1e-320));
        assert!(matches!(Camera::new(tiny), Err(Error::DegenerateWorld(_))));

        let mut camera = Camera::new(Rectangle::new((0.0, 0.0), (1e-300, 1e-300))).unwrap();
        assert!(camera.update_screen(1e10, 1e10).is_err());
        assert_eq!(camera.screen().width(), 1.0);
    }
}

