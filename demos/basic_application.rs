use ezcanvas::{
    Application, FontFace, FontSlant, FontWeight, HorizontalJustification, LineDash, Rectangle, Renderer,
    Settings, VerticalJustification, color,
};

fn draw_screen(g: &mut Renderer<'_>) {
    let world = g.visible_world();

    // a blue line across the drawable area
    g.set_color(color::BLUE);
    g.draw_line(world.bottom_left(), world.top_right());

    g.set_color(color::RED);
    g.draw_rectangle(Rectangle::new((100.0, 100.0), (400.0, 300.0)));
    g.draw_rectangle(Rectangle::with_size((10.0, 10.0), 50.0, 50.0));

    g.set_color_with_alpha(color::BLUE, 0.6);
    g.format_font(FontFace::new("monospace", FontSlant::Oblique, FontWeight::Normal), 24.0);
    g.draw_text((100.0, 100.0), "Hello World!");

    // label hanging below and right of the rectangle's corner
    g.set_font_size(14.0);
    g.set_horiz_justification(HorizontalJustification::Left);
    g.set_vert_justification(VerticalJustification::Top);
    g.draw_text((400.0, 100.0), "(400, 100)");

    g.set_line_dash(LineDash::Asymmetric5_3);
    g.draw_line((0.0, 500.0), (1000.0, 500.0));
    g.set_line_dash(LineDash::None);

    // green, half transparent
    g.set_color_rgba(0, 255, 0, 128);
    g.fill_rectangle(Rectangle::new((500.0, 50.0), (600.0, 300.0)));
    g.fill_rectangle(Rectangle::with_size((500.0, 50.0), 50.0, 50.0));
}

fn main() -> ezcanvas::Result<()> {
    let mut settings = Settings::default();
    settings.window.title = "Basic Application Example".to_string();
    settings.background = color::BLACK;

    let mut application = Application::new(settings);
    application.add_main_canvas(Rectangle::new((0.0, 0.0), (1000.0, 1000.0)), draw_screen)?;

    application.on_key_press(|app, event| {
        println!("{} was pressed.", event.key_name);
        if event.is_escape() {
            app.quit();
        }
    });
    application.on_mouse_move(|_, event| {
        println!("{}, {}", event.widget.x, event.widget.y);
    });

    std::process::exit(application.run()?);
}
