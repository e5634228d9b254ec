use ezcanvas::{Application, Rectangle, Settings};

fn main() -> ezcanvas::Result<()> {
    let mut settings = Settings::default();
    settings.window.title = "Input Mouse Motion Example".to_string();

    let mut application = Application::new(settings);
    application.add_main_canvas(Rectangle::new((0.0, 0.0), (1000.0, 1000.0)), |_| {})?;
    application.on_mouse_move(|_, event| {
        println!("{}, {}", event.widget.x, event.widget.y);
    });

    std::process::exit(application.run()?);
}
