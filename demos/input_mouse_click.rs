use ezcanvas::{Application, Rectangle, Settings};

fn main() -> ezcanvas::Result<()> {
    let mut settings = Settings::default();
    settings.window.title = "Input Mouse Click Example".to_string();

    let mut application = Application::new(settings);
    application.add_main_canvas(Rectangle::new((0.0, 0.0), (1000.0, 1000.0)), |_| {})?;
    application.on_mouse_press(|app, event| {
        println!("User clicked mouse at {}, {}", event.widget.x, event.widget.y);
        app.update_message(&format!("world ({:.1}, {:.1})", event.world.x, event.world.y));
    });
    application.on_mouse_release(|_, event| {
        println!("User released mouse button at {}, {}", event.widget.x, event.widget.y);
    });

    std::process::exit(application.run()?);
}
