use ezcanvas::{Application, Rectangle, Settings};

fn main() -> ezcanvas::Result<()> {
    let mut settings = Settings::default();
    settings.window.title = "Input Key Press Example".to_string();

    let mut application = Application::new(settings);
    application.add_main_canvas(Rectangle::new((0.0, 0.0), (1000.0, 1000.0)), |_| {})?;
    application.on_key_press(|app, event| {
        println!("{} was pressed.", event.key_name);
        if event.is_escape() {
            app.quit();
        }
    });

    std::process::exit(application.run()?);
}
