use std::collections::{HashMap, VecDeque};

use crate::builder::{UiDescription, UiSource};
use crate::canvas::Canvas;
use crate::color::Color;
use crate::control;
use crate::dialog::{Dialog, DialogCallback, DialogResponse};
use crate::error::{Error, Result};
use crate::event::{KeyEvent, Modifiers, MouseEvent};
use crate::geometry::{Point2D, Rectangle};
use crate::graphics::Renderer;
use crate::settings::Settings;
use crate::text_renderer::{FontBook, TextEngine};
use crate::ui::{GridCell, Panel, StatusBar, Widget, WidgetKind};

pub type SetupCallback = Box<dyn FnMut(&mut Application, bool)>;
pub type MouseCallback = Box<dyn FnMut(&mut Application, &MouseEvent)>;
pub type KeyCallback = Box<dyn FnMut(&mut Application, &KeyEvent)>;
pub type ButtonCallback = Box<dyn FnMut(&mut Application)>;
pub type ComboBoxCallback = Box<dyn FnMut(&mut Application, &str)>;
pub(crate) type RegisterCallback = Box<dyn FnOnce(&mut Application) -> Result<()>>;

pub(crate) enum Action {
    Button(Option<ButtonCallback>),
    ComboBox(Option<ComboBoxCallback>),
}

#[derive(Default)]
pub(crate) struct Handlers {
    pub setup: Option<SetupCallback>,
    pub mouse_press: Option<MouseCallback>,
    pub mouse_release: Option<MouseCallback>,
    pub mouse_move: Option<MouseCallback>,
    pub key_press: Option<KeyCallback>,
    pub register: Option<RegisterCallback>,
}

/// Pointer tracking between events.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pub cursor: Option<Point2D>,
    // canvas index and last cursor position of a middle-button drag
    pub pan: Option<(usize, Point2D)>,
    pub modifiers: Modifiers,
    pub hovered: Option<String>,
}

/// The main window: canvases, the widget panel, the status bar and dialogs,
/// plus the callbacks that react to input.
///
/// ```no_run
/// use ezcanvas::{Application, Rectangle, Settings, color};
///
/// let mut application = Application::new(Settings::default());
/// application
///     .add_canvas("MainCanvas", Rectangle::new((0.0, 0.0), (1000.0, 1000.0)), color::WHITE, |g| {
///         g.set_color(color::BLUE);
///         g.draw_line((0.0, 0.0), (1000.0, 1000.0));
///     })
///     .unwrap();
/// std::process::exit(application.run().unwrap_or(1));
/// ```
pub struct Application {
    settings: Settings,
    pub(crate) ui: Option<UiDescription>,
    pub(crate) canvases: Vec<Canvas>,
    pub(crate) panel: Panel,
    pub(crate) status: StatusBar,
    pub(crate) dialogs: VecDeque<Dialog>,
    actions: HashMap<String, Action>,
    pub(crate) handlers: Handlers,
    pub(crate) input: InputState,
    pub(crate) text: TextEngine,
    event_loop_disabled: bool,
    quit_requested: bool,
    pub(crate) needs_paint: bool,
    pub(crate) size: (f64, f64),
    started: bool,
}

impl Application {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ui: None,
            canvases: Vec::new(),
            panel: Panel::new("InnerGrid"),
            status: StatusBar::new("StatusBar"),
            dialogs: VecDeque::new(),
            actions: HashMap::new(),
            handlers: Handlers::default(),
            input: InputState::default(),
            text: TextEngine::default(),
            event_loop_disabled: false,
            quit_requested: false,
            needs_paint: true,
            size: (0.0, 0.0),
            started: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Adds a canvas showing `world`. The id must be declared in the UI description.
    pub fn add_canvas(
        &mut self,
        id: impl Into<String>,
        world: Rectangle,
        background: Color,
        draw: impl FnMut(&mut Renderer<'_>) + 'static,
    ) -> Result<()> {
        let id = id.into();
        if self.canvas(&id).is_some() {
            return Err(Error::DuplicateCanvas(id));
        }
        if let Some(ui) = &self.ui {
            if !ui.canvases.contains(&id) {
                return Err(Error::UnknownWidget(id));
            }
        }

        log::debug!("adding canvas {id} showing {world:?}");
        self.canvases.push(Canvas::new(id, world, background, draw)?);
        if self.started {
            self.layout();
        }
        Ok(())
    }

    /// Adds the canvas named by [`Settings::canvas_id`], painted over [`Settings::background`].
    pub fn add_main_canvas(
        &mut self,
        world: Rectangle,
        draw: impl FnMut(&mut Renderer<'_>) + 'static,
    ) -> Result<()> {
        let id = self.settings.canvas_id.clone();
        let background = self.settings.background;
        self.add_canvas(id, world, background, draw)
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.iter().find(|c| c.id() == id)
    }

    pub fn canvas_mut(&mut self, id: &str) -> Option<&mut Canvas> {
        self.canvases.iter_mut().find(|c| c.id() == id)
    }

    /// The canvas named by [`Settings::canvas_id`].
    pub fn main_canvas_mut(&mut self) -> Option<&mut Canvas> {
        let id = self.settings.canvas_id.clone();
        self.canvas_mut(&id)
    }

    pub fn canvases(&self) -> impl Iterator<Item = &Canvas> {
        self.canvases.iter()
    }

    fn require_canvas(&mut self, id: &str) -> Result<&mut Canvas> {
        self.canvas_mut(id)
            .ok_or_else(|| Error::UnknownCanvas(id.to_string()))
    }

    /// Replaces the world of a canvas, including the one zoom-fit returns to.
    pub fn change_canvas_world_coordinates(&mut self, id: &str, world: Rectangle) -> Result<()> {
        let canvas = self.require_canvas(id)?;
        canvas.camera_mut().reset_world(world)?;
        canvas.redraw();
        Ok(())
    }

    /// Repaints every canvas.
    pub fn refresh_drawing(&mut self) {
        for canvas in &mut self.canvases {
            canvas.redraw();
        }
    }

    /// Runs once the window exists; the flag tells whether the window is new.
    pub fn on_setup(&mut self, callback: impl FnMut(&mut Application, bool) + 'static) {
        self.handlers.setup = Some(Box::new(callback));
    }

    /// Replaces the default click behaviour (zoom in on left, out on right).
    pub fn on_mouse_press(&mut self, callback: impl FnMut(&mut Application, &MouseEvent) + 'static) {
        self.handlers.mouse_press = Some(Box::new(callback));
    }

    pub fn on_mouse_release(&mut self, callback: impl FnMut(&mut Application, &MouseEvent) + 'static) {
        self.handlers.mouse_release = Some(Box::new(callback));
    }

    pub fn on_mouse_move(&mut self, callback: impl FnMut(&mut Application, &MouseEvent) + 'static) {
        self.handlers.mouse_move = Some(Box::new(callback));
    }

    /// Replaces the default key behaviour (Escape quits).
    pub fn on_key_press(&mut self, callback: impl FnMut(&mut Application, &KeyEvent) + 'static) {
        self.handlers.key_press = Some(Box::new(callback));
    }

    /// Wires up the panel widgets instead of the default buttons. Runs once the UI
    /// description is loaded, before the window opens.
    pub fn register_callbacks_with(&mut self, register: impl FnOnce(&mut Application) -> Result<()> + 'static) {
        self.handlers.register = Some(Box::new(register));
    }

    /// Attaches `callback` to an existing button.
    pub fn connect_button(&mut self, id: &str, callback: impl FnMut(&mut Application) + 'static) -> Result<()> {
        match self.panel.find(id).map(|w| &w.kind) {
            Some(WidgetKind::Button { .. }) => {
                self.actions
                    .insert(id.to_string(), Action::Button(Some(Box::new(callback))));
                Ok(())
            }
            _ => Err(Error::UnknownWidget(id.to_string())),
        }
    }

    /// Adds a full-width button at `row`, pushing the widgets below it down.
    /// The label doubles as the widget id.
    pub fn create_button(
        &mut self,
        label: &str,
        row: u32,
        callback: impl FnMut(&mut Application) + 'static,
    ) -> Result<()> {
        if self.panel.find(label).is_some() {
            return Err(Error::DuplicateWidget(label.to_string()));
        }
        self.panel.insert_row(row);
        self.create_button_at(label, GridCell::row(row), callback)
    }

    /// Adds a button at an explicit grid position.
    pub fn create_button_at(
        &mut self,
        label: &str,
        cell: GridCell,
        callback: impl FnMut(&mut Application) + 'static,
    ) -> Result<()> {
        let kind = WidgetKind::Button {
            label: label.to_string(),
        };
        self.panel.add(Widget::new(label, kind, cell))?;
        self.actions
            .insert(label.to_string(), Action::Button(Some(Box::new(callback))));
        self.needs_paint = true;
        Ok(())
    }

    pub fn create_label(&mut self, id: &str, row: u32, text: &str) -> Result<()> {
        if self.panel.find(id).is_some() {
            return Err(Error::DuplicateWidget(id.to_string()));
        }
        self.panel.insert_row(row);
        self.create_label_at(id, GridCell::row(row), text)
    }

    pub fn create_label_at(&mut self, id: &str, cell: GridCell, text: &str) -> Result<()> {
        let kind = WidgetKind::Label {
            text: text.to_string(),
        };
        self.panel.add(Widget::new(id, kind, cell))?;
        self.needs_paint = true;
        Ok(())
    }

    /// Adds a drop-down list; clicking it selects the next option and calls
    /// `callback` with the new text.
    pub fn create_combo_box_text(
        &mut self,
        id: &str,
        cell: GridCell,
        options: Vec<String>,
        callback: impl FnMut(&mut Application, &str) + 'static,
    ) -> Result<()> {
        let kind = WidgetKind::ComboBox { options, active: 0 };
        self.panel.add(Widget::new(id, kind, cell))?;
        self.actions
            .insert(id.to_string(), Action::ComboBox(Some(Box::new(callback))));
        self.needs_paint = true;
        Ok(())
    }

    /// Replaces the options of a combo box and selects the first one.
    pub fn change_combo_box_text_options(&mut self, id: &str, new_options: Vec<String>) -> Result<()> {
        match self.panel.find_mut(id).map(|w| &mut w.kind) {
            Some(WidgetKind::ComboBox { options, active }) => {
                *options = new_options;
                *active = 0;
                self.needs_paint = true;
                Ok(())
            }
            _ => Err(Error::UnknownWidget(id.to_string())),
        }
    }

    /// Removes a widget and its callback. Returns false if there was no such widget.
    pub fn destroy_widget(&mut self, id: &str) -> bool {
        self.actions.remove(id);
        let removed = self.panel.remove(id).is_some();
        if removed {
            self.needs_paint = true;
            if self.input.hovered.as_deref() == Some(id) {
                self.input.hovered = None;
            }
        }
        removed
    }

    /// Removes the first button showing `label`.
    pub fn destroy_button(&mut self, label: &str) -> bool {
        match self.panel.find_button_by_label(label).map(|w| w.id.clone()) {
            Some(id) => self.destroy_widget(&id),
            None => false,
        }
    }

    /// Relabels the first button showing `old_label`.
    pub fn change_button_text(&mut self, old_label: &str, new_label: &str) -> Result<()> {
        let id = self
            .panel
            .find_button_by_label(old_label)
            .map(|w| w.id.clone())
            .ok_or_else(|| Error::UnknownWidget(old_label.to_string()))?;
        if let Some(WidgetKind::Button { label }) = self.panel.find_mut(&id).map(|w| &mut w.kind) {
            *label = new_label.to_string();
        }
        self.needs_paint = true;
        Ok(())
    }

    pub fn find_widget(&self, id: &str) -> Option<&Widget> {
        self.panel.find(id)
    }

    /// Shows `message` in the status bar.
    pub fn update_message(&mut self, message: &str) {
        self.status.set_message(message);
        self.needs_paint = true;
    }

    /// A modal dialog with OK and CANCEL.
    pub fn create_dialog_window(
        &mut self,
        title: &str,
        message: &str,
        callback: impl FnMut(&mut Application, DialogResponse) + 'static,
    ) {
        self.push_dialog(Dialog::confirm(title, message, Box::new(callback)));
    }

    /// A modal message with a DONE button.
    pub fn create_popup_message(&mut self, title: &str, message: &str) {
        self.push_dialog(Dialog::popup(title, message, None));
    }

    pub fn create_popup_message_with_callback(
        &mut self,
        title: &str,
        message: &str,
        callback: impl FnMut(&mut Application, DialogResponse) + 'static,
    ) {
        let callback: DialogCallback = Box::new(callback);
        self.push_dialog(Dialog::popup(title, message, Some(callback)));
    }

    fn push_dialog(&mut self, mut dialog: Dialog) {
        dialog.layout(self.window_rect());
        log::debug!("queueing dialog {:?}", dialog.title());
        self.dialogs.push_back(dialog);
        self.needs_paint = true;
    }

    pub fn dialog_open(&self) -> bool {
        !self.dialogs.is_empty()
    }

    /// Closes the front dialog, then calls its callback.
    pub fn respond_to_dialog(&mut self, response: DialogResponse) {
        let Some(mut dialog) = self.dialogs.pop_front() else {
            return;
        };
        self.needs_paint = true;
        log::debug!("dialog {:?} answered {response:?}", dialog.title());
        if let Some(mut callback) = dialog.take_callback() {
            callback(self, response);
        }
    }

    /// Leaves the event loop after the current event; `run` then returns.
    pub fn quit(&mut self) {
        log::info!("quitting");
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// With the event loop disabled, `run` returns immediately. Useful for tests
    /// and batch runs of programs that otherwise open a window.
    pub fn set_event_loop_disabled(&mut self, disabled: bool) {
        self.event_loop_disabled = disabled;
    }

    pub fn is_event_loop_disabled(&self) -> bool {
        self.event_loop_disabled
    }

    /// Opens the window and runs the event loop until the window closes or
    /// [`quit`](Self::quit) is called. Returns the process exit code.
    pub fn run(&mut self) -> Result<i32> {
        if env_logger::try_init().is_err() {
            log::debug!("keeping the logger that is already installed");
        }

        if self.event_loop_disabled {
            log::info!("event loop disabled, not opening a window");
            return Ok(0);
        }

        self.quit_requested = false;
        crate::app::run_event_loop(self)?;
        Ok(0)
    }

    fn ui_source(&self) -> UiSource {
        match &self.settings.main_ui {
            Some(path) => UiSource::File(path.clone()),
            None => UiSource::default(),
        }
    }

    /// Loads the UI description and fonts and wires up the panel. Called before
    /// the window is created.
    pub(crate) fn prepare(&mut self) -> Result<()> {
        let ui = self.ui_source().load()?;

        if !ui.declares(&self.settings.window_id) {
            return Err(Error::UnknownWidget(self.settings.window_id.clone()));
        }
        if let Some(canvas) = self.canvases.iter().find(|c| !ui.canvases.iter().any(|id| id == c.id())) {
            return Err(Error::UnknownWidget(canvas.id().to_string()));
        }
        // declaration order
        self.canvases.sort_by_key(|c| ui.canvases.iter().position(|id| id == c.id()));

        if let Some(grid) = &ui.grid {
            let mut panel = Panel::new(grid.id.clone());
            for widget in &grid.widgets {
                panel.add(widget.clone())?;
            }
            for widget in self.panel.widgets() {
                panel.add(widget.clone())?;
            }
            self.panel = panel;
        }
        if let Some(id) = &ui.statusbar {
            let message = self.status.message().to_string();
            self.status = StatusBar::new(id.clone());
            self.status.set_message(message);
        }
        self.ui = Some(ui);

        self.text.set_book(FontBook::load(&self.settings.fonts));

        match self.handlers.register.take() {
            Some(register) => register(self)?,
            None => self.register_default_buttons(),
        }
        Ok(())
    }

    /// Window title and size from the UI description, falling back to the settings.
    pub(crate) fn window_attributes(&self) -> (String, u32, u32) {
        let window = self.ui.as_ref().map(|ui| &ui.window);
        (
            window
                .and_then(|w| w.title.clone())
                .unwrap_or_else(|| self.settings.window.title.clone()),
            window
                .and_then(|w| w.width)
                .unwrap_or(self.settings.window.width),
            window
                .and_then(|w| w.height)
                .unwrap_or(self.settings.window.height),
        )
    }

    fn register_default_buttons(&mut self) {
        let zoom = self.settings.zoom_factor;
        let pan = self.settings.pan_factor;

        let defaults: [(&str, ButtonCallback); 8] = [
            (
                "ZoomFitButton",
                Box::new(|app: &mut Application| {
                    app.with_main_canvas(|c| {
                        let world = c.camera().initial_world();
                        control::zoom_fit(c, world)
                    })
                }),
            ),
            ("ZoomInButton", Box::new(move |app: &mut Application| app.with_main_canvas(|c| control::zoom_in(c, zoom)))),
            ("ZoomOutButton", Box::new(move |app: &mut Application| app.with_main_canvas(|c| control::zoom_out(c, zoom)))),
            ("UpButton", Box::new(move |app: &mut Application| app.with_main_canvas(|c| control::translate_up(c, pan)))),
            ("DownButton", Box::new(move |app: &mut Application| app.with_main_canvas(|c| control::translate_down(c, pan)))),
            ("LeftButton", Box::new(move |app: &mut Application| app.with_main_canvas(|c| control::translate_left(c, pan)))),
            ("RightButton", Box::new(move |app: &mut Application| app.with_main_canvas(|c| control::translate_right(c, pan)))),
            ("ProceedButton", Box::new(|app: &mut Application| app.quit())),
        ];

        for (id, callback) in defaults {
            if self.panel.find(id).is_some() {
                self.actions
                    .insert(id.to_string(), Action::Button(Some(callback)));
            } else {
                log::debug!("no {id} in the UI description");
            }
        }
    }

    fn with_main_canvas(&mut self, action: impl FnOnce(&mut Canvas) -> Result<()>) {
        let result = match self.main_canvas_mut() {
            Some(canvas) => action(canvas),
            None => Err(Error::UnknownCanvas(self.settings.canvas_id.clone())),
        };
        if let Err(err) = result {
            log::warn!("{err}");
        }
    }

    /// Lays out for the first time and runs the setup callback.
    pub(crate) fn start(&mut self, width: f64, height: f64) {
        self.size = (width, height);
        self.started = true;
        self.layout();

        if let Some(mut setup) = self.handlers.setup.take() {
            setup(self, true);
            if self.handlers.setup.is_none() {
                self.handlers.setup = Some(setup);
            }
        }
    }

    pub(crate) fn window_rect(&self) -> Rectangle {
        Rectangle::with_size(Point2D::ORIGIN, self.size.0, self.size.1)
    }

    /// Panel on the right, status bar along the bottom, canvases stacked in what is left.
    pub(crate) fn layout(&mut self) {
        let (width, height) = self.size;
        let panel_width = crate::ui::PANEL_WIDTH.min(width);
        let status_height = crate::ui::STATUS_HEIGHT.min(height);
        let area_width = (width - panel_width).max(1.0);
        let area_height = (height - status_height).max(1.0);

        self.panel.layout(Rectangle::with_size(
            (width - panel_width, 0.0),
            panel_width,
            area_height,
        ));
        self.status
            .layout(Rectangle::with_size((0.0, area_height), width, status_height));

        let count = self.canvases.len().max(1) as f64;
        let slice = area_height / count;
        for (i, canvas) in self.canvases.iter_mut().enumerate() {
            let placement = Rectangle::with_size((0.0, slice * i as f64), area_width, slice);
            if let Err(err) = canvas.place(placement) {
                log::warn!("cannot place canvas {}: {err}", canvas.id());
            }
        }

        let window = self.window_rect();
        for dialog in &mut self.dialogs {
            dialog.layout(window);
        }
        self.needs_paint = true;
    }

    pub(crate) fn run_button(&mut self, id: &str) {
        let Some(Action::Button(slot)) = self.actions.get_mut(id) else {
            log::debug!("button {id} has no callback");
            return;
        };
        let Some(mut callback) = slot.take() else {
            return;
        };
        callback(self);
        if let Some(Action::Button(slot @ None)) = self.actions.get_mut(id) {
            *slot = Some(callback);
        }
    }

    /// Selects the next option of a combo box and reports it.
    pub(crate) fn cycle_combo_box(&mut self, id: &str) {
        let Some(WidgetKind::ComboBox { options, active }) = self.panel.find_mut(id).map(|w| &mut w.kind) else {
            return;
        };
        if options.is_empty() {
            return;
        }
        *active = (*active + 1) % options.len();
        let text = options[*active].clone();
        self.needs_paint = true;

        let Some(Action::ComboBox(slot)) = self.actions.get_mut(id) else {
            return;
        };
        let Some(mut callback) = slot.take() else {
            return;
        };
        callback(self, &text);
        if let Some(Action::ComboBox(slot @ None)) = self.actions.get_mut(id) {
            *slot = Some(callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn world() -> Rectangle {
        Rectangle::new((0.0, 0.0), (100.0, 100.0))
    }

    fn started_app() -> Application {
        let mut app = Application::new(Settings::default());
        app.add_canvas("MainCanvas", world(), color::WHITE, |_| {}).unwrap();
        app.prepare().unwrap();
        app.start(800.0, 600.0);
        app
    }

    #[test]
    fn test_duplicate_canvas_is_rejected() {
        let mut app = Application::new(Settings::default());
        app.add_canvas("MainCanvas", world(), color::WHITE, |_| {}).unwrap();
        assert!(matches!(
            app.add_canvas("MainCanvas", world(), color::WHITE, |_| {}),
            Err(Error::DuplicateCanvas(_))
        ));
    }

    #[test]
    fn test_undeclared_canvas_fails_prepare() {
        let mut app = Application::new(Settings::default());
        app.add_canvas("Elsewhere", world(), color::WHITE, |_| {}).unwrap();
        assert!(matches!(app.prepare(), Err(Error::UnknownWidget(id)) if id == "Elsewhere"));
    }

    #[test]
    fn test_disabled_event_loop_returns_immediately() {
        let mut app = Application::new(Settings::default());
        app.set_event_loop_disabled(true);
        assert_eq!(app.run().unwrap(), 0);
        // the logger from the first run stays installed
        assert_eq!(app.run().unwrap(), 0);
    }

    #[test]
    fn test_layout_splits_window() {
        let app = started_app();
        let canvas = app.canvas("MainCanvas").unwrap();
        assert_eq!(canvas.width(), 800.0 - crate::ui::PANEL_WIDTH);
        assert_eq!(canvas.height(), 600.0 - crate::ui::STATUS_HEIGHT);
        assert_eq!(app.panel.bounds().left(), 800.0 - crate::ui::PANEL_WIDTH);
        assert_eq!(app.find_widget("ZoomInButton").map(|w| w.text()), Some("Zoom In"));
    }

    #[test]
    fn test_default_buttons_drive_the_main_canvas() {
        let mut app = started_app();
        let before = app.canvas("MainCanvas").unwrap().camera().world();

        app.run_button("ZoomInButton");
        let zoomed = app.canvas("MainCanvas").unwrap().camera().world();
        assert!(zoomed.width() < before.width());

        app.run_button("ZoomFitButton");
        assert_eq!(app.canvas("MainCanvas").unwrap().camera().world(), before);

        app.run_button("UpButton");
        assert!(app.canvas("MainCanvas").unwrap().camera().world().bottom() > 0.0);

        app.run_button("ProceedButton");
        assert!(app.quit_requested());
    }

    #[test]
    fn test_setup_runs_with_new_window_flag() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut app = Application::new(Settings::default());
        app.add_canvas("MainCanvas", world(), color::WHITE, |_| {}).unwrap();
        app.on_setup(move |app, new_window| {
            log.borrow_mut().push(new_window);
            app.update_message("ready");
        });
        app.prepare().unwrap();
        app.start(640.0, 480.0);

        assert_eq!(*seen.borrow(), vec![true]);
        assert_eq!(app.status.message(), "ready");
        assert!(app.handlers.setup.is_some());
    }

    #[test]
    fn test_custom_registration_replaces_defaults() {
        let mut app = Application::new(Settings::default());
        app.add_canvas("MainCanvas", world(), color::WHITE, |_| {}).unwrap();
        app.register_callbacks_with(|app| {
            app.connect_button("ProceedButton", |app| app.update_message("proceeding"))
        });
        app.prepare().unwrap();
        app.start(640.0, 480.0);

        app.run_button("ProceedButton");
        assert!(!app.quit_requested());
        assert_eq!(app.status.message(), "proceeding");

        // nothing attached to the zoom buttons
        let before = app.canvas("MainCanvas").unwrap().camera().world();
        app.run_button("ZoomInButton");
        assert_eq!(app.canvas("MainCanvas").unwrap().camera().world(), before);
    }

    #[test]
    fn test_created_buttons_shift_rows_and_can_be_destroyed() {
        let mut app = started_app();
        let fit_row = app.find_widget("ZoomFitButton").unwrap().cell.top;

        let clicks = Rc::new(RefCell::new(0));
        let counter = clicks.clone();
        app.create_button("Count", fit_row, move |_| *counter.borrow_mut() += 1)
            .unwrap();
        assert_eq!(app.find_widget("ZoomFitButton").unwrap().cell.top, fit_row + 1);
        assert!(app.create_button("Count", 0, |_| {}).is_err());

        app.run_button("Count");
        app.run_button("Count");
        assert_eq!(*clicks.borrow(), 2);

        app.change_button_text("Count", "Counted").unwrap();
        assert_eq!(app.find_widget("Count").unwrap().text(), "Counted");
        assert!(app.destroy_button("Counted"));
        assert!(!app.destroy_button("Counted"));
        app.run_button("Count");
        assert_eq!(*clicks.borrow(), 2);
    }

    #[test]
    fn test_button_destroying_itself_is_not_reinstalled() {
        let mut app = started_app();
        app.create_button_at("Once", GridCell::row(20), |app| {
            app.destroy_widget("Once");
        })
        .unwrap();
        app.run_button("Once");
        assert!(app.find_widget("Once").is_none());
        assert!(!app.actions.contains_key("Once"));
    }

    #[test]
    fn test_combo_box_cycles_options() {
        let mut app = started_app();
        let picked = Rc::new(RefCell::new(Vec::new()));
        let log = picked.clone();
        app.create_combo_box_text(
            "Mode",
            GridCell::row(10),
            vec!["a".into(), "b".into()],
            move |_, text| log.borrow_mut().push(text.to_string()),
        )
        .unwrap();

        app.cycle_combo_box("Mode");
        app.cycle_combo_box("Mode");
        assert_eq!(*picked.borrow(), vec!["b".to_string(), "a".to_string()]);

        app.change_combo_box_text_options("Mode", vec!["x".into(), "y".into(), "z".into()])
            .unwrap();
        assert_eq!(app.find_widget("Mode").unwrap().text(), "x");
        assert!(app.change_combo_box_text_options("Count", vec![]).is_err());
    }

    #[test]
    fn test_dialogs_queue_and_answer_in_order() {
        let mut app = started_app();
        let answers = Rc::new(RefCell::new(Vec::new()));
        let log = answers.clone();
        app.create_dialog_window("First", "?", move |app, response| {
            log.borrow_mut().push(response);
            app.update_message("answered");
        });
        app.create_popup_message("Second", "!");

        assert!(app.dialog_open());
        app.respond_to_dialog(DialogResponse::Reject);
        assert_eq!(*answers.borrow(), vec![DialogResponse::Reject]);
        assert_eq!(app.status.message(), "answered");
        assert_eq!(app.dialogs.front().map(|d| d.title()), Some("Second"));

        app.respond_to_dialog(DialogResponse::Accept);
        assert!(!app.dialog_open());
    }

    #[test]
    fn test_change_world_coordinates() {
        let mut app = started_app();
        let new_world = Rectangle::new((-10.0, -10.0), (10.0, 10.0));
        app.change_canvas_world_coordinates("MainCanvas", new_world).unwrap();
        let camera = app.canvas("MainCanvas").unwrap().camera();
        assert_eq!(camera.world(), new_world);
        assert_eq!(camera.initial_world(), new_world);

        assert!(matches!(
            app.change_canvas_world_coordinates("Nope", new_world),
            Err(Error::UnknownCanvas(_))
        ));
    }
}
