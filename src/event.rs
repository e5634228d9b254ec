use winit::event::MouseButton as WinitButton;
use winit::keyboard::{Key, ModifiersState, NamedKey};

use crate::geometry::Point2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Back,
    Forward,
    Other(u16),
}

impl From<WinitButton> for MouseButton {
    fn from(button: WinitButton) -> Self {
        match button {
            WinitButton::Left => MouseButton::Left,
            WinitButton::Right => MouseButton::Right,
            WinitButton::Middle => MouseButton::Middle,
            WinitButton::Back => MouseButton::Back,
            WinitButton::Forward => MouseButton::Forward,
            WinitButton::Other(n) => MouseButton::Other(n),
        }
    }
}

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub logo: bool,
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            control: state.control_key(),
            alt: state.alt_key(),
            logo: state.super_key(),
        }
    }
}

/// A pointer event over a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub canvas: String,
    /// `None` for motion.
    pub button: Option<MouseButton>,
    /// Canvas pixels, origin top-left.
    pub widget: Point2D,
    pub world: Point2D,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// `"a"`, `"Escape"`, `"ArrowUp"`, ...
    pub key_name: String,
    /// Text the key would type, if any.
    pub text: Option<String>,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub(crate) fn from_winit(key: &Key, text: Option<&str>, modifiers: Modifiers) -> Self {
        let key_name = match key {
            Key::Named(named) => format!("{named:?}"),
            Key::Character(c) => c.to_string(),
            Key::Unidentified(_) => "Unidentified".to_string(),
            Key::Dead(c) => c.map_or_else(|| "Dead".to_string(), |c| c.to_string()),
        };
        Self {
            key_name,
            text: text.map(str::to_string),
            modifiers,
        }
    }

    pub fn is_escape(&self) -> bool {
        self.key_name == format!("{:?}", NamedKey::Escape)
    }
}
