use serde::{Deserialize, Serialize};

/// An RGBA colour with 8-bit channels. Alpha 255 is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(default = "opaque")]
    pub alpha: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Same colour with an alpha in `0.0..=1.0`, clamped.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Normalized channels in the order the shaders expect.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.red as f32 / 255.0,
            self.green as f32 / 255.0,
            self.blue as f32 / 255.0,
            self.alpha as f32 / 255.0,
        ]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_f32();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        BLACK
    }
}

pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const GREY_55: Color = Color::rgb(0x8C, 0x8C, 0x8C);
pub const GREY_75: Color = Color::rgb(0xBF, 0xBF, 0xBF);
pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
pub const ORANGE: Color = Color::rgb(0xFF, 0xA5, 0x00);
pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
pub const CYAN: Color = Color::rgb(0x00, 0xFF, 0xFF);
pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
pub const PURPLE: Color = Color::rgb(0xA0, 0x20, 0xF0);
pub const PINK: Color = Color::rgb(0xFF, 0xC0, 0xCB);
pub const LIGHT_PINK: Color = Color::rgb(0xFF, 0xB6, 0xC1);
pub const DARK_GREEN: Color = Color::rgb(0x00, 0x64, 0x00);
pub const MAGENTA: Color = Color::rgb(0xFF, 0x00, 0xFF);
pub const BISQUE: Color = Color::rgb(0xFF, 0xE4, 0xC4);
pub const LIGHT_SKY_BLUE: Color = Color::rgb(0x87, 0xCE, 0xFA);
pub const THISTLE: Color = Color::rgb(0xD8, 0xBF, 0xD8);
pub const PLUM: Color = Color::rgb(0xDD, 0xA0, 0xDD);
pub const KHAKI: Color = Color::rgb(0xF0, 0xE6, 0x8C);
pub const CORAL: Color = Color::rgb(0xFF, 0x7F, 0x50);
pub const TURQUOISE: Color = Color::rgb(0x40, 0xE0, 0xD0);
pub const MEDIUM_PURPLE: Color = Color::rgb(0x93, 0x70, 0xDB);
pub const DARK_SLATE_BLUE: Color = Color::rgb(0x48, 0x3D, 0x8B);
pub const DARK_KHAKI: Color = Color::rgb(0xBD, 0xB7, 0x6B);
pub const LIGHT_MEDIUM_BLUE: Color = Color::rgb(0x44, 0x44, 0xFF);
pub const SADDLE_BROWN: Color = Color::rgb(0x8B, 0x45, 0x13);
pub const FIRE_BRICK: Color = Color::rgb(0xB2, 0x22, 0x22);
pub const LIME_GREEN: Color = Color::rgb(0x32, 0xCD, 0x32);
