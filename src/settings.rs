use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::color::{self, Color};
use crate::error::{Error, Result};
use crate::style::FontFace;

/// Configuration for an [`Application`](crate::Application).
///
/// Every field has a default, so a JSON file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub application_id: String,
    /// UI description file; the built-in layout is used when unset.
    pub main_ui: Option<PathBuf>,
    pub window_id: String,
    pub canvas_id: String,
    pub window: WindowSettings,
    pub background: Color,
    pub zoom_factor: f64,
    /// Fraction of the visible world moved by the arrow buttons is `1 / pan_factor`.
    pub pan_factor: f64,
    pub fonts: Vec<FontSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            application_id: "ezcanvas.app".to_string(),
            main_ui: None,
            window_id: "MainWindow".to_string(),
            canvas_id: "MainCanvas".to_string(),
            window: WindowSettings::default(),
            background: color::WHITE,
            zoom_factor: 5.0 / 3.0,
            pan_factor: 5.0,
            fonts: Vec::new(),
        }
    }
}

/// Used when the UI description does not size the window itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "ezcanvas".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    #[serde(flatten)]
    pub face: FontFace,
    pub path: PathBuf,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FontSlant, FontWeight};

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings = Settings::from_json_str(r#"{ "canvas_id": "Map", "window": { "width": 1024 } }"#)
            .unwrap();
        assert_eq!(settings.canvas_id, "Map");
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.window.height, 600);
        assert_eq!(settings.window_id, "MainWindow");
        assert!((settings.zoom_factor - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(settings.background, color::WHITE);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut settings = Settings::default();
        settings.background = color::LIGHT_SKY_BLUE;
        settings.main_ui = Some(PathBuf::from("ui/main.ui"));
        settings.fonts.push(FontSettings {
            face: FontFace::new("monospace", FontSlant::Oblique, FontWeight::Bold),
            path: PathBuf::from("/fonts/mono.ttf"),
        });

        let json = settings.to_json_string().unwrap();
        assert_eq!(Settings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn test_font_entries_are_flat() {
        let settings = Settings::from_json_str(
            r#"{ "fonts": [ { "family": "serif", "slant": "italic", "path": "a.ttf" } ] }"#,
        )
        .unwrap();
        let font = &settings.fonts[0];
        assert_eq!(font.face.family, "serif");
        assert_eq!(font.face.slant, FontSlant::Italic);
        assert_eq!(font.face.weight, FontWeight::Normal);
    }

    #[test]
    fn test_errors_name_the_problem() {
        assert!(matches!(Settings::from_json_str("{ nope"), Err(Error::Settings(_))));
        assert!(matches!(
            Settings::from_json_file("/nonexistent/settings.json"),
            Err(Error::Io { .. })
        ));
    }
}
