use serde::{Deserialize, Serialize};

/// How the ends of stroked lines are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Stop exactly at the end point.
    #[default]
    Butt,
    /// Half circle centred on the end point.
    Round,
    /// Half square centred on the end point.
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineDash {
    #[default]
    None,
    /// 5 pixels on, 3 pixels off.
    Asymmetric5_3,
}

impl LineDash {
    /// On/off lengths in pixels, empty for a solid line.
    pub fn pattern(self) -> &'static [f32] {
        match self {
            LineDash::None => &[],
            LineDash::Asymmetric5_3 => &[5.0, 3.0],
        }
    }
}

/// Which part of the text's ink box lines up with the anchor along x.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalJustification {
    Left,
    #[default]
    Center,
    Right,
}

/// Which part of the text lines up with the anchor along y. `Top` and `Bottom`
/// use the font's ascent and descent so a row of labels shares one baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalJustification {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Whether drawing coordinates are world units or canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoordinateSystem {
    #[default]
    World,
    Screen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Everything about a font except its size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontFace {
    /// e.g. serif, sans-serif, monospace
    pub family: String,
    #[serde(default)]
    pub slant: FontSlant,
    #[serde(default)]
    pub weight: FontWeight,
}

impl FontFace {
    pub fn new(family: impl Into<String>, slant: FontSlant, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            slant,
            weight,
        }
    }
}

impl Default for FontFace {
    fn default() -> Self {
        Self::new("sans-serif", FontSlant::Normal, FontWeight::Normal)
    }
}
