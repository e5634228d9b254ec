use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::settings::FontSettings;
use crate::style::{FontFace, FontSlant, FontWeight, HorizontalJustification, VerticalJustification};
use crate::tessellate::Mesh;
use crate::vertex::TexVertex;

pub const ATLAS_SIZE: u32 = 1024;
const PADDING: u32 = 1;

// Common locations, tried after the configured fonts.
const SYSTEM_FONTS: &[(&str, FontSlant, FontWeight, &str)] = &[
    ("sans-serif", FontSlant::Normal, FontWeight::Normal, "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
    ("sans-serif", FontSlant::Normal, FontWeight::Bold, "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
    ("sans-serif", FontSlant::Oblique, FontWeight::Normal, "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf"),
    ("serif", FontSlant::Normal, FontWeight::Normal, "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf"),
    ("serif", FontSlant::Normal, FontWeight::Bold, "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf"),
    ("serif", FontSlant::Italic, FontWeight::Normal, "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Italic.ttf"),
    ("monospace", FontSlant::Normal, FontWeight::Normal, "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf"),
    ("monospace", FontSlant::Normal, FontWeight::Bold, "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf"),
    ("monospace", FontSlant::Oblique, FontWeight::Normal, "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Oblique.ttf"),
    ("sans-serif", FontSlant::Normal, FontWeight::Normal, "/usr/share/fonts/TTF/DejaVuSans.ttf"),
    ("monospace", FontSlant::Normal, FontWeight::Normal, "/usr/share/fonts/TTF/DejaVuSansMono.ttf"),
    ("sans-serif", FontSlant::Normal, FontWeight::Normal, "/Library/Fonts/Arial.ttf"),
    ("sans-serif", FontSlant::Normal, FontWeight::Normal, "/System/Library/Fonts/Supplemental/Arial.ttf"),
    ("monospace", FontSlant::Normal, FontWeight::Normal, "/System/Library/Fonts/Supplemental/Courier New.ttf"),
    ("sans-serif", FontSlant::Normal, FontWeight::Normal, "C:\\Windows\\Fonts\\arial.ttf"),
    ("monospace", FontSlant::Normal, FontWeight::Normal, "C:\\Windows\\Fonts\\cour.ttf"),
];

/// Picks the closest face: exact, then same family with any slant of the same
/// kind, then same family, then the first face.
pub fn best_match(faces: &[FontFace], wanted: &FontFace) -> Option<usize> {
    let slanted = |s: FontSlant| s != FontSlant::Normal;
    let family = |f: &FontFace| f.family.eq_ignore_ascii_case(&wanted.family);

    faces
        .iter()
        .position(|f| family(f) && f.slant == wanted.slant && f.weight == wanted.weight)
        .or_else(|| {
            faces.iter().position(|f| {
                family(f) && slanted(f.slant) == slanted(wanted.slant) && f.weight == wanted.weight
            })
        })
        .or_else(|| faces.iter().position(|f| family(f)))
        .or(if faces.is_empty() { None } else { Some(0) })
}

/// The fonts available to text drawing.
#[derive(Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
    fonts: Vec<FontArc>,
}

impl FontBook {
    /// Loads the configured fonts, then whatever common system fonts exist.
    /// Configured fonts that fail to load are logged and skipped.
    pub fn load(configured: &[FontSettings]) -> Self {
        let mut book = Self::default();
        for font in configured {
            if let Err(err) = book.add_file(font.face.clone(), &font.path) {
                log::warn!("{err}");
            }
        }
        for &(family, slant, weight, path) in SYSTEM_FONTS {
            let face = FontFace::new(family, slant, weight);
            if book.faces.contains(&face) || !Path::new(path).exists() {
                continue;
            }
            if let Err(err) = book.add_file(face, path) {
                log::debug!("{err}");
            }
        }
        log::info!("{} font faces available", book.faces.len());
        book
    }

    pub fn add_file(&mut self, face: FontFace, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|_| Error::Font(PathBuf::from(path)))?;
        self.add(face, font);
        Ok(())
    }

    pub fn add(&mut self, face: FontFace, font: FontArc) {
        self.faces.push(face);
        self.fonts.push(font);
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn select(&self, face: &FontFace) -> Option<(usize, &FontArc)> {
        best_match(&self.faces, face).map(|i| (i, &self.fonts[i]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    font: usize,
    glyph: GlyphId,
    px: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct GlyphInfo {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    size: [f32; 2],
    // offset of the bitmap's top-left from the pen on the baseline
    bearing: [f32; 2],
}

/// Rasterised glyph coverage packed into one RGBA texture (white, alpha = coverage).
pub struct GlyphAtlas {
    pixels: Vec<u8>,
    cache: HashMap<GlyphKey, GlyphInfo>,
    next_x: u32,
    next_y: u32,
    row_h: u32,
    dirty: bool,
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphAtlas {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; (ATLAS_SIZE * ATLAS_SIZE * 4) as usize],
            cache: HashMap::new(),
            next_x: 0,
            next_y: 0,
            row_h: 0,
            dirty: true,
        }
    }

    pub fn size(&self) -> u32 {
        ATLAS_SIZE
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True when the pixels changed since the last [`mark_uploaded`](Self::mark_uploaded).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.cache.clear();
        self.next_x = 0;
        self.next_y = 0;
        self.row_h = 0;
        self.dirty = true;
    }

    /// Starts over if the atlas is mostly used, so a frame rarely overflows it.
    pub fn begin_frame(&mut self) {
        if self.next_y > ATLAS_SIZE * 3 / 4 {
            log::debug!("glyph atlas nearly full, clearing");
            self.clear();
        }
    }

    fn allocate(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let (w, h) = (width + PADDING, height + PADDING);
        if w > ATLAS_SIZE || h > ATLAS_SIZE {
            return None;
        }
        if self.next_x + w > ATLAS_SIZE {
            self.next_x = 0;
            self.next_y += self.row_h;
            self.row_h = 0;
        }
        if self.next_y + h > ATLAS_SIZE {
            return None;
        }
        let at = (self.next_x, self.next_y);
        self.next_x += w;
        self.row_h = self.row_h.max(h);
        Some(at)
    }

    fn cache_glyph(&mut self, font: &FontArc, key: GlyphKey) -> Option<GlyphInfo> {
        if let Some(info) = self.cache.get(&key) {
            return Some(*info);
        }

        let glyph = key.glyph.with_scale_and_position(PxScale::from(key.px as f32), point(0.0, 0.0));
        let Some(outline) = font.outline_glyph(glyph) else {
            // whitespace and the like
            return Some(*self.cache.entry(key).or_default());
        };

        let bounds = outline.px_bounds();
        let width = bounds.width().ceil() as u32;
        let height = bounds.height().ceil() as u32;
        let (x0, y0) = match self.allocate(width, height) {
            Some(at) => at,
            None => {
                log::debug!("glyph atlas full, clearing");
                self.clear();
                self.allocate(width, height)?
            }
        };

        let stride = ATLAS_SIZE as usize * 4;
        let pixels = &mut self.pixels;
        outline.draw(|x, y, coverage| {
            if x < width && y < height {
                let i = (y0 + y) as usize * stride + (x0 + x) as usize * 4;
                pixels[i..i + 4].copy_from_slice(&[255, 255, 255, (coverage * 255.0).round() as u8]);
            }
        });
        self.dirty = true;

        let texel = 1.0 / ATLAS_SIZE as f32;
        let info = GlyphInfo {
            uv_min: [x0 as f32 * texel, y0 as f32 * texel],
            uv_max: [(x0 + width) as f32 * texel, (y0 + height) as f32 * texel],
            size: [width as f32, height as f32],
            bearing: [bounds.min.x, bounds.min.y],
        };
        Some(*self.cache.entry(key).or_insert(info))
    }
}

/// Ink bounds of a string in pixels, measured from the pen origin on the baseline
/// (y grows downward), plus the font's vertical metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtents {
    pub x_bearing: f64,
    pub y_bearing: f64,
    pub width: f64,
    pub height: f64,
    pub advance: f64,
    /// Above the baseline, positive.
    pub ascent: f64,
    /// Below the baseline, positive.
    pub descent: f64,
}

/// Where laid-out text goes: an anchor in window pixels, how the text sits
/// against it, and a counter-clockwise rotation about it in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextPlacement {
    pub anchor: [f32; 2],
    pub horizontal: HorizontalJustification,
    pub vertical: VerticalJustification,
    pub rotation: f64,
}

// Start of the pen on the baseline for text justified against the anchor.
fn pen_origin(extents: &TextExtents, placement: &TextPlacement) -> [f32; 2] {
    let [x, y] = placement.anchor;
    let dx = match placement.horizontal {
        HorizontalJustification::Left => extents.x_bearing,
        HorizontalJustification::Center => extents.x_bearing + extents.width / 2.0,
        HorizontalJustification::Right => extents.x_bearing + extents.width,
    };
    let dy = match placement.vertical {
        VerticalJustification::Top => extents.ascent,
        VerticalJustification::Center => (extents.ascent - extents.descent) / 2.0,
        VerticalJustification::Bottom => -extents.descent,
    };
    [x - dx as f32, y + dy as f32]
}

/// Fonts plus the glyph atlas; measures and lays out text into textured quads.
#[derive(Default)]
pub struct TextEngine {
    book: FontBook,
    atlas: GlyphAtlas,
    warned: bool,
}

impl TextEngine {
    pub fn new(book: FontBook) -> Self {
        Self {
            book,
            atlas: GlyphAtlas::new(),
            warned: false,
        }
    }

    pub fn set_book(&mut self, book: FontBook) {
        self.book = book;
        self.atlas.clear();
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut GlyphAtlas {
        &mut self.atlas
    }

    fn font(&mut self, face: &FontFace) -> Option<(usize, FontArc)> {
        match self.book.select(face) {
            Some((index, font)) => Some((index, font.clone())),
            None => {
                if !self.warned {
                    log::warn!("no fonts available, text will not be drawn");
                    self.warned = true;
                }
                None
            }
        }
    }

    pub fn extents(&mut self, face: &FontFace, size: f64, text: &str) -> Option<TextExtents> {
        let (_, font) = self.font(face)?;
        Some(measure(&font, size as f32, text))
    }

    /// Appends quads for `text` justified and rotated as `placement` says.
    /// Returns false if nothing was laid out.
    pub fn layout_text(
        &mut self,
        mesh: &mut Mesh<TexVertex>,
        face: &FontFace,
        size: f64,
        text: &str,
        placement: &TextPlacement,
        color: [f32; 4],
    ) -> bool {
        let Some((index, font)) = self.font(face) else {
            return false;
        };
        if size <= 0.0 || text.is_empty() {
            return false;
        }

        let px = size.round().max(1.0) as u32;
        let scale = PxScale::from(px as f32);
        let scaled = font.as_scaled(scale);
        let extents = measure(&font, px as f32, text);

        let [mut pen_x, baseline] = pen_origin(&extents, placement);

        // counter-clockwise on a y-down screen
        let pivot = placement.anchor;
        let (sin, cos) = (-placement.rotation.to_radians() as f32).sin_cos();
        let rotate = |p: [f32; 2]| {
            let (dx, dy) = (p[0] - pivot[0], p[1] - pivot[1]);
            [pivot[0] + dx * cos - dy * sin, pivot[1] + dx * sin + dy * cos]
        };

        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = previous {
                pen_x += scaled.kern(prev, id);
            }
            previous = Some(id);

            let key = GlyphKey {
                font: index,
                glyph: id,
                px,
            };
            let info = self.atlas.cache_glyph(&font, key).unwrap_or_default();
            let advance = scaled.h_advance(id);
            if info.size[0] == 0.0 || info.size[1] == 0.0 {
                pen_x += advance;
                continue;
            }

            let x0 = pen_x + info.bearing[0];
            let y0 = baseline + info.bearing[1];
            let x1 = x0 + info.size[0];
            let y1 = y0 + info.size[1];
            let [u0, v0] = info.uv_min;
            let [u1, v1] = info.uv_max;

            mesh.push_quad([
                TexVertex { position: rotate([x0, y0]), uv: [u0, v0], color },
                TexVertex { position: rotate([x1, y0]), uv: [u1, v0], color },
                TexVertex { position: rotate([x1, y1]), uv: [u1, v1], color },
                TexVertex { position: rotate([x0, y1]), uv: [u0, v1], color },
            ]);
            pen_x += advance;
        }
        true
    }
}

fn measure(font: &FontArc, size: f32, text: &str) -> TextExtents {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    let mut ink: Option<(f32, f32, f32, f32)> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            pen_x += scaled.kern(prev, id);
        }
        previous = Some(id);

        let glyph = id.with_scale_and_position(scale, point(pen_x, 0.0));
        if let Some(outline) = font.outline_glyph(glyph) {
            let b = outline.px_bounds();
            ink = Some(match ink {
                None => (b.min.x, b.min.y, b.max.x, b.max.y),
                Some((x0, y0, x1, y1)) => (x0.min(b.min.x), y0.min(b.min.y), x1.max(b.max.x), y1.max(b.max.y)),
            });
        }
        pen_x += scaled.h_advance(id);
    }

    let (x0, y0, x1, y1) = ink.unwrap_or((0.0, 0.0, 0.0, 0.0));
    TextExtents {
        x_bearing: x0 as f64,
        y_bearing: y0 as f64,
        width: (x1 - x0) as f64,
        height: (y1 - y0) as f64,
        advance: pen_x as f64,
        ascent: scaled.ascent() as f64,
        descent: -scaled.descent() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(family: &str, slant: FontSlant, weight: FontWeight) -> FontFace {
        FontFace::new(family, slant, weight)
    }

    #[test]
    fn test_best_match_prefers_exact_then_family() {
        let faces = vec![
            face("sans-serif", FontSlant::Normal, FontWeight::Normal),
            face("monospace", FontSlant::Normal, FontWeight::Normal),
            face("monospace", FontSlant::Italic, FontWeight::Normal),
            face("monospace", FontSlant::Normal, FontWeight::Bold),
        ];

        let wanted = face("monospace", FontSlant::Normal, FontWeight::Bold);
        assert_eq!(best_match(&faces, &wanted), Some(3));
        // oblique falls back to italic before plain
        let wanted = face("monospace", FontSlant::Oblique, FontWeight::Normal);
        assert_eq!(best_match(&faces, &wanted), Some(2));
        let wanted = face("MONOSPACE", FontSlant::Oblique, FontWeight::Bold);
        assert_eq!(best_match(&faces, &wanted), Some(1));
        let wanted = face("fantasy", FontSlant::Normal, FontWeight::Normal);
        assert_eq!(best_match(&faces, &wanted), Some(0));
        assert_eq!(best_match(&[], &wanted), None);
    }

    #[test]
    fn test_atlas_allocation_wraps_rows_and_fills_up() {
        let mut atlas = GlyphAtlas::new();
        assert_eq!(atlas.allocate(100, 20), Some((0, 0)));
        assert_eq!(atlas.allocate(100, 30), Some((101, 0)));

        let (x, y) = atlas.allocate(ATLAS_SIZE - 10, 5).unwrap();
        assert_eq!((x, y), (0, 31));
        assert_eq!(atlas.allocate(ATLAS_SIZE + 1, 1), None);

        while atlas.allocate(ATLAS_SIZE / 2, 200).is_some() {}
        assert_eq!(atlas.allocate(ATLAS_SIZE / 2, 200), None);

        atlas.mark_uploaded();
        atlas.clear();
        assert!(atlas.is_dirty());
        assert_eq!(atlas.allocate(10, 10), Some((0, 0)));
    }

    #[test]
    fn test_no_fonts_means_no_text() {
        let mut engine = TextEngine::default();
        let mut mesh = Mesh::new();
        assert!(engine.extents(&FontFace::default(), 12.0, "hi").is_none());
        let placement = TextPlacement::default();
        assert!(!engine.layout_text(&mut mesh, &FontFace::default(), 12.0, "hi", &placement, [1.0; 4]));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_justification_moves_the_pen() {
        let extents = TextExtents {
            x_bearing: 1.0,
            y_bearing: -9.0,
            width: 20.0,
            height: 12.0,
            advance: 22.0,
            ascent: 10.0,
            descent: 4.0,
        };
        let at = |horizontal, vertical| {
            let placement = TextPlacement {
                anchor: [100.0, 50.0],
                horizontal,
                vertical,
                rotation: 0.0,
            };
            pen_origin(&extents, &placement)
        };

        use HorizontalJustification as H;
        use VerticalJustification as V;
        assert_eq!(at(H::Center, V::Center), [89.0, 53.0]);
        // ink starts at the anchor
        assert_eq!(at(H::Left, V::Center)[0], 99.0);
        // ink ends at the anchor
        assert_eq!(at(H::Right, V::Center)[0], 79.0);
        // ascent below the anchor, descent above it
        assert_eq!(at(H::Center, V::Top)[1], 60.0);
        assert_eq!(at(H::Center, V::Bottom)[1], 46.0);
    }

    #[test]
    fn test_unreadable_font_file_is_an_error() {
        let mut book = FontBook::default();
        let result = book.add_file(FontFace::default(), "/nonexistent/font.ttf");
        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(book.is_empty());
    }
}
