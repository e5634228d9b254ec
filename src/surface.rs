use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded RGBA8 image that can be drawn onto a canvas.
///
/// Clones share their pixels and their id, so the GPU texture built for one is
/// reused by all of them. The texture is released once no frame draws the surface.
#[derive(Clone)]
pub struct Surface {
    id: u64,
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl Surface {
    /// Loads a PNG or JPEG file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|err| match err {
                image::ImageError::IoError(source) => Error::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => Error::Image(other),
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::debug!("loaded {} ({width}x{height})", path.display());
        Self::from_rgba(width, height, image.into_raw())
    }

    /// Wraps raw RGBA8 pixels, row-major from the top-left corner.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(Error::DegenerateScreen {
                width: width as f64,
                height: height as f64,
            });
        }
        Ok(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_id_and_new_surfaces_do_not() {
        let a = Surface::from_rgba(2, 1, vec![0; 8]).unwrap();
        let b = a.clone();
        let c = Surface::from_rgba(2, 1, vec![0; 8]).unwrap();
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_pixel_count_must_match_dimensions() {
        assert!(Surface::from_rgba(2, 2, vec![0; 8]).is_err());
        assert!(Surface::from_rgba(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        match Surface::load("/nonexistent/picture.png") {
            Err(Error::Io { path, .. }) => assert!(path.ends_with("picture.png")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
