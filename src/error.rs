use std::path::PathBuf;

use crate::geometry::Rectangle;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("world rectangle has no area: {0:?}")]
    DegenerateWorld(Rectangle),
    #[error("screen of {width}x{height} pixels cannot be drawn to")]
    DegenerateScreen { width: f64, height: f64 },
    #[error("zoom factor must be finite and positive, got {0}")]
    InvalidZoomFactor(f64),
    #[error("duplicate canvas id: {0}")]
    DuplicateCanvas(String),
    #[error("duplicate widget id: {0}")]
    DuplicateWidget(String),
    #[error("no canvas named {0}")]
    UnknownCanvas(String),
    #[error("no widget named {0}")]
    UnknownWidget(String),
    #[error("invalid UI description: {0}")]
    Layout(String),
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid font data in {0}")]
    Font(PathBuf),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("graphics device error: {0:#}")]
    Gpu(anyhow::Error),
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Layout(err.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
