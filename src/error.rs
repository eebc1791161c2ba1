//! Error type shared by loading, rendering and saving

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model load error: {0}")]
    Model(#[from] tobj::LoadError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),

    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),
}
