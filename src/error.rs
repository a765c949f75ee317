//! Error types for cave generation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaveError {
    #[error("Invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Invalid passage radius {0}: must be at least 1")]
    InvalidRadius(i32),

    #[error("Invalid square size {0}: must be positive and finite")]
    InvalidSquareSize(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse parameters: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot connect {components} room components: no edge tiles to join")]
    ConnectivityStalled { components: usize },
}

pub type Result<T> = std::result::Result<T, CaveError>;
