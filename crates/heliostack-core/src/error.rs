use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeliostackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid metadata sidecar: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("Invalid timestamp '{0}' (expected YYYY-MM-DD HH:MM)")]
    Time(String),

    #[error("Missing observer metadata: {0}")]
    MissingMetadata(String),

    #[error("Invalid pixel scale: {0}")]
    InvalidScale(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Crop shape mismatch: expected {expected_h}x{expected_w}, got {got_h}x{got_w}")]
    ShapeMismatch {
        expected_h: usize,
        expected_w: usize,
        got_h: usize,
        got_w: usize,
    },

    #[error("Empty frame sequence: no frames survived to stacking")]
    EmptySequence,

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, HeliostackError>;
