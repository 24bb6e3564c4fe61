use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShrinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Cannot read size of {path}: {source}")]
    FileSizeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read dimensions of {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid setting '{0}'. Expected w=<int>, h=<int> or t=<format>")]
    InvalidSetting(String),

    #[error("Invalid target size '{0}'. Examples: 204800, 200KB, 1.5MB")]
    InvalidTargetSize(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Refusing to overwrite existing file: {0}")]
    OutputExists(PathBuf),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ShrinkError>;
