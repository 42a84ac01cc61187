use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Input unreadable: {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid or corrupt image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("JPEG encode failed: {0}")]
    JpegEncode(#[from] jpeg_encoder::EncodingError),

    #[error("PNG encode failed: {0}")]
    PngEncode(#[source] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Resize of {width}x{height} would produce a zero-sized image ({target_width}x{target_height})")]
    DegenerateResize {
        width: u32,
        height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid compression level: {0}. Must be between 0 and 9")]
    InvalidCompressionLevel(u8),

    #[error("Invalid resize percentage: {0}. Must be between 0 and 100")]
    InvalidResizePercent(f64),

    #[error("Invalid chroma subsampling: {0}. Expected 4:4:4, 4:2:2 or 4:2:0")]
    InvalidChromaSubsampling(String),

    #[error("Directory scan failed: {0}")]
    ScanFailed(#[from] walkdir::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Worker panicked while compressing {0}")]
    WorkerPanicked(PathBuf),
}

/// Coarse classification of a [`CompressionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file is not something the pipeline handles (by extension).
    Resolution,
    /// Missing or unreadable input, directory creation or write failure.
    Io,
    /// Decoder or encoder rejected the image.
    Codec,
    /// Out-of-range option values.
    Options,
    /// Pool construction or worker panics.
    Internal,
}

impl CompressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressionError::UnsupportedFormat(_) => ErrorKind::Resolution,
            CompressionError::FileNotFound(_)
            | CompressionError::InputUnreadable { .. }
            | CompressionError::DirectoryCreationFailed(_)
            | CompressionError::OutputWrite { .. }
            | CompressionError::ScanFailed(_) => ErrorKind::Io,
            CompressionError::Decode { .. }
            | CompressionError::JpegEncode(_)
            | CompressionError::PngEncode(_)
            | CompressionError::PngOptimization(_)
            | CompressionError::DegenerateResize { .. }
            | CompressionError::InvalidDimensions(..) => ErrorKind::Codec,
            CompressionError::InvalidQuality(_)
            | CompressionError::InvalidCompressionLevel(_)
            | CompressionError::InvalidResizePercent(_)
            | CompressionError::InvalidChromaSubsampling(_) => ErrorKind::Options,
            CompressionError::ThreadPool(_) | CompressionError::WorkerPanicked(_) => {
                ErrorKind::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
