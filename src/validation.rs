use crate::error::{CompressionError, Result};
use crate::formats::{resolve_format, ImageFormat};
use crate::processing::stat_input;
use image::ImageReader;
use std::path::Path;

/// Check that `path` exists, has a supported extension, and that its header
/// decodes as that format.
///
/// This mirrors what a compression run needs up front without decoding the
/// whole pixel grid.
pub fn validate_image(path: &Path) -> Result<ImageFormat> {
    stat_input(path)?;
    let format = resolve_format(path)?;

    let mut reader =
        ImageReader::open(path).map_err(|source| CompressionError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    reader.set_format(format.to_image_format());
    reader
        .into_decoder()
        .map_err(|source| CompressionError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(format)
}
