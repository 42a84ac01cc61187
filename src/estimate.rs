/// Closed-form output size estimates for previews.
///
/// These never encode anything. Actual sizes come from a real compression
/// run and can differ widely depending on image content.
use crate::constants::{
    JPEG_ESTIMATE_BASE_RATIO, JPEG_ESTIMATE_QUALITY_WEIGHT, PNG_ESTIMATE_SAVING_PER_LEVEL,
};
use crate::formats::ImageFormat;
use crate::options::{CompressionOptions, ResizeOptions};

/// Estimate the compressed size in bytes of a `format` file of `input_size` bytes.
///
/// * JPEG: `input * (0.1 + 0.4 * quality / 100) * area`
/// * PNG: `input * (1 - 0.05 * level) * area`
///
/// `area` is `(percent / 100)^2` when a percentage resize applies, else 1.
pub fn estimate_compressed_size(
    format: ImageFormat,
    input_size: u64,
    options: &CompressionOptions,
) -> u64 {
    let ratio = match format {
        ImageFormat::Jpeg => {
            let quality = f64::from(options.jpeg().quality) / 100.0;
            JPEG_ESTIMATE_BASE_RATIO + JPEG_ESTIMATE_QUALITY_WEIGHT * quality
        }
        ImageFormat::Png => {
            1.0 - PNG_ESTIMATE_SAVING_PER_LEVEL * f64::from(options.png().compression_level)
        }
    };

    let estimated = input_size as f64 * ratio * resize_area_factor(&options.resize);
    estimated.max(0.0) as u64
}

/// Fraction of the pixel count left after a percentage resize
pub fn resize_area_factor(resize: &ResizeOptions) -> f64 {
    if resize.percent > 0.0 && resize.percent < 100.0 {
        let scale = resize.percent / 100.0;
        scale * scale
    } else {
        1.0
    }
}
