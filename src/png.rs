use crate::constants::{
    LIBDEFLATER_DEFAULT_LEVEL, LIBDEFLATER_FASTEST_LEVEL, LIBDEFLATER_NONE_LEVEL,
    OXIPNG_DEFAULT_PRESET, OXIPNG_FASTEST_PRESET, OXIPNG_MAXIMUM_PRESET, ZOPFLI_ITERATIONS,
};
use crate::error::{CompressionError, Result};
use crate::formats::ImageFormat;
use crate::options::{CompressionOptions, PngEffort, PngOptions};
use crate::processing::Compressor;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageEncoder};
use oxipng::{Deflaters, Interlacing, Options, StripChunks};
use std::num::NonZeroU8;
use tracing::{debug, warn};

/// Re-encodes PNG files, mapping levels 0-9 onto oxipng effort tiers
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCompressor;

impl PngCompressor {
    pub fn new() -> Self {
        Self
    }
}

impl Compressor for PngCompressor {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn encode(
        &self,
        image: &DynamicImage,
        icc_profile: Option<&[u8]>,
        options: &CompressionOptions,
    ) -> Result<Vec<u8>> {
        encode_png(image, icc_profile, &options.png())
    }
}

/// oxipng settings for one effort tier
pub fn oxipng_options(options: &PngOptions) -> Options {
    let effort = options.effort();
    let (preset, deflate) = match effort {
        PngEffort::None => (
            0,
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_NONE_LEVEL,
            },
        ),
        PngEffort::Fastest => (
            OXIPNG_FASTEST_PRESET,
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_FASTEST_LEVEL,
            },
        ),
        PngEffort::Default => (
            OXIPNG_DEFAULT_PRESET,
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_DEFAULT_LEVEL,
            },
        ),
        PngEffort::Maximum => (
            OXIPNG_MAXIMUM_PRESET,
            Deflaters::Zopfli {
                iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
            },
        ),
    };

    let mut oxipng_options = Options::from_preset(preset);
    oxipng_options.deflate = deflate;
    // Always take the tier's output, even if the intermediate PNG was smaller
    oxipng_options.force = true;
    oxipng_options.interlace = Some(if options.interlaced {
        Interlacing::Adam7
    } else {
        Interlacing::None
    });
    oxipng_options.strip = if options.strip_metadata {
        StripChunks::Safe
    } else {
        StripChunks::None
    };
    oxipng_options
}

/// Encode `image` as PNG: a quick in-memory encode by the image crate,
/// then an oxipng pass at the requested effort.
pub fn encode_png(
    image: &DynamicImage,
    icc_profile: Option<&[u8]>,
    options: &PngOptions,
) -> Result<Vec<u8>> {
    let mut intermediate = Vec::new();
    let mut encoder =
        PngEncoder::new_with_quality(&mut intermediate, CompressionType::Fast, FilterType::Adaptive);
    if let Some(icc) = icc_profile {
        if let Err(e) = encoder.set_icc_profile(icc.to_vec()) {
            warn!("ICC profile could not be embedded and will be lost: {}", e);
        }
    }
    image
        .write_with_encoder(encoder)
        .map_err(CompressionError::PngEncode)?;

    debug!(
        "Optimizing PNG ({} bytes, {:?} effort)",
        intermediate.len(),
        options.effort()
    );
    oxipng::optimize_from_memory(&intermediate, &oxipng_options(options))
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}
