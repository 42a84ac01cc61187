use crate::error::{CompressionError, Result};
use crate::formats::ImageFormat;
use crate::options::{ChromaSubsampling, CompressionOptions, JpegOptions};
use crate::processing::Compressor;
use image::{ColorType, DynamicImage, GenericImageView};
use jpeg_encoder::{Encoder, SamplingFactor};

/// Largest edge a baseline or progressive JPEG frame header can describe
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Re-encodes JPEG files with quality, progressive and subsampling control
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCompressor;

impl JpegCompressor {
    pub fn new() -> Self {
        Self
    }
}

impl Compressor for JpegCompressor {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn encode(
        &self,
        image: &DynamicImage,
        icc_profile: Option<&[u8]>,
        options: &CompressionOptions,
    ) -> Result<Vec<u8>> {
        encode_jpeg(image, icc_profile, &options.jpeg())
    }
}

fn sampling_factor(subsampling: ChromaSubsampling) -> SamplingFactor {
    match subsampling {
        ChromaSubsampling::Yuv444 => SamplingFactor::R_4_4_4,
        ChromaSubsampling::Yuv422 => SamplingFactor::R_4_2_2,
        ChromaSubsampling::Yuv420 => SamplingFactor::R_4_2_0,
    }
}

/// Encode `image` as JPEG.
///
/// Greyscale sources stay single-channel; everything else is flattened to
/// 8-bit RGB, dropping any alpha channel.
pub fn encode_jpeg(
    image: &DynamicImage,
    icc_profile: Option<&[u8]>,
    options: &JpegOptions,
) -> Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
        return Err(CompressionError::InvalidDimensions(
            width,
            height,
            MAX_JPEG_DIMENSION,
        ));
    }
    let (width, height) = (width as u16, height as u16);

    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, options.quality);
    encoder.set_progressive(options.progressive);
    encoder.set_sampling_factor(sampling_factor(options.chroma_subsampling));
    if let Some(icc) = icc_profile {
        encoder.add_icc_profile(icc)?;
    }

    match image.color() {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => {
            let luma = image.to_luma8();
            encoder.encode(luma.as_raw(), width, height, jpeg_encoder::ColorType::Luma)?;
        }
        _ => {
            let rgb = image.to_rgb8();
            encoder.encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)?;
        }
    }

    Ok(buffer)
}
