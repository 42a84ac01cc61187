use crate::error::{CompressionError, Result};
use crate::options::ResizeOptions;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(img: &DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Work out the size an image of `source` dimensions should be resampled to.
///
/// Rules are tried in order and the first that applies wins:
/// 1. `percent` strictly between 0 and 100 scales both axes by the same factor.
/// 2. A non-zero `width` and/or `height`: both set are used as given, a single
///    one is matched and the other axis follows the source aspect ratio.
/// 3. Otherwise the source size is kept.
///
/// All results are floored. A target with a zero axis is reported as
/// [`CompressionError::DegenerateResize`] instead of being produced.
pub fn calculate_target_dimensions(
    source: Dimensions,
    resize: &ResizeOptions,
) -> Result<Dimensions> {
    let target = if resize.percent > 0.0 && resize.percent < 100.0 {
        Dimensions::new(
            scale_by_percent(source.width, resize.percent),
            scale_by_percent(source.height, resize.percent),
        )
    } else if resize.width > 0 || resize.height > 0 {
        match (resize.width, resize.height) {
            (width, 0) => Dimensions::new(width, scale_axis(source.height, width, source.width)),
            (0, height) => Dimensions::new(scale_axis(source.width, height, source.height), height),
            (width, height) => Dimensions::new(width, height),
        }
    } else {
        source
    };

    if target.width == 0 || target.height == 0 {
        return Err(CompressionError::DegenerateResize {
            width: source.width,
            height: source.height,
            target_width: target.width,
            target_height: target.height,
        });
    }

    Ok(target)
}

fn scale_by_percent(value: u32, percent: f64) -> u32 {
    (f64::from(value) * percent / 100.0).floor() as u32
}

/// `value * numerator / denominator`, floored, in integer arithmetic so that
/// exact ratios such as 600 * 400 / 800 never land one pixel short.
fn scale_axis(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let scaled = u64::from(value) * u64::from(numerator) / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Resample `img` to `target` with a Lanczos filter.
///
/// Images already at `target` are returned untouched; resampling to the
/// same size would only blur them.
pub fn resample(img: DynamicImage, target: Dimensions) -> DynamicImage {
    let source = Dimensions::of(&img);
    if source == target {
        return img;
    }

    debug!("Resampling {} -> {}", source, target);
    img.resize_exact(target.width, target.height, FilterType::Lanczos3)
}
