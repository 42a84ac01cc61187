use crate::constants::{
    DEFAULT_OUTPUT_SUFFIX, DEFAULT_PNG_COMPRESSION_LEVEL, DEFAULT_QUALITY,
    MAX_PNG_COMPRESSION_LEVEL, MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{CompressionError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// JPEG chroma subsampling scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    /// Full colour resolution
    Yuv444,
    /// Half horizontal colour resolution
    Yuv422,
    /// Half horizontal and vertical colour resolution
    #[default]
    Yuv420,
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChromaSubsampling::Yuv444 => "4:4:4",
            ChromaSubsampling::Yuv422 => "4:2:2",
            ChromaSubsampling::Yuv420 => "4:2:0",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ChromaSubsampling {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "4:4:4" | "444" => Ok(ChromaSubsampling::Yuv444),
            "4:2:2" | "422" => Ok(ChromaSubsampling::Yuv422),
            "4:2:0" | "420" => Ok(ChromaSubsampling::Yuv420),
            _ => Err(CompressionError::InvalidChromaSubsampling(s.to_string())),
        }
    }
}

/// Deflate effort the PNG encoder can actually express.
///
/// Levels 0-9 collapse onto these four tiers: 0 is none, 1-3 fastest,
/// 4-6 default and 7-9 maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PngEffort {
    None,
    Fastest,
    Default,
    Maximum,
}

impl PngEffort {
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => PngEffort::None,
            1..=3 => PngEffort::Fastest,
            4..=6 => PngEffort::Default,
            _ => PngEffort::Maximum,
        }
    }
}

/// The part of [`CompressionOptions`] the JPEG encoder reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    pub quality: u8,
    pub progressive: bool,
    pub chroma_subsampling: ChromaSubsampling,
    pub strip_metadata: bool,
}

/// The part of [`CompressionOptions`] the PNG encoder reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngOptions {
    pub compression_level: u8,
    pub interlaced: bool,
    pub strip_metadata: bool,
}

impl PngOptions {
    pub fn effort(&self) -> PngEffort {
        PngEffort::from_level(self.compression_level)
    }
}

/// Resize request, resolved against the source size by
/// [`calculate_target_dimensions`](crate::resize::calculate_target_dimensions)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeOptions {
    /// Scale factor in percent; only values strictly between 0 and 100 apply
    pub percent: f64,
    /// Target width, 0 means unset
    pub width: u32,
    /// Target height, 0 means unset
    pub height: u32,
}

/// Settings for one compression run.
///
/// This is the superset the caller fills in. Encoders only see their own
/// view through [`CompressionOptions::jpeg`] and [`CompressionOptions::png`],
/// so a PNG run can never be influenced by `quality` and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOptions {
    /// JPEG quality, 1-100
    pub quality: u8,
    /// PNG deflate level, 0-9
    pub compression_level: u8,
    pub resize: ResizeOptions,
    pub strip_metadata: bool,
    pub progressive: bool,
    pub chroma_subsampling: ChromaSubsampling,
    pub interlaced: bool,
    /// Destination directory; `None` writes next to the input
    pub output_dir: Option<PathBuf>,
    /// Inserted between the file stem and the extension
    pub output_suffix: String,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            compression_level: DEFAULT_PNG_COMPRESSION_LEVEL,
            resize: ResizeOptions::default(),
            strip_metadata: true,
            progressive: true,
            chroma_subsampling: ChromaSubsampling::default(),
            interlaced: false,
            output_dir: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl CompressionOptions {
    pub fn builder() -> CompressionOptionsBuilder {
        CompressionOptionsBuilder::default()
    }

    pub fn jpeg(&self) -> JpegOptions {
        JpegOptions {
            quality: self.quality,
            progressive: self.progressive,
            chroma_subsampling: self.chroma_subsampling,
            strip_metadata: self.strip_metadata,
        }
    }

    pub fn png(&self) -> PngOptions {
        PngOptions {
            compression_level: self.compression_level,
            interlaced: self.interlaced,
            strip_metadata: self.strip_metadata,
        }
    }

    /// Output directory override, treating an empty path as unset
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<()> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(CompressionError::InvalidQuality(self.quality));
        }
        if self.compression_level > MAX_PNG_COMPRESSION_LEVEL {
            return Err(CompressionError::InvalidCompressionLevel(
                self.compression_level,
            ));
        }
        let percent = self.resize.percent;
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(CompressionError::InvalidResizePercent(percent));
        }
        Ok(())
    }
}

/// Builds validated [`CompressionOptions`], starting from the defaults
#[derive(Debug, Clone, Default)]
pub struct CompressionOptionsBuilder {
    options: CompressionOptions,
}

impl CompressionOptionsBuilder {
    pub fn quality(mut self, quality: u8) -> Self {
        self.options.quality = quality;
        self
    }

    pub fn compression_level(mut self, level: u8) -> Self {
        self.options.compression_level = level;
        self
    }

    pub fn resize_percent(mut self, percent: f64) -> Self {
        self.options.resize.percent = percent;
        self
    }

    pub fn resize_width(mut self, width: u32) -> Self {
        self.options.resize.width = width;
        self
    }

    pub fn resize_height(mut self, height: u32) -> Self {
        self.options.resize.height = height;
        self
    }

    pub fn strip_metadata(mut self, strip: bool) -> Self {
        self.options.strip_metadata = strip;
        self
    }

    pub fn progressive(mut self, progressive: bool) -> Self {
        self.options.progressive = progressive;
        self
    }

    pub fn chroma_subsampling(mut self, subsampling: ChromaSubsampling) -> Self {
        self.options.chroma_subsampling = subsampling;
        self
    }

    pub fn interlaced(mut self, interlaced: bool) -> Self {
        self.options.interlaced = interlaced;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.options.output_dir = if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir)
        };
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.options.output_suffix = suffix.into();
        self
    }

    pub fn build(self) -> Result<CompressionOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CompressionOptions::default();
        assert_eq!(options.quality, 85);
        assert_eq!(options.compression_level, 6);
        assert_eq!(options.resize, ResizeOptions::default());
        assert!(options.strip_metadata);
        assert!(options.progressive);
        assert_eq!(options.chroma_subsampling, ChromaSubsampling::Yuv420);
        assert!(!options.interlaced);
        assert_eq!(options.output_dir, None);
        assert_eq!(options.output_suffix, "_compressed");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder_sets_fields() {
        let options = CompressionOptions::builder()
            .quality(70)
            .compression_level(9)
            .resize_percent(50.0)
            .resize_width(640)
            .progressive(false)
            .chroma_subsampling(ChromaSubsampling::Yuv444)
            .interlaced(true)
            .strip_metadata(false)
            .output_dir("out")
            .output_suffix("_small")
            .build()
            .unwrap();

        assert_eq!(options.quality, 70);
        assert_eq!(options.compression_level, 9);
        assert_eq!(options.resize.percent, 50.0);
        assert_eq!(options.resize.width, 640);
        assert_eq!(options.resize.height, 0);
        assert_eq!(options.output_dir(), Some(Path::new("out")));
        assert_eq!(options.output_suffix, "_small");
    }

    #[test]
    fn test_builder_empty_output_dir_is_unset() {
        let options = CompressionOptions::builder().output_dir("").build().unwrap();
        assert_eq!(options.output_dir, None);

        let options = CompressionOptions {
            output_dir: Some(PathBuf::new()),
            ..CompressionOptions::default()
        };
        assert_eq!(options.output_dir(), None);
    }

    #[test]
    fn test_invalid_quality() {
        let result = CompressionOptions::builder().quality(0).build();
        assert!(matches!(result, Err(CompressionError::InvalidQuality(0))));

        let result = CompressionOptions::builder().quality(101).build();
        assert!(matches!(result, Err(CompressionError::InvalidQuality(101))));
    }

    #[test]
    fn test_invalid_compression_level() {
        let result = CompressionOptions::builder().compression_level(10).build();
        assert!(matches!(
            result,
            Err(CompressionError::InvalidCompressionLevel(10))
        ));
    }

    #[test]
    fn test_invalid_resize_percent() {
        for percent in [-1.0, 100.5, f64::NAN, f64::INFINITY] {
            let result = CompressionOptions::builder().resize_percent(percent).build();
            assert!(matches!(
                result,
                Err(CompressionError::InvalidResizePercent(_))
            ));
        }
        assert!(CompressionOptions::builder().resize_percent(100.0).build().is_ok());
    }

    #[test]
    fn test_format_views() {
        let options = CompressionOptions::builder()
            .quality(60)
            .compression_level(2)
            .interlaced(true)
            .build()
            .unwrap();

        let jpeg = options.jpeg();
        assert_eq!(jpeg.quality, 60);
        assert!(jpeg.progressive);
        assert_eq!(jpeg.chroma_subsampling, ChromaSubsampling::Yuv420);

        let png = options.png();
        assert_eq!(png.compression_level, 2);
        assert!(png.interlaced);
        assert_eq!(png.effort(), PngEffort::Fastest);
    }

    #[test]
    fn test_png_effort_tiers() {
        assert_eq!(PngEffort::from_level(0), PngEffort::None);
        for level in 1..=3 {
            assert_eq!(PngEffort::from_level(level), PngEffort::Fastest);
        }
        for level in 4..=6 {
            assert_eq!(PngEffort::from_level(level), PngEffort::Default);
        }
        for level in 7..=9 {
            assert_eq!(PngEffort::from_level(level), PngEffort::Maximum);
        }
    }

    #[test]
    fn test_png_effort_monotonic() {
        let tiers: Vec<PngEffort> = (0..=9).map(PngEffort::from_level).collect();
        assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_chroma_subsampling_parse() {
        assert_eq!(
            "4:4:4".parse::<ChromaSubsampling>().unwrap(),
            ChromaSubsampling::Yuv444
        );
        assert_eq!(
            "422".parse::<ChromaSubsampling>().unwrap(),
            ChromaSubsampling::Yuv422
        );
        assert_eq!(ChromaSubsampling::Yuv420.to_string(), "4:2:0");
        assert!(matches!(
            "4:1:1".parse::<ChromaSubsampling>(),
            Err(CompressionError::InvalidChromaSubsampling(_))
        ));
    }
}
