use crate::batch::{collect_image_files, BatchOrchestrator, BatchResult};
use crate::error::Result;
use crate::formats::{resolve_format, ImageFormat};
use crate::info::{get_image_info, ImageInfo};
use crate::jpeg::JpegCompressor;
use crate::options::CompressionOptions;
use crate::png::PngCompressor;
use crate::processing::{CompressionResult, Compressor};
use crate::resize::calculate_target_dimensions;
use crate::utils::calculate_reduction;
use crate::validation;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// What a compression run is expected to produce, without running it
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionPreview {
    pub input_path: PathBuf,
    pub format: ImageFormat,
    pub input_size: u64,
    pub estimated_size: u64,
    pub estimated_reduction: f64,
    pub width: u32,
    pub height: u32,
    pub new_width: u32,
    pub new_height: u32,
}

/// Entry point for callers: routes each file to the encoder its extension
/// names and exposes the inspection helpers alongside.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageApi {
    jpeg: JpegCompressor,
    png: PngCompressor,
    orchestrator: BatchOrchestrator,
}

impl ImageApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// An API whose batches run at most `max_in_flight` files at once
    pub fn with_concurrency(max_in_flight: usize) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(max_in_flight),
            ..Self::default()
        }
    }

    pub fn default_options(&self) -> CompressionOptions {
        CompressionOptions::default()
    }

    pub fn compressor_for(&self, format: ImageFormat) -> &dyn Compressor {
        match format {
            ImageFormat::Jpeg => &self.jpeg,
            ImageFormat::Png => &self.png,
        }
    }

    /// Compress one file. Failures, including an unsupported extension or
    /// out-of-range options, come back inside the result.
    pub fn compress(&self, input_path: &Path, options: &CompressionOptions) -> CompressionResult {
        if let Err(e) = options.validate() {
            return CompressionResult::failed(input_path, e);
        }
        match resolve_format(input_path) {
            Ok(format) => self.compressor_for(format).compress(input_path, options),
            Err(e) => CompressionResult::failed(input_path, e),
        }
    }

    pub fn get_info(&self, input_path: &Path) -> Result<ImageInfo> {
        get_image_info(input_path)
    }

    /// Heuristic size of the compressed output in bytes
    pub fn estimate_size(&self, input_path: &Path, options: &CompressionOptions) -> Result<u64> {
        options.validate()?;
        let format = resolve_format(input_path)?;
        let info = get_image_info(input_path)?;
        Ok(self.compressor_for(format).estimate_size(info.size, options))
    }

    pub fn preview(
        &self,
        input_path: &Path,
        options: &CompressionOptions,
    ) -> Result<CompressionPreview> {
        options.validate()?;
        let format = resolve_format(input_path)?;
        let info = get_image_info(input_path)?;
        let target = calculate_target_dimensions(info.dimensions(), &options.resize)?;
        let estimated_size = self.compressor_for(format).estimate_size(info.size, options);

        Ok(CompressionPreview {
            input_path: input_path.to_path_buf(),
            format,
            input_size: info.size,
            estimated_size,
            estimated_reduction: calculate_reduction(info.size, estimated_size),
            width: info.width,
            height: info.height,
            new_width: target.width,
            new_height: target.height,
        })
    }

    /// Compress every path concurrently. Each finished result is also sent
    /// to `progress` when one is given.
    ///
    /// Only invalid options or a failure to start the worker pool fail the
    /// call; per-file problems are reported in the batch.
    pub fn batch_compress(
        &self,
        paths: &[PathBuf],
        options: &CompressionOptions,
        progress: Option<Sender<CompressionResult>>,
    ) -> Result<BatchResult> {
        options.validate()?;
        self.orchestrator
            .run(paths, progress, |path| self.compress(path, options))
    }

    pub fn scan_directory(&self, dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        collect_image_files(dir, recursive)
    }

    /// Exists, has a supported extension, and its header decodes
    pub fn validate_image(&self, input_path: &Path) -> Result<ImageFormat> {
        validation::validate_image(input_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn write_gradient(path: &Path, width: u32, height: u32) {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        }));
        img.save(path).unwrap();
    }

    #[test]
    fn test_routes_by_extension() {
        let api = ImageApi::new();
        assert_eq!(api.compressor_for(ImageFormat::Jpeg).format(), ImageFormat::Jpeg);
        assert_eq!(api.compressor_for(ImageFormat::Png).format(), ImageFormat::Png);
    }

    #[test]
    fn test_compress_unsupported_extension() {
        let api = ImageApi::new();
        let result = api.compress(Path::new("animation.gif"), &api.default_options());
        assert!(!result.success());
        assert!(matches!(
            result.error.as_deref(),
            Some(CompressionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_compress_rejects_invalid_options() {
        let api = ImageApi::new();
        let options = CompressionOptions {
            quality: 0,
            ..CompressionOptions::default()
        };
        let result = api.compress(Path::new("photo.jpg"), &options);
        assert!(matches!(
            result.error.as_deref(),
            Some(CompressionError::InvalidQuality(0))
        ));
    }

    #[test]
    fn test_compress_png() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("shot.png");
        write_gradient(&input, 40, 20);

        let api = ImageApi::new();
        let result = api.compress(&input, &api.default_options());
        assert!(result.success(), "{:?}", result.error);
        let output = result.output_path.clone().unwrap();
        assert_eq!(output, temp_dir.path().join("shot_compressed.png"));
        assert_eq!(result.output_size, fs::metadata(&output).unwrap().len());
        assert_eq!((result.width, result.height), (40, 20));
    }

    #[test]
    fn test_preview_and_estimate() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.jpg");
        write_gradient(&input, 80, 60);

        let api = ImageApi::new();
        let options = CompressionOptions::builder()
            .quality(50)
            .resize_percent(50.0)
            .build()
            .unwrap();

        let preview = api.preview(&input, &options).unwrap();
        assert_eq!(preview.format, ImageFormat::Jpeg);
        assert_eq!((preview.width, preview.height), (80, 60));
        assert_eq!((preview.new_width, preview.new_height), (40, 30));
        assert_eq!(
            preview.estimated_size,
            api.estimate_size(&input, &options).unwrap()
        );
        assert!(preview.estimated_size < preview.input_size);
        assert!(preview.estimated_reduction > 0.0);
    }

    #[test]
    fn test_estimate_size_unsupported() {
        let api = ImageApi::new();
        let result = api.estimate_size(Path::new("clip.bmp"), &api.default_options());
        assert!(matches!(result, Err(CompressionError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_batch_compress_mixed() {
        let temp_dir = TempDir::new().unwrap();
        let good_png = temp_dir.path().join("a.png");
        let good_jpg = temp_dir.path().join("b.jpg");
        let corrupt = temp_dir.path().join("c.jpg");
        write_gradient(&good_png, 16, 16);
        write_gradient(&good_jpg, 16, 16);
        fs::write(&corrupt, b"garbage").unwrap();

        let api = ImageApi::new();
        let batch = api
            .batch_compress(
                &[good_png, good_jpg, corrupt.clone()],
                &api.default_options(),
                None,
            )
            .unwrap();

        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.success_count, 2);
        assert_eq!(batch.failure_count, 1);
        assert_eq!(batch.failures().next().unwrap().input_path, corrupt);
    }

    #[test]
    fn test_batch_compress_invalid_options() {
        let api = ImageApi::new();
        let options = CompressionOptions {
            compression_level: 12,
            ..CompressionOptions::default()
        };
        let result = api.batch_compress(&[PathBuf::from("a.png")], &options, None);
        assert!(matches!(
            result,
            Err(CompressionError::InvalidCompressionLevel(12))
        ));
    }

    #[test]
    fn test_scan_and_validate() {
        let temp_dir = TempDir::new().unwrap();
        let png = temp_dir.path().join("one.png");
        write_gradient(&png, 4, 4);
        fs::write(temp_dir.path().join("readme.md"), b"# hi").unwrap();

        let api = ImageApi::with_concurrency(2);
        let found = api.scan_directory(temp_dir.path(), false).unwrap();
        assert_eq!(found, vec![png.clone()]);
        assert_eq!(api.validate_image(&png).unwrap(), ImageFormat::Png);
    }
}
