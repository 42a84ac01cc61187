use crate::error::{CompressionError, Result};
use crate::estimate::estimate_compressed_size;
use crate::formats::ImageFormat;
use crate::options::CompressionOptions;
use crate::resize::{calculate_target_dimensions, resample, Dimensions};
use crate::utils::{calculate_reduction, generate_output_path};
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of compressing one file.
///
/// `error` is set exactly when the run failed; fields filled in before the
/// failing step (input size, dimensions, output path) are kept for reporting.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub input_size: u64,
    pub output_size: u64,
    pub width: u32,
    pub height: u32,
    /// Percent saved; negative when the output is larger than the input
    pub reduction: f64,
    pub error: Option<Arc<CompressionError>>,
}

impl CompressionResult {
    fn new(input_path: &Path) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_path: None,
            input_size: 0,
            output_size: 0,
            width: 0,
            height: 0,
            reduction: 0.0,
            error: None,
        }
    }

    /// A result for a file that failed before any pipeline step ran
    pub fn failed(input_path: &Path, error: CompressionError) -> Self {
        let mut result = Self::new(input_path);
        result.error = Some(Arc::new(error));
        result
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Bytes saved; negative when the output grew
    pub fn saved_bytes(&self) -> i64 {
        self.input_size as i64 - self.output_size as i64
    }
}

/// Pixels decoded from an input file plus the metadata worth carrying over
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: DynamicImage,
    pub icc_profile: Option<Vec<u8>>,
}

/// One output format's encoder.
///
/// Implementors only provide [`Compressor::encode`]; the provided
/// [`Compressor::compress`] runs the shared stat, decode, resize, encode and
/// measure sequence around it.
pub trait Compressor: Send + Sync {
    fn format(&self) -> ImageFormat;

    /// Encode `image` into the bytes of an output file
    fn encode(
        &self,
        image: &DynamicImage,
        icc_profile: Option<&[u8]>,
        options: &CompressionOptions,
    ) -> Result<Vec<u8>>;

    /// Compress `input_path` according to `options`.
    ///
    /// Never fails as a call: any error ends up in the returned result.
    fn compress(&self, input_path: &Path, options: &CompressionOptions) -> CompressionResult {
        let mut result = CompressionResult::new(input_path);
        if let Err(e) = run_pipeline(self, input_path, options, &mut result) {
            warn!("Failed to compress {}: {}", input_path.display(), e);
            result.error = Some(Arc::new(e));
        }
        result
    }

    /// Heuristic output size for an input of `input_size` bytes
    fn estimate_size(&self, input_size: u64, options: &CompressionOptions) -> u64 {
        estimate_compressed_size(self.format(), input_size, options)
    }
}

fn run_pipeline<C: Compressor + ?Sized>(
    compressor: &C,
    input_path: &Path,
    options: &CompressionOptions,
    result: &mut CompressionResult,
) -> Result<()> {
    result.input_size = stat_input(input_path)?;

    let decoded = decode_image(input_path, compressor.format())?;
    let source = Dimensions::of(&decoded.pixels);
    let target = calculate_target_dimensions(source, &options.resize)?;
    let pixels = resample(decoded.pixels, target);
    result.width = target.width;
    result.height = target.height;

    let output_path = generate_output_path(input_path, options)?;
    result.output_path = Some(output_path.clone());
    ensure_parent_dir(&output_path)?;

    let icc_profile = if options.strip_metadata {
        None
    } else {
        decoded.icc_profile.as_deref()
    };
    let bytes = compressor.encode(&pixels, icc_profile, options)?;
    drop(pixels);

    result.output_size = write_output(&output_path, &bytes)?;
    result.reduction = calculate_reduction(result.input_size, result.output_size);

    debug!(
        "{} -> {} ({} -> {} bytes, {:.1}%)",
        input_path.display(),
        output_path.display(),
        result.input_size,
        result.output_size,
        result.reduction
    );
    Ok(())
}

/// Validates that a file exists at the given path.
///
/// # Example
/// ```
/// use std::path::Path;
/// use img_press::validate_file_exists;
///
/// let result = validate_file_exists(Path::new("nonexistent.jpg"));
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CompressionError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Size of the input file in bytes
pub fn stat_input(path: &Path) -> Result<u64> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(metadata.len()),
        Ok(_) => Err(CompressionError::InputUnreadable {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(CompressionError::FileNotFound(path.to_path_buf()))
        }
        Err(source) => Err(CompressionError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Decode `path` as `format` and bake its EXIF orientation into the pixels.
///
/// The format is taken from the caller rather than sniffed, so a PNG saved
/// as `.jpg` fails here with [`CompressionError::Decode`].
pub fn decode_image(path: &Path, format: ImageFormat) -> Result<DecodedImage> {
    let mut reader =
        ImageReader::open(path).map_err(|source| CompressionError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    reader.set_format(format.to_image_format());

    let decode_error = |source: image::ImageError| CompressionError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let mut decoder = reader.into_decoder().map_err(decode_error)?;
    let orientation = decoder.orientation().map_err(decode_error)?;
    let icc_profile = decoder.icc_profile().map_err(decode_error)?;
    let mut pixels = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    pixels.apply_orientation(orientation);

    Ok(DecodedImage {
        pixels,
        icc_profile,
    })
}

fn ensure_parent_dir(output_path: &Path) -> Result<()> {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf())),
        _ => Ok(()),
    }
}

/// Write `bytes` to `output_path` and return the size found on disk.
///
/// Bytes go to a temporary file next to the destination first and are then
/// renamed over it, so a failed write never leaves a truncated image behind.
pub fn write_output(output_path: &Path, bytes: &[u8]) -> Result<u64> {
    let write_error = |source: io::Error| CompressionError::OutputWrite {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".img-press-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_error)?;
    temp.write_all(bytes).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.persist(output_path)
        .map_err(|e| write_error(e.error))?;

    Ok(fs::metadata(output_path).map_err(write_error)?.len())
}
