use crate::error::{CompressionError, Result};
use crate::formats::{resolve_format, ImageFormat};
use crate::processing::validate_file_exists;
use crate::resize::Dimensions;
use crate::utils::format_file_size;
use image::metadata::Orientation;
use image::{ImageDecoder, ImageReader};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only snapshot of an image file, taken fresh on every call
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub format: ImageFormat,
    /// Width as displayed, after EXIF orientation
    pub width: u32,
    /// Height as displayed, after EXIF orientation
    pub height: u32,
    pub size: u64,
    pub color_mode: String,
}

impl ImageInfo {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Inspect `input_path` by reading only the image header.
///
/// The format comes from the extension when it is one we support, and from
/// the file's magic bytes otherwise.
pub fn get_image_info(input_path: &Path) -> Result<ImageInfo> {
    validate_file_exists(input_path)?;

    let unreadable = |source: std::io::Error| CompressionError::InputUnreadable {
        path: input_path.to_path_buf(),
        source,
    };
    let decode_error = |source: image::ImageError| CompressionError::Decode {
        path: input_path.to_path_buf(),
        source,
    };

    let size = fs::metadata(input_path).map_err(unreadable)?.len();
    let reader = ImageReader::open(input_path)
        .map_err(unreadable)?
        .with_guessed_format()
        .map_err(unreadable)?;

    let format = match resolve_format(input_path) {
        Ok(format) => format,
        Err(e) => reader
            .format()
            .and_then(ImageFormat::from_image_format)
            .ok_or(e)?,
    };

    let mut decoder = reader.into_decoder().map_err(decode_error)?;
    let (raw_width, raw_height) = decoder.dimensions();
    let color_mode = format!("{:?}", decoder.color_type());
    let (width, height) = match decoder.orientation().map_err(decode_error)? {
        Orientation::Rotate90
        | Orientation::Rotate270
        | Orientation::Rotate90FlipH
        | Orientation::Rotate270FlipH => (raw_height, raw_width),
        _ => (raw_width, raw_height),
    };

    Ok(ImageInfo {
        path: input_path.to_path_buf(),
        format,
        width,
        height,
        size,
        color_mode,
    })
}

pub fn print_image_info(info: &ImageInfo) {
    println!("📋 Basic Information:");
    println!("  📁 File: {}", info.path.display());
    println!("  🎭 Image format: {}", info.format);
    println!("  📏 Dimensions: {}x{} pixels", info.width, info.height);
    println!(
        "  📦 File size: {} bytes ({})",
        info.size,
        format_file_size(info.size)
    );
    println!("  🎨 Color type: {}", info.color_mode);

    let total_pixels = info.dimensions().pixel_count();
    println!("  🔢 Total pixels: {}", total_pixels);
    if info.height > 0 {
        let aspect_ratio = info.width as f64 / info.height as f64;
        println!("  📐 Aspect ratio: {:.2}:1", aspect_ratio);
    }

    println!("\n💡 Compression Suggestions:");
    match info.format {
        ImageFormat::Jpeg => {
            if info.size > 5 * 1024 * 1024 {
                println!("  🎯 Large file (>5MB): Consider quality 60-80");
            } else if info.size > 1024 * 1024 {
                println!("  🎯 Medium file (1-5MB): Consider quality 70-85");
            } else {
                println!("  🎯 Small file (<1MB): Consider quality 85-95");
            }
        }
        ImageFormat::Png => {
            println!("  🎯 PNG is lossless: levels 7-9 give the smallest files, 1-3 the fastest runs");
        }
    }

    if info.width > 1920 || info.height > 1080 {
        println!("  📏 Large dimensions: Consider resizing to 1920x1080 or smaller");
    } else if info.width > 1280 || info.height > 720 {
        println!("  📏 HD dimensions: Consider resizing to 1280x720 for web use");
    }
}
