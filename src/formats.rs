/// Image format resolution
///
/// The file extension is the only thing consulted here. A file whose name
/// disagrees with its contents is classified by name and fails later, when
/// the decoder for that format rejects the bytes.
use crate::error::{CompressionError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Formats the compression pipeline accepts and produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Lossy, tuned by quality
    Jpeg,
    /// Lossless, tuned by deflate effort
    Png,
}

impl ImageFormat {
    /// Map a bare extension (without the dot, any case) to a format
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }

    /// Convert from the image crate's format, if it is one we handle
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            image::ImageFormat::Png => Some(ImageFormat::Png),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        ImageFormat::from_extension(s).ok_or_else(|| CompressionError::UnsupportedFormat(s.to_string()))
    }
}

/// Resolve the format of `path` from its lower-cased extension.
///
/// # Returns
/// * `Ok(ImageFormat)` for `.jpg`, `.jpeg` and `.png`
/// * `Err(CompressionError::UnsupportedFormat)` for anything else, including no extension
pub fn resolve_format(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    ImageFormat::from_extension(extension).ok_or_else(|| {
        if extension.is_empty() {
            CompressionError::UnsupportedFormat(format!("{} has no file extension", path.display()))
        } else {
            CompressionError::UnsupportedFormat(format!(".{}", extension.to_lowercase()))
        }
    })
}

/// Whether `path` is in scope for the pipeline
pub fn is_supported_image(path: &Path) -> bool {
    resolve_format(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_format_by_extension() {
        assert_eq!(resolve_format(Path::new("a.jpg")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(resolve_format(Path::new("a.jpeg")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(resolve_format(Path::new("a.JPG")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(resolve_format(Path::new("dir/a.PnG")).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_resolve_format_unsupported() {
        for name in ["a.gif", "a.webp", "a.txt", "a", "a.jpg.bak"] {
            let result = resolve_format(Path::new(name));
            assert!(
                matches!(result, Err(CompressionError::UnsupportedFormat(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_unsupported_message_names_extension() {
        match resolve_format(Path::new("photo.GIF")) {
            Err(CompressionError::UnsupportedFormat(msg)) => assert_eq!(msg, ".gif"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ImageFormat::from_str("jpeg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_str("PNG").unwrap(), ImageFormat::Png);
        assert!(ImageFormat::from_str("webp").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format!("{}", ImageFormat::Jpeg), "JPEG");
        assert_eq!(format!("{}", ImageFormat::Png), "PNG");
    }

    #[test]
    fn test_image_format_conversion() {
        assert_eq!(
            ImageFormat::from_image_format(ImageFormat::Png.to_image_format()),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_image_format(image::ImageFormat::Gif), None);
    }
}
