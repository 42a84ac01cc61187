/// Utility functions for common operations
///
/// Output naming, size arithmetic and formatting shared by the encoders,
/// the batch runner and the CLI.
use crate::error::{CompressionError, Result};
use crate::options::CompressionOptions;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Compute where the compressed version of `input_path` is written.
///
/// The directory is `options.output_dir` when set, otherwise the input's own
/// directory. The file name is the input stem, then `options.output_suffix`,
/// then the original extension. Nothing on disk is touched.
///
/// # Returns
/// * `Err(CompressionError::UnsupportedFormat)` if `input_path` has no file name
pub fn generate_output_path(input_path: &Path, options: &CompressionOptions) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat("Invalid file name".to_string()))?;

    let mut file_name = OsString::from(file_stem);
    file_name.push(&options.output_suffix);
    if let Some(extension) = input_path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }

    let dir = match options.output_dir() {
        Some(dir) => dir,
        None => input_path.parent().unwrap_or_else(|| Path::new("")),
    };

    Ok(dir.join(file_name))
}

/// Percentage saved going from `original_size` to `compressed_size`.
///
/// Negative when the output grew. A zero-byte original yields 0.
pub fn calculate_reduction(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (1.0 - compressed_size as f64 / original_size as f64) * 100.0
}

/// Format file size in human-readable format
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
