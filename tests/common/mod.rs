#![allow(dead_code)]

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// A noisy-enough RGB gradient that encoders have real work to do
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x ^ y) % 256) as u8,
        ])
    }))
}

pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 96, ((x + y) % 256) as u8])
    }))
}

pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_rgb(width, height)
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .unwrap();
    path
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_rgba(width, height)
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

/// A file with an image extension but no image inside
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(b"definitely not image data")
        .unwrap();
    path
}

pub fn create_nested_directory_structure(temp_dir: &Path) -> PathBuf {
    let subdir = temp_dir.join("subdir");
    fs::create_dir(&subdir).unwrap();

    write_jpeg(&subdir, "nested.jpg", 8, 8);
    File::create(subdir.join("nested.txt"))
        .unwrap()
        .write_all(b"nested text")
        .unwrap();

    subdir
}

pub fn decoded_dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

/// Minimal big-endian EXIF block holding only an Orientation tag
pub fn exif_orientation(orientation: u8) -> Vec<u8> {
    let mut exif = b"Exif\0\0".to_vec();
    exif.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
    exif.extend_from_slice(&[0x00, 0x01]);
    exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    exif.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
    exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    exif
}

/// Placeholder colour profile; decoders hand it back byte for byte
pub fn fake_icc_profile() -> Vec<u8> {
    (0..200u32).map(|i| (i * 7 % 251) as u8).collect()
}

/// Encode `pixels` as JPEG with optional EXIF (APP1) and ICC (APP2) segments
pub fn write_jpeg_with_metadata(
    dir: &Path,
    name: &str,
    pixels: &RgbImage,
    exif: Option<&[u8]>,
    icc_profile: Option<&[u8]>,
) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut bytes, 95);
    if let Some(exif) = exif {
        encoder.add_app_segment(1, exif).unwrap();
    }
    if let Some(icc) = icc_profile {
        encoder.add_icc_profile(icc).unwrap();
    }
    encoder
        .encode(
            pixels.as_raw(),
            pixels.width() as u16,
            pixels.height() as u16,
            jpeg_encoder::ColorType::Rgb,
        )
        .unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

/// A PNG carrying `icc_profile` in an iCCP chunk
pub fn write_png_with_icc(dir: &Path, name: &str, icc_profile: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let writer = BufWriter::new(File::create(&path).unwrap());
    let mut encoder = PngEncoder::new(writer);
    encoder.set_icc_profile(icc_profile.to_vec()).unwrap();
    gradient_rgba(24, 24).write_with_encoder(encoder).unwrap();
    path
}

pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
