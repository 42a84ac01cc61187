pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_PNG_COMPRESSION_LEVEL: u8 = 6;
pub const MAX_PNG_COMPRESSION_LEVEL: u8 = 9;

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_compressed";

/// Upper bound on files being decoded/encoded at the same time. Each one
/// holds a full pixel grid, so this caps peak memory rather than CPU use.
pub const MAX_CONCURRENT_COMPRESSIONS: usize = 4;

// Deflate settings behind the four PNG effort tiers
pub const LIBDEFLATER_NONE_LEVEL: u8 = 0;
pub const LIBDEFLATER_FASTEST_LEVEL: u8 = 1;
pub const LIBDEFLATER_DEFAULT_LEVEL: u8 = 8;
pub const ZOPFLI_ITERATIONS: u8 = 15;

pub const OXIPNG_FASTEST_PRESET: u8 = 1;
pub const OXIPNG_DEFAULT_PRESET: u8 = 2;
pub const OXIPNG_MAXIMUM_PRESET: u8 = 4;

// Size estimation heuristics
pub const JPEG_ESTIMATE_BASE_RATIO: f64 = 0.1;
pub const JPEG_ESTIMATE_QUALITY_WEIGHT: f64 = 0.4;
pub const PNG_ESTIMATE_SAVING_PER_LEVEL: f64 = 0.05;

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Compression ratio:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
pub const INFO_PREFIX: &str = "📋";
