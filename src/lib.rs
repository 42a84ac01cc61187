pub mod api;
pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod estimate;
pub mod formats;
pub mod info;
pub mod jpeg;
pub mod logger;
pub mod options;
pub mod png;
pub mod processing;
pub mod resize;
pub mod utils;
pub mod validation;

pub use api::{CompressionPreview, ImageApi};
pub use batch::{collect_image_files, BatchAccumulator, BatchOrchestrator, BatchResult};
pub use error::{CompressionError, ErrorKind, Result};
pub use estimate::estimate_compressed_size;
pub use formats::{is_supported_image, resolve_format, ImageFormat};
pub use info::{get_image_info, print_image_info, ImageInfo};
pub use jpeg::JpegCompressor;
pub use options::{
    ChromaSubsampling, CompressionOptions, CompressionOptionsBuilder, JpegOptions, PngEffort,
    PngOptions, ResizeOptions,
};
pub use png::PngCompressor;
pub use processing::{validate_file_exists, CompressionResult, Compressor};
pub use resize::{calculate_target_dimensions, Dimensions};
pub use utils::{calculate_reduction, format_file_size, generate_output_path};
pub use validation::validate_image;
