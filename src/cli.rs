use crate::constants::{DEFAULT_OUTPUT_SUFFIX, DEFAULT_PNG_COMPRESSION_LEVEL, DEFAULT_QUALITY};
use crate::error::Result;
use crate::options::{ChromaSubsampling, CompressionOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-press",
    about = "Compress JPEG and PNG images in parallel",
    long_about = "img-press re-encodes JPEG and PNG files to reduce their size. \
                  It can resize while compressing, keeps EXIF orientation, \
                  and processes up to four files at a time.",
    version,
    after_help = "EXAMPLES:\n  \
    img-press compress photo.jpg -q 80 -w 1920\n  \
    img-press compress \"shots/*.png\" -l 9 -o ./compressed\n  \
    img-press estimate photo.jpg --resize-percent 50\n  \
    img-press scan ./images -r\n  \
    img-press info photo.png"
)]
pub struct Args {
    #[arg(short = 'Q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, global = true, help = "Print debug logging")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Compress one or more image files",
        long_about = "Compress JPEG and PNG files. Inputs may be file paths or glob patterns; \
                      each output is written next to its input (or into --output-dir) with \
                      the suffix inserted before the extension."
    )]
    Compress {
        #[arg(required = true, help = "Input files or glob patterns")]
        inputs: Vec<String>,

        #[command(flatten)]
        options: CompressionArgs,
    },

    #[command(about = "Display image information and compression suggestions")]
    Info {
        #[arg(help = "Image file path to analyze")]
        input: PathBuf,
    },

    #[command(
        about = "Estimate the compressed size without compressing",
        long_about = "Print a heuristic estimate of the output size and the target \
                      dimensions. The estimate is approximate; only a real run is exact."
    )]
    Estimate {
        #[arg(help = "Image file path")]
        input: PathBuf,

        #[command(flatten)]
        options: CompressionArgs,
    },

    #[command(about = "List the supported images in a directory")]
    Scan {
        #[arg(help = "Directory to scan")]
        dir: PathBuf,

        #[arg(short = 'r', long, help = "Descend into subdirectories")]
        recursive: bool,
    },

    #[command(about = "Check that files exist and decode as the format their extension names")]
    Validate {
        #[arg(required = true, help = "Image files to check")]
        inputs: Vec<PathBuf>,
    },
}

/// Flags shared by every command that takes compression settings
#[derive(clap::Args, Debug, Clone)]
pub struct CompressionArgs {
    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        help = "JPEG quality (1-100)"
    )]
    pub quality: u8,

    #[arg(
        short = 'l',
        long,
        default_value_t = DEFAULT_PNG_COMPRESSION_LEVEL,
        help = "PNG compression level (0-9)",
        long_help = "PNG compression level. 0 stores without compression, 1-3 is fastest, \
                     4-6 is the default effort and 7-9 is maximum (zopfli)."
    )]
    pub level: u8,

    #[arg(
        long,
        default_value_t = 0.0,
        help = "Scale both axes to this percentage (takes precedence over -w/-H)"
    )]
    pub resize_percent: f64,

    #[arg(
        short = 'w',
        long,
        default_value_t = 0,
        help = "Target width in pixels (0 = keep aspect from height)"
    )]
    pub width: u32,

    #[arg(
        short = 'H',
        long,
        default_value_t = 0,
        help = "Target height in pixels (0 = keep aspect from width)"
    )]
    pub height: u32,

    #[arg(long, help = "Carry the ICC colour profile into the output")]
    pub keep_metadata: bool,

    #[arg(long, help = "Write baseline instead of progressive JPEG")]
    pub baseline: bool,

    #[arg(long, default_value = "4:2:0", help = "JPEG chroma subsampling (4:4:4, 4:2:2, 4:2:0)")]
    pub chroma: String,

    #[arg(long, help = "Write Adam7-interlaced PNG")]
    pub interlace: bool,

    #[arg(short = 'o', long, help = "Directory for outputs (default: next to each input)")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_OUTPUT_SUFFIX, help = "Suffix added to output file names")]
    pub suffix: String,
}

impl CompressionArgs {
    pub fn to_options(&self) -> Result<CompressionOptions> {
        let chroma: ChromaSubsampling = self.chroma.parse()?;
        let mut builder = CompressionOptions::builder()
            .quality(self.quality)
            .compression_level(self.level)
            .resize_percent(self.resize_percent)
            .resize_width(self.width)
            .resize_height(self.height)
            .strip_metadata(!self.keep_metadata)
            .progressive(!self.baseline)
            .chroma_subsampling(chroma)
            .interlaced(self.interlace)
            .output_suffix(self.suffix.clone());
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir.clone());
        }
        builder.build()
    }
}
