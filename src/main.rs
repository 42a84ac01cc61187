use anyhow::{bail, Context, Result};
use clap::Parser;
use img_press::cli::{Args, CompressionArgs, Commands};
use img_press::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ERROR_PREFIX, INFO_PREFIX,
    ORIGINAL_SIZE_PREFIX, PROGRESS_BAR_TEMPLATE, SUCCESS_PREFIX, WARNING_PREFIX,
};
use img_press::logger::init_logging;
use img_press::{format_file_size, print_image_info, BatchResult, CompressionResult, ImageApi};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::error;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    let api = ImageApi::new();
    let all_ok = match args.command {
        Commands::Compress { inputs, options } => compress(&api, &inputs, &options, args.quiet)?,
        Commands::Info { input } => {
            let info = api
                .get_info(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            print_image_info(&info);
            true
        }
        Commands::Estimate { input, options } => {
            estimate(&api, &input, &options)?;
            true
        }
        Commands::Scan { dir, recursive } => {
            let files = api
                .scan_directory(&dir, recursive)
                .with_context(|| format!("Failed to scan {}", dir.display()))?;
            for file in &files {
                println!("{}", file.display());
            }
            if !args.quiet {
                eprintln!("{} Found {} image files", INFO_PREFIX, files.len());
            }
            true
        }
        Commands::Validate { inputs } => validate(&api, &inputs),
    };

    if !all_ok {
        process::exit(1);
    }
    Ok(())
}

/// Expand glob patterns. A pattern that matches nothing is passed through
/// unchanged so the missing file still gets a result of its own.
fn expand_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        let is_pattern = input.contains(['*', '?', '[']);
        let matches: Vec<PathBuf> = if is_pattern {
            glob::glob(input)
                .map(|entries| entries.filter_map(|entry| entry.ok()).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        if matches.is_empty() {
            paths.push(PathBuf::from(input));
        } else {
            paths.extend(matches);
        }
    }
    paths
}

fn compress(
    api: &ImageApi,
    inputs: &[String],
    args: &CompressionArgs,
    quiet: bool,
) -> Result<bool> {
    let options = args.to_options().context("Invalid compression options")?;
    let paths = expand_inputs(inputs);
    if paths.is_empty() {
        bail!("No input files given");
    }

    let start_time = Instant::now();
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(paths.len() as u64)
    };
    progress.set_style(
        ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let (tx, rx) = mpsc::channel::<CompressionResult>();
    let reporter = {
        let progress = progress.clone();
        thread::spawn(move || {
            for result in rx {
                // A hidden bar swallows println, which happens whenever stderr is not a terminal
                if progress.is_hidden() {
                    if !quiet {
                        println!("{}", result_line(&result));
                    }
                } else {
                    progress.println(result_line(&result));
                }
                progress.inc(1);
            }
        })
    };

    let batch = api.batch_compress(&paths, &options, Some(tx));
    // The sender is gone once batch_compress returns, so the reporter drains and exits
    join_reporter(reporter);
    progress.finish_and_clear();
    let batch = batch?;

    if !quiet {
        print_summary(&batch, start_time);
    }
    Ok(batch.failure_count == 0)
}

/// Wait for the progress reporter. The batch itself is unaffected by a
/// reporter panic, so it is logged and the summary still prints.
fn join_reporter(reporter: JoinHandle<()>) -> bool {
    match reporter.join() {
        Ok(()) => true,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown cause".to_string());
            error!("Progress reporter panicked, per-file lines may be missing: {}", reason);
            false
        }
    }
}

fn result_line(result: &CompressionResult) -> String {
    match (&result.error, &result.output_path) {
        (None, Some(output)) => format!(
            "{} {} -> {} ({} -> {}, {:.1}%)",
            SUCCESS_PREFIX,
            result.input_path.display(),
            output.display(),
            format_file_size(result.input_size),
            format_file_size(result.output_size),
            result.reduction
        ),
        (Some(e), _) => format!("{} {}: {}", ERROR_PREFIX, result.input_path.display(), e),
        (None, None) => format!("{} {}", WARNING_PREFIX, result.input_path.display()),
    }
}

fn print_summary(batch: &BatchResult, start_time: Instant) {
    println!("\n📊 Compression Summary:");
    println!(
        "  {} Processed: {} succeeded, {} failed",
        SUCCESS_PREFIX, batch.success_count, batch.failure_count
    );
    println!(
        "  {} {} bytes ({})",
        ORIGINAL_SIZE_PREFIX,
        batch.total_input,
        format_file_size(batch.total_input)
    );
    println!(
        "  {} {} bytes ({})",
        COMPRESSED_SIZE_PREFIX,
        batch.total_output,
        format_file_size(batch.total_output)
    );
    println!("  {} {:.1}%", COMPRESSION_RATIO_PREFIX, batch.total_reduction);
    println!("  ⏱️  Total time: {:?}", start_time.elapsed());

    if batch.failure_count > 0 {
        println!("  {}  Failed files: {}", WARNING_PREFIX, batch.failure_count);
    }
}

fn estimate(api: &ImageApi, input: &Path, args: &CompressionArgs) -> Result<()> {
    let options = args.to_options().context("Invalid compression options")?;
    let preview = api
        .preview(input, &options)
        .with_context(|| format!("Failed to estimate {}", input.display()))?;

    println!("{} Estimate for: {}", INFO_PREFIX, preview.input_path.display());
    println!("  🎭 Format: {}", preview.format);
    println!(
        "  📏 Dimensions: {}x{} -> {}x{}",
        preview.width, preview.height, preview.new_width, preview.new_height
    );
    println!(
        "  {} {} bytes ({})",
        ORIGINAL_SIZE_PREFIX,
        preview.input_size,
        format_file_size(preview.input_size)
    );
    println!(
        "  {} ~{} bytes ({})",
        COMPRESSED_SIZE_PREFIX,
        preview.estimated_size,
        format_file_size(preview.estimated_size)
    );
    println!(
        "  {} ~{:.1}%",
        COMPRESSION_RATIO_PREFIX, preview.estimated_reduction
    );
    println!("  {}  Estimates are approximate; run compress for real sizes", WARNING_PREFIX);
    Ok(())
}

fn validate(api: &ImageApi, inputs: &[PathBuf]) -> bool {
    let mut all_ok = true;
    for input in inputs {
        match api.validate_image(input) {
            Ok(format) => println!("{} {} ({})", SUCCESS_PREFIX, input.display(), format),
            Err(e) => {
                all_ok = false;
                println!("{} {}: {}", ERROR_PREFIX, input.display(), e);
            }
        }
    }
    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_join_reporter() {
        assert!(join_reporter(thread::spawn(|| {})));
        assert!(!join_reporter(thread::spawn(|| panic!("terminal went away"))));
    }

    #[test]
    fn test_expand_inputs_plain_paths() {
        let inputs = vec!["a.jpg".to_string(), "dir/b.png".to_string()];
        assert_eq!(
            expand_inputs(&inputs),
            vec![PathBuf::from("a.jpg"), PathBuf::from("dir/b.png")]
        );
    }

    #[test]
    fn test_expand_inputs_glob() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("one.png")).unwrap();
        File::create(temp_dir.path().join("two.png")).unwrap();
        File::create(temp_dir.path().join("three.jpg")).unwrap();

        let pattern = format!("{}/*.png", temp_dir.path().display());
        let paths = expand_inputs(&[pattern]);
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.extension().unwrap() == "png"));
    }

    #[test]
    fn test_expand_inputs_unmatched_pattern_kept() {
        let inputs = vec!["/nonexistent/*.jpg".to_string()];
        assert_eq!(expand_inputs(&inputs), vec![PathBuf::from("/nonexistent/*.jpg")]);
    }
}
