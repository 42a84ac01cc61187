use crate::constants::MAX_CONCURRENT_COMPRESSIONS;
use crate::error::{CompressionError, Result};
use crate::formats::is_supported_image;
use crate::processing::CompressionResult;
use crate::utils::calculate_reduction;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Aggregate over a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// One entry per input path, in completion order
    pub results: Vec<CompressionResult>,
    /// Bytes read, successful files only
    pub total_input: u64,
    /// Bytes written, successful files only
    pub total_output: u64,
    pub success_count: usize,
    pub failure_count: usize,
    /// Overall reduction across the successful files
    pub total_reduction: f64,
}

impl BatchResult {
    pub fn failures(&self) -> impl Iterator<Item = &CompressionResult> {
        self.results.iter().filter(|result| !result.success())
    }

    pub fn saved_bytes(&self) -> i64 {
        self.total_input as i64 - self.total_output as i64
    }
}

/// Running totals for a batch; the only state workers share
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    batch: BatchResult,
}

impl BatchAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            batch: BatchResult {
                results: Vec::with_capacity(capacity),
                ..BatchResult::default()
            },
        }
    }

    /// Fold one finished file into the totals
    pub fn record(&mut self, result: CompressionResult) {
        if result.success() {
            self.batch.success_count += 1;
            self.batch.total_input += result.input_size;
            self.batch.total_output += result.output_size;
        } else {
            self.batch.failure_count += 1;
        }
        self.batch.results.push(result);
    }

    pub fn finish(mut self) -> BatchResult {
        self.batch.total_reduction =
            calculate_reduction(self.batch.total_input, self.batch.total_output);
        self.batch
    }
}

/// Runs one compression per input path on a fixed-size worker pool.
///
/// The pool size is the admission cap: a file only starts once a worker is
/// free, and a worker handles one file from decode to write.
#[derive(Debug, Clone, Copy)]
pub struct BatchOrchestrator {
    max_in_flight: usize,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::new(MAX_CONCURRENT_COMPRESSIONS)
    }
}

impl BatchOrchestrator {
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Compress every path with `compress` and aggregate the results.
    ///
    /// Every path yields exactly one result, including paths whose worker
    /// panicked. Each result is also sent to `progress` as it completes; a
    /// dropped receiver is ignored. `progress` is dropped on return, which
    /// ends the receiver's iteration.
    pub fn run<F>(
        &self,
        paths: &[PathBuf],
        progress: Option<Sender<CompressionResult>>,
        compress: F,
    ) -> Result<BatchResult>
    where
        F: Fn(&Path) -> CompressionResult + Sync,
    {
        let start_time = Instant::now();
        info!(
            "Compressing {} files with up to {} in flight",
            paths.len(),
            self.max_in_flight
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_in_flight)
            .thread_name(|index| format!("img-press-worker-{}", index))
            .build()
            .map_err(|e| CompressionError::ThreadPool(e.to_string()))?;

        let accumulator = Mutex::new(BatchAccumulator::with_capacity(paths.len()));
        let progress = progress.map(Mutex::new);

        pool.install(|| {
            paths.par_iter().for_each(|path| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| compress(path)))
                    .unwrap_or_else(|_| {
                        CompressionResult::failed(
                            path,
                            CompressionError::WorkerPanicked(path.clone()),
                        )
                    });
                debug!(
                    "Finished {} (success: {})",
                    path.display(),
                    result.success()
                );

                if let Some(progress) = &progress {
                    let sender = progress.lock().unwrap_or_else(PoisonError::into_inner);
                    // The receiver may be gone; the batch carries on regardless
                    let _ = sender.send(result.clone());
                }

                accumulator
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record(result);
            });
        });

        let batch = accumulator
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .finish();

        info!(
            "Batch finished in {:?}: {} succeeded, {} failed, {:.1}% overall reduction",
            start_time.elapsed(),
            batch.success_count,
            batch.failure_count,
            batch.total_reduction
        );
        Ok(batch)
    }
}

/// List the supported images in `dir`, descending into subdirectories when
/// `recursive` is set. Hidden files and directories are skipped. The result
/// is sorted so repeated scans agree.
pub fn collect_image_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CompressionError::FileNotFound(dir.to_path_buf()));
    }

    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut image_files = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            image_files.push(entry.into_path());
        }
    }

    image_files.sort();
    Ok(image_files)
}
