//! Benchmark execution.
//!
//! A run parses one dataset with one library a fixed number of times and
//! reduces the per-parse timings into a [`LibraryBenchmarkResult`].

use serde::Serialize;
use thiserror::Error;

use crate::dataset::{DatasetError, DatasetLoader, LoadedDataset, SizeCategory};
use crate::library::MarkdownLibrary;
use crate::metrics::{self, MetricsError, format_bytes, format_time};
use crate::perf;

/// How many parses to run per (library, dataset) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkOptions {
    /// Timed parses
    pub iterations: usize,
    /// Untimed parses run first to warm caches
    pub warmup: usize,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            warmup: 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

/// Timing statistics for one library on one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryBenchmarkResult {
    pub library: String,
    pub dataset: String,
    pub size: SizeCategory,
    pub input_bytes: u64,
    pub iterations: usize,
    pub total_ms: f64,
    pub average_ms: f64,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub ops_per_second: f64,
    pub bytes_per_second: f64,
    /// Median heap growth of one parse, measured while its output is alive;
    /// 0 without the tracking allocator
    pub memory_delta_bytes: i64,
    /// Length of the HTML produced by the last timed parse
    pub output_len: usize,
}

impl LibraryBenchmarkResult {
    /// One plain line: library, dataset, median, mean, throughput, memory.
    pub fn summary(&self) -> String {
        format!(
            "{:<16} {:<11} median {:>10}  avg {:>10}  {:>10}/s  mem {}",
            self.library,
            self.dataset,
            format_time(self.median_ms),
            format_time(self.average_ms),
            format_bytes(self.bytes_per_second),
            format_signed_bytes(self.memory_delta_bytes),
        )
    }
}

/// Time `library` on `dataset`.
///
/// # Errors
/// Returns [`BenchError::Metrics`] when `options.iterations` is zero.
pub fn run_benchmark(
    library: &dyn MarkdownLibrary,
    dataset: &LoadedDataset<'_>,
    options: BenchmarkOptions,
) -> Result<LibraryBenchmarkResult, BenchError> {
    let input = dataset.content.as_str();
    for _ in 0..options.warmup {
        std::hint::black_box(library.parse(std::hint::black_box(input)));
    }

    let mut samples = Vec::with_capacity(options.iterations);
    let mut memory_samples = Vec::with_capacity(options.iterations);
    let mut output_len = 0;
    for _ in 0..options.iterations {
        let memory_before = metrics::memory_usage();
        let (html, ms) = perf::measure(|| library.parse(std::hint::black_box(input)));
        // Sampled before `html` drops so the output counts as growth.
        let memory_after = metrics::memory_usage();
        output_len = html.len();
        samples.push(ms);
        memory_samples.push(signed_delta(memory_before, memory_after) as f64);
    }

    let median_ms = metrics::calculate_median(&samples)?;
    #[allow(clippy::cast_possible_truncation)]
    let memory_delta_bytes = metrics::calculate_median(&memory_samples)?.round() as i64;
    let total_ms: f64 = samples.iter().sum();
    let average_ms = total_ms / samples.len() as f64;
    let min_ms = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let input_bytes = input.len() as u64;

    let (ops_per_second, bytes_per_second) = if average_ms > 0.0 {
        (
            1000.0 / average_ms,
            input_bytes as f64 * 1000.0 / average_ms,
        )
    } else {
        (0.0, 0.0)
    };

    Ok(LibraryBenchmarkResult {
        library: library.name().to_string(),
        dataset: dataset.info.name.clone(),
        size: dataset.info.size,
        input_bytes,
        iterations: samples.len(),
        total_ms,
        average_ms,
        median_ms,
        min_ms,
        max_ms,
        ops_per_second,
        bytes_per_second,
        memory_delta_bytes,
        output_len,
    })
}

/// Run every library against every selected dataset.
///
/// An empty `dataset_names` selects all datasets the loader found. Results
/// are ordered by dataset, then by library.
///
/// # Errors
/// Fails on the first unknown dataset name, unreadable fixture, or zero
/// iteration count.
pub fn run_suite(
    loader: &DatasetLoader,
    libraries: &[Box<dyn MarkdownLibrary>],
    dataset_names: &[String],
    options: BenchmarkOptions,
) -> Result<Vec<LibraryBenchmarkResult>, BenchError> {
    let _scope = perf::scope("suite.run");
    let names: Vec<String> = if dataset_names.is_empty() {
        loader
            .available_datasets()
            .iter()
            .map(|info| info.name.clone())
            .collect()
    } else {
        dataset_names.to_vec()
    };

    let mut results = Vec::with_capacity(names.len() * libraries.len());
    for name in &names {
        let dataset = loader.load_dataset(name)?;
        for library in libraries {
            tracing::info!(
                library = library.name(),
                dataset = %name,
                bytes = dataset.content.len(),
                "running benchmark"
            );
            results.push(run_benchmark(library.as_ref(), &dataset, options)?);
        }
    }
    Ok(results)
}

fn format_signed_bytes(bytes: i64) -> String {
    let magnitude = format_bytes(bytes.unsigned_abs() as f64);
    if bytes < 0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

fn signed_delta(before: u64, after: u64) -> i64 {
    if after >= before {
        i64::try_from(after - before).unwrap_or(i64::MAX)
    } else {
        i64::try_from(before - after).map_or(i64::MIN, |d| -d)
    }
}
