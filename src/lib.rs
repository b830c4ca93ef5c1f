// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. dataset::DatasetInfo)
    clippy::module_name_repetitions
)]

//! # mdbench
//!
//! A benchmarking harness for comparing markdown parser performance across
//! document sizes.
//!
//! The harness:
//! - Discovers markdown fixtures of five size categories on disk
//! - Times each library's markdown-to-HTML conversion on each fixture
//! - Reduces the timings into median/mean/min/max, throughput and heap deltas
//!
//! ## Modules
//!
//! - [`dataset`]: Fixture discovery and loading
//! - [`metrics`]: Median, byte/time formatting, heap usage
//! - [`library`]: Markdown libraries under test
//! - [`runner`]: Benchmark execution and results
//! - [`config`]: Saved default flags
//! - [`perf`]: Timing scopes

pub mod config;
pub mod dataset;
pub mod library;
pub mod metrics;
pub mod perf;
pub mod runner;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dataset::{DatasetInfo, DatasetLoader, LoaderConfig};
    pub use crate::library::MarkdownLibrary;
    pub use crate::runner::{BenchmarkOptions, LibraryBenchmarkResult};
}
