//! Markdown fixture datasets.
//!
//! This module handles:
//! - Scanning a directory for the five known fixtures (`small.md` through `massive.md`)
//! - Recording byte, line and character counts at scan time
//! - Re-reading fixture content from disk on every load

mod loader;
mod types;

pub use loader::{DatasetLoader, LoaderConfig, default_dataset_dir};
pub use types::{DatasetError, DatasetInfo, LoadedDataset, SizeCategory};
