//! Fixture discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::{DatasetError, DatasetInfo, LoadedDataset, SizeCategory};
use crate::perf;

/// Loader settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory holding `<name>.md` fixtures. Defaults to [`default_dataset_dir`].
    pub dataset_dir: Option<PathBuf>,
}

impl LoaderConfig {
    pub fn with_dataset_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset_dir: Some(dir.into()),
        }
    }
}

/// The `dataset/` directory shipped next to the crate manifest.
pub fn default_dataset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("dataset")
}

/// Scans the dataset directory once and serves fixture content on demand.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    dataset_dir: PathBuf,
    datasets: Vec<DatasetInfo>,
}

impl DatasetLoader {
    /// Scan the configured directory for the known fixtures.
    ///
    /// Fixtures that are missing or unreadable are skipped.
    pub fn new(config: LoaderConfig) -> Self {
        let _scope = perf::scope("dataset.scan");
        let dataset_dir = config.dataset_dir.unwrap_or_else(default_dataset_dir);
        let datasets = SizeCategory::ALL
            .into_iter()
            .filter_map(|size| scan_fixture(&dataset_dir, size))
            .collect::<Vec<_>>();
        tracing::debug!(
            dir = %dataset_dir.display(),
            found = datasets.len(),
            "scanned dataset directory"
        );
        Self {
            dataset_dir,
            datasets,
        }
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    /// Fixtures found at construction, smallest category first.
    pub fn available_datasets(&self) -> &[DatasetInfo] {
        &self.datasets
    }

    /// Metadata for a dataset found at construction.
    pub fn dataset(&self, name: &str) -> Option<&DatasetInfo> {
        self.datasets.iter().find(|info| info.name == name)
    }

    /// Read a fixture's current content from disk.
    ///
    /// # Errors
    /// Returns [`DatasetError::NotFound`] for names that were not found at
    /// construction and [`DatasetError::Io`] if the file can no longer be read.
    pub fn load_dataset(&self, name: &str) -> Result<LoadedDataset<'_>, DatasetError> {
        let info = self.dataset(name).ok_or_else(|| DatasetError::NotFound {
            name: name.to_string(),
            available: self.datasets.iter().map(|info| info.name.clone()).collect(),
        })?;
        let raw = fs::read(&info.path).map_err(|source| DatasetError::Io {
            path: info.path.clone(),
            source,
        })?;
        Ok(LoadedDataset {
            content: decode(raw),
            info,
        })
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

fn scan_fixture(dir: &Path, size: SizeCategory) -> Option<DatasetInfo> {
    let path = dir.join(format!("{}.md", size.name()));
    let raw = match fs::read(&path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "skipping dataset");
            return None;
        }
    };
    let bytes = raw.len() as u64;
    let content = decode(raw);
    Some(DatasetInfo {
        name: size.name().to_string(),
        size,
        bytes,
        lines: content.split('\n').count(),
        characters: content.chars().count(),
        description: size.description().to_string(),
        path,
    })
}

// Invalid UTF-8 becomes U+FFFD so a present fixture is never dropped.
fn decode(raw: Vec<u8>) -> String {
    match String::from_utf8(raw) {
        Ok(content) => content,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
