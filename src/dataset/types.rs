//! Dataset metadata types.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Declared size category of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
    ExtraLarge,
    Massive,
}

impl SizeCategory {
    /// Every category, smallest first. Also the scan order of the loader.
    pub const ALL: [Self; 5] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::ExtraLarge,
        Self::Massive,
    ];

    /// Canonical dataset name, which is also the fixture file stem.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extraLarge",
            Self::Massive => "massive",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Small => "Small document (~1 KB): a short README with basic formatting",
            Self::Medium => "Medium document (~10 KB): typical documentation page",
            Self::Large => "Large document (~100 KB): long technical guide",
            Self::ExtraLarge => "Extra large document (~1 MB): book-length content",
            Self::Massive => "Massive document (~10 MB): stress test input",
        }
    }

    /// Look up a category by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata recorded for one fixture when the loader scans its directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub name: String,
    pub size: SizeCategory,
    pub path: PathBuf,
    /// File size in bytes
    pub bytes: u64,
    /// Number of `\n`-separated lines (a trailing newline adds an empty line)
    pub lines: usize,
    /// Number of Unicode scalar values
    pub characters: usize,
    pub description: String,
}

/// Fixture content read from disk together with its scan-time metadata.
///
/// The metadata is a snapshot from loader construction and is not refreshed
/// if the file changes afterwards.
#[derive(Debug, Clone)]
pub struct LoadedDataset<'a> {
    pub content: String,
    pub info: &'a DatasetInfo,
}

/// Errors returned by [`super::DatasetLoader::load_dataset`].
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset '{name}' not found; {}", describe_available(.available))]
    NotFound {
        name: String,
        available: Vec<String>,
    },
    #[error("failed to read dataset {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_available(available: &[String]) -> String {
    if available.is_empty() {
        let expected = SizeCategory::ALL
            .iter()
            .map(|size| format!("{}.md", size.name()))
            .collect::<Vec<_>>();
        format!(
            "no datasets are available (expected any of: {})",
            expected.join(", ")
        )
    } else {
        format!("available datasets: {}", available.join(", "))
    }
}
