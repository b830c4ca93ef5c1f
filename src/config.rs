//! Saved default flags.
//!
//! Config files hold command-line flag tokens, one or more per line, with
//! `#` comments. The global file is merged first, then the local
//! `.mdbenchrc`, then the actual command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::runner::BenchmarkOptions;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub dataset_dir: Option<PathBuf>,
    pub iterations: Option<usize>,
    pub warmup: Option<usize>,
    pub datasets: Vec<String>,
    pub libraries: Vec<String>,
    pub json: bool,
    pub perf: bool,
}

impl ConfigFlags {
    /// Merge `other` on top of `self`: options and non-empty selections from
    /// `other` win, booleans are OR-ed.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            dataset_dir: other
                .dataset_dir
                .clone()
                .or_else(|| self.dataset_dir.clone()),
            iterations: other.iterations.or(self.iterations),
            warmup: other.warmup.or(self.warmup),
            datasets: if other.datasets.is_empty() {
                self.datasets.clone()
            } else {
                other.datasets.clone()
            },
            libraries: if other.libraries.is_empty() {
                self.libraries.clone()
            } else {
                other.libraries.clone()
            },
            json: self.json || other.json,
            perf: self.perf || other.perf,
        }
    }

    pub fn benchmark_options(&self) -> BenchmarkOptions {
        let defaults = BenchmarkOptions::default();
        BenchmarkOptions {
            iterations: self.iterations.unwrap_or(defaults.iterations),
            warmup: self.warmup.unwrap_or(defaults.warmup),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("mdbench").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("mdbench")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("mdbench").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("mdbench")
                .join("config");
        }
    }

    PathBuf::from(".mdbenchrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".mdbenchrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# mdbench defaults (saved with --save)".to_string());
    if let Some(dir) = &flags.dataset_dir {
        lines.push(format!("--dataset-dir {}", dir.display()));
    }
    if let Some(iterations) = flags.iterations {
        lines.push(format!("--iterations {iterations}"));
    }
    if let Some(warmup) = flags.warmup {
        lines.push(format!("--warmup {warmup}"));
    }
    for dataset in &flags.datasets {
        lines.push(format!("--dataset {dataset}"));
    }
    for library in &flags.libraries {
        lines.push(format!("--library {library}"));
    }
    if flags.json {
        lines.push("--json".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from raw tokens. Unknown tokens are ignored, as are
/// numeric flags whose value does not parse.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--json" {
            flags.json = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if let Some((name, inline)) = split_valued_flag(token) {
            let value = match inline {
                Some(value) => Some(value.to_string()),
                None => {
                    let next = tokens.get(i + 1).cloned();
                    if next.is_some() {
                        i += 1;
                    }
                    next
                }
            };
            if let Some(value) = value {
                apply_value(&mut flags, name, value);
            }
        }
        i += 1;
    }
    flags
}

const VALUED_FLAGS: &[&str] = &[
    "--dataset-dir",
    "--iterations",
    "--warmup",
    "--dataset",
    "--library",
];

// "--warmup" -> ("--warmup", None), "--warmup=3" -> ("--warmup", Some("3"))
fn split_valued_flag(token: &str) -> Option<(&'static str, Option<&str>)> {
    VALUED_FLAGS.iter().find_map(|&name| {
        if token == name {
            Some((name, None))
        } else {
            token
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('='))
                .map(|value| (name, Some(value)))
        }
    })
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: String) {
    match name {
        "--dataset-dir" => flags.dataset_dir = Some(PathBuf::from(value)),
        "--iterations" => flags.iterations = value.parse().ok().or(flags.iterations),
        "--warmup" => flags.warmup = value.parse().ok().or(flags.warmup),
        "--dataset" => flags.datasets.push(value),
        "--library" => flags.libraries.push(value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = tokens(&[
            "mdbench",
            "--json",
            "--iterations",
            "25",
            "--warmup=4",
            "--dataset",
            "small",
            "--dataset=large",
            "--library",
            "comrak",
            "--dataset-dir",
            "fixtures",
            "--list",
        ]);
        let flags = parse_flag_tokens(&args);
        assert!(flags.json);
        assert!(!flags.perf);
        assert_eq!(flags.iterations, Some(25));
        assert_eq!(flags.warmup, Some(4));
        assert_eq!(flags.datasets, vec!["small", "large"]);
        assert_eq!(flags.libraries, vec!["comrak"]);
        assert_eq!(flags.dataset_dir, Some(PathBuf::from("fixtures")));
    }

    #[test]
    fn test_dataset_dir_prefix_is_not_confused_with_dataset() {
        let flags = parse_flag_tokens(&tokens(&["--dataset-dir=data", "--dataset=medium"]));
        assert_eq!(flags.dataset_dir, Some(PathBuf::from("data")));
        assert_eq!(flags.datasets, vec!["medium"]);
    }

    #[test]
    fn test_invalid_number_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--iterations", "lots", "--perf"]));
        assert_eq!(flags.iterations, None);
        assert!(flags.perf);
    }

    #[test]
    fn test_trailing_valued_flag_without_value_is_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--json", "--library"]));
        assert!(flags.json);
        assert!(flags.libraries.is_empty());
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            json: true,
            iterations: Some(50),
            datasets: vec!["small".to_string()],
            libraries: vec!["comrak".to_string()],
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            perf: true,
            iterations: Some(5),
            datasets: vec!["massive".to_string()],
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.json);
        assert!(merged.perf);
        assert_eq!(merged.iterations, Some(5));
        assert_eq!(merged.datasets, vec!["massive"]);
        assert_eq!(merged.libraries, vec!["comrak"]);
    }

    #[test]
    fn test_benchmark_options_fall_back_to_defaults() {
        let flags = ConfigFlags {
            warmup: Some(0),
            ..ConfigFlags::default()
        };
        let options = flags.benchmark_options();
        assert_eq!(options.iterations, BenchmarkOptions::default().iterations);
        assert_eq!(options.warmup, 0);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".mdbenchrc");
        let flags = ConfigFlags {
            dataset_dir: Some(PathBuf::from("fixtures")),
            iterations: Some(20),
            warmup: Some(1),
            datasets: vec!["small".to_string(), "medium".to_string()],
            libraries: vec!["pulldown-cmark".to_string()],
            json: true,
            perf: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let flags = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(flags, ConfigFlags::default());
    }
}
