use std::fs;

use mdbench::dataset::{DatasetError, DatasetLoader, LoaderConfig, SizeCategory};
use mdbench::library::all_libraries;
use mdbench::runner::{BenchmarkOptions, run_suite};

fn write_fixture(dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(format!("{name}.md")), content).unwrap();
}

#[test]
fn test_only_fixtures_on_disk_are_available() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "small", "# Small\n");
    write_fixture(dir.path(), "large", "# Large\n\nbody\n");
    write_fixture(dir.path(), "README", "not a dataset\n");

    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));
    let names = loader
        .available_datasets()
        .iter()
        .map(|info| info.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["small", "large"]);
    assert!(loader.dataset("medium").is_none());
    assert_eq!(loader.dataset("large").unwrap().size, SizeCategory::Large);
}

#[test]
fn test_missing_directory_yields_no_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path().join("nope")));
    assert!(loader.available_datasets().is_empty());
}

#[test]
fn test_load_unknown_dataset_lists_available_names() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "small", "a");
    write_fixture(dir.path(), "medium", "b");

    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));
    let err = loader.load_dataset("nonexistent").unwrap_err();
    assert!(matches!(err, DatasetError::NotFound { .. }));
    let message = err.to_string();
    assert!(message.contains("nonexistent"), "{message}");
    assert!(message.contains("small"), "{message}");
    assert!(message.contains("medium"), "{message}");
}

#[test]
fn test_loaded_content_matches_recorded_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let content = "# Überschrift\n\n- eins\n- zwei\n\n```rust\nfn main() {}\n```\n";
    write_fixture(dir.path(), "small", content);

    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));
    let loaded = loader.load_dataset("small").unwrap();
    assert_eq!(loaded.content, content);
    assert_eq!(loaded.content.chars().count(), loaded.info.characters);
    assert_eq!(loaded.content.len() as u64, loaded.info.bytes);
    assert_eq!(loaded.info.lines, 9);
}

#[test]
fn test_fixture_with_invalid_utf8_is_still_available() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("small.md"), b"# Caf\xe9\n").unwrap();

    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));
    assert_eq!(loader.available_datasets().len(), 1);
    let loaded = loader.load_dataset("small").unwrap();
    assert_eq!(loaded.info.bytes, 7);
    assert_eq!(loaded.content, "# Caf\u{fffd}\n");
    assert_eq!(loaded.content.chars().count(), loaded.info.characters);
}

#[test]
fn test_metadata_is_a_scan_time_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "medium", "short");
    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));

    write_fixture(dir.path(), "medium", "much longer content\n");
    let loaded = loader.load_dataset("medium").unwrap();
    assert_eq!(loaded.content, "much longer content\n");
    assert_eq!(loaded.info.characters, 5);
}

#[test]
fn test_deleted_fixture_surfaces_io_error() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "massive", "gone soon");
    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));

    fs::remove_file(dir.path().join("massive.md")).unwrap();
    let err = loader.load_dataset("massive").unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn test_shipped_fixtures_are_discovered() {
    let loader = DatasetLoader::default();
    assert!(loader.dataset("small").is_some());
    assert!(loader.dataset("medium").is_some());
}

#[test]
fn test_suite_runs_every_library_on_selected_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "small", "# Title\n\nParagraph with **bold**.\n");
    write_fixture(dir.path(), "medium", "# Other\n");
    let loader = DatasetLoader::new(LoaderConfig::with_dataset_dir(dir.path()));

    let results = run_suite(
        &loader,
        &all_libraries(),
        &["small".to_string()],
        BenchmarkOptions {
            iterations: 3,
            warmup: 1,
        },
    )
    .unwrap();

    assert_eq!(results.len(), all_libraries().len());
    for result in &results {
        assert_eq!(result.dataset, "small");
        assert_eq!(result.iterations, 3);
        assert!(result.output_len > 0);
        assert!(result.max_ms >= result.min_ms);
    }
}
