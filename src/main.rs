//! mdbench - compare markdown parser performance across document sizes.
//!
//! # Usage
//!
//! ```bash
//! mdbench --list
//! mdbench --dataset small --dataset medium --iterations 50
//! mdbench --library comrak --json > results.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use mdbench::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use mdbench::dataset::{DatasetLoader, LoaderConfig};
use mdbench::library::{MarkdownLibrary, all_libraries, library_by_name};
use mdbench::metrics::{TrackingAllocator, format_bytes};
use mdbench::perf;
use mdbench::runner::run_suite;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

/// Compare markdown parser performance across document sizes
#[derive(Parser, Debug)]
#[command(name = "mdbench", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// List the datasets found on disk and exit
    #[arg(long)]
    list: bool,

    /// Directory containing small.md, medium.md, large.md, extraLarge.md, massive.md
    #[arg(long, value_name = "DIR")]
    dataset_dir: Option<PathBuf>,

    /// Dataset to benchmark (repeatable; default: all available)
    #[arg(long = "dataset", value_name = "NAME")]
    datasets: Vec<String>,

    /// Library to benchmark (repeatable; default: all)
    #[arg(long = "library", value_name = "NAME")]
    libraries: Vec<String>,

    /// Timed parses per library and dataset
    #[arg(long, value_name = "N")]
    iterations: Option<usize>,

    /// Untimed warmup parses per library and dataset
    #[arg(long, value_name = "N")]
    warmup: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log phase timings
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn select_libraries(names: &[String]) -> Result<Vec<Box<dyn MarkdownLibrary>>> {
    if names.is_empty() {
        return Ok(all_libraries());
    }
    names
        .iter()
        .map(|name| {
            library_by_name(name).with_context(|| {
                let known = all_libraries()
                    .iter()
                    .map(|library| library.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Unknown library '{name}' (known: {known})")
            })
        })
        .collect()
}

fn list_datasets(loader: &DatasetLoader) {
    if loader.available_datasets().is_empty() {
        println!("No datasets found in {}", loader.dataset_dir().display());
        return;
    }
    for info in loader.available_datasets() {
        println!(
            "{:<11} {:>10} {:>8} lines  {}",
            info.name,
            format_bytes(info.bytes as f64),
            info.lines,
            info.description
        );
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);

    let loader = DatasetLoader::new(LoaderConfig {
        dataset_dir: effective.dataset_dir.clone(),
    });

    if cli.list {
        list_datasets(&loader);
        return Ok(());
    }

    let libraries = select_libraries(&effective.libraries)?;
    let results = run_suite(
        &loader,
        &libraries,
        &effective.datasets,
        effective.benchmark_options(),
    )
    .context("Benchmark failed")?;

    if effective.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No datasets found in {}", loader.dataset_dir().display());
    } else {
        for result in &results {
            println!("{}", result.summary());
        }
    }
    Ok(())
}
