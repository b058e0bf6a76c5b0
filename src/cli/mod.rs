//! Command-line interface for the nozzle finder.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::MatchingConfig;
use crate::core::loaders::{load_label_groups, LabelGroups};
use crate::core::writers::{output_file_name, write_index_list};
use crate::processors::RunReport;
use crate::report;
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "nozzle-finder")]
#[command(about = "Map labelled strip measurements onto flaw nozzle indices", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute flaw nozzle indices from a CSV file and export them
    Find {
        /// Input CSV file with Label, X, Y columns
        csv_path: PathBuf,
        /// Machine identifier suffix for the output filename (e.g. 04)
        #[arg(short, long)]
        machine: Option<String>,
        /// Total nozzle count
        #[arg(long)]
        nozzles: Option<usize>,
        /// Tolerance in nozzle steps for matching
        #[arg(long)]
        tolerance: Option<f64>,
        /// Output directory (defaults to the CSV file's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Compute and report without writing the output file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show orientation, grid and per-point matches for each label
    Inspect {
        /// Input CSV file with Label, X, Y columns
        csv_path: PathBuf,
        /// Total nozzle count
        #[arg(long)]
        nozzles: Option<usize>,
        /// Tolerance in nozzle steps for matching
        #[arg(long)]
        tolerance: Option<f64>,
        /// Only show this label
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Write the default configuration to a YAML file
    InitConfig {
        /// Destination YAML file
        path: PathBuf,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            let head: String = value.chars().take(36).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Apply command-line overrides on top of the configured grid parameters.
fn effective_matching(
    config: &PipelineConfig,
    nozzles: Option<usize>,
    tolerance: Option<f64>,
) -> MatchingConfig {
    let matching = MatchingConfig {
        nozzle_count: nozzles.unwrap_or(config.matching.nozzle_count),
        tolerance: tolerance.unwrap_or(config.matching.tolerance),
    };
    if matching.nozzle_count < 2 {
        warn!(
            "Nozzle count {} leaves no interior nozzles; no indices will be matched",
            matching.nozzle_count
        );
    }
    if matching.tolerance <= 0.0 {
        warn!(
            "Tolerance {} rejects every point; use a positive value",
            matching.tolerance
        );
    }
    matching
}

fn load_with_spinner(csv_path: &Path) -> Result<LabelGroups> {
    let spinner = create_spinner("Loading measurements...");
    let groups = load_label_groups(csv_path);
    spinner.finish_and_clear();
    groups.with_context(|| format!("failed to load {}", csv_path.display()))
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    let result = match cli.command {
        Commands::Find {
            csv_path,
            machine,
            nozzles,
            tolerance,
            output_dir,
            dry_run,
        } => cmd_find(
            &csv_path, machine, nozzles, tolerance, output_dir, dry_run, &config,
        ),
        Commands::Inspect {
            csv_path,
            nozzles,
            tolerance,
            label,
        } => cmd_inspect(&csv_path, nozzles, tolerance, label.as_deref(), &config),
        Commands::InitConfig { path } => cmd_init_config(&path, &config),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn cmd_find(
    csv_path: &Path,
    machine: Option<String>,
    nozzles: Option<usize>,
    tolerance: Option<f64>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
    config: &PipelineConfig,
) -> Result<()> {
    let start = Instant::now();
    let matching = effective_matching(config, nozzles, tolerance);

    println!("Selected file: {}", csv_path.display());

    let groups = load_with_spinner(csv_path)?;
    if groups.is_empty() {
        println!("No data loaded. Exiting.");
        return Ok(());
    }

    println!("Labels found and point counts:");
    for line in report::point_count_lines(&groups) {
        println!("{}", line);
    }

    let run = RunReport::build(&groups, matching.nozzle_count, matching.tolerance);
    for line in report::summary_lines(&run) {
        println!("{}", line);
    }
    for warning in run.warnings() {
        warn!("{}", warning);
    }

    let machine = machine
        .or_else(|| config.export.machine.clone())
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    let output_path = if dry_run {
        println!("DRY RUN: no file will be written");
        None
    } else if let Some(machine) = machine {
        let dir = output_dir.unwrap_or_else(|| match csv_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        });
        let name = output_file_name(
            &config.export.file_prefix,
            Local::now().date_naive(),
            &config.export.model_tag,
            &machine,
        );
        let path = dir.join(name);
        write_index_list(&path, &run.combined, config.export.index_offset)
            .with_context(|| format!("failed to export {}", path.display()))?;
        println!("Output written to: {}", path.display());
        Some(path)
    } else {
        println!("No machine identifier provided. Skipping export.");
        None
    };

    if run.has_tolerance_misses() {
        println!("Warning: some points were out of range. See details above.");
    }

    print_summary(
        "Nozzle Search Complete",
        &[
            ("Input file", csv_path.display().to_string()),
            ("Labels", run.labels.len().to_string()),
            ("Points", run.total_points().to_string()),
            ("Nozzle count", matching.nozzle_count.to_string()),
            ("Tolerance", matching.tolerance.to_string()),
            ("Unique indices", run.combined.len().to_string()),
            (
                "Output file",
                output_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );

    Ok(())
}

fn cmd_inspect(
    csv_path: &Path,
    nozzles: Option<usize>,
    tolerance: Option<f64>,
    label: Option<&str>,
    config: &PipelineConfig,
) -> Result<()> {
    let matching = effective_matching(config, nozzles, tolerance);
    let groups = load_with_spinner(csv_path)?;

    if let Some(label) = label {
        if !groups.contains_key(label) {
            bail!("label '{}' not found in {}", label, csv_path.display());
        }
    }

    let run = RunReport::build(&groups, matching.nozzle_count, matching.tolerance);
    for result in run
        .labels
        .iter()
        .filter(|r| label.map_or(true, |l| r.label == l))
    {
        for line in report::detail_lines(result) {
            println!("{}", line);
        }
        println!();
    }

    if label.is_none() {
        println!(
            "Combined nozzle list ({} unique): {:?}",
            run.combined.len(),
            run.combined
        );
    }
    Ok(())
}

fn cmd_init_config(path: &Path, config: &PipelineConfig) -> Result<()> {
    config
        .to_yaml(path)
        .map_err(|e| anyhow!("failed to write config to {}: {}", path.display(), e))?;
    println!("Configuration written to: {}", path.display());
    Ok(())
}
