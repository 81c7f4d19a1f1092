// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Mapped dataset inspection
//!
//! Loads one dataset family and prints row, column and label counts per smell

use anyhow::{bail, Result};
use clap::Parser;
use smell_eval::config::ReportConfig;
use smell_eval::datasets::read_mapped_dataset;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inspect-datasets")]
#[command(about = "Summarize the mapped QC or MLCQ datasets")]
#[command(version)]
struct Args {
    /// Dataset family (QC or MLCQ, case-insensitive)
    #[arg(short, long, default_value = "QC")]
    data: String,

    /// Directory containing the mapped_*.csv files (overrides the config file)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Column whose value distribution is printed per smell
    #[arg(short, long)]
    label_column: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ReportConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.dir {
        config = config.with_mapped_dataset_dir(dir);
    }

    let Some(datasets) = read_mapped_dataset(&config.mapped_dataset_dir, &args.data) else {
        bail!("Failed to load mapped dataset '{}'", args.data);
    };

    println!("\n{} mapped datasets ({} rows total)", datasets.family, datasets.total_rows());
    println!("{:-<50}", "");
    println!("{:<15} {:>10} {:>10}", "Smell", "Rows", "Columns");
    println!("{:-<50}", "");
    for (smell, table) in datasets.iter() {
        println!("{:<15} {:>10} {:>10}", smell.name(), table.len(), table.num_columns());
    }
    println!("{:-<50}", "");

    if let Some(ref column) = args.label_column {
        println!("\nDistribution of '{}':", column);
        for (smell, table) in datasets.iter() {
            match table.value_counts(column) {
                Some(counts) => {
                    let mut counts: Vec<_> = counts.into_iter().collect();
                    counts.sort();
                    let formatted: Vec<String> =
                        counts.iter().map(|(v, n)| format!("{}={}", v, n)).collect();
                    println!("  {}: {}", smell.name(), formatted.join(", "));
                }
                None => tracing::warn!("{} has no column '{}'", smell.name(), column),
            }
        }
    }

    Ok(())
}
