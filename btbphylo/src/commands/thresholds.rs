// btbphylo/src/commands/thresholds.rs
//
// USE CASE: Derive the per-clade maxN table.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::clade_thresholds;
use btbphylo_core::infrastructure::adapters::CsvDatasets;

use super::{load_project, record_metadata};

pub fn execute(
    project_dir: PathBuf,
    output: Option<PathBuf>,
    quantile: Option<f64>,
) -> anyhow::Result<()> {
    let (config, layout) = load_project(&project_dir)?;
    let summary = config.resolve(&project_dir, &config.summary_path);
    let output = output.unwrap_or_else(|| layout.clade_info());
    let quantile = quantile.unwrap_or(config.quantile);

    println!("📏 Deriving maxN at quantile {quantile}...");
    let (metadata, thresholds) = clade_thresholds(
        &CsvDatasets,
        &summary,
        &output,
        &config.dedup,
        quantile,
        &config.exclude_clades,
    )
    .with_context(|| format!("Failed to derive thresholds from {}", summary.display()))?;

    println!(
        "✨ {} clade thresholds saved to {}",
        thresholds.len(),
        output.display()
    );
    record_metadata(&layout, metadata)
}
