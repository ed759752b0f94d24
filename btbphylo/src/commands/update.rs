// btbphylo/src/commands/update.rs
//
// USE CASE: Append new sequencing batches to the WGS summary.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::{discover_batches, update_samples};
use btbphylo_core::infrastructure::adapters::CsvDatasets;

use super::{load_project, record_metadata};

pub fn execute(project_dir: PathBuf, batches: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, layout) = load_project(&project_dir)?;
    let batches_dir = match (batches, &config.batches_path) {
        (Some(dir), _) => dir,
        (None, Some(rel)) => config.resolve(&project_dir, rel),
        (None, None) => anyhow::bail!(
            "❌ No batches directory given.\n👉 Pass --batches or set 'batches-path' in btbphylo.yaml"
        ),
    };

    println!("📥 Scanning batches in {}...", batches_dir.display());
    let found = discover_batches(&batches_dir)
        .with_context(|| format!("Failed to scan {}", batches_dir.display()))?;
    println!("   Found {} batch summaries.", found.len());

    let summary_path = config.resolve(&project_dir, &config.summary_path);
    let (metadata, _) = update_samples(&CsvDatasets, &summary_path, &found)
        .with_context(|| format!("Failed to update {}", summary_path.display()))?;

    println!("✨ Summary updated at {}", summary_path.display());
    record_metadata(&layout, metadata)
}
