// btbphylo/src/commands/consistify.rs
//
// USE CASE: Restrict WGS, cattle and movement data to shared samples.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::{DatasetPaths, consistify_datasets};
use btbphylo_core::infrastructure::adapters::CsvDatasets;

use super::{load_project, record_metadata};

pub fn execute(project_dir: PathBuf, wgs: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, layout) = load_project(&project_dir)?;
    let wgs = wgs.unwrap_or_else(|| layout.passed_samples());
    let cattle = config.resolve(&project_dir, &config.cattle_path);
    let movement = config.resolve(&project_dir, &config.movement_path);

    println!("🔗 Consistifying {}...", wgs.display());
    let paths = DatasetPaths {
        wgs: &wgs,
        cattle: &cattle,
        movement: &movement,
    };
    let (metadata, processed) = consistify_datasets(&CsvDatasets, paths, &layout)
        .context("Failed to consistify datasets")?;

    println!(
        "✨ {} samples shared by all datasets, results in {}",
        processed.wgs.n_rows(),
        layout.root().display()
    );
    record_metadata(&layout, metadata)
}
