// btbphylo/src/commands/report.rs
//
// USE CASE: Report samples excluded from the final dataset.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::{EartagInputs, exclusion_report};
use btbphylo_core::infrastructure::adapters::CsvDatasets;

use super::{load_project, record_metadata};

pub fn execute(project_dir: PathBuf, deduped: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, layout) = load_project(&project_dir)?;
    let deduped = deduped.unwrap_or_else(|| layout.deduped_wgs());
    let clade_info = config.resolve(&project_dir, &config.clade_info_path);
    let cattle = config.resolve(&project_dir, &config.cattle_path);
    let movement = config.resolve(&project_dir, &config.movement_path);
    let eartags = config.eartags.as_ref().map(|columns| EartagInputs {
        cattle: &cattle,
        movement: &movement,
        columns,
    });

    println!("📋 Building exclusion report...");
    let (metadata, report) =
        exclusion_report(&CsvDatasets, &layout, &deduped, &clade_info, eartags)
            .context("Failed to build the exclusion report")?;

    println!(
        "✨ {} excluded samples listed in {}",
        report.n_rows(),
        layout.report().display()
    );
    record_metadata(&layout, metadata)
}
