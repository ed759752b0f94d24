// btbphylo/src/commands/view_bovine.rs
//
// USE CASE: Run the full cattle and movement pipeline.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::view_bovine;
use btbphylo_core::infrastructure::adapters::CsvDatasets;

use super::{load_project, print_metadata};

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let (config, layout) = load_project(&project_dir)?;

    println!("🐄 Running view-bovine pipeline...");
    let metadata = view_bovine(&CsvDatasets, &project_dir, &config)
        .await
        .context("💥 view-bovine pipeline failed")?;

    print_metadata(&metadata);
    println!(
        "\n✨ SUCCESS! Results in {} ({:.2?})",
        layout.root().display(),
        start.elapsed()
    );
    Ok(())
}
