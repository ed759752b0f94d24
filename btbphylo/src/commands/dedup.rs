// btbphylo/src/commands/dedup.rs
//
// USE CASE: Keep one row per submission.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::de_duplicate;
use btbphylo_core::domain::dedup::TieBreak;
use btbphylo_core::infrastructure::adapters::CsvDatasets;

use super::{load_project, record_metadata};

pub fn execute(
    project_dir: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    rules: Vec<TieBreak>,
) -> anyhow::Result<()> {
    let (config, layout) = load_project(&project_dir)?;
    let rules = if rules.is_empty() { config.dedup.clone() } else { rules };
    let input = input.unwrap_or_else(|| config.resolve(&project_dir, &config.summary_path));
    let output = output.unwrap_or_else(|| layout.deduped_wgs());

    let listed: Vec<String> = rules.iter().map(ToString::to_string).collect();
    println!("🧬 De-duplicating with rules: {}", listed.join(" > "));

    let (metadata, deduped) = de_duplicate(&CsvDatasets, &input, &output, &rules)
        .with_context(|| format!("Failed to de-duplicate {}", input.display()))?;

    println!(
        "✨ {} unique samples saved to {}",
        deduped.n_rows(),
        output.display()
    );
    record_metadata(&layout, metadata)
}
