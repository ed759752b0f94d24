// btbphylo/src/commands/filter.rs
//
// USE CASE: Filter the WGS summary on quality criteria.

use anyhow::Context;
use std::path::PathBuf;

use btbphylo_core::application::filter_samples;
use btbphylo_core::infrastructure::adapters::CsvDatasets;
use btbphylo_core::infrastructure::config::resolve_filter_spec;

use super::{load_project, record_metadata};
use crate::cli::FilterArgs;

pub fn execute(
    project_dir: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    filters: FilterArgs,
    allow_wipe_out: bool,
) -> anyhow::Result<()> {
    let (config, layout) = load_project(&project_dir)?;

    let inline = filters.inline_spec()?;
    let spec = if inline.is_empty() && filters.config.is_none() {
        // Nothing on the command line: fall back to the project's global filter.
        config.filter_spec()?
    } else {
        resolve_filter_spec(inline, filters.config.as_deref())?
    };

    let input = input.unwrap_or_else(|| config.resolve(&project_dir, &config.summary_path));
    let output = output.unwrap_or_else(|| layout.passed_samples());
    println!("🔎 Filtering {} with {} criteria...", input.display(), spec.len());

    let result = filter_samples(&CsvDatasets, &input, &output, &spec, allow_wipe_out);
    if matches!(&result, Err(e) if e.is_insufficient_samples()) {
        println!("💡 Re-run with --allow-wipe-out to keep fewer than two samples");
    }
    let (metadata, passed) =
        result.with_context(|| format!("Failed to filter {}", input.display()))?;

    println!(
        "✨ {} samples passed, saved to {}",
        passed.n_rows(),
        output.display()
    );
    record_metadata(&layout, metadata)
}
