// btbphylo/src/commands/mod.rs

pub mod consistify;
pub mod dedup;
pub mod filter;
pub mod report;
pub mod thresholds;
pub mod update;
pub mod view_bovine;

use anyhow::Context;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::Path;
use tracing::debug;

use btbphylo_core::application::ResultsLayout;
use btbphylo_core::domain::metadata::RunMetadata;
use btbphylo_core::domain::project::PipelineConfig;
use btbphylo_core::infrastructure::config::load_project_config;

/// Loads `btbphylo.yaml` and the results layout it points at.
pub(crate) fn load_project(project_dir: &Path) -> anyhow::Result<(PipelineConfig, ResultsLayout)> {
    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {}", config.name);
    debug!(?config, "configuration resolved");
    let layout = ResultsLayout::from_config(project_dir, &config);
    Ok((config, layout))
}

/// Merges a stage's counters into the metadata log and prints them.
pub(crate) fn record_metadata(layout: &ResultsLayout, metadata: RunMetadata) -> anyhow::Result<()> {
    let stage = metadata.clone();
    layout
        .record_metadata(metadata)
        .with_context(|| format!("Failed to write {}", layout.metadata().display()))?;
    print_metadata(&stage);
    Ok(())
}

pub(crate) fn print_metadata(metadata: &RunMetadata) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);
    for (key, value) in metadata.iter() {
        let value = match value.as_str() {
            Some(text) => text.to_string(),
            None => value.to_string(),
        };
        table.add_row(vec![key.to_string(), value]);
    }
    println!("{table}");
}
