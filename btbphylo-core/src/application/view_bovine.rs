// btbphylo-core/src/application/view_bovine.rs

use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::application::consistify::{load_cattle_and_movement, processed_metadata, save_processed};
use crate::application::layout::ResultsLayout;
use crate::application::report::write_report;
use crate::domain::dedup::resolve_duplicates;
use crate::domain::error::DomainError;
use crate::domain::filter::{FilterSpec, filter};
use crate::domain::metadata::RunMetadata;
use crate::domain::project::PipelineConfig;
use crate::domain::reconcile::process;
use crate::domain::report::EartagSource;
use crate::domain::samples::ensure_submission_column;
use crate::domain::table::{GROUP, N_COUNT, Table, TableSchema};
use crate::domain::thresholds::CladeThresholds;
use crate::error::PhyloError;
use crate::ports::dataset::DatasetSource;

/// Result of the per-clade filter passes, in clade order.
#[derive(Debug, Default)]
pub struct CladePasses {
    pub passes: Vec<Table>,
    pub skipped: Vec<String>,
}

/// Filters `base` once per clade with `global` plus `group == clade` and
/// `Ncount <= maxN`. Up to `concurrency` passes run at once on blocking tasks.
///
/// A clade left with too few samples is skipped; any other error aborts.
pub async fn clade_passes(
    base: Arc<Table>,
    global: &FilterSpec,
    thresholds: &CladeThresholds,
    concurrency: usize,
) -> Result<CladePasses, PhyloError> {
    let tasks = thresholds.iter().enumerate().map(|(order, (clade, max_n))| {
        let base = Arc::clone(&base);
        let spec = global
            .clone()
            .include(GROUP, [clade])
            .at_most(N_COUNT, max_n);
        let clade = clade.to_string();
        async move {
            let joined = tokio::task::spawn_blocking(move || filter(&base, &spec, false)).await;
            (order, clade, joined)
        }
    });

    let mut finished: Vec<_> = futures::stream::iter(tasks)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    finished.sort_by_key(|(order, _, _)| *order);

    let mut out = CladePasses::default();
    for (_, clade, joined) in finished {
        let result = joined
            .map_err(|e| PhyloError::InternalError(format!("clade pass '{clade}' failed: {e}")))?;
        match result {
            Ok(outcome) => {
                for missing in &outcome.warnings {
                    debug!(clade = %clade, "{missing}");
                }
                debug!(clade = %clade, passed = outcome.passed.n_rows(), "clade pass done");
                out.passes.push(outcome.passed);
            }
            Err(DomainError::InsufficientSamples { passed }) => {
                warn!(clade = %clade, passed, "too few samples, clade skipped");
                out.skipped.push(clade);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}

/// Runs the full cattle and movement pipeline for a project.
///
/// Summary → de-duplicate → per-clade filter → consistify → report. Inputs,
/// including the eartag columns, are checked before anything is written. Every
/// intermediate table is saved under the results directory and the counts are
/// merged into the metadata log, which is returned.
#[instrument(skip(source, config), fields(project = %config.name))]
pub async fn view_bovine(
    source: &dyn DatasetSource,
    project_dir: &Path,
    config: &PipelineConfig,
) -> Result<RunMetadata, PhyloError> {
    let layout = ResultsLayout::from_config(project_dir, config);
    let mut metadata = RunMetadata::new();

    // Every input is loaded and checked before the first output is written.
    let summary = ensure_submission_column(source.load(
        &config.resolve(project_dir, &config.summary_path),
        &TableSchema::wgs(),
    )?)?;
    let thresholds = CladeThresholds::from_table(&source.load(
        &config.resolve(project_dir, &config.clade_info_path),
        &TableSchema::clade_info(),
    )?)?;
    let global = config.filter_spec()?;
    let (cattle, movement) = load_cattle_and_movement(
        source,
        &config.resolve(project_dir, &config.cattle_path),
        &config.resolve(project_dir, &config.movement_path),
    )?;
    let eartags = config.eartags.as_ref().map(|columns| EartagSource {
        cattle: &cattle,
        cattle_column: &columns.cattle_column,
        movement: &movement,
        movement_column: &columns.movement_column,
    });
    if let Some(eartags) = &eartags {
        eartags.validate()?;
    }

    let deduped = resolve_duplicates(&summary, &config.dedup)?;
    source.save(&layout.deduped_wgs(), &deduped)?;
    metadata.record("total_number_of_wgs_samples", summary.n_rows());
    metadata.record("number_of_deduplicated_samples", deduped.n_rows());
    info!(samples = deduped.n_rows(), "summary de-duplicated");

    let base = Arc::new(deduped);
    let CladePasses { passes, skipped } =
        clade_passes(Arc::clone(&base), &global, &thresholds, config.concurrency).await?;
    let passed = if passes.is_empty() {
        base.empty_like()
    } else {
        Table::concat(&passes)?
    };
    source.save(&layout.passed_samples(), &passed)?;
    metadata.record("number_of_passed_samples", passed.n_rows());
    metadata.record("skipped_clades", skipped);
    info!(
        clades = passes.len(),
        samples = passed.n_rows(),
        "clade filters applied"
    );

    let processed = process(&passed, &cattle, &movement)?;
    save_processed(source, &layout, &processed)?;
    metadata.merge(processed_metadata(&processed)?);

    let (report_metadata, _) = write_report(
        source,
        &layout,
        &base,
        &processed.wgs,
        &processed.missing,
        &thresholds,
        eartags,
    )?;
    metadata.merge(report_metadata);

    layout.record_metadata(metadata)
}
