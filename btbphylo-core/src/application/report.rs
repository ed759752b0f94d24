// btbphylo-core/src/application/report.rs

use std::path::Path;
use tracing::instrument;

use crate::application::consistify::load_cattle_and_movement;
use crate::application::layout::ResultsLayout;
use crate::domain::metadata::RunMetadata;
use crate::domain::project::EartagConfig;
use crate::domain::reconcile::MissingSamples;
use crate::domain::report::{EartagSource, report};
use crate::domain::table::{Table, TableSchema};
use crate::domain::thresholds::CladeThresholds;
use crate::error::PhyloError;
use crate::ports::dataset::DatasetSource;

/// Cattle and movement tables to take eartags from, with their column names.
#[derive(Debug, Clone, Copy)]
pub struct EartagInputs<'a> {
    pub cattle: &'a Path,
    pub movement: &'a Path,
    pub columns: &'a EartagConfig,
}

/// Builds the report from in-memory tables, saves it and counts its rows.
pub(crate) fn write_report(
    source: &dyn DatasetSource,
    layout: &ResultsLayout,
    pre: &Table,
    post: &Table,
    missing: &MissingSamples,
    thresholds: &CladeThresholds,
    eartags: Option<EartagSource<'_>>,
) -> Result<(RunMetadata, Table), PhyloError> {
    let table = report(pre, post, missing, thresholds, eartags.as_ref())?;
    source.save(&layout.report(), &table)?;

    let mut metadata = RunMetadata::new();
    metadata.record("number_of_excluded_samples", table.n_rows());
    Ok((metadata, table))
}

/// Reports the samples of `deduped` that did not reach the consistified WGS
/// table under `layout`, reading the missing sets saved next to it.
#[instrument(skip_all, fields(deduped = ?deduped))]
pub fn exclusion_report(
    source: &dyn DatasetSource,
    layout: &ResultsLayout,
    deduped: &Path,
    clade_info: &Path,
    eartags: Option<EartagInputs<'_>>,
) -> Result<(RunMetadata, Table), PhyloError> {
    let schema = TableSchema::wgs();
    let pre = source.load(deduped, &schema)?;
    let post = source.load(&layout.consistified_wgs(), &schema)?;
    let missing = layout.load_missing(source)?;
    let thresholds =
        CladeThresholds::from_table(&source.load(clade_info, &TableSchema::clade_info())?)?;

    let tables = eartags
        .map(|inputs| load_cattle_and_movement(source, inputs.cattle, inputs.movement))
        .transpose()?;
    let lookup = match (&tables, eartags) {
        (Some((cattle, movement)), Some(inputs)) => Some(EartagSource {
            cattle,
            cattle_column: &inputs.columns.cattle_column,
            movement,
            movement_column: &inputs.columns.movement_column,
        }),
        _ => None,
    };

    write_report(source, layout, &pre, &post, &missing, &thresholds, lookup)
}
