// btbphylo-core/src/application/consistify.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::application::layout::ResultsLayout;
use crate::domain::metadata::RunMetadata;
use crate::domain::reconcile::{ProcessedDatasets, process};
use crate::domain::table::{Table, TableSchema};
use crate::error::PhyloError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::dataset::DatasetSource;

/// Input table locations for a reconciliation run.
#[derive(Debug, Clone, Copy)]
pub struct DatasetPaths<'a> {
    pub wgs: &'a Path,
    pub cattle: &'a Path,
    pub movement: &'a Path,
}

/// Saves the reconciled tables and missing sets under `layout`.
pub fn save_processed(
    source: &dyn DatasetSource,
    layout: &ResultsLayout,
    processed: &ProcessedDatasets,
) -> Result<(), PhyloError> {
    source.save(&layout.consistified_wgs(), &processed.wgs)?;
    source.save(&layout.consistified_cattle(), &processed.cattle)?;
    source.save(&layout.consistified_movement(), &processed.movement)?;
    layout.save_missing(source, &processed.missing)
}

pub fn processed_metadata(processed: &ProcessedDatasets) -> Result<RunMetadata, PhyloError> {
    let mut metadata = RunMetadata::new();
    metadata
        .record_all(&processed.metadata)
        .map_err(InfrastructureError::from)?;
    metadata.record("number_of_missing_wgs", processed.missing.wgs.len());
    metadata.record("number_of_missing_cattle", processed.missing.cattle.len());
    metadata.record("number_of_missing_movement", processed.missing.movement.len());
    Ok(metadata)
}

pub(crate) fn load_cattle_and_movement(
    source: &dyn DatasetSource,
    cattle: &Path,
    movement: &Path,
) -> Result<(Table, Table), PhyloError> {
    Ok((
        source.load(cattle, &TableSchema::cattle())?,
        source.load(movement, &TableSchema::movement())?,
    ))
}

/// Reconciles WGS, cattle and movement tables on their shared sample keys.
#[instrument(skip_all, fields(wgs = ?paths.wgs))]
pub fn consistify_datasets(
    source: &dyn DatasetSource,
    paths: DatasetPaths<'_>,
    layout: &ResultsLayout,
) -> Result<(RunMetadata, ProcessedDatasets), PhyloError> {
    let wgs = source.load(paths.wgs, &TableSchema::wgs())?;
    let (cattle, movement) = load_cattle_and_movement(source, paths.cattle, paths.movement)?;
    let processed = process(&wgs, &cattle, &movement)?;
    save_processed(source, layout, &processed)?;
    info!(
        wgs = processed.wgs.n_rows(),
        missing = processed.missing.wgs.len()
            + processed.missing.cattle.len()
            + processed.missing.movement.len(),
        "datasets consistified"
    );
    Ok((processed_metadata(&processed)?, processed))
}
