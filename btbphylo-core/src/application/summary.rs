// btbphylo-core/src/application/summary.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::domain::error::DomainError;
use crate::domain::metadata::RunMetadata;
use crate::domain::samples::{add_submission_column, ensure_submission_column};
use crate::domain::table::{Column, ColumnData, RESULT_LOC, Table, TableSchema};
use crate::error::PhyloError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::dataset::DatasetSource;

/// File name fragment of per-batch sample summaries.
pub const FINAL_OUT_MARKER: &str = "FinalOut";

/// Finds `*FinalOut*.csv` files under `batches_dir`, sorted by path.
pub fn discover_batches(batches_dir: &Path) -> Result<Vec<PathBuf>, PhyloError> {
    if !batches_dir.is_dir() {
        return Err(InfrastructureError::NotFound(batches_dir.to_path_buf()).into());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(batches_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| InfrastructureError::Io(std::io::Error::other(e)))?;
        let path = entry.path();
        let is_summary = entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "csv")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(FINAL_OUT_MARKER));
        if is_summary {
            found.push(path.to_path_buf());
        }
    }
    debug!(batches = found.len(), dir = ?batches_dir, "batch summaries discovered");
    Ok(found)
}

/// A null or absent `ResultLoc` defaults to the batch directory.
fn with_result_loc(batch: Table, path: &Path) -> Result<Table, DomainError> {
    let fallback = path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let values: Vec<Option<String>> = if batch.has_column(RESULT_LOC) {
        batch
            .categorical(RESULT_LOC)?
            .iter()
            .map(|v| Some(v.clone().unwrap_or_else(|| fallback.clone())))
            .collect()
    } else {
        vec![Some(fallback); batch.n_rows()]
    };
    batch.with_column(Column::new(RESULT_LOC, ColumnData::Categorical(values)))
}

/// Appends new batch summaries to the WGS summary table and saves it.
///
/// A batch is skipped when any of its `ResultLoc` values is already present in
/// the summary. A missing summary starts empty. Columns outside the WGS schema
/// are kept from either side and null-filled where absent.
#[instrument(skip(source, batches), fields(batches = batches.len()))]
pub fn update_samples(
    source: &dyn DatasetSource,
    summary_path: &Path,
    batches: &[PathBuf],
) -> Result<(RunMetadata, Table), PhyloError> {
    let schema = TableSchema::wgs();
    let summary = if source.exists(summary_path) {
        schema.conform(&ensure_submission_column(source.load(summary_path, &schema)?)?)?
    } else {
        info!(path = ?summary_path, "no summary yet, starting empty");
        schema.empty_table()
    };

    let mut known: BTreeSet<String> = summary.key_set(RESULT_LOC)?;
    let mut tables = vec![summary];
    let mut new_batches = 0usize;
    let mut new_samples = 0usize;

    for path in batches {
        let batch = with_result_loc(source.load(path, &schema)?, path)?;
        let locations = batch.key_set(RESULT_LOC)?;
        if locations.iter().any(|loc| known.contains(loc)) {
            debug!(batch = ?path, "batch already in summary");
            continue;
        }
        let batch = schema.conform(&add_submission_column(&batch)?)?;
        new_batches += 1;
        new_samples += batch.n_rows();
        known.extend(locations);
        tables.push(batch);
    }

    let updated = Table::concat_union(&tables)?;
    source.save(summary_path, &updated)?;
    info!(new_batches, new_samples, total = updated.n_rows(), "summary updated");

    let mut metadata = RunMetadata::new();
    metadata.record("number_of_new_batches", new_batches);
    metadata.record("number_of_new_wgs_samples", new_samples);
    metadata.record("total_number_of_wgs_samples", updated.n_rows());
    Ok((metadata, updated))
}
