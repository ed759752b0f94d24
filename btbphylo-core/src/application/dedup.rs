// btbphylo-core/src/application/dedup.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::domain::dedup::{TieBreak, resolve_duplicates};
use crate::domain::metadata::RunMetadata;
use crate::domain::samples::ensure_submission_column;
use crate::domain::table::{Table, TableSchema};
use crate::error::PhyloError;
use crate::ports::dataset::DatasetSource;

#[instrument(skip(source, rules), fields(rules = rules.len()))]
pub fn de_duplicate(
    source: &dyn DatasetSource,
    input: &Path,
    output: &Path,
    rules: &[TieBreak],
) -> Result<(RunMetadata, Table), PhyloError> {
    let table = ensure_submission_column(source.load(input, &TableSchema::wgs())?)?;
    let deduped = resolve_duplicates(&table, rules)?;
    source.save(output, &deduped)?;
    info!(
        before = table.n_rows(),
        after = deduped.n_rows(),
        "duplicates removed"
    );

    let mut metadata = RunMetadata::new();
    metadata.record("number_of_wgs_samples_before_deduplication", table.n_rows());
    metadata.record("number_of_deduplicated_samples", deduped.n_rows());
    metadata.record(
        "dedup_rules",
        rules.iter().map(ToString::to_string).collect::<Vec<_>>(),
    );
    Ok((metadata, deduped))
}
