// btbphylo-core/src/application/thresholds.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::domain::dedup::{TieBreak, resolve_duplicates};
use crate::domain::filter::{FilterSpec, filter};
use crate::domain::metadata::RunMetadata;
use crate::domain::samples::ensure_submission_column;
use crate::domain::table::TableSchema;
use crate::domain::thresholds::{CladeThresholds, derive_thresholds};
use crate::error::PhyloError;
use crate::ports::dataset::DatasetSource;

/// Derives per-clade `maxN` from passing, de-duplicated samples and saves the
/// `clade,maxN` table to `output`.
#[instrument(skip(source, rules, exclude))]
pub fn clade_thresholds(
    source: &dyn DatasetSource,
    summary: &Path,
    output: &Path,
    rules: &[TieBreak],
    quantile: f64,
    exclude: &[String],
) -> Result<(RunMetadata, CladeThresholds), PhyloError> {
    let table = ensure_submission_column(source.load(summary, &TableSchema::wgs())?)?;
    let passed = filter(&table, &FilterSpec::new(), true)?.passed;
    let deduped = resolve_duplicates(&passed, rules)?;
    let thresholds = derive_thresholds(&deduped, quantile, exclude)?;
    source.save(output, &thresholds.to_table()?)?;
    info!(clades = thresholds.len(), "clade thresholds saved");

    let mut metadata = RunMetadata::new();
    metadata.record("number_of_clades", thresholds.len());
    metadata.record("maxN_quantile", quantile);
    Ok((metadata, thresholds))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::testing::MemoryDatasets;
    use crate::domain::dedup::default_rules;
    use crate::domain::table::{Column, Table};
    use anyhow::Result;

    #[test]
    fn test_thresholds_ignore_failed_and_duplicate_samples() -> Result<()> {
        let table = Table::new(vec![
            Column::categorical("Submission", ["A", "A", "B", "C", "D", "E"]),
            Column::categorical("Outcome", ["Pass", "Pass", "Pass", "Pass", "LowQual", "Pass"]),
            Column::categorical("flag", ["BritishbTB"; 6]),
            Column::categorical("group", ["B6-11", "B6-11", "B6-11", "B6-11", "B6-11", "nonbTB"]),
            Column::numeric("pcMapped", [95.0, 99.0, 95.0, 95.0, 95.0, 95.0]),
            Column::numeric("Ncount", [100.0, 2.0, 4.0, 6.0, 500.0, 7.0]),
        ])?;
        let source = MemoryDatasets::default().with("/summary.csv", table);
        let (_, thresholds) = clade_thresholds(
            &source,
            Path::new("/summary.csv"),
            Path::new("/CladeInfo.csv"),
            &default_rules(),
            0.5,
            &["nonbTB".to_string()],
        )?;

        // Medians of [2, 4, 6]; the failed D and the worse copy of A are gone.
        assert_eq!(thresholds.get("B6-11"), Some(4.0));
        assert_eq!(thresholds.get("nonbTB"), None);
        let saved = source.get("/CladeInfo.csv").unwrap();
        assert_eq!(CladeThresholds::from_table(&saved)?, thresholds);
        Ok(())
    }
}
