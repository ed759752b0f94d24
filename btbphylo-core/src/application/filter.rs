// btbphylo-core/src/application/filter.rs

use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::filter::{FilterSpec, filter};
use crate::domain::metadata::RunMetadata;
use crate::domain::samples::ensure_submission_column;
use crate::domain::table::{Table, TableSchema};
use crate::error::PhyloError;
use crate::ports::dataset::DatasetSource;

/// Filters the WGS table at `input` and saves the survivors to `output`.
#[instrument(skip(source, spec), fields(constraints = spec.len()))]
pub fn filter_samples(
    source: &dyn DatasetSource,
    input: &Path,
    output: &Path,
    spec: &FilterSpec,
    allow_wipe_out: bool,
) -> Result<(RunMetadata, Table), PhyloError> {
    let table = ensure_submission_column(source.load(input, &TableSchema::wgs())?)?;
    let outcome = filter(&table, spec, allow_wipe_out)?;
    source.save(output, &outcome.passed)?;
    info!(
        total = table.n_rows(),
        passed = outcome.passed.n_rows(),
        "samples filtered"
    );

    let mut metadata = RunMetadata::new();
    metadata.record("total_number_of_wgs_samples", table.n_rows());
    metadata.record("number_of_passed_samples", outcome.passed.n_rows());
    metadata.record(
        "filters",
        JsonValue::Object(spec.to_config().into_iter().collect()),
    );
    Ok((metadata, outcome.passed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::testing::MemoryDatasets;
    use crate::domain::error::DomainError;
    use crate::domain::table::{Column, SUBMISSION};
    use anyhow::Result;

    fn summary() -> Result<Table> {
        Ok(Table::new(vec![
            Column::categorical("Sample", ["AF-1-1111-1", "AF-2-2222-2", "AF-3-3333-3"]),
            Column::categorical("Submission", ["A", "B", "C"]),
            Column::categorical("Outcome", ["Pass", "Pass", "Pass"]),
            Column::numeric("pcMapped", [95.0, 80.0, 99.0]),
        ])?)
    }

    #[test]
    fn test_filter_saves_survivors() -> Result<()> {
        let source = MemoryDatasets::default().with("/in.csv", summary()?);
        let spec = FilterSpec::new().range("pcMapped", 90.0, 100.0);
        let (metadata, passed) =
            filter_samples(&source, Path::new("/in.csv"), Path::new("/out.csv"), &spec, false)?;

        assert_eq!(passed.keys(SUBMISSION)?, vec![Some("A"), Some("C")]);
        assert_eq!(source.get("/out.csv"), Some(passed));
        assert_eq!(metadata.get("number_of_passed_samples"), Some(&2.into()));
        assert_eq!(
            metadata.get("filters"),
            Some(&serde_json::json!({ "pcMapped": [90.0, 100.0] }))
        );
        Ok(())
    }

    #[test]
    fn test_wiped_out_filter_writes_nothing() -> Result<()> {
        let source = MemoryDatasets::default().with("/in.csv", summary()?);
        let spec = FilterSpec::new().range("pcMapped", 96.0, 100.0);
        let err = filter_samples(&source, Path::new("/in.csv"), Path::new("/out.csv"), &spec, false)
            .unwrap_err();

        assert!(matches!(
            err,
            PhyloError::Domain(DomainError::InsufficientSamples { passed: 1 })
        ));
        assert!(source.get("/out.csv").is_none());
        Ok(())
    }
}
