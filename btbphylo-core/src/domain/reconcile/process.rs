// btbphylo-core/src/domain/reconcile/process.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::reconcile::consistify::{MissingSamples, consistify};
use crate::domain::table::{
    CLADE, CVL_REF, Column, ColumnData, GROUP, STAY_LENGTH, SUBMISSION, Table,
};

/// Row counts of the three datasets before and after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsistifyMetadata {
    pub wgs_records_before: usize,
    pub cattle_records_before: usize,
    pub movement_records_before: usize,
    pub wgs_records_after: usize,
    pub cattle_records_after: usize,
    pub movement_records_after: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDatasets {
    pub metadata: ConsistifyMetadata,
    pub wgs: Table,
    pub cattle: Table,
    pub movement: Table,
    pub missing: MissingSamples,
}

/// Overwrites cattle `clade` with the WGS `group` of the same sample.
pub fn clade_correction(wgs: &Table, cattle: &Table) -> Result<Table, DomainError> {
    let mut groups: HashMap<&str, Option<&str>> = HashMap::new();
    for (key, group) in wgs.keys(SUBMISSION)?.into_iter().zip(wgs.categorical(GROUP)?) {
        if let Some(key) = key {
            groups.entry(key).or_insert(group.as_deref());
        }
    }

    let clades = cattle.categorical(CLADE)?;
    let mut unmatched = 0usize;
    let corrected: Vec<Option<String>> = cattle
        .keys(CVL_REF)?
        .into_iter()
        .zip(clades)
        .map(|(key, clade)| match key.and_then(|k| groups.get(k)) {
            Some(group) => group.map(str::to_string),
            None => {
                unmatched += 1;
                clade.clone()
            }
        })
        .collect();
    if unmatched > 0 {
        warn!(unmatched, "cattle rows without a WGS sample keep their clade");
    }

    cattle
        .clone()
        .with_column(Column::new(CLADE, ColumnData::Categorical(corrected)))
}

/// Drops movement rows with no `Stay_Length`.
pub fn fix_movement(movement: &Table) -> Result<Table, DomainError> {
    let stay = movement.require(STAY_LENGTH)?.data();
    let mask: Vec<bool> = (0..movement.n_rows()).map(|r| !stay.is_null(r)).collect();
    Ok(movement.filter_rows(&mask))
}

/// consistify, then clade correction, then movement fix.
#[instrument(skip_all, fields(wgs = wgs.n_rows(), cattle = cattle.n_rows(), movement = movement.n_rows()))]
pub fn process(
    wgs: &Table,
    cattle: &Table,
    movement: &Table,
) -> Result<ProcessedDatasets, DomainError> {
    let reconciled = consistify(wgs, cattle, movement)?;
    let cattle_out = clade_correction(&reconciled.wgs, &reconciled.cattle)?;
    let movement_out = fix_movement(&reconciled.movement)?;

    let metadata = ConsistifyMetadata {
        wgs_records_before: wgs.n_rows(),
        cattle_records_before: cattle.n_rows(),
        movement_records_before: movement.n_rows(),
        wgs_records_after: reconciled.wgs.n_rows(),
        cattle_records_after: cattle_out.n_rows(),
        movement_records_after: movement_out.n_rows(),
    };

    Ok(ProcessedDatasets {
        metadata,
        wgs: reconciled.wgs,
        cattle: cattle_out,
        movement: movement_out,
        missing: reconciled.missing,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_clade_correction() -> Result<()> {
        let wgs = Table::new(vec![
            Column::categorical("Submission", ["A", "B", "C"]),
            Column::categorical("group", ["A", "B", "C"]),
        ])?;
        let cattle = Table::new(vec![
            Column::categorical("CVLRef", ["A", "B", "C"]),
            Column::categorical("clade", ["A", "B", "D"]),
        ])?;
        let out = clade_correction(&wgs, &cattle)?;
        assert_eq!(out.keys("clade")?, vec![Some("A"), Some("B"), Some("C")]);
        assert_eq!(out.column_names(), cattle.column_names());
        Ok(())
    }

    #[test]
    fn test_fix_movement_drops_null_stay_length() -> Result<()> {
        let movement = Table::new(vec![
            Column::categorical("SampleName", ["A", "B", "C"]),
            Column::new(
                "Stay_Length",
                ColumnData::Numeric(vec![Some(3.0), None, Some(0.0)]),
            ),
        ])?;
        let out = fix_movement(&movement)?;
        assert_eq!(out.keys("SampleName")?, vec![Some("A"), Some("C")]);
        Ok(())
    }

    #[test]
    fn test_process_reports_counts() -> Result<()> {
        let wgs = Table::new(vec![
            Column::categorical("Submission", ["A", "B", "C"]),
            Column::categorical("group", ["B6-11", "B6-13", "B6-11"]),
        ])?;
        let cattle = Table::new(vec![
            Column::categorical("CVLRef", ["A", "B", "X"]),
            Column::categorical("clade", ["B1-11", "B6-13", "B6-11"]),
        ])?;
        let movement = Table::new(vec![
            Column::categorical("SampleName", ["A", "A", "B", "C"]),
            Column::new(
                "Stay_Length",
                ColumnData::Numeric(vec![Some(10.0), None, Some(4.0), Some(1.0)]),
            ),
        ])?;
        let out = process(&wgs, &cattle, &movement)?;
        assert_eq!(
            out.metadata,
            ConsistifyMetadata {
                wgs_records_before: 3,
                cattle_records_before: 3,
                movement_records_before: 4,
                wgs_records_after: 2,
                cattle_records_after: 2,
                movement_records_after: 2,
            }
        );
        assert_eq!(out.cattle.keys("clade")?, vec![Some("B6-11"), Some("B6-13")]);
        Ok(())
    }
}
