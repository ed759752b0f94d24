// btbphylo-core/src/domain/reconcile/consistify.rs

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::table::{CVL_REF, SAMPLE_NAME, SUBMISSION, Table};

/// Keys each dataset is missing relative to the other two.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MissingSamples {
    pub wgs: BTreeSet<String>,
    pub cattle: BTreeSet<String>,
    pub movement: BTreeSet<String>,
}

impl MissingSamples {
    /// True when some dataset lacks `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.wgs.contains(key) || self.cattle.contains(key) || self.movement.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.wgs.is_empty() && self.cattle.is_empty() && self.movement.is_empty()
    }
}

/// Three row-subsets sharing one key set, plus what each input was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub wgs: Table,
    pub cattle: Table,
    pub movement: Table,
    pub missing: MissingSamples,
}

/// Restricts WGS (`Submission`), cattle (`CVLRef`) and movement (`SampleName`)
/// to the keys present in all three. Duplicate rows within a table are kept.
///
/// A dataset's missing set is the union of the other two key sets minus its own.
#[instrument(level = "debug", skip_all)]
pub fn consistify(
    wgs: &Table,
    cattle: &Table,
    movement: &Table,
) -> Result<Reconciliation, DomainError> {
    let wgs_keys = wgs.key_set(SUBMISSION)?;
    let cattle_keys = cattle.key_set(CVL_REF)?;
    let movement_keys = movement.key_set(SAMPLE_NAME)?;

    let shared: BTreeSet<String> = wgs_keys
        .iter()
        .filter(|k| cattle_keys.contains(*k) && movement_keys.contains(*k))
        .cloned()
        .collect();

    let missing_from = |own: &BTreeSet<String>, a: &BTreeSet<String>, b: &BTreeSet<String>| {
        a.union(b)
            .filter(|k| !own.contains(*k))
            .cloned()
            .collect::<BTreeSet<String>>()
    };
    let missing = MissingSamples {
        wgs: missing_from(&wgs_keys, &cattle_keys, &movement_keys),
        cattle: missing_from(&cattle_keys, &wgs_keys, &movement_keys),
        movement: missing_from(&movement_keys, &wgs_keys, &cattle_keys),
    };

    info!(
        shared = shared.len(),
        missing_wgs = missing.wgs.len(),
        missing_cattle = missing.cattle.len(),
        missing_movement = missing.movement.len(),
        "datasets consistified"
    );

    Ok(Reconciliation {
        wgs: wgs.retain_keys(SUBMISSION, &shared)?,
        cattle: cattle.retain_keys(CVL_REF, &shared)?,
        movement: movement.retain_keys(SAMPLE_NAME, &shared)?,
        missing,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::table::Column;
    use anyhow::Result;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn fixtures() -> Result<(Table, Table, Table)> {
        let wgs = Table::new(vec![Column::categorical("Submission", ["A", "B", "C", "D"])])?;
        let cattle = Table::new(vec![
            Column::categorical("CVLRef", ["B", "C", "D"]),
            Column::categorical("clade", ["x", "y", "z"]),
        ])?;
        let movement = Table::new(vec![Column::categorical(
            "SampleName",
            ["C", "C", "D", "D", "D", "E"],
        )])?;
        Ok((wgs, cattle, movement))
    }

    #[test]
    fn test_consistify_intersection_and_missing_sets() -> Result<()> {
        let (wgs, cattle, movement) = fixtures()?;
        let out = consistify(&wgs, &cattle, &movement)?;
        assert_eq!(out.wgs.key_set(SUBMISSION)?, set(&["C", "D"]));
        assert_eq!(out.cattle.key_set(CVL_REF)?, set(&["C", "D"]));
        assert_eq!(out.movement.key_set(SAMPLE_NAME)?, set(&["C", "D"]));
        assert_eq!(out.movement.n_rows(), 5);
        assert_eq!(out.missing.wgs, set(&["E"]));
        assert_eq!(out.missing.cattle, set(&["A", "E"]));
        assert_eq!(out.missing.movement, set(&["A", "B"]));
        Ok(())
    }

    #[test]
    fn test_consistify_is_idempotent() -> Result<()> {
        let (wgs, cattle, movement) = fixtures()?;
        let once = consistify(&wgs, &cattle, &movement)?;
        let twice = consistify(&once.wgs, &once.cattle, &once.movement)?;
        assert_eq!(once.wgs, twice.wgs);
        assert_eq!(once.cattle, twice.cattle);
        assert_eq!(once.movement, twice.movement);
        assert!(twice.missing.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_rows_are_kept() -> Result<()> {
        let (wgs, cattle, _) = fixtures()?;
        let movement = Table::new(vec![Column::categorical("SampleName", ["C", "C", "D"])])?;
        let out = consistify(&wgs, &cattle, &movement)?;
        assert_eq!(out.movement.n_rows(), 3);
        Ok(())
    }

    #[test]
    fn test_missing_key_column() -> Result<()> {
        let (wgs, cattle, _) = fixtures()?;
        let movement = Table::new(vec![Column::categorical("Sample", ["C"])])?;
        assert!(matches!(
            consistify(&wgs, &cattle, &movement),
            Err(DomainError::UnknownColumn { .. })
        ));
        Ok(())
    }
}
