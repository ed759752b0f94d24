// btbphylo-core/src/domain/report/exclusion.rs

use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

use crate::domain::error::DomainError;
use crate::domain::reconcile::MissingSamples;
use crate::domain::thresholds::CladeThresholds;
use crate::domain::table::{
    CVL_REF, Column, ColumnData, FLAG, GROUP, N_COUNT, OUTCOME, PC_MAPPED, SAMPLE_NAME,
    SUBMISSION, Table,
};

/// Minimum `pcMapped` for a sample to pass the mapping check.
pub const MAPPING_THRESHOLD: f64 = 90.0;

pub const PASS: &str = "Pass";
pub const FAIL: &str = "Fail";

pub const WGS_DATA: &str = "wgs_data";
pub const CATTLE_DATA: &str = "cattle_data";
pub const MOVEMENT_DATA: &str = "movement_data";
pub const EARTAG: &str = "eartag";

/// Where to look up eartags. Cattle wins over movement.
#[derive(Debug, Clone, Copy)]
pub struct EartagSource<'a> {
    pub cattle: &'a Table,
    pub cattle_column: &'a str,
    pub movement: &'a Table,
    pub movement_column: &'a str,
}

impl<'a> EartagSource<'a> {
    /// Checks that the key and eartag columns exist and hold text.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (table, key, column) in [
            (self.cattle, CVL_REF, self.cattle_column),
            (self.movement, SAMPLE_NAME, self.movement_column),
        ] {
            table.categorical(key)?;
            table.categorical(column)?;
        }
        Ok(())
    }

    fn lookup(&self) -> Result<HashMap<&'a str, &'a str>, DomainError> {
        let mut tags = first_values(self.movement, SAMPLE_NAME, self.movement_column)?;
        tags.extend(first_values(self.cattle, CVL_REF, self.cattle_column)?);
        Ok(tags)
    }
}

fn first_values<'a>(
    table: &'a Table,
    key: &str,
    column: &str,
) -> Result<HashMap<&'a str, &'a str>, DomainError> {
    let mut out = HashMap::new();
    for (k, v) in table.keys(key)?.into_iter().zip(table.categorical(column)?) {
        if let (Some(k), Some(v)) = (k, v.as_deref()) {
            out.entry(k).or_insert(v);
        }
    }
    Ok(out)
}

fn verdict(pass: bool) -> Option<String> {
    Some(if pass { PASS } else { FAIL }.to_string())
}

/// Rows of `pre` whose `Submission` does not survive into `post`.
pub fn excluded(pre: &Table, post: &Table) -> Result<Table, DomainError> {
    let kept = post.key_set(SUBMISSION)?;
    let mask: Vec<bool> = pre
        .keys(SUBMISSION)?
        .into_iter()
        .map(|k| !k.is_some_and(|k| kept.contains(k)))
        .collect();
    Ok(pre.filter_rows(&mask))
}

/// Pass/Fail per quality metric for each excluded sample.
///
/// Columns: `Submission`, `Outcome`, `flag`, `pcMapped`, `Ncount`. A sample
/// whose clade has no threshold, or whose metric is null, fails that metric.
pub fn exclusion_reasons(
    excluded: &Table,
    thresholds: &CladeThresholds,
) -> Result<Table, DomainError> {
    let pc_mapped: Vec<Option<String>> = excluded
        .numeric(PC_MAPPED)?
        .iter()
        .map(|v| verdict(v.is_some_and(|v| v >= MAPPING_THRESHOLD)))
        .collect();

    let n_count: Vec<Option<String>> = excluded
        .numeric(N_COUNT)?
        .iter()
        .zip(excluded.categorical(GROUP)?)
        .map(|(n, group)| {
            let max_n = group.as_deref().and_then(|g| thresholds.get(g));
            verdict(matches!((n, max_n), (Some(n), Some(max)) if *n <= max))
        })
        .collect();

    Table::new(vec![
        Column::new(SUBMISSION, ColumnData::Categorical(excluded.categorical(SUBMISSION)?.to_vec())),
        Column::new(OUTCOME, ColumnData::Categorical(excluded.categorical(OUTCOME)?.to_vec())),
        Column::new(FLAG, ColumnData::Categorical(excluded.categorical(FLAG)?.to_vec())),
        Column::new(PC_MAPPED, ColumnData::Categorical(pc_mapped)),
        Column::new(N_COUNT, ColumnData::Categorical(n_count)),
    ])
}

/// One row per sample that did not make it into the final dataset.
///
/// Filtered-out samples come first, in `pre` order, with `wgs_data = true`.
/// Every key missing from the WGS data follows, sorted, with null diagnostics
/// and `wgs_data = false`. A key that was filtered out and is also missing from
/// the WGS data appears in both parts. `cattle_data` and `movement_data` are
/// false when the key is in the respective missing set.
#[instrument(skip_all, fields(pre = pre.n_rows(), post = post.n_rows()))]
pub fn report(
    pre: &Table,
    post: &Table,
    missing: &MissingSamples,
    thresholds: &CladeThresholds,
    eartags: Option<&EartagSource<'_>>,
) -> Result<Table, DomainError> {
    let reasons = exclusion_reasons(&excluded(pre, post)?, thresholds)?;
    let synthetic: Vec<&String> = missing.wgs.iter().collect();

    let n_real = reasons.n_rows();
    let mut columns = Vec::with_capacity(9);
    for column in reasons.columns() {
        let mut data = column.data().clone();
        let pad = if column.name() == SUBMISSION {
            ColumnData::Categorical(synthetic.iter().map(|k| Some((*k).clone())).collect())
        } else {
            ColumnData::nulls(column.kind(), synthetic.len())
        };
        data.extend_from(&pad);
        columns.push(Column::new(column.name(), data));
    }

    let keys: Vec<Option<String>> = reasons
        .categorical(SUBMISSION)?
        .iter()
        .cloned()
        .chain(synthetic.iter().map(|k| Some((*k).clone())))
        .collect();
    let present_in = |set: &BTreeSet<String>| -> Vec<bool> {
        keys.iter()
            .map(|k| k.as_ref().is_none_or(|k| !set.contains(k)))
            .collect()
    };

    columns.push(Column::boolean(
        WGS_DATA,
        (0..keys.len()).map(|i| i < n_real),
    ));
    columns.push(Column::boolean(CATTLE_DATA, present_in(&missing.cattle)));
    columns.push(Column::boolean(MOVEMENT_DATA, present_in(&missing.movement)));

    if let Some(source) = eartags {
        let tags = source.lookup()?;
        let values = keys
            .iter()
            .map(|k| {
                k.as_deref()
                    .and_then(|k| tags.get(k))
                    .map(|t| (*t).to_string())
            })
            .collect();
        columns.push(Column::new(EARTAG, ColumnData::Categorical(values)));
    }

    info!(
        excluded = n_real,
        missing_wgs = synthetic.len(),
        "exclusion report built"
    );
    Table::new(columns)
}
