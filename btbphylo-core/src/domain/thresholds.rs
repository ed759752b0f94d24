// btbphylo-core/src/domain/thresholds.rs

use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::table::{CLADE, Column, GROUP, MAX_N, N_COUNT, Table};

pub const DEFAULT_QUANTILE: f64 = 0.85;

/// Clades never given a threshold (non-bTB and mixed assignments).
pub fn default_excluded_clades() -> Vec<String> {
    ["MicPin", "Microti", "Pinnipedii", "bTB", "nonbTB"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Per-clade `Ncount` ceiling (`maxN`), ordered by clade name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CladeThresholds(BTreeMap<String, f64>);

impl CladeThresholds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, clade: impl Into<String>, max_n: f64) {
        self.0.insert(clade.into(), max_n);
    }

    pub fn get(&self, clade: &str) -> Option<f64> {
        self.0.get(clade).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Reads a `clade,maxN` table. Rows with a null cell are skipped.
    pub fn from_table(table: &Table) -> Result<Self, DomainError> {
        let clades = table.categorical(CLADE)?;
        let max_n = table.numeric(MAX_N)?;
        Ok(clades
            .iter()
            .zip(max_n)
            .filter_map(|(c, m)| Some((c.clone()?, (*m)?)))
            .collect())
    }

    pub fn to_table(&self) -> Result<Table, DomainError> {
        Table::new(vec![
            Column::categorical(CLADE, self.0.keys().cloned()),
            Column::numeric(MAX_N, self.0.values().copied()),
        ])
    }
}

impl FromIterator<(String, f64)> for CladeThresholds {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Linear interpolation between closest ranks. `sorted` must be ascending.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let (a, b) = (*sorted.get(lo)?, *sorted.get(hi)?);
    Some(a + (b - a) * (pos - lo as f64))
}

/// Derives `maxN` per WGS `group` as the rounded `q`-quantile of `Ncount`.
///
/// Ties round half to even. Clades in `exclude` and clades without any
/// `Ncount` value get no threshold.
pub fn derive_thresholds(
    table: &Table,
    q: f64,
    exclude: &[String],
) -> Result<CladeThresholds, DomainError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(DomainError::InvalidConstraint {
            column: N_COUNT.to_string(),
            reason: format!("quantile {q} is outside [0, 1]"),
        });
    }
    let groups = table.categorical(GROUP)?;
    let counts = table.numeric(N_COUNT)?;

    let mut by_clade: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (group, count) in groups.iter().zip(counts) {
        if let (Some(group), Some(count)) = (group.as_deref(), count)
            && !exclude.iter().any(|e| e == group)
        {
            by_clade.entry(group).or_default().push(*count);
        }
    }

    let thresholds: CladeThresholds = by_clade
        .into_iter()
        .filter_map(|(clade, mut values)| {
            values.sort_by(f64::total_cmp);
            quantile(&values, q).map(|v| (clade.to_string(), v.round_ties_even()))
        })
        .collect();
    debug!(clades = thresholds.len(), "clade thresholds derived");
    Ok(thresholds)
}
