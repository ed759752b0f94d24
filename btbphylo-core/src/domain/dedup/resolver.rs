// btbphylo-core/src/domain/dedup/resolver.rs

use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

use crate::domain::dedup::rule::{TieBreak, TieBreakTarget};
use crate::domain::error::DomainError;
use crate::domain::table::{ColumnData, ColumnKind, SUBMISSION, Table};

enum Selector<'a> {
    Extremum {
        values: &'a [Option<f64>],
        max: bool,
    },
    Equals {
        values: &'a [Option<String>],
        target: &'a str,
    },
}

impl<'a> Selector<'a> {
    fn compile(table: &'a Table, rule: &'a TieBreak) -> Result<Self, DomainError> {
        let column = table.require(&rule.column)?;
        let invalid = |reason: &str| DomainError::InvalidRule {
            column: rule.column.clone(),
            target: rule.target.to_string(),
            reason: reason.to_string(),
        };

        match column.data() {
            ColumnData::Numeric(values) => match rule.target {
                TieBreakTarget::Min => Ok(Selector::Extremum { values, max: false }),
                TieBreakTarget::Max => Ok(Selector::Extremum { values, max: true }),
                TieBreakTarget::Equals(_) => Err(invalid(
                    "numeric columns only take 'min' or 'max'",
                )),
            },
            ColumnData::Categorical(values) => {
                let target = rule.target.as_str();
                if !values.iter().flatten().any(|v| v == target) {
                    return Err(invalid("value not present in column"));
                }
                Ok(Selector::Equals { values, target })
            }
            ColumnData::Boolean(_) => Err(DomainError::InvalidColumnType {
                column: rule.column.clone(),
                expected: ColumnKind::Categorical,
                found: ColumnKind::Boolean,
            }),
        }
    }

    /// Marks which of `rows` satisfy the rule within their group.
    fn select(&self, rows: &[usize]) -> Vec<bool> {
        match self {
            Selector::Extremum { values, max } => {
                let pick = |a: f64, b: f64| if *max { a.max(b) } else { a.min(b) };
                let best = rows
                    .iter()
                    .filter_map(|&r| values[r])
                    .reduce(pick);
                rows.iter()
                    .map(|&r| best.is_some() && values[r] == best)
                    .collect()
            }
            Selector::Equals { values, target } => rows
                .iter()
                .map(|&r| values[r].as_deref() == Some(*target))
                .collect(),
        }
    }
}

/// Groups of candidate rows sharing a key, in first-appearance order, keeping
/// only keys that are still duplicated.
fn duplicated_groups(keys: &[Option<&str>], alive: &[bool]) -> Vec<Vec<usize>> {
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (row, key) in keys.iter().enumerate() {
        if !alive[row] {
            continue;
        }
        let slot = *index.entry(*key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }
    groups.retain(|g| g.len() > 1);
    groups
}

/// Keeps one row per `Submission`.
///
/// Rules apply in order. Each narrows the rows of every still-duplicated key
/// to those holding the extremum (numeric) or the literal (categorical); a key
/// with no matching row is left as is. Remaining ties fall back to the first
/// surviving row. Output keeps input order.
#[instrument(level = "debug", skip_all, fields(rows = table.n_rows(), rules = rules.len()))]
pub fn resolve_duplicates(table: &Table, rules: &[TieBreak]) -> Result<Table, DomainError> {
    if rules.is_empty() {
        return Err(DomainError::NoRulesProvided);
    }
    let keys = table.keys(SUBMISSION)?;
    let selectors = rules
        .iter()
        .map(|rule| Selector::compile(table, rule))
        .collect::<Result<Vec<_>, _>>()?;

    let mut alive = vec![true; table.n_rows()];
    for selector in &selectors {
        for rows in duplicated_groups(&keys, &alive) {
            let keep = selector.select(&rows);
            if !keep.iter().any(|k| *k) {
                continue;
            }
            for (row, k) in rows.iter().zip(keep) {
                if !k {
                    alive[*row] = false;
                }
            }
        }
    }

    let mut seen = HashSet::new();
    let survivors: Vec<usize> = (0..table.n_rows())
        .filter(|&r| alive[r] && seen.insert(keys[r]))
        .collect();
    debug!(
        removed = table.n_rows() - survivors.len(),
        "duplicates resolved"
    );
    Ok(table.take(&survivors))
}
