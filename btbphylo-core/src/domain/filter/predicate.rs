// btbphylo-core/src/domain/filter/predicate.rs

use std::collections::HashSet;
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::filter::criterion::{Constraint, Criterion, FilterSpec};
use crate::domain::table::{ColumnData, ColumnKind, OUTCOME, Table};

/// Outcome value kept when the caller does not constrain `Outcome`.
pub const DEFAULT_OUTCOME: &str = "Pass";

/// Minimum number of surviving rows unless a wipe-out is allowed.
pub const MIN_SURVIVORS: usize = 2;

/// Non-fatal: constraint values that never occur in the column.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValues {
    pub column: String,
    pub values: Vec<String>,
}

impl fmt::Display for MissingValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "values {:?} are not present in column '{}'",
            self.values, self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub passed: Table,
    pub warnings: Vec<MissingValues>,
}

enum Check<'a> {
    Categorical {
        values: &'a [Option<String>],
        listed: HashSet<&'a str>,
        negate: bool,
    },
    Range {
        values: &'a [Option<f64>],
        min: f64,
        max: f64,
    },
}

impl Check<'_> {
    fn is_categorical(&self) -> bool {
        matches!(self, Check::Categorical { .. })
    }

    fn accepts(&self, row: usize) -> bool {
        match self {
            Check::Categorical {
                values,
                listed,
                negate,
            } => match values.get(row).and_then(Option::as_deref) {
                Some(v) => listed.contains(v) != *negate,
                None => *negate,
            },
            Check::Range { values, min, max } => values
                .get(row)
                .copied()
                .flatten()
                .is_some_and(|v| v >= *min && v <= *max),
        }
    }
}

fn compile<'a>(
    table: &'a Table,
    constraint: &'a Constraint,
    warnings: &mut Vec<MissingValues>,
) -> Result<Check<'a>, DomainError> {
    let column = table.require(&constraint.column)?;
    let name = &constraint.column;

    match (&constraint.criterion, column.data()) {
        (Criterion::Range { min, max }, ColumnData::Numeric(values)) => {
            if min.is_nan() || max.is_nan() || min >= max {
                return Err(DomainError::InvalidConstraint {
                    column: name.clone(),
                    reason: format!("min ({min}) must be less than max ({max})"),
                });
            }
            Ok(Check::Range {
                values,
                min: *min,
                max: *max,
            })
        }
        (Criterion::Include(listed) | Criterion::Exclude(listed), ColumnData::Categorical(values)) => {
            if listed.is_empty() {
                return Err(DomainError::InvalidConstraint {
                    column: name.clone(),
                    reason: "empty list".into(),
                });
            }
            let present: HashSet<&str> = values.iter().flatten().map(String::as_str).collect();
            let absent: Vec<String> = listed
                .iter()
                .filter(|v| !present.contains(v.as_str()))
                .cloned()
                .collect();
            if !absent.is_empty() {
                let warning = MissingValues {
                    column: name.clone(),
                    values: absent,
                };
                warn!(column = %name, values = ?warning.values, "{warning}");
                warnings.push(warning);
            }
            Ok(Check::Categorical {
                values,
                listed: listed.iter().map(String::as_str).collect(),
                negate: matches!(constraint.criterion, Criterion::Exclude(_)),
            })
        }
        (Criterion::Range { .. }, data) => Err(DomainError::InvalidColumnType {
            column: name.clone(),
            expected: ColumnKind::Numeric,
            found: data.kind(),
        }),
        (_, data) => Err(DomainError::InvalidColumnType {
            column: name.clone(),
            expected: ColumnKind::Categorical,
            found: data.kind(),
        }),
    }
}

/// Keeps the rows satisfying every constraint of `spec`.
///
/// Unless `spec` constrains `Outcome`, only `Outcome == "Pass"` rows survive.
/// Categorical constraints run before numeric ones. Fewer than two survivors
/// is `InsufficientSamples` unless `allow_wipe_out` is set.
#[instrument(level = "debug", skip_all, fields(rows = table.n_rows(), constraints = spec.len()))]
pub fn filter(
    table: &Table,
    spec: &FilterSpec,
    allow_wipe_out: bool,
) -> Result<FilterOutcome, DomainError> {
    let mut constraints = spec.constraints().to_vec();
    if !spec.constrains(OUTCOME) {
        constraints.push(Constraint {
            column: OUTCOME.to_string(),
            criterion: Criterion::Include(vec![DEFAULT_OUTCOME.to_string()]),
        });
    }

    let mut warnings = Vec::new();
    let checks = constraints
        .iter()
        .map(|c| compile(table, c, &mut warnings))
        .collect::<Result<Vec<_>, _>>()?;
    let (categorical, numeric): (Vec<_>, Vec<_>) =
        checks.into_iter().partition(|c| c.is_categorical());

    let mut mask = vec![true; table.n_rows()];
    for check in categorical.iter().chain(&numeric) {
        for (row, keep) in mask.iter_mut().enumerate() {
            if *keep {
                *keep = check.accepts(row);
            }
        }
    }

    let passed = table.filter_rows(&mask);
    debug!(passed = passed.n_rows(), "filter applied");
    if !allow_wipe_out && passed.n_rows() < MIN_SURVIVORS {
        return Err(DomainError::InsufficientSamples {
            passed: passed.n_rows(),
        });
    }
    Ok(FilterOutcome { passed, warnings })
}
