// btbphylo-core/src/domain/filter/criterion.rs

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::domain::error::DomainError;

/// Config key prefix turning a categorical inclusion into an exclusion.
pub const EXCLUDE_PREFIX: &str = "not_";

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    /// Accept rows whose value is listed.
    Include(Vec<String>),
    /// Reject rows whose value is listed. Null cells pass.
    Exclude(Vec<String>),
}

impl Criterion {
    /// Interprets a persisted criterion: `[min, max]` or a list of strings.
    pub fn from_config(
        column: &str,
        value: &JsonValue,
        exclude: bool,
    ) -> Result<Criterion, DomainError> {
        let invalid = |reason: String| DomainError::InvalidConstraint {
            column: column.to_string(),
            reason,
        };

        let items = value
            .as_array()
            .ok_or_else(|| invalid(format!("expected a list, got {value}")))?;
        if items.is_empty() {
            return Err(invalid("empty list".into()));
        }

        if let Some(strings) = items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
        {
            return Ok(if exclude {
                Criterion::Exclude(strings)
            } else {
                Criterion::Include(strings)
            });
        }

        let numbers = items
            .iter()
            .map(JsonValue::as_f64)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid("mixes numbers and strings".into()))?;
        if exclude {
            return Err(invalid("exclusion takes a list of strings".into()));
        }
        match numbers[..] {
            [min, max] => Ok(Criterion::Range { min, max }),
            _ => Err(invalid(format!(
                "expected exactly two numbers [min, max], got {}",
                numbers.len()
            ))),
        }
    }

    fn to_config(&self) -> JsonValue {
        match self {
            Criterion::Range { min, max } => JsonValue::from(vec![*min, *max]),
            Criterion::Include(values) | Criterion::Exclude(values) => {
                JsonValue::from(values.clone())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub column: String,
    pub criterion: Criterion,
}

impl Constraint {
    /// Name of the constraint as written in a config file or on the CLI.
    pub fn key(&self) -> String {
        match self.criterion {
            Criterion::Exclude(_) => format!("{EXCLUDE_PREFIX}{}", self.column),
            _ => self.column.clone(),
        }
    }
}

/// Conjunction of per-column constraints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    constraints: Vec<Constraint>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, criterion: Criterion) -> Self {
        self.constraints.push(Constraint {
            column: column.into(),
            criterion,
        });
        self
    }

    pub fn range(self, column: impl Into<String>, min: f64, max: f64) -> Self {
        self.with(column, Criterion::Range { min, max })
    }

    /// Upper bound only.
    pub fn at_most(self, column: impl Into<String>, max: f64) -> Self {
        self.range(column, f64::NEG_INFINITY, max)
    }

    pub fn include<I, S>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(
            column,
            Criterion::Include(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn exclude<I, S>(self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(
            column,
            Criterion::Exclude(values.into_iter().map(Into::into).collect()),
        )
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn constrains(&self, column: &str) -> bool {
        self.constraints.iter().any(|c| c.column == column)
    }

    pub fn keys(&self) -> Vec<String> {
        self.constraints.iter().map(Constraint::key).collect()
    }

    /// Builds a spec from a persisted `column -> list` mapping. Keys prefixed
    /// with `not_` are exclusions.
    pub fn from_config(config: &BTreeMap<String, JsonValue>) -> Result<Self, DomainError> {
        config
            .iter()
            .try_fold(FilterSpec::new(), |spec, (key, value)| {
                let (column, exclude) = match key.strip_prefix(EXCLUDE_PREFIX) {
                    Some(column) => (column, true),
                    None => (key.as_str(), false),
                };
                let criterion = Criterion::from_config(column, value, exclude)?;
                Ok(spec.with(column, criterion))
            })
    }

    pub fn to_config(&self) -> BTreeMap<String, JsonValue> {
        self.constraints
            .iter()
            .map(|c| (c.key(), c.criterion.to_config()))
            .collect()
    }
}
