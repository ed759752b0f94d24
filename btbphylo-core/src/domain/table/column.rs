// btbphylo-core/src/domain/table/column.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a column. Drives filter and tie-break dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Boolean,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Boolean => "boolean",
        };
        f.write_str(label)
    }
}

/// A single cell, detached from its column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
        }
    }
}

/// Column storage. Every cell is nullable.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnData {
    pub fn nulls(kind: ColumnKind, len: usize) -> Self {
        match kind {
            ColumnKind::Numeric => ColumnData::Numeric(vec![None; len]),
            ColumnKind::Categorical => ColumnData::Categorical(vec![None; len]),
            ColumnKind::Boolean => ColumnData::Boolean(vec![None; len]),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Boolean(_) => ColumnKind::Boolean,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            ColumnData::Numeric(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Categorical(v) => v.get(row).is_none_or(Option::is_none),
            ColumnData::Boolean(v) => v.get(row).is_none_or(Option::is_none),
        }
    }

    pub fn cell(&self, row: usize) -> Value {
        match self {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Number),
            ColumnData::Categorical(v) => v
                .get(row)
                .and_then(|c| c.clone())
                .map_or(Value::Null, Value::Text),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map_or(Value::Null, Value::Bool),
        }
    }

    pub(crate) fn take(&self, rows: &[usize]) -> ColumnData {
        fn pick<T: Clone>(values: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
            rows.iter()
                .map(|&r| values.get(r).cloned().flatten())
                .collect()
        }
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(pick(v, rows)),
            ColumnData::Categorical(v) => ColumnData::Categorical(pick(v, rows)),
            ColumnData::Boolean(v) => ColumnData::Boolean(pick(v, rows)),
        }
    }

    /// Appends `other` in place. Returns false when the kinds differ.
    pub(crate) fn extend_from(&mut self, other: &ColumnData) -> bool {
        match (self, other) {
            (ColumnData::Numeric(a), ColumnData::Numeric(b)) => a.extend_from_slice(b),
            (ColumnData::Categorical(a), ColumnData::Categorical(b)) => a.extend_from_slice(b),
            (ColumnData::Boolean(a), ColumnData::Boolean(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn numeric<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(
            name,
            ColumnData::Numeric(values.into_iter().map(Some).collect()),
        )
    }

    pub fn categorical<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            ColumnData::Categorical(values.into_iter().map(|s| Some(s.into())).collect()),
        )
    }

    pub fn boolean<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self::new(
            name,
            ColumnData::Boolean(values.into_iter().map(Some).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn into_data(self) -> ColumnData {
        self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&[Option<bool>]> {
        match &self.data {
            ColumnData::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }
}
