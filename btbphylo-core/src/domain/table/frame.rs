// btbphylo-core/src/domain/table/frame.rs

use std::collections::{BTreeSet, HashSet};

use crate::domain::error::DomainError;
use crate::domain::table::column::{Column, ColumnData, ColumnKind, Value};

/// Immutable rectangular table of named, typed columns.
///
/// Every operation returns a new table; row order is preserved unless an
/// operation explicitly selects rows in a different order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Builds a table, rejecting ragged columns and duplicate names.
    pub fn new(columns: Vec<Column>) -> Result<Self, DomainError> {
        let n_rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != n_rows {
                return Err(DomainError::SchemaError(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    n_rows
                )));
            }
            if !seen.insert(column.name()) {
                return Err(DomainError::SchemaError(format!(
                    "duplicate column '{}'",
                    column.name()
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Like [`Table::column`], but an absent column is an `UnknownColumn` error.
    pub fn require(&self, name: &str) -> Result<&Column, DomainError> {
        self.column(name).ok_or_else(|| DomainError::UnknownColumn {
            column: name.to_string(),
            valid: self.column_names(),
        })
    }

    /// Cells of a categorical column.
    pub fn categorical(&self, name: &str) -> Result<&[Option<String>], DomainError> {
        let column = self.require(name)?;
        column
            .as_categorical()
            .ok_or_else(|| DomainError::InvalidColumnType {
                column: name.to_string(),
                expected: ColumnKind::Categorical,
                found: column.kind(),
            })
    }

    /// Cells of a numeric column.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], DomainError> {
        let column = self.require(name)?;
        column
            .as_numeric()
            .ok_or_else(|| DomainError::InvalidColumnType {
                column: name.to_string(),
                expected: ColumnKind::Numeric,
                found: column.kind(),
            })
    }

    /// Values of a categorical key column, one per row.
    pub fn keys(&self, name: &str) -> Result<Vec<Option<&str>>, DomainError> {
        Ok(self
            .categorical(name)?
            .iter()
            .map(Option::as_deref)
            .collect())
    }

    /// Distinct non-null values of a categorical key column.
    pub fn key_set(&self, name: &str) -> Result<BTreeSet<String>, DomainError> {
        Ok(self
            .keys(name)?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }

    pub fn row(&self, index: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.data().cell(index)).collect()
    }

    /// Selects `rows` in the given order.
    pub fn take(&self, rows: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name(), c.data().take(rows)))
                .collect(),
            n_rows: rows.len(),
        }
    }

    /// Keeps the rows whose mask entry is true.
    pub fn filter_rows(&self, mask: &[bool]) -> Table {
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect();
        self.take(&rows)
    }

    /// Keeps the rows whose `key` value is in `keep`.
    pub fn retain_keys(&self, key: &str, keep: &BTreeSet<String>) -> Result<Table, DomainError> {
        let mask: Vec<bool> = self
            .keys(key)?
            .into_iter()
            .map(|k| k.is_some_and(|k| keep.contains(k)))
            .collect();
        Ok(self.filter_rows(&mask))
    }

    /// Replaces the column of the same name, or appends it.
    pub fn with_column(mut self, column: Column) -> Result<Table, DomainError> {
        if !self.columns.is_empty() && column.len() != self.n_rows {
            return Err(DomainError::SchemaError(format!(
                "column '{}' has {} rows, expected {}",
                column.name(),
                column.len(),
                self.n_rows
            )));
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        }
        match self.columns.iter_mut().find(|c| c.name() == column.name()) {
            Some(slot) => *slot = column,
            None => self.columns.push(column),
        }
        Ok(self)
    }

    /// Stacks tables vertically. All tables must share names, order and kinds.
    pub fn concat(tables: &[Table]) -> Result<Table, DomainError> {
        let Some((first, rest)) = tables.split_first() else {
            return Ok(Table::default());
        };
        let mut out = first.clone();
        for table in rest {
            if table.column_names() != out.column_names() {
                return Err(DomainError::SchemaError(format!(
                    "cannot concatenate tables with columns {:?} and {:?}",
                    out.column_names(),
                    table.column_names()
                )));
            }
            for (target, source) in out.columns.iter_mut().zip(&table.columns) {
                let (kind, other) = (target.kind(), source.kind());
                if !target.data_mut().extend_from(source.data()) {
                    return Err(DomainError::SchemaError(format!(
                        "column '{}' is {} in one table and {} in another",
                        source.name(),
                        kind,
                        other
                    )));
                }
            }
            out.n_rows += table.n_rows;
        }
        Ok(out)
    }

    /// Stacks tables over the union of their columns, in first-seen order.
    /// Rows of a table lacking a column get nulls; a column must keep one kind.
    pub fn concat_union(tables: &[Table]) -> Result<Table, DomainError> {
        let mut union: Vec<(String, ColumnKind)> = Vec::new();
        for column in tables.iter().flat_map(|t| &t.columns) {
            match union.iter().find(|(name, _)| name == column.name()) {
                Some((_, kind)) if *kind != column.kind() => {
                    return Err(DomainError::SchemaError(format!(
                        "column '{}' is {} in one table and {} in another",
                        column.name(),
                        kind,
                        column.kind()
                    )));
                }
                Some(_) => {}
                None => union.push((column.name().to_string(), column.kind())),
            }
        }

        let aligned: Vec<Table> = tables
            .iter()
            .map(|table| Table {
                columns: union
                    .iter()
                    .map(|(name, kind)| match table.column(name) {
                        Some(c) => c.clone(),
                        None => Column::new(name.as_str(), ColumnData::nulls(*kind, table.n_rows)),
                    })
                    .collect(),
                n_rows: table.n_rows,
            })
            .collect();
        Self::concat(&aligned)
    }

    /// A table with the same columns and no rows.
    pub fn empty_like(&self) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name(), ColumnData::nulls(c.kind(), 0)))
                .collect(),
            n_rows: 0,
        }
    }
}
