// btbphylo-core/src/domain/table/schema.rs

use crate::domain::error::DomainError;
use crate::domain::table::column::{Column, ColumnData, ColumnKind};
use crate::domain::table::frame::Table;

use ColumnKind::{Categorical, Numeric};

/// Columns of the WGS sample summary, in file order.
const WGS_COLUMNS: &[(&str, ColumnKind)] = &[
    ("Sample", Categorical),
    ("GenomeCov", Numeric),
    ("MeanDepth", Numeric),
    ("NumRawReads", Numeric),
    ("pcMapped", Numeric),
    ("Outcome", Categorical),
    ("flag", Categorical),
    ("group", Categorical),
    ("CSSTested", Numeric),
    ("matches", Numeric),
    ("mismatches", Numeric),
    ("noCoverage", Numeric),
    ("anomalous", Numeric),
    ("Ncount", Numeric),
    ("ResultLoc", Categorical),
    ("ID", Categorical),
    ("TotalReads", Numeric),
    ("Abundance", Numeric),
    ("Submission", Categorical),
];

const CATTLE_COLUMNS: &[(&str, ColumnKind)] = &[("CVLRef", Categorical), ("clade", Categorical)];

const MOVEMENT_COLUMNS: &[(&str, ColumnKind)] =
    &[("SampleName", Categorical), ("Stay_Length", Numeric)];

const CLADE_INFO_COLUMNS: &[(&str, ColumnKind)] = &[("clade", Categorical), ("maxN", Numeric)];

/// Declared column kinds for a table type. Undeclared columns are categorical.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    name: &'static str,
    columns: Vec<(String, ColumnKind)>,
}

impl TableSchema {
    pub fn new(name: &'static str, columns: &[(&str, ColumnKind)]) -> Self {
        Self {
            name,
            columns: columns
                .iter()
                .map(|(n, k)| ((*n).to_string(), *k))
                .collect(),
        }
    }

    pub fn wgs() -> Self {
        Self::new("wgs", WGS_COLUMNS)
    }

    pub fn cattle() -> Self {
        Self::new("cattle", CATTLE_COLUMNS)
    }

    pub fn movement() -> Self {
        Self::new("movement", MOVEMENT_COLUMNS)
    }

    pub fn clade_info() -> Self {
        Self::new("clade_info", CLADE_INFO_COLUMNS)
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn kind_of(&self, column: &str) -> ColumnKind {
        self.columns
            .iter()
            .find(|(n, _)| n == column)
            .map_or(Categorical, |(_, k)| *k)
    }

    pub fn declared(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(n, k)| (n.as_str(), *k))
    }

    /// A table holding every declared column and no rows.
    pub fn empty_table(&self) -> Table {
        let columns = self
            .declared()
            .map(|(n, k)| Column::new(n, ColumnData::nulls(k, 0)))
            .collect();
        // Declared names are unique and every column is empty.
        Table::new(columns).unwrap_or_default()
    }

    /// Reorders `table` to the declared column order, adding null columns for
    /// declared columns it lacks. Extra columns follow in their original order.
    pub fn conform(&self, table: &Table) -> Result<Table, DomainError> {
        let n = table.n_rows();
        let mut columns = Vec::with_capacity(table.columns().len());
        for (name, kind) in self.declared() {
            match table.column(name) {
                Some(c) if c.kind() == kind => columns.push(c.clone()),
                Some(c) => {
                    return Err(DomainError::InvalidColumnType {
                        column: name.to_string(),
                        expected: kind,
                        found: c.kind(),
                    });
                }
                None => columns.push(Column::new(name, ColumnData::nulls(kind, n))),
            }
        }
        for column in table.columns() {
            if !self.columns.iter().any(|(n, _)| n == column.name()) {
                columns.push(column.clone());
            }
        }
        Table::new(columns)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_undeclared_columns_are_categorical() {
        let schema = TableSchema::wgs();
        assert_eq!(schema.kind_of("pcMapped"), Numeric);
        assert_eq!(schema.kind_of("Host"), Categorical);
    }

    #[test]
    fn test_conform_orders_and_pads() -> Result<()> {
        let schema = TableSchema::clade_info();
        let table = Table::new(vec![
            Column::numeric("maxN", [10.0]),
            Column::categorical("note", ["x"]),
        ])?;
        let out = schema.conform(&table)?;
        assert_eq!(out.column_names(), vec!["clade", "maxN", "note"]);
        assert!(out.require("clade")?.data().is_null(0));
        Ok(())
    }

    #[test]
    fn test_conform_rejects_kind_mismatch() -> Result<()> {
        let table = Table::new(vec![Column::categorical("maxN", ["ten"])])?;
        assert!(matches!(
            TableSchema::clade_info().conform(&table),
            Err(DomainError::InvalidColumnType { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_empty_wgs_table_has_all_columns() {
        let table = TableSchema::wgs().empty_table();
        assert_eq!(table.column_names().len(), WGS_COLUMNS.len());
        assert!(table.is_empty());
    }
}
