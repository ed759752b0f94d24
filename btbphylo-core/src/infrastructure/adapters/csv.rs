// btbphylo-core/src/infrastructure/adapters/csv.rs

use std::path::Path;
use tracing::{debug, instrument};

use crate::domain::table::{Column, ColumnData, ColumnKind, Table, TableSchema};
use crate::error::PhyloError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::dataset::DatasetSource;

/// `DatasetSource` over CSV files with a header row.
///
/// Empty cells are null, `#` starts a comment line, and unnamed leading index
/// columns are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvDatasets;

impl CsvDatasets {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(schema), fields(schema = schema.name()))]
    pub fn read(path: &Path, schema: &TableSchema) -> Result<Table, InfrastructureError> {
        if !path.exists() {
            return Err(InfrastructureError::NotFound(path.to_path_buf()));
        }
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .comment(Some(b'#'))
            .from_path(path)?;
        let headers = reader.headers()?.clone();

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut lines: Vec<u64> = Vec::new();
        for record in reader.records() {
            let record = record?;
            lines.push(record.position().map_or(0, |p| p.line()));
            for (slot, field) in cells.iter_mut().zip(record.iter()) {
                slot.push((!field.is_empty()).then(|| field.to_string()));
            }
        }

        let columns = headers
            .iter()
            .zip(cells)
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, raw)| {
                let data = parse_column(path, name, schema.kind_of(name), raw, &lines)?;
                Ok(Column::new(name, data))
            })
            .collect::<Result<Vec<_>, InfrastructureError>>()?;

        let table = Table::new(columns)
            .map_err(|e| InfrastructureError::ConfigError(format!("{}: {e}", path.display())))?;
        debug!(rows = table.n_rows(), "table loaded");
        Ok(table)
    }

    pub fn to_bytes(table: &Table) -> Result<Vec<u8>, InfrastructureError> {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(table.column_names())?;
        for index in 0..table.n_rows() {
            writer.write_record(table.row(index).iter().map(ToString::to_string))?;
        }
        writer
            .into_inner()
            .map_err(|e| InfrastructureError::Io(e.into_error()))
    }

    pub fn write(path: &Path, table: &Table) -> Result<(), InfrastructureError> {
        atomic_write(path, Self::to_bytes(table)?)?;
        debug!(path = ?path, rows = table.n_rows(), "table saved");
        Ok(())
    }
}

fn parse_column(
    path: &Path,
    name: &str,
    kind: ColumnKind,
    raw: Vec<Option<String>>,
    lines: &[u64],
) -> Result<ColumnData, InfrastructureError> {
    let bad_value = |row: usize, value: &str| InfrastructureError::ParseValue {
        path: path.to_path_buf(),
        line: lines.get(row).copied().unwrap_or_default(),
        column: name.to_string(),
        value: value.to_string(),
    };

    match kind {
        ColumnKind::Categorical => Ok(ColumnData::Categorical(raw)),
        ColumnKind::Numeric => raw
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(v) => v
                    .parse::<f64>()
                    .map(|n| (!n.is_nan()).then_some(n))
                    .map_err(|_| bad_value(row, v)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnData::Numeric),
        ColumnKind::Boolean => raw
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(v) => match v.to_ascii_lowercase().as_str() {
                    "true" | "1" => Ok(Some(true)),
                    "false" | "0" => Ok(Some(false)),
                    _ => Err(bad_value(row, v)),
                },
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ColumnData::Boolean),
    }
}

impl DatasetSource for CsvDatasets {
    fn load(&self, path: &Path, schema: &TableSchema) -> Result<Table, PhyloError> {
        Ok(Self::read(path, schema)?)
    }

    fn save(&self, path: &Path, table: &Table) -> Result<(), PhyloError> {
        Ok(Self::write(path, table)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::table::Value;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_types_columns_from_schema() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("summary.csv");
        fs::write(
            &path,
            "# exported 2024-01-01\nSample,pcMapped,Ncount,Outcome,Host\nAF-1,99.5,,Pass,Cow\nAF-2,NaN,12,Fail,\n",
        )?;
        let table = CsvDatasets::read(&path, &TableSchema::wgs())?;

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.require("pcMapped")?.kind(), ColumnKind::Numeric);
        assert_eq!(table.require("Host")?.kind(), ColumnKind::Categorical);
        assert_eq!(table.numeric("pcMapped")?, &[Some(99.5), None]);
        assert_eq!(table.numeric("Ncount")?, &[None, Some(12.0)]);
        assert_eq!(table.row(1)[4], Value::Null);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = CsvDatasets::read(Path::new("/nonexistent/cattle.csv"), &TableSchema::cattle())
            .unwrap_err();
        assert!(matches!(err, InfrastructureError::NotFound(p) if p.ends_with("cattle.csv")));
    }

    #[test]
    fn test_bad_numeric_cell_reports_line() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("movement.csv");
        fs::write(&path, "SampleName,Stay_Length\nA,3\nB,long\n")?;
        let err = CsvDatasets::read(&path, &TableSchema::movement()).unwrap_err();
        match err {
            InfrastructureError::ParseValue {
                line, column, value, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Stay_Length");
                assert_eq!(value, "long");
            }
            other => anyhow::bail!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_unnamed_index_column_is_dropped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cattle.csv");
        fs::write(&path, ",CVLRef,clade\n0,AF-1,B6-11\n")?;
        let table = CsvDatasets::read(&path, &TableSchema::cattle())?;
        assert_eq!(table.column_names(), vec!["CVLRef", "clade"]);
        Ok(())
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out/report.csv");
        let table = Table::new(vec![
            Column::categorical("Submission", ["AF-1", "AF-2"]),
            Column::numeric("pcMapped", [90.0, 85.25]),
            Column::new("wgs_data", ColumnData::Boolean(vec![Some(true), None])),
        ])?;
        CsvDatasets::write(&path, &table)?;
        assert_eq!(
            fs::read_to_string(&path)?,
            "Submission,pcMapped,wgs_data\nAF-1,90,True\nAF-2,85.25,\n"
        );

        let schema = TableSchema::new(
            "report",
            &[
                ("pcMapped", ColumnKind::Numeric),
                ("wgs_data", ColumnKind::Boolean),
            ],
        );
        assert_eq!(CsvDatasets::read(&path, &schema)?, table);
        Ok(())
    }
}
