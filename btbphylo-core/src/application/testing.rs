// btbphylo-core/src/application/testing.rs

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::table::{Table, TableSchema};
use crate::error::PhyloError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::dataset::DatasetSource;

/// In-memory `DatasetSource` keyed by path.
#[derive(Debug, Default)]
pub struct MemoryDatasets {
    tables: Mutex<HashMap<PathBuf, Table>>,
}

impl MemoryDatasets {
    pub fn with(self, path: impl Into<PathBuf>, table: Table) -> Self {
        self.tables.lock().unwrap().insert(path.into(), table);
        self
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Table> {
        self.tables.lock().unwrap().get(path.as_ref()).cloned()
    }
}

impl DatasetSource for MemoryDatasets {
    fn load(&self, path: &Path, _schema: &TableSchema) -> Result<Table, PhyloError> {
        self.get(path)
            .ok_or_else(|| InfrastructureError::NotFound(path.to_path_buf()).into())
    }

    fn save(&self, path: &Path, table: &Table) -> Result<(), PhyloError> {
        self.tables
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), table.clone());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.tables.lock().unwrap().contains_key(path)
    }
}
