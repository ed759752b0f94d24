// btbphylo-core/src/ports/dataset.rs

use std::path::Path;

use crate::domain::table::{Table, TableSchema};
use crate::error::PhyloError;

/// Loads and persists tables. Implemented by the CSV adapter and by test doubles.
pub trait DatasetSource: Send + Sync {
    /// Reads the table at `path`, typing columns with `schema`.
    ///
    /// A missing file is `InfrastructureError::NotFound` carrying the path.
    fn load(&self, path: &Path, schema: &TableSchema) -> Result<Table, PhyloError>;

    /// Writes `table` to `path`, creating parent directories.
    fn save(&self, path: &Path, table: &Table) -> Result<(), PhyloError>;

    fn exists(&self, path: &Path) -> bool;
}
