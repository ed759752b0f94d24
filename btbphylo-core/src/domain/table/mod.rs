// btbphylo-core/src/domain/table/mod.rs

pub mod column;
pub mod frame;
pub mod schema;

pub use column::{Column, ColumnData, ColumnKind, Value};
pub use frame::Table;
pub use schema::TableSchema;

/// Natural key of WGS samples.
pub const SUBMISSION: &str = "Submission";
pub const SAMPLE: &str = "Sample";
/// Natural key of the cattle dataset.
pub const CVL_REF: &str = "CVLRef";
/// Natural key of the movement dataset.
pub const SAMPLE_NAME: &str = "SampleName";

pub const OUTCOME: &str = "Outcome";
pub const FLAG: &str = "flag";
pub const GROUP: &str = "group";
pub const PC_MAPPED: &str = "pcMapped";
pub const N_COUNT: &str = "Ncount";
pub const RESULT_LOC: &str = "ResultLoc";
pub const CLADE: &str = "clade";
pub const MAX_N: &str = "maxN";
pub const STAY_LENGTH: &str = "Stay_Length";
