// btbphylo-core/src/infrastructure/adapters/mod.rs

pub mod csv;
pub use self::csv::CsvDatasets;
