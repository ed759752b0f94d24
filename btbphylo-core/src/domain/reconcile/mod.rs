// btbphylo-core/src/domain/reconcile/mod.rs

pub mod consistify;
pub mod process;

pub use consistify::{MissingSamples, Reconciliation, consistify};
pub use process::{ConsistifyMetadata, ProcessedDatasets, clade_correction, fix_movement, process};
