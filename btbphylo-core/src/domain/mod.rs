// btbphylo-core/src/domain/mod.rs

pub mod dedup;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod project;
pub mod reconcile;
pub mod report;
pub mod samples;
pub mod table;
pub mod thresholds;
