// btbphylo-core/src/ports/mod.rs

pub mod dataset;
pub use dataset::DatasetSource;
