// btbphylo-core/src/domain/report/mod.rs

pub mod exclusion;

pub use exclusion::{EartagSource, MAPPING_THRESHOLD, excluded, exclusion_reasons, report};
