// btbphylo-core/src/domain/filter/mod.rs

pub mod criterion;
pub mod predicate;

pub use criterion::{Constraint, Criterion, EXCLUDE_PREFIX, FilterSpec};
pub use predicate::{DEFAULT_OUTCOME, FilterOutcome, MissingValues, filter};
