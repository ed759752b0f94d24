// btbphylo-core/src/domain/dedup/mod.rs

pub mod resolver;
pub mod rule;

pub use resolver::resolve_duplicates;
pub use rule::{TieBreak, TieBreakTarget, default_rules};
