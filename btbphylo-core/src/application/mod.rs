// btbphylo-core/src/application/mod.rs

pub mod consistify;
pub mod dedup;
pub mod filter;
pub mod layout;
pub mod report;
pub mod summary;
pub mod thresholds;
pub mod view_bovine;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI calls `btbphylo_core::application::{view_bovine, filter_samples, ...}`
// without knowing the file layout.

pub use consistify::{DatasetPaths, consistify_datasets};
pub use dedup::de_duplicate;
pub use filter::filter_samples;
pub use layout::ResultsLayout;
pub use report::{EartagInputs, exclusion_report};
pub use summary::{discover_batches, update_samples};
pub use thresholds::clade_thresholds;
pub use view_bovine::{CladePasses, clade_passes, view_bovine};
