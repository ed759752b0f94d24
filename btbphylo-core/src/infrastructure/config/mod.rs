// btbphylo-core/src/infrastructure/config/mod.rs

pub mod filter;
pub mod project;

pub use filter::{load_filter_spec, resolve_filter_spec};
pub use project::load_project_config;
