// btbphylo-core/src/lib.rs

#![allow(missing_docs)]
// 1. Memory safety
#![deny(unsafe_code)]
// 2. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 3. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (traits)
// Contract for loading and persisting tables (DatasetSource).
pub mod ports;

// 2. Domain
// Typed tables, filter predicates, duplicate resolution, three-way reconciliation,
// exclusion reporting. Pure: no IO, no knowledge of the infra or application layers.
pub mod domain;

// 3. Infrastructure (adapters)
// CSV persistence, YAML/JSON configuration, atomic file writes.
pub mod infrastructure;

// 4. Application (use cases)
// Stage orchestration (update, filter, dedup, consistify, report, ViewBovine).
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use domain::table::{Column, ColumnData, ColumnKind, Table, TableSchema, Value};
pub use error::PhyloError;
