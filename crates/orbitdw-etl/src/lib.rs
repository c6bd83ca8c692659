//! Extract-and-load driver for the orbitdw launch warehouse.
//!
//! Fetches launches, the rockets and launchpads they reference, optionally
//! archives the raw payloads, and loads everything through a
//! [`Warehouse`](orbitdw_core::warehouse::Warehouse).

pub mod config;
pub mod pipeline;
pub mod snapshot;

pub use config::EtlConfig;
pub use pipeline::{Pipeline, RunSummary, Stage, run_with};
pub use snapshot::SnapshotSink;
