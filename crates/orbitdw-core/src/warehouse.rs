//! The `Warehouse` trait and the row types it reads back.
//!
//! The trait is implemented by storage backends (e.g. `orbitdw-store-sqlite`).
//! The ETL driver depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  keys::{DimensionSet, KeyMappings, SurrogateKey},
  record::Launch,
};

// ─── Row types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RocketRow {
  pub key:       SurrogateKey,
  pub spacex_id: String,
  pub name:      Option<String>,
  pub kind:      Option<String>,
  pub active:    bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchpadRow {
  pub key:       SurrogateKey,
  pub spacex_id: String,
  pub name:      Option<String>,
  pub region:    Option<String>,
  pub latitude:  Option<f64>,
  pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRow {
  pub key:           SurrogateKey,
  pub spacex_id:     String,
  pub name:          Option<String>,
  pub date_utc:      Option<String>,
  pub success:       Option<bool>,
  pub rocket_key:    Option<SurrogateKey>,
  pub launchpad_key: Option<SurrogateKey>,
  pub details:       Option<String>,
}

/// Outcome of a fact load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactLoad {
  pub inserted: usize,
  /// Facts whose natural key was already present.
  pub skipped:  usize,
  /// References stored as null because they did not resolve.
  pub orphans:  usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A relational warehouse with two dimension tables (rockets, launchpads) and
/// one fact table (launches).
///
/// Rows are only ever inserted. Every insert is keyed by natural key and is a
/// no-op when that key already exists, so re-running a load is safe.
pub trait Warehouse: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create every table, index and constraint that does not exist yet.
  /// Must complete before either loader runs on the same handle.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert each fetched dimension record if its natural key is absent, then
  /// read back the full natural-to-surrogate mapping of every dimension table.
  fn load_dimensions<'a>(
    &'a self,
    dims: &'a DimensionSet,
  ) -> impl Future<Output = Result<KeyMappings, Self::Error>> + Send + 'a;

  /// Insert each launch with references resolved through `keys`. Unresolved
  /// references are stored as null; launches already present are skipped.
  fn load_facts<'a>(
    &'a self,
    launches: &'a [Launch],
    keys: &'a KeyMappings,
  ) -> impl Future<Output = Result<FactLoad, Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn rockets(&self) -> impl Future<Output = Result<Vec<RocketRow>, Self::Error>> + Send + '_;

  fn launchpads(
    &self,
  ) -> impl Future<Output = Result<Vec<LaunchpadRow>, Self::Error>> + Send + '_;

  fn launches(&self) -> impl Future<Output = Result<Vec<LaunchRow>, Self::Error>> + Send + '_;

  /// Release the underlying connection.
  fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send
  where
    Self: Sized;
}
